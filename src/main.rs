use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use claimdesk::api::{DashboardClient, PushSubscription, RequestSequencer};
use claimdesk::claims::detailed;
use claimdesk::claims::filter::parse_selection;
use claimdesk::claims::view::ViewChange;
use claimdesk::claims::{ClaimStatus, ClaimsView, FilterCriteria, SortOrder, TimePeriod};
use claimdesk::config::Config;
use claimdesk::events::LiveFeed;
use claimdesk::export;
use claimdesk::insights::{InsightFilter, InsightsView};
use claimdesk::notify::{Notifier, TerminalNotifier};
use claimdesk::output::terminal;
use claimdesk::refresh;

/// Claimdesk: browse, filter and export the output of a fake news
/// detection backend from the terminal.
#[derive(Parser)]
#[command(name = "claimdesk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Claims filter options shared by several commands.
#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Category to show, or "all"
    #[arg(long, default_value = "all")]
    category: String,

    /// Status to show: false, verified, pending or "all"
    #[arg(long, default_value = "all")]
    status: String,

    /// Case-insensitive text search
    #[arg(long, default_value = "")]
    search: String,

    /// Time window: all, 7d, 30d, 90d or 1y
    #[arg(long, default_value = "all")]
    time_period: TimePeriod,

    /// Sort: date_desc, date_asc, confidence_desc or confidence_asc
    #[arg(long, default_value = "date_desc")]
    sort: SortOrder,
}

impl FilterArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        let status = parse_selection(&self.status)
            .map(|s| ClaimStatus::from_str(&s))
            .transpose()?;
        Ok(FilterCriteria {
            category: parse_selection(&self.category),
            status,
            search_term: self.search.trim().to_string(),
            time_period: self.time_period,
            sort: self.sort,
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    /// Server-side export of the filtered claims
    Claims,
    /// The locally filtered and sorted claims list
    View,
    /// Insights for the selected time period
    Insights,
    /// Sources analysis
    Sources,
    /// Server-side detailed report with reach and verification metadata
    Detailed,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of claims, filtered and sorted
    Claims {
        #[command(flatten)]
        filters: FilterArgs,

        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Ignore every filter option and show all claims
        #[arg(long)]
        reset: bool,
    },

    /// Show insight cards
    Insights {
        /// Time window: all, 7d, 30d, 90d or 1y
        #[arg(long, default_value = "all")]
        time_period: TimePeriod,

        /// Category to show, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        /// Impact to show: high, medium, low or "all"
        #[arg(long, default_value = "all")]
        impact: String,

        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Show claims with source, reach and verification details
    Details {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Submit text to the backend for verification
    Analyze {
        /// Text to analyze
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the sources analysis
    Sources,

    /// Show recent updates, trending topics and the crisis monitor
    Dashboard,

    /// Write a dated JSON export
    Export {
        /// What to export
        #[arg(long, value_enum, default_value = "view")]
        kind: ExportKind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory (defaults to CLAIMDESK_EXPORT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Keep a claims page on screen, refreshing in the background
    Watch {
        #[command(flatten)]
        filters: FilterArgs,

        /// Seconds between refreshes (defaults to CLAIMDESK_POLL_SECS)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Follow the backend's live push events
    Live,

    /// Show backend status (reachability, record counts, settings)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("claimdesk=info")),
        )
        .init();

    let cli = Cli::parse();
    let notifier = TerminalNotifier;

    match cli.command {
        Commands::Claims {
            filters,
            page,
            reset,
        } => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;
            let criteria = filters.criteria()?;

            let mut view = ClaimsView::new(config.page_size);
            load_claims(&client, &mut view, &notifier).await;
            if view.load_state().is_failed() {
                terminal::display_claims_page(&view);
                return Ok(());
            }

            if !reset && !criteria.is_default() {
                view.apply_filter(criteria);
                notifier.success(&format!(
                    "Applied filters: {} claims found",
                    view.filtered_len()
                ));
            }

            view.go_to_page(page);
            if page != view.current_page() && view.filtered_len() > 0 {
                notifier.warning(&format!(
                    "Page {page} is out of range (1-{}), showing page {}",
                    view.total_pages(),
                    view.current_page()
                ));
            }

            terminal::display_claims_page(&view);
        }

        Commands::Insights {
            time_period,
            category,
            impact,
            page,
        } => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;

            let spinner = spinner("Loading insights...");
            let result = client.fetch_all_insights(time_period).await;
            spinner.finish_and_clear();

            let insights = match result {
                Ok(insights) => insights,
                Err(e) => {
                    notifier.error(&format!("Error loading insights: {e}"));
                    return Ok(());
                }
            };

            let mut view = InsightsView::default();
            view.load(insights);
            view.apply_filter(InsightFilter {
                category: parse_selection(&category),
                impact: parse_selection(&impact),
            });
            view.go_to_page(page);
            terminal::display_insights(&view);
        }

        Commands::Details { filters } => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;
            let criteria = filters.criteria()?;

            let spinner = spinner("Loading detailed analysis...");
            let result = client.fetch_detailed_claims(&criteria).await;
            spinner.finish_and_clear();

            match result {
                Ok(records) => {
                    let selected = detailed::select(&records, &criteria, chrono::Utc::now());
                    terminal::display_detailed_claims(&selected);
                }
                Err(e) => notifier.error(&format!("Error loading detailed analysis: {e}")),
            }
        }

        Commands::Analyze { text } => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;

            let spinner = spinner("Analyzing...");
            let result = client.analyze(&text.join(" ")).await;
            spinner.finish_and_clear();

            match result {
                Ok(analysis) => terminal::display_analysis(&analysis),
                Err(e) => notifier.error(&format!("Error analyzing text: {e}")),
            }
        }

        Commands::Sources => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;

            let spinner = spinner("Loading sources analysis...");
            let result = client.fetch_sources().await;
            spinner.finish_and_clear();

            match result {
                Ok(analysis) => terminal::display_sources(&analysis),
                Err(e) => notifier.error(&format!("Error loading sources analysis: {e}")),
            }
        }

        Commands::Dashboard => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;

            // Both panels are independent: one failing still shows the other.
            match client.fetch_updates().await {
                Ok(updates) => terminal::display_updates(&updates),
                Err(e) => notifier.error(&format!("Error loading updates: {e}")),
            }
            match client.fetch_trends().await {
                Ok(trends) => terminal::display_trends(&trends),
                Err(e) => notifier.error(&format!("Error loading trends: {e}")),
            }

            let stats = match client.fetch_crisis_stats().await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    notifier.error(&format!("Error loading crisis stats: {e}"));
                    None
                }
            };
            let alerts = match client.fetch_crisis_alerts().await {
                Ok(alerts) => alerts,
                Err(e) => {
                    notifier.error(&format!("Error loading crisis alerts: {e}"));
                    Vec::new()
                }
            };
            terminal::display_crisis(stats.as_ref(), &alerts);
        }

        Commands::Export { kind, filters, out } => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;
            let criteria = filters.criteria()?;
            let dir = out.unwrap_or_else(|| config.export_dir.clone());

            let spinner = spinner("Preparing export...");
            let result = match kind {
                ExportKind::Claims => client
                    .fetch_export(&criteria)
                    .await
                    .map(|doc| (export::SERVER_CLAIMS_PREFIX, doc)),
                ExportKind::View => client
                    .fetch_claims(&FilterCriteria::default())
                    .await
                    .map(|claims| {
                        let mut view = ClaimsView::new(config.page_size);
                        view.load(claims);
                        view.apply_filter(criteria);
                        (export::CLAIMS_PREFIX, view.export_payload())
                    }),
                ExportKind::Insights => client
                    .fetch_all_insights(criteria.time_period)
                    .await
                    .map(|insights| (export::INSIGHTS_PREFIX, json!({ "insights": insights }))),
                ExportKind::Sources => match client.fetch_sources().await {
                    Ok(analysis) => serde_json::to_value(&analysis)
                        .map(|doc| (export::SOURCES_PREFIX, doc))
                        .map_err(anyhow::Error::from),
                    Err(e) => Err(e),
                },
                ExportKind::Detailed => client
                    .fetch_detailed_export(&criteria)
                    .await
                    .map(|doc| (export::DETAILED_PREFIX, doc)),
            };
            spinner.finish_and_clear();

            match result {
                Ok((prefix, document)) => {
                    let path = export::write_export(&dir, prefix, &document)?;
                    notifier.success(&format!("Exported to {}", path.display()));
                }
                Err(e) => notifier.error(&format!("Export failed: {e}")),
            }
        }

        Commands::Watch { filters, interval } => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;
            let criteria = filters.criteria()?;
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.poll_interval);
            if interval.is_zero() {
                anyhow::bail!("--interval must be at least 1 second.");
            }

            let mut view = ClaimsView::new(config.page_size);
            load_claims(&client, &mut view, &notifier).await;
            view.apply_filter(criteria);
            terminal::display_claims_page(&view);

            view.subscribe(|change: ViewChange, view: &ClaimsView| {
                if matches!(change, ViewChange::Refreshed | ViewChange::LoadFailed) {
                    println!(
                        "\n{}",
                        format!("Refreshed at {}", chrono::Local::now().format("%H:%M:%S"))
                            .dimmed()
                    );
                    terminal::display_claims_page(view);
                }
            });

            let view = Arc::new(Mutex::new(view));
            let handle = refresh::spawn_poller(
                Arc::new(client),
                Arc::clone(&view),
                Arc::new(RequestSequencer::new()),
                interval,
            );
            info!(interval_secs = interval.as_secs(), "Watching claims");
            println!(
                "{}",
                format!("Refreshing every {}s. Press Ctrl-C to stop.", interval.as_secs())
                    .dimmed()
            );

            tokio::signal::ctrl_c().await?;
            handle.stop();
        }

        Commands::Live => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;
            let mut feed = LiveFeed::new();

            match client.fetch_updates().await {
                Ok(updates) => {
                    feed.merge_polled(updates);
                }
                Err(e) => warn!(error = %e, "Could not load recent updates"),
            }
            match client.fetch_crisis_alerts().await {
                Ok(alerts) => feed.load_crises(alerts),
                Err(e) => warn!(error = %e, "Could not load crisis alerts"),
            }
            terminal::display_live_feed(&feed);

            let mut subscription = match PushSubscription::connect(&config.socket_url).await {
                Ok(subscription) => subscription,
                Err(e) => {
                    notifier.error(&format!("Could not subscribe to live events: {e:#}"));
                    return Ok(());
                }
            };
            println!(
                "\n{}",
                format!("Listening on {} (Ctrl-C to stop)...", config.socket_url).dimmed()
            );

            loop {
                tokio::select! {
                    event = subscription.next() => match event {
                        Some(event) => {
                            if feed.apply(event.clone()) {
                                terminal::display_push_event(&event, &feed);
                            }
                        }
                        None => {
                            notifier.warning("Live event stream closed");
                            break;
                        }
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            if let Err(e) = subscription.close().await {
                warn!(error = %e, "Push subscription did not close cleanly");
            }
            terminal::display_live_feed(&feed);
        }

        Commands::Status => {
            let config = Config::load()?;
            let client = DashboardClient::new(&config.api_url)?;
            claimdesk::status::show(&client, &config).await?;
        }
    }

    Ok(())
}

/// Fetch the full claim set into `view`, recording failures on the view and
/// surfacing them through `notifier`.
async fn load_claims(client: &DashboardClient, view: &mut ClaimsView, notifier: &dyn Notifier) {
    view.mark_loading();
    let spinner = spinner("Loading claims...");
    let result = client.fetch_claims(&FilterCriteria::default()).await;
    spinner.finish_and_clear();

    match result {
        Ok(claims) => {
            view.load(claims);
            if view.all_claims().is_empty() {
                notifier.warning("No claims data available");
            }
        }
        Err(e) => {
            let message = format!("Error loading claims: {e}");
            notifier.error(&message);
            view.fail_load(message);
        }
    }
}

/// Indeterminate spinner for a single fetch.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
