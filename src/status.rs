// Backend status display: reachability and record counts per endpoint.

use anyhow::Result;
use colored::Colorize;

use crate::api::client::DashboardClient;
use crate::claims::filter::{FilterCriteria, TimePeriod};
use crate::config::Config;

/// Display backend status to the terminal.
///
/// Each endpoint is probed independently; one failing doesn't hide the rest.
pub async fn show(client: &DashboardClient, config: &Config) -> Result<()> {
    println!("Backend: {}", client.base_url());
    println!("Push events: {}", config.socket_url);
    println!("Export directory: {}", config.export_dir.display());
    println!(
        "Page size: {}   Poll interval: {}s",
        config.page_size,
        config.poll_interval.as_secs()
    );
    println!();

    match client.fetch_claims(&FilterCriteria::default()).await {
        Ok(claims) => {
            let dated = claims.iter().filter(|c| c.parsed_date().is_some()).count();
            println!("Claims: {} ({} with a usable date)", claims.len(), dated);
        }
        Err(e) => println!("Claims: {} {}", "unavailable".red(), e),
    }

    match client.fetch_insights(TimePeriod::All).await {
        Ok(insights) => println!("Recent insights: {}", insights.len()),
        Err(e) => println!("Recent insights: {} {}", "unavailable".red(), e),
    }

    match client.fetch_crisis_stats().await {
        Ok(stats) => println!(
            "Crisis monitor: {} active, {} high risk alerts",
            stats.active_crises, stats.high_risk_alerts
        ),
        Err(e) => println!("Crisis monitor: {} {}", "unavailable".red(), e),
    }

    match client.fetch_sources().await {
        Ok(analysis) => {
            let summary = analysis.summary();
            println!(
                "Sources: {} claims, {}% false overall",
                summary.total_claims, summary.overall_false_rate
            );
        }
        Err(e) => println!("Sources: {} {}", "unavailable".red(), e),
    }

    match client.fetch_updates().await {
        Ok(updates) if updates.is_empty() => println!("Recent updates: none yet"),
        Ok(updates) => println!("Recent updates: {}", updates.len()),
        Err(e) => println!("Recent updates: {} {}", "unavailable".red(), e),
    }

    Ok(())
}
