// Colored terminal output for the dashboard views.
//
// Everything here only reads: views hand over their current page and the
// functions below print it. The "no results" and "failed" states are drawn
// distinctly so an empty filter is never mistaken for a broken backend.

use colored::Colorize;

use super::{format_compact, format_count, percent_bar, truncate_chars};
use crate::analysis::AnalysisResult;
use crate::claims::detailed::{summarize, DetailedClaim};
use crate::claims::models::{source_label, Claim, ClaimStatus};
use crate::claims::view::ClaimsView;
use crate::crisis::{CrisisAlert, CrisisStats};
use crate::dashboard::{is_top_rank, DashboardUpdate, Trend};
use crate::events::{LiveFeed, PushEvent};
use crate::insights::{Impact, InsightsView};
use crate::notify::LoadState;
use crate::sources::SourcesAnalysis;

/// Display the current page of the claims view.
pub fn display_claims_page(view: &ClaimsView) {
    if let LoadState::Failed(message) = view.load_state() {
        println!("\n  {}", message.red());
        return;
    }

    println!(
        "\n{}",
        format!("=== Claims ({} matching) ===", view.filtered_len()).bold()
    );

    if view.filtered_len() == 0 {
        println!();
        println!("  No claims found matching the current filters.");
        if !view.criteria().is_default() {
            println!("  {}", "Run without filters (or --reset) to see everything.".dimmed());
        }
        return;
    }

    println!();
    println!(
        "  {:<9}  {:<48} {:<12} {:<9} {:<10} {:<16} {:<9}",
        "ID".dimmed(),
        "Claim".dimmed(),
        "Category".dimmed(),
        "Status".dimmed(),
        "Date".dimmed(),
        "Confidence".dimmed(),
        "Source".dimmed(),
    );
    println!("  {}", "-".repeat(122).dimmed());

    for claim in view.current_page_items() {
        display_claim_row(claim);
    }

    println!();
    display_pagination(view);
}

fn display_claim_row(claim: &Claim) {
    let date = if claim.date.is_empty() { "-" } else { claim.date.as_str() };
    println!(
        "  {:<9}  {:<48} {:<12} {:<9} {:<10} {} {:>3}% {:<9}",
        claim.id.to_string(),
        truncate_chars(&claim.text, 45),
        truncate_chars(&claim.category, 12),
        colorize_status(&claim.status),
        date,
        percent_bar(claim.confidence as u64, 10).cyan(),
        claim.confidence,
        source_label(&claim.id),
    );
}

/// "Page x of y" footer with navigation hints.
pub fn display_pagination(view: &ClaimsView) {
    let total = view.total_pages();
    let mut footer = format!("  Page {} of {}", view.current_page(), total);
    if view.has_previous() {
        footer.push_str(&format!("  (--page {} for previous)", view.current_page() - 1));
    }
    if view.has_next() {
        footer.push_str(&format!("  (--page {} for next)", view.current_page() + 1));
    }
    println!("{}", footer.dimmed());
}

/// Display the current page of insight cards.
pub fn display_insights(view: &InsightsView) {
    println!(
        "\n{}",
        format!("=== Insights ({}) ===", view.visible_len()).bold()
    );

    if view.visible_len() == 0 {
        println!("\n  No insights match the current filter criteria.");
        return;
    }

    for insight in view.current_page_items() {
        let arrow = if insight.is_rising() {
            format!("▲ {:.0}%", insight.trend.abs()).red()
        } else {
            format!("▼ {:.0}%", insight.trend.abs()).green()
        };

        println!();
        println!(
            "  [{}] {}  {}",
            insight.category.dimmed(),
            colorize_impact(insight.impact_level()),
            arrow
        );
        println!("  {}", insight.title.bold());
        println!("  {}", truncate_chars(&insight.content, 100));

        let mut meta = insight.time.clone();
        if let Some(confidence) = insight.confidence {
            meta.push_str(&format!("  ·  {confidence:.0}% confidence"));
        }
        println!("  {}", meta.dimmed());
    }

    if view.total_pages() > 1 {
        println!(
            "\n{}",
            format!("  Page {} of {}", view.current_page(), view.total_pages()).dimmed()
        );
    }
}

/// Display the sources table, headline stats and platform false rates.
pub fn display_sources(analysis: &SourcesAnalysis) {
    let summary = analysis.summary();

    println!("\n{}", "=== Sources Analysis ===".bold());
    println!();
    println!(
        "  Total claims analyzed: {}   Overall false rate: {}%   Platforms monitored: {}",
        format_count(summary.total_claims).bold(),
        summary.overall_false_rate.to_string().bold(),
        summary.platforms_monitored.to_string().bold(),
    );
    println!();

    println!(
        "  {:<14} {:>8} {:>8} {:>9}  {}",
        "Source".dimmed(),
        "Total".dimmed(),
        "False".dimmed(),
        "Verified".dimmed(),
        "False rate".dimmed(),
    );
    println!("  {}", "-".repeat(62).dimmed());

    for row in analysis.rows() {
        println!(
            "  {:<14} {:>8} {:>8} {:>9}  {} {:>3}%",
            row.label.bold(),
            format_count(row.total),
            format_count(row.false_claims),
            format_count(row.verified),
            percent_bar(row.false_rate, 12).red(),
            row.false_rate,
        );
    }

    if !analysis.social_media.platforms.is_empty() {
        println!("\n  {}", "False claims rate by platform:".bold());
        for platform in &analysis.social_media.platforms {
            let rate = platform.false_rate.round().clamp(0.0, 100.0) as u64;
            println!(
                "    {:<12} {} {:>3}%  ({} claims)",
                platform.name,
                percent_bar(rate, 20).red(),
                rate,
                format_count(platform.claims),
            );
        }
    }
}

/// Display polled dashboard updates.
pub fn display_updates(updates: &[DashboardUpdate]) {
    println!("\n{}", "=== Recent Updates ===".bold());
    if updates.is_empty() {
        println!("  No recent updates.");
        return;
    }
    for update in updates {
        println!(
            "  {:<10} {}  {}",
            colorize_status(&update.claim_status()),
            update.title.bold(),
            update.time.dimmed()
        );
        if !update.content.is_empty() {
            println!("             {}", update.content.dimmed());
        }
    }
}

/// Display trending topics, highlighting the top three.
pub fn display_trends(trends: &[Trend]) {
    println!("\n{}", format!("=== Trending ({}) ===", trends.len()).bold());
    for (i, trend) in trends.iter().enumerate() {
        let rank = format!("{:>2}.", i + 1);
        let rank = if is_top_rank(i) { rank.red().bold() } else { rank.normal() };
        println!(
            "  {} {:<28} {} mentions, {} false",
            rank,
            trend.topic,
            trend.mentions,
            trend.false_claims.to_string().red()
        );
    }
}

/// One line per push event as it arrives. Review items that belong to a
/// known crisis get that crisis's badge.
pub fn display_push_event(event: &PushEvent, feed: &LiveFeed) {
    match event {
        PushEvent::NewVerification(v) => println!(
            "  {} {}  {}",
            colorize_status(&v.status()),
            truncate_chars(&v.claim, 50),
            format!("Claim analyzed: {}", v.severity).dimmed()
        ),
        PushEvent::HumanReview(v) => {
            println!(
                "  {} {}  {}",
                "REVIEW".magenta().bold(),
                truncate_chars(&v.claim, 50),
                format!("score {:.2}", v.score).dimmed()
            );
            if let Some(alert) = feed.crisis_for(&v.claim) {
                println!("         {}", alert.badge().red().bold());
            }
        }
        PushEvent::CrisisAlert(alert) => {
            println!(
                "  {} {}",
                alert.badge().on_red().white().bold(),
                alert.claim.bold()
            );
            if let Some(action) = &alert.recommended_action {
                println!("         {} {}", "Recommended:".dimmed(), action);
            }
        }
    }
}

/// Summary of the live feed: counters and the current panel contents.
pub fn display_live_feed(feed: &LiveFeed) {
    let counts = feed.counts();
    println!(
        "\n{}  {} false  {} verified  {} pending",
        "=== Live Feed ===".bold(),
        counts.false_claims.to_string().red(),
        counts.verified.to_string().green(),
        counts.pending.to_string().yellow(),
    );
    if let Some(alert) = feed.crisis() {
        println!("  {} {}", alert.badge().on_red().white().bold(), alert.claim);
    }
    for update in feed.updates() {
        println!(
            "  {:<10} {}  {}",
            colorize_status(&update.status),
            truncate_chars(&update.claim, 50),
            update.time.dimmed()
        );
    }
    let queued = feed.review_queue().count();
    if queued > 0 {
        println!("  {} awaiting human review", queued.to_string().magenta().bold());
    }
}

/// Crisis headline numbers and the active alerts.
pub fn display_crisis(stats: Option<&CrisisStats>, alerts: &[CrisisAlert]) {
    println!("\n{}", "=== Crisis Monitor ===".bold());
    if let Some(stats) = stats {
        println!(
            "  {} active crises   {} crisis claims today   {} high risk alerts   {}m avg response",
            stats.active_crises.to_string().red().bold(),
            stats.crisis_claims_today.to_string().bold(),
            stats.high_risk_alerts.to_string().red(),
            stats.response_time_minutes,
        );
    }
    if alerts.is_empty() {
        println!("  No active crisis alerts.");
        return;
    }
    for alert in alerts {
        println!();
        println!("  {}  {}", alert.badge().red().bold(), alert.claim.bold());
        let mut meta = Vec::new();
        if let Some(reach) = alert.reach {
            meta.push(format!("reach {}", format_count(reach)));
        }
        if let Some(first) = &alert.first_detected {
            meta.push(format!("first seen {first}"));
        }
        if let Some(trend) = &alert.trend {
            meta.push(trend.clone());
        }
        if !meta.is_empty() {
            println!("  {}", meta.join("  ·  ").dimmed());
        }
        if let Some(action) = &alert.recommended_action {
            println!("  {} {}", "Recommended:".dimmed(), action);
        }
    }
}

/// Result of an on-demand analysis.
pub fn display_analysis(result: &AnalysisResult) {
    println!("\n{}", "=== Analysis ===".bold());

    if result.claims.is_empty() {
        println!("  No verifiable claims found in the text.");
    } else {
        println!("  {}", "Claims found:".dimmed());
        for claim in &result.claims {
            println!("    - {claim}");
        }
    }

    let Some(report) = &result.verification else {
        return;
    };
    println!();
    println!(
        "  {}  {}  score {:+.2}",
        colorize_status(&report.status()),
        report.severity.bold(),
        report.score
    );
    println!(
        "  Confidence: {} {:.1}%",
        percent_bar(report.confidence_percent().round() as u64, 20).cyan(),
        report.confidence_percent()
    );
    if !report.verification_method.is_empty() {
        println!("  {} {}", "Method:".dimmed(), report.verification_method);
    }
    if !report.analysis.is_empty() {
        println!("\n  {}", report.analysis);
    }
}

/// Detailed claims table with its summary line.
pub fn display_detailed_claims(records: &[&DetailedClaim]) {
    let summary = summarize(records.iter().copied());
    println!(
        "\n{}",
        format!("=== Detailed Analysis ({} claims) ===", summary.total).bold()
    );
    if records.is_empty() {
        println!("\n  No claims found matching the current filters.");
        return;
    }

    let avg = summary
        .avg_verification_minutes
        .map(|m| format!("{m}m"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "\n  False rate: {}%   Total reach: {}   Avg verification: {}",
        summary.false_rate.to_string().red().bold(),
        format_compact(summary.total_reach).bold(),
        avg.bold()
    );
    println!();
    println!(
        "  {:<40} {:<11} {:<9} {:<10} {:>9} {:<11} {}",
        "Claim".dimmed(),
        "Category".dimmed(),
        "Status".dimmed(),
        "Source".dimmed(),
        "Reach".dimmed(),
        "Verified in".dimmed(),
        "Impact".dimmed(),
    );
    println!("  {}", "-".repeat(112).dimmed());
    for record in records {
        println!(
            "  {:<40} {:<11} {:<9} {:<10} {:>9} {:<11} {} {:>3}",
            truncate_chars(&record.claim.text, 37),
            truncate_chars(&record.claim.category, 11),
            colorize_status(&record.claim.status),
            truncate_chars(&record.source, 10),
            format_count(record.reach_estimate),
            truncate_chars(&record.verification_time, 11),
            percent_bar(record.impact_score as u64, 10).red(),
            record.impact_score,
        );
    }
}

/// Colorize a claim status label.
fn colorize_status(status: &ClaimStatus) -> colored::ColoredString {
    let label = status.label();
    match status.display_status() {
        ClaimStatus::False => label.red().bold(),
        ClaimStatus::Verified => label.green(),
        _ => label.yellow(),
    }
}

fn colorize_impact(impact: Impact) -> colored::ColoredString {
    match impact {
        Impact::High => impact.as_str().red().bold(),
        Impact::Medium => impact.as_str().yellow(),
        Impact::Low => impact.as_str().green(),
    }
}
