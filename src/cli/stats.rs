//! `folio stats` and `folio visit` command implementations.

use crate::core::{DashboardSummary, MessageDb};
use crate::error::Result;

/// Run the visit command: record one page visit.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn visit(db: &MessageDb) -> Result<()> {
    let day = db.visitors().record_visit()?;
    println!("Recorded visit #{} for {}", day.count, day.date);
    Ok(())
}

/// Run the stats command.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(db: &MessageDb, json: bool) -> Result<()> {
    let summary = db.dashboard().summary()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary, db.options().window_days));
    }
    Ok(())
}

/// Render the dashboard as text.
fn render_summary(summary: &DashboardSummary, window_days: u32) -> String {
    let rule = "─".repeat(50);
    let visitors = &summary.visitors;

    let mut lines = vec![
        "Messages".to_string(),
        rule.clone(),
        format!("  Total:            {:>8}", summary.total_messages),
        format!("  Unread:           {:>8}", summary.unread_messages),
        format!(
            "  Last {window_days} days:      {:>8}",
            summary.messages_in_window
        ),
    ];
    lines.extend(
        summary
            .messages_by_day
            .iter()
            .map(|(day, count)| format!("    {day}:       {count:>8}")),
    );

    lines.extend([
        String::new(),
        "Visitors".to_string(),
        rule.clone(),
        format!("  Total (retained): {:>8}", visitors.total),
        format!("  Today:            {:>8}", visitors.today),
        format!("  Daily average:    {:>8.1}", visitors.daily_average),
        format!("  Days tracked:     {:>8}", visitors.total_days),
        match &visitors.most_active_day {
            Some(day) => format!("  Most active day:  {} ({} visits)", day.date, day.count),
            None => "  Most active day:  N/A".to_string(),
        },
    ]);

    lines.extend([
        String::new(),
        "Performance".to_string(),
        rule,
        format!("  Response rate:    {:>7}%", summary.response_rate),
        format!("  Engagement rate:  {:>7.1}%", summary.engagement_rate),
    ]);

    lines.join("\n") + "\n"
}
