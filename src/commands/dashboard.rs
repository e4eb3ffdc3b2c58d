use crate::config::Config;
use crate::error::{HushError, Result};
use crate::storage::{DashboardSnapshot, SnapshotStore};
use colored::Colorize;
use prettytable::{format, Table};

/// Print the stored snapshot history
///
/// Reads the store directly; the accumulator of a running server is not
/// consulted.
pub fn show_dashboard(config: &Config, json: bool) -> Result<()> {
    let store = SnapshotStore::new_with_path(&config.storage.db_path)?;
    let snapshots = store.list()?;

    if json {
        let rendered = serde_json::to_string_pretty(&snapshots).map_err(HushError::from)?;
        println!("{}", rendered);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("{}", "No dashboard snapshots found.".yellow());
        println!("Run {} to populate seed data.", "hush seed".cyan());
        return Ok(());
    }

    println!("\nDashboard History:");
    render_table(&snapshots).printstd();
    if let Some(latest) = store.latest()? {
        println!("{}", latest_summary(&latest, snapshots.len()));
    }
    println!();
    Ok(())
}

/// One-line summary of the newest snapshot
fn latest_summary(latest: &DashboardSnapshot, total: usize) -> String {
    format!(
        "{} {} snapshot(s); latest #{} at {}: text={:.4} typing={:.4} voice={:.4}",
        "Total:".bold(),
        total,
        latest.id,
        latest.timestamp,
        latest.avg_text_importance,
        latest.avg_typing_importance,
        latest.avg_voice_importance
    )
}

fn render_table(snapshots: &[DashboardSnapshot]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Timestamp".bold(),
        "Text".bold(),
        "Typing".bold(),
        "Voice".bold()
    ]);

    for s in snapshots {
        table.add_row(prettytable::row![
            s.id.to_string().cyan(),
            s.timestamp,
            format!("{:.4}", s.avg_text_importance),
            format!("{:.4}", s.avg_typing_importance),
            format!("{:.4}", s.avg_voice_importance)
        ]);
    }

    table
}
