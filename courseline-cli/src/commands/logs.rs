//! Logs command - show recent event log entries

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;

use super::get_logger;
use crate::output;

pub fn run(limit: usize, json: bool) -> Result<()> {
    let Some(logger) = get_logger() else {
        output::error("Event log is unavailable");
        std::process::exit(1);
    };

    let entries = match logger.recent(limit) {
        Ok(entries) => entries,
        Err(_) => Vec::new(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::warning("No events logged yet");
        return Ok(());
    }

    println!("{}", "Recent Events".bold());
    println!();
    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Error"]);
    for entry in &entries {
        let time = DateTime::<Utc>::from_timestamp_millis(entry.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.timestamp.to_string());
        table.add_row(vec![
            time,
            entry.event.clone(),
            entry.command.clone().unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
