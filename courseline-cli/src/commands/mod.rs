//! CLI command implementations

pub mod auth;
pub mod chat;
pub mod courses;
pub mod dashboard;
pub mod demo;
pub mod enroll;
pub mod faq;
pub mod logs;
pub mod pages;
pub mod profile;
pub mod reset;
pub mod users;

use std::path::PathBuf;

use anyhow::{Context, Result};
use courseline_core::services::{EntryPoint, LogEvent, LoggingService};
use courseline_core::CourselineContext;
use uuid::Uuid;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let courseline_dir = get_courseline_dir();
    std::fs::create_dir_all(&courseline_dir).ok()?;
    LoggingService::new(&courseline_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the courseline directory from environment or default
pub fn get_courseline_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COURSELINE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".courseline")
    }
}

/// Get or create the courseline context
pub fn get_context() -> Result<CourselineContext> {
    let courseline_dir = get_courseline_dir();

    std::fs::create_dir_all(&courseline_dir)
        .with_context(|| format!("Failed to create courseline directory: {:?}", courseline_dir))?;

    CourselineContext::new(&courseline_dir).context("Failed to initialize courseline context")
}

/// Parse an id argument, accepting full UUIDs or unambiguous prefixes
/// against the provided candidates
pub fn resolve_id(input: &str, candidates: &[Uuid]) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    let matches: Vec<&Uuid> = candidates
        .iter()
        .filter(|id| id.to_string().starts_with(input))
        .collect();
    match matches.as_slice() {
        [id] => Ok(**id),
        [] => anyhow::bail!("No id matches '{}'", input),
        _ => anyhow::bail!("Id prefix '{}' is ambiguous", input),
    }
}
