//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and store access. Each service focuses
//! on a specific feature area. Every mutating operation rewrites its whole
//! slice; there are no partial updates at the storage layer.

mod auth;
mod catalog;
mod chatbot;
mod dashboard;
mod demo;
mod enrollment;
pub mod logging;

pub use auth::{AuthService, ProfileUpdate, SignUpRequest, RESET_OTP};
pub use catalog::{CatalogService, CourseDraft, CourseFilter, CoursePage, SortOrder};
pub use chatbot::{ChatbotService, Conversation, QUICK_ACTIONS};
pub use dashboard::{CategoryCount, DashboardService, DashboardSummary, MonthCount};
pub use demo::DemoService;
pub use enrollment::{EnrolledCourse, EnrollmentService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};

use std::time::Duration;

/// Sleep for the configured simulated backend latency.
///
/// Services call this at the top of each simulated "backend" operation. A
/// zero duration disables the gate (tests run with 0).
pub(crate) fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        std::thread::sleep(latency);
    }
}
