//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod auth;
mod chat;
mod course;
mod enrollment;
pub mod result;
pub mod sanitize;
mod user;

pub use auth::{mint_session_token, AuthState, ResetToken, SessionUser};
pub use chat::{ChatMessage, ChatSender};
pub use course::{validate_title, Course, Lesson, Section, TITLE_MAX_LEN, TITLE_MIN_LEN};
pub use enrollment::{CourseProgress, Enrollment, Progress};
pub use user::{validate_email, validate_password, FieldError, User, UserCategory};
