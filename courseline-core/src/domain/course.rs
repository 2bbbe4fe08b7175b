//! Course domain model
//!
//! A course owns an ordered list of sections, each owning an ordered list of
//! lessons. Sections and lessons have no identity outside the owning course.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::user::FieldError;

/// Title length bounds enforced on create and edit
pub const TITLE_MIN_LEN: usize = 10;
pub const TITLE_MAX_LEN: usize = 60;

/// A course in the catalog
/// Note: category and difficulty are freeform strings. The catalog surfaces
/// whatever distinct values exist; common difficulty values are "Beginner",
/// "Intermediate" and "Advanced" but any string is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    /// Rich text (sanitized HTML subset)
    pub description: String,
    /// URL or data URI
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub category: String,
    pub difficulty: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered group of lessons inside a course
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A single lesson inside a section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    /// Rich text body
    #[serde(default)]
    pub content: String,
    /// Short description shown in listings
    pub description: String,
    /// Local file handle attached in the editor. Never persisted; the
    /// store only ever sees the serialized form, which skips this field.
    #[serde(skip)]
    pub file: Option<PathBuf>,
    /// Duration in minutes
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Course {
    /// Create a new course with required fields
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            thumbnail: None,
            category: category.into(),
            difficulty: difficulty.into(),
            sections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Total lesson count across all sections
    pub fn total_lessons(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    /// True if any section contains a lesson with this id
    pub fn has_lesson(&self, lesson_id: Uuid) -> bool {
        self.sections
            .iter()
            .any(|s| s.lessons.iter().any(|l| l.id == lesson_id))
    }

    /// Look up a lesson by id
    pub fn find_lesson(&self, lesson_id: Uuid) -> Option<&Lesson> {
        self.sections
            .iter()
            .flat_map(|s| s.lessons.iter())
            .find(|l| l.id == lesson_id)
    }

    /// Validate the full course structure (form rules)
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = validate_title(&self.title) {
            errors.push(e);
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        }
        if self.category.trim().is_empty() {
            errors.push(FieldError::new("category", "Please select a category"));
        }
        if self.difficulty.trim().is_empty() {
            errors.push(FieldError::new("difficulty", "Please select a difficulty"));
        }
        if let Some(thumbnail) = &self.thumbnail {
            if let Some(e) = validate_thumbnail(thumbnail) {
                errors.push(e);
            }
        }

        if self.sections.iter().any(|s| s.title.trim().is_empty()) {
            errors.push(FieldError::new("sections", "All sections must have a title"));
        }
        let lessons_invalid = self.sections.iter().any(|section| {
            section.lessons.is_empty()
                || section.lessons.iter().any(|lesson| {
                    lesson.title.trim().is_empty() || lesson.description.trim().is_empty()
                })
        });
        if lessons_invalid {
            errors.push(FieldError::new(
                "lessons",
                "All sections must have at least one lesson, and all lessons must have a title and short description",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            lessons: Vec::new(),
        }
    }
}

impl Lesson {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: String::new(),
            description: description.into(),
            file: None,
            duration: None,
        }
    }
}

/// Validate a course title against the 10-60 character bounds
pub fn validate_title(title: &str) -> Option<FieldError> {
    if title.trim().is_empty() {
        return Some(FieldError::new("title", "Title is required"));
    }
    if title.len() < TITLE_MIN_LEN {
        return Some(FieldError::new(
            "title",
            format!("Title must be at least {} characters", TITLE_MIN_LEN),
        ));
    }
    if title.len() > TITLE_MAX_LEN {
        return Some(FieldError::new(
            "title",
            format!("Title must not exceed {} characters", TITLE_MAX_LEN),
        ));
    }
    None
}

/// Thumbnails are either data URIs or parseable URLs
fn validate_thumbnail(value: &str) -> Option<FieldError> {
    if value.starts_with("data:") || Url::parse(value).is_ok() {
        None
    } else {
        Some(FieldError::new(
            "thumbnail",
            "Thumbnail must be a valid URL or data URI",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_course() -> Course {
        let mut course = Course::new(
            "Intro to Rust Programming",
            "<p>Learn the basics.</p>",
            "Programming",
            "Beginner",
        );
        let mut section = Section::new("Getting Started");
        section.lessons.push(Lesson::new("Installing", "Set up the toolchain"));
        course.sections.push(section);
        course
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("Intro to Rust Programming").is_none());
        assert!(validate_title("Too short").is_some());
        assert!(validate_title(&"x".repeat(61)).is_some());
        assert!(validate_title("   ").is_some());
    }

    #[test]
    fn test_course_validation() {
        let course = valid_course();
        assert!(course.validate().is_ok());
    }

    #[test]
    fn test_lesson_invariant() {
        let mut course = valid_course();
        course.sections[0].lessons[0].description = String::new();
        let errors = course.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "lessons"));

        // A section with no lessons at all is also rejected
        let mut course = valid_course();
        course.sections[0].lessons.clear();
        assert!(course.validate().is_err());
    }

    #[test]
    fn test_lesson_file_not_serialized() {
        let mut course = valid_course();
        course.sections[0].lessons[0].file = Some(PathBuf::from("/tmp/slides.pdf"));
        let json = serde_json::to_string(&course).unwrap();
        assert!(!json.contains("slides.pdf"));

        let parsed: Course = serde_json::from_str(&json).unwrap();
        assert!(parsed.sections[0].lessons[0].file.is_none());
    }

    #[test]
    fn test_total_lessons() {
        let mut course = valid_course();
        let mut section = Section::new("Deeper");
        section.lessons.push(Lesson::new("Ownership", "Moves and borrows"));
        section.lessons.push(Lesson::new("Lifetimes", "Scopes and regions"));
        course.sections.push(section);
        assert_eq!(course.total_lessons(), 3);
    }

    #[test]
    fn test_thumbnail_validation() {
        let mut course = valid_course();
        course.thumbnail = Some("https://example.com/cover.png".to_string());
        assert!(course.validate().is_ok());

        course.thumbnail = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
        assert!(course.validate().is_ok());

        course.thumbnail = Some("not a url".to_string());
        assert!(course.validate().is_err());
    }
}
