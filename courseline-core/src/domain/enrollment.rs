//! Enrollment domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::Course;

/// Links a user to a course together with their completion progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub progress: Progress,
}

fn default_status() -> String {
    "active".to_string()
}

/// Per-enrollment completion state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub completed_lessons: Vec<Uuid>,
    pub last_accessed_at: DateTime<Utc>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            completed_lessons: Vec::new(),
            last_accessed_at: Utc::now(),
        }
    }
}

impl Enrollment {
    /// Create a new active enrollment with empty progress
    pub fn new(user_id: Uuid, course_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            enrolled_at: Utc::now(),
            status: default_status(),
            progress: Progress::default(),
        }
    }

    /// Mark a lesson completed or not. Both directions are idempotent:
    /// completing an already-completed lesson or clearing an untracked one
    /// is a no-op apart from the access timestamp.
    pub fn set_lesson_completed(&mut self, lesson_id: Uuid, completed: bool) {
        if completed {
            if !self.progress.completed_lessons.contains(&lesson_id) {
                self.progress.completed_lessons.push(lesson_id);
            }
        } else {
            self.progress.completed_lessons.retain(|id| *id != lesson_id);
        }
        self.progress.last_accessed_at = Utc::now();
    }

    /// Compute progress against the owning course.
    ///
    /// Completed ids referencing lessons that no longer exist in the course
    /// are ignored rather than counted or treated as an error.
    pub fn progress_for(&self, course: &Course) -> CourseProgress {
        let total_lessons = course.total_lessons();
        let completed_lessons = self
            .progress
            .completed_lessons
            .iter()
            .filter(|id| course.has_lesson(**id))
            .count();
        let progress_percentage = if total_lessons > 0 {
            ((completed_lessons as f64 / total_lessons as f64) * 100.0).round() as u32
        } else {
            0
        };
        CourseProgress {
            total_lessons,
            completed_lessons,
            progress_percentage,
            is_complete: total_lessons > 0 && completed_lessons == total_lessons,
        }
    }
}

/// Progress summary computed on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub progress_percentage: u32,
    pub is_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{Lesson, Section};

    fn course_with_lessons(n: usize) -> Course {
        let mut course = Course::new(
            "Course With Lessons",
            "desc",
            "Programming",
            "Beginner",
        );
        let mut section = Section::new("Only Section");
        for i in 0..n {
            section
                .lessons
                .push(Lesson::new(format!("Lesson {}", i), "short"));
        }
        course.sections.push(section);
        course
    }

    #[test]
    fn test_toggle_round_trip() {
        let course = course_with_lessons(3);
        let lesson_id = course.sections[0].lessons[0].id;
        let mut enrollment = Enrollment::new(Uuid::new_v4(), course.id);

        let before = enrollment.progress.completed_lessons.clone();
        enrollment.set_lesson_completed(lesson_id, true);
        enrollment.set_lesson_completed(lesson_id, false);
        assert_eq!(enrollment.progress.completed_lessons, before);
    }

    #[test]
    fn test_completion_idempotent() {
        let course = course_with_lessons(3);
        let lesson_id = course.sections[0].lessons[0].id;
        let mut enrollment = Enrollment::new(Uuid::new_v4(), course.id);

        enrollment.set_lesson_completed(lesson_id, true);
        enrollment.set_lesson_completed(lesson_id, true);
        assert_eq!(enrollment.progress.completed_lessons.len(), 1);
    }

    #[test]
    fn test_percentage_rounding() {
        let course = course_with_lessons(3);
        let mut enrollment = Enrollment::new(Uuid::new_v4(), course.id);
        enrollment.set_lesson_completed(course.sections[0].lessons[0].id, true);

        let progress = enrollment.progress_for(&course);
        // 1/3 rounds to 33
        assert_eq!(progress.progress_percentage, 33);
        assert!(!progress.is_complete);

        enrollment.set_lesson_completed(course.sections[0].lessons[1].id, true);
        // 2/3 rounds to 67
        assert_eq!(enrollment.progress_for(&course).progress_percentage, 67);
    }

    #[test]
    fn test_complete_when_all_done() {
        let course = course_with_lessons(2);
        let mut enrollment = Enrollment::new(Uuid::new_v4(), course.id);
        for lesson in &course.sections[0].lessons {
            enrollment.set_lesson_completed(lesson.id, true);
        }
        let progress = enrollment.progress_for(&course);
        assert_eq!(progress.progress_percentage, 100);
        assert!(progress.is_complete);
    }

    #[test]
    fn test_zero_lesson_course() {
        let course = Course::new("Empty Course Here", "desc", "Misc", "Beginner");
        let enrollment = Enrollment::new(Uuid::new_v4(), course.id);
        let progress = enrollment.progress_for(&course);
        assert_eq!(progress.progress_percentage, 0);
        assert!(!progress.is_complete);
    }

    #[test]
    fn test_stale_completed_ids_ignored() {
        let course = course_with_lessons(2);
        let mut enrollment = Enrollment::new(Uuid::new_v4(), course.id);
        // A lesson id that was completed before the course was edited
        enrollment.progress.completed_lessons.push(Uuid::new_v4());
        let progress = enrollment.progress_for(&course);
        assert_eq!(progress.completed_lessons, 0);
        assert_eq!(progress.progress_percentage, 0);
    }
}
