//! Enrollment service - per-user enrollment and lesson-completion tracking

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Course, CourseProgress, Enrollment};
use crate::ports::store::keys;
use crate::ports::{StateStore, StateStoreExt};

use super::catalog::{CourseFilter, SortOrder};
use super::simulate_latency;

/// Persisted enrollments slice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EnrollmentSlice {
    #[serde(default)]
    enrollments: Vec<Enrollment>,
}

/// A course joined with the user's enrollment and computed progress
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub course: Course,
    pub enrollment: Enrollment,
    pub progress: CourseProgress,
}

/// Enrollment service
pub struct EnrollmentService {
    store: Arc<dyn StateStore>,
    latency: Duration,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn StateStore>, latency: Duration) -> Self {
        Self { store, latency }
    }

    fn slice(&self) -> Result<EnrollmentSlice> {
        Ok(self
            .store
            .load_slice(keys::ENROLLMENTS)?
            .unwrap_or_default())
    }

    fn save_slice(&self, slice: &EnrollmentSlice) -> Result<()> {
        self.store.save_slice(keys::ENROLLMENTS, slice)
    }

    /// All enrollments across all users
    pub fn all(&self) -> Result<Vec<Enrollment>> {
        Ok(self.slice()?.enrollments)
    }

    /// Enrollments belonging to one user
    pub fn for_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|e| e.user_id == user_id)
            .collect())
    }

    /// The user's enrollment in a course, if any. Lookups assume at most one
    /// per (user, course) pair; `enroll` keeps that true.
    pub fn find(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Enrollment>> {
        Ok(self
            .all()?
            .into_iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id))
    }

    /// Enroll a user in a course. Rejects a second enrollment in the same
    /// course.
    pub fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<Enrollment> {
        simulate_latency(self.latency);

        let mut slice = self.slice()?;
        if slice
            .enrollments
            .iter()
            .any(|e| e.user_id == user_id && e.course_id == course_id)
        {
            return Err(Error::validation("You are already enrolled in this course"));
        }

        let enrollment = Enrollment::new(user_id, course_id);
        slice.enrollments.push(enrollment.clone());
        self.save_slice(&slice)?;
        Ok(enrollment)
    }

    /// Mark a lesson completed or not on the user's enrollment. Idempotent
    /// in both directions; refreshes the last-accessed timestamp either way.
    pub fn set_lesson_completed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
    ) -> Result<Enrollment> {
        simulate_latency(self.latency);

        let mut slice = self.slice()?;
        let enrollment = slice
            .enrollments
            .iter_mut()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .ok_or_else(|| Error::not_found("Enrollment not found"))?;

        enrollment.set_lesson_completed(lesson_id, completed);
        let updated = enrollment.clone();
        self.save_slice(&slice)?;
        Ok(updated)
    }

    /// Remove a single enrollment by id
    pub fn unenroll(&self, enrollment_id: Uuid) -> Result<()> {
        self.unenroll_many(&[enrollment_id])
    }

    /// Remove enrollments in bulk. Unknown ids are ignored.
    pub fn unenroll_many(&self, ids: &[Uuid]) -> Result<()> {
        simulate_latency(self.latency);

        let mut slice = self.slice()?;
        slice.enrollments.retain(|e| !ids.contains(&e.id));
        self.save_slice(&slice)
    }

    /// The user's enrolled courses joined with progress.
    ///
    /// Enrollments whose course no longer exists are skipped, never an
    /// error: deleting a course must leave its dangling enrollments
    /// harmless.
    pub fn my_courses(
        &self,
        user_id: Uuid,
        courses: &[Course],
        filter: &CourseFilter,
    ) -> Result<Vec<EnrolledCourse>> {
        let enrollments = self.for_user(user_id)?;

        let mut joined: Vec<EnrolledCourse> = enrollments
            .into_iter()
            .filter_map(|enrollment| {
                let course = courses.iter().find(|c| c.id == enrollment.course_id)?;
                let progress = enrollment.progress_for(course);
                Some(EnrolledCourse {
                    course: course.clone(),
                    enrollment,
                    progress,
                })
            })
            .collect();

        if let Some(search) = filter.search.as_deref() {
            let query = search.trim().to_lowercase();
            if !query.is_empty() {
                joined.retain(|e| e.course.title.to_lowercase().contains(&query));
            }
        }
        if let Some(category) = filter.category.as_deref() {
            joined.retain(|e| e.course.category == category);
        }
        if let Some(difficulty) = filter.difficulty.as_deref() {
            joined.retain(|e| e.course.difficulty == difficulty);
        }

        match filter.sort {
            Some(SortOrder::AToZ) => joined.sort_by(|a, b| {
                a.course
                    .title
                    .to_lowercase()
                    .cmp(&b.course.title.to_lowercase())
            }),
            Some(SortOrder::ZToA) => joined.sort_by(|a, b| {
                b.course
                    .title
                    .to_lowercase()
                    .cmp(&a.course.title.to_lowercase())
            }),
            None => joined.sort_by(|a, b| b.enrollment.enrolled_at.cmp(&a.enrollment.enrolled_at)),
        }

        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{Lesson, Section};

    fn service() -> EnrollmentService {
        EnrollmentService::new(Arc::new(MemoryStore::new()), Duration::ZERO)
    }

    fn course(title: &str, lessons: usize) -> Course {
        let mut course = Course::new(title, "desc", "Programming", "Beginner");
        let mut section = Section::new("Only");
        for i in 0..lessons {
            section.lessons.push(Lesson::new(format!("L{}", i), "short"));
        }
        course.sections.push(section);
        course
    }

    #[test]
    fn test_enroll_rejects_duplicates() {
        let service = service();
        let user_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();

        service.enroll(user_id, course_id).unwrap();
        assert!(service.enroll(user_id, course_id).is_err());
        assert_eq!(service.all().unwrap().len(), 1);

        // A different user can still enroll
        service.enroll(Uuid::new_v4(), course_id).unwrap();
    }

    #[test]
    fn test_toggle_persists() {
        let service = service();
        let user_id = Uuid::new_v4();
        let course = course("Persistence Of Toggles", 2);
        service.enroll(user_id, course.id).unwrap();
        let lesson_id = course.sections[0].lessons[0].id;

        service
            .set_lesson_completed(user_id, course.id, lesson_id, true)
            .unwrap();
        let enrollment = service.find(user_id, course.id).unwrap().unwrap();
        assert_eq!(enrollment.progress.completed_lessons, vec![lesson_id]);

        service
            .set_lesson_completed(user_id, course.id, lesson_id, false)
            .unwrap();
        let enrollment = service.find(user_id, course.id).unwrap().unwrap();
        assert!(enrollment.progress.completed_lessons.is_empty());
    }

    #[test]
    fn test_toggle_without_enrollment_fails() {
        let service = service();
        let result =
            service.set_lesson_completed(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), true);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_bulk_unenroll() {
        let service = service();
        let user_id = Uuid::new_v4();
        let a = service.enroll(user_id, Uuid::new_v4()).unwrap();
        let b = service.enroll(user_id, Uuid::new_v4()).unwrap();
        let c = service.enroll(user_id, Uuid::new_v4()).unwrap();

        service.unenroll_many(&[a.id, c.id]).unwrap();
        let remaining = service.all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[test]
    fn test_my_courses_skips_dangling_enrollments() {
        let service = service();
        let user_id = Uuid::new_v4();
        let kept = course("A Course That Stays Around", 1);
        service.enroll(user_id, kept.id).unwrap();
        // Enrollment for a course that has since been deleted
        service.enroll(user_id, Uuid::new_v4()).unwrap();

        let courses = vec![kept];
        let joined = service
            .my_courses(user_id, &courses, &CourseFilter::default())
            .unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].course.title, "A Course That Stays Around");
    }

    #[test]
    fn test_my_courses_progress() {
        let service = service();
        let user_id = Uuid::new_v4();
        let course = course("Progress Shows Up Here", 4);
        service.enroll(user_id, course.id).unwrap();
        service
            .set_lesson_completed(user_id, course.id, course.sections[0].lessons[0].id, true)
            .unwrap();

        let courses = vec![course];
        let joined = service
            .my_courses(user_id, &courses, &CourseFilter::default())
            .unwrap();
        assert_eq!(joined[0].progress.progress_percentage, 25);
        assert_eq!(joined[0].progress.total_lessons, 4);
    }
}
