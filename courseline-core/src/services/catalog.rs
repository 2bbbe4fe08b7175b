//! Catalog service - course CRUD and the list/filter/sort/paginate surface
//!
//! Any authenticated user may create, edit or delete any course; there is no
//! ownership model. Every mutation validates, stamps timestamps and rewrites
//! the whole courses slice. Lesson file handles never reach the store; the
//! serialized form skips them.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::sanitize::{sanitize_html, sanitize_input};
use crate::domain::{Course, FieldError, Section};
use crate::ports::store::keys;
use crate::ports::{StateStore, StateStoreExt};

use super::simulate_latency;

/// Fixed page size for course listings
pub const COURSES_PER_PAGE: usize = 6;

/// Persisted courses slice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CourseSlice {
    #[serde(default)]
    courses: Vec<Course>,
}

/// Payload for creating or editing a course
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub sections: Vec<Section>,
}

/// Title sort order; the default listing is newest-first by creation date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    AToZ,
    ZToA,
}

/// Listing filter. Empty fields don't constrain.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub sort: Option<SortOrder>,
}

/// One page of a filtered listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Catalog service for course management
pub struct CatalogService {
    store: Arc<dyn StateStore>,
    latency: Duration,
}

impl CatalogService {
    pub fn new(store: Arc<dyn StateStore>, latency: Duration) -> Self {
        Self { store, latency }
    }

    fn slice(&self) -> Result<CourseSlice> {
        Ok(self.store.load_slice(keys::COURSES)?.unwrap_or_default())
    }

    fn save_slice(&self, slice: &CourseSlice) -> Result<()> {
        self.store.save_slice(keys::COURSES, slice)
    }

    /// All courses, unfiltered and unsorted
    pub fn all(&self) -> Result<Vec<Course>> {
        Ok(self.slice()?.courses)
    }

    /// Look up a course by id
    pub fn get(&self, id: Uuid) -> Result<Course> {
        self.all()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found(format!("Course {} not found", id)))
    }

    /// Create a course from a draft
    pub fn add_course(&self, draft: CourseDraft) -> Result<Course> {
        simulate_latency(self.latency);

        let mut course = Course::new(
            sanitize_input(draft.title.trim()),
            sanitize_html(&draft.description),
            draft.category.trim().to_string(),
            draft.difficulty.trim().to_string(),
        );
        course.thumbnail = draft.thumbnail;
        course.sections = sanitize_sections(draft.sections);
        course.validate().map_err(field_errors_to_validation)?;

        let mut slice = self.slice()?;
        slice.courses.push(course.clone());
        self.save_slice(&slice)?;
        Ok(course)
    }

    /// Replace a course's content from a draft, keeping id and created_at
    pub fn update_course(&self, id: Uuid, draft: CourseDraft) -> Result<Course> {
        simulate_latency(self.latency);

        let mut slice = self.slice()?;
        let course = slice
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found(format!("Course {} not found", id)))?;

        course.title = sanitize_input(draft.title.trim());
        course.description = sanitize_html(&draft.description);
        course.thumbnail = draft.thumbnail;
        course.category = draft.category.trim().to_string();
        course.difficulty = draft.difficulty.trim().to_string();
        course.sections = sanitize_sections(draft.sections);
        course.updated_at = chrono::Utc::now();
        course.validate().map_err(field_errors_to_validation)?;

        let updated = course.clone();
        self.save_slice(&slice)?;
        Ok(updated)
    }

    /// Delete a course. Enrollments referencing it are left in place and
    /// skipped by joins; see the enrollment service.
    pub fn delete_course(&self, id: Uuid) -> Result<()> {
        self.delete_courses(&[id])
    }

    /// Bulk delete by id. Unknown ids are ignored.
    pub fn delete_courses(&self, ids: &[Uuid]) -> Result<()> {
        simulate_latency(self.latency);

        let mut slice = self.slice()?;
        slice.courses.retain(|c| !ids.contains(&c.id));
        self.save_slice(&slice)
    }

    /// Filtered, sorted, paginated listing. Pages are 1-based.
    pub fn list(&self, filter: &CourseFilter, page: usize) -> Result<CoursePage> {
        let mut courses = self.all()?;

        if let Some(search) = filter.search.as_deref() {
            let query = search.trim().to_lowercase();
            if !query.is_empty() {
                courses.retain(|c| c.title.to_lowercase().contains(&query));
            }
        }
        if let Some(category) = filter.category.as_deref() {
            courses.retain(|c| c.category == category);
        }
        if let Some(difficulty) = filter.difficulty.as_deref() {
            courses.retain(|c| c.difficulty == difficulty);
        }

        match filter.sort {
            Some(SortOrder::AToZ) => {
                courses.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            }
            Some(SortOrder::ZToA) => {
                courses.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()));
            }
            None => {
                // Newest first
                courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }

        let total = courses.len();
        let total_pages = total.div_ceil(COURSES_PER_PAGE);
        let page = page.max(1);
        let start = (page - 1) * COURSES_PER_PAGE;
        let courses = if start < total {
            courses[start..(start + COURSES_PER_PAGE).min(total)].to_vec()
        } else {
            Vec::new()
        };

        Ok(CoursePage {
            courses,
            total,
            page,
            total_pages,
        })
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = self
            .all()?
            .into_iter()
            .map(|c| c.category)
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    /// Distinct difficulty values, sorted
    pub fn difficulties(&self) -> Result<Vec<String>> {
        let mut difficulties: Vec<String> = self
            .all()?
            .into_iter()
            .map(|c| c.difficulty)
            .filter(|d| !d.is_empty())
            .collect();
        difficulties.sort();
        difficulties.dedup();
        Ok(difficulties)
    }
}

fn sanitize_sections(sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .map(|mut section| {
            section.title = sanitize_input(section.title.trim());
            section.lessons = section
                .lessons
                .into_iter()
                .map(|mut lesson| {
                    lesson.title = sanitize_input(lesson.title.trim());
                    lesson.description = sanitize_input(lesson.description.trim());
                    lesson.content = sanitize_html(&lesson.content);
                    lesson
                })
                .collect();
            section
        })
        .collect()
}

fn field_errors_to_validation(errors: Vec<FieldError>) -> Error {
    let joined = errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ");
    Error::Validation(joined)
}
