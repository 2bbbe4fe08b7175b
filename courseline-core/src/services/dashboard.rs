//! Dashboard service - read-side analytics over the three slices

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Course, Enrollment, User};
use crate::ports::store::keys;
use crate::ports::{StateStore, StateStoreExt};

use super::enrollment::EnrolledCourse;

#[derive(Debug, Clone, Default, Deserialize)]
struct CoursesDoc {
    #[serde(default)]
    courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnrollmentsDoc {
    #[serde(default)]
    enrollments: Vec<Enrollment>,
}

/// A name/count pair for distribution charts
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Enrollment count for one calendar month
#[derive(Debug, Clone, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

/// Everything the dashboard renders in one pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_courses: usize,
    pub total_users: usize,
    pub total_enrollments: usize,
    /// Counts for the viewing user; zero when nobody is signed in
    pub enrolled_count: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub categories: Vec<CategoryCount>,
    pub difficulties: Vec<CategoryCount>,
    pub recent: Vec<EnrolledCourse>,
    pub enrollment_trend: Vec<MonthCount>,
}

/// Dashboard service
pub struct DashboardService {
    store: Arc<dyn StateStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Compute the full dashboard for an optional viewing user
    pub fn summary(&self, user_id: Option<Uuid>) -> Result<DashboardSummary> {
        let users: Vec<User> = self.store.load_slice(keys::USERS)?.unwrap_or_default();
        let courses = self
            .store
            .load_slice::<CoursesDoc>(keys::COURSES)?
            .unwrap_or_default()
            .courses;
        let enrollments = self
            .store
            .load_slice::<EnrollmentsDoc>(keys::ENROLLMENTS)?
            .unwrap_or_default()
            .enrollments;

        let mine = user_id
            .map(|id| joined_for_user(id, &courses, &enrollments))
            .unwrap_or_default();
        let completed_count = mine.iter().filter(|e| e.progress.is_complete).count();

        let mut recent = mine.clone();
        recent.sort_by(|a, b| {
            b.enrollment
                .progress
                .last_accessed_at
                .cmp(&a.enrollment.progress.last_accessed_at)
        });
        recent.truncate(3);

        Ok(DashboardSummary {
            total_courses: courses.len(),
            total_users: users.len(),
            total_enrollments: enrollments.len(),
            enrolled_count: mine.len(),
            completed_count,
            in_progress_count: mine.len() - completed_count,
            categories: category_distribution(&courses),
            difficulties: difficulty_distribution(&courses),
            recent,
            enrollment_trend: enrollment_trend(&enrollments),
        })
    }
}

fn joined_for_user(
    user_id: Uuid,
    courses: &[Course],
    enrollments: &[Enrollment],
) -> Vec<EnrolledCourse> {
    enrollments
        .iter()
        .filter(|e| e.user_id == user_id)
        .filter_map(|enrollment| {
            let course = courses.iter().find(|c| c.id == enrollment.course_id)?;
            Some(EnrolledCourse {
                course: course.clone(),
                enrollment: enrollment.clone(),
                progress: enrollment.progress_for(course),
            })
        })
        .collect()
}

/// Category counts, descending
fn category_distribution(courses: &[Course]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for course in courses {
        let category = if course.category.is_empty() {
            "Other".to_string()
        } else {
            course.category.clone()
        };
        *counts.entry(category).or_default() += 1;
    }
    let mut result: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Bucket difficulties into Beginner/Intermediate/Advanced by substring,
/// defaulting unknown values to Beginner
fn difficulty_distribution(courses: &[Course]) -> Vec<CategoryCount> {
    let mut beginner = 0;
    let mut intermediate = 0;
    let mut advanced = 0;
    for course in courses {
        let level = course.difficulty.to_lowercase();
        if level.contains("inter") {
            intermediate += 1;
        } else if level.contains("adv") {
            advanced += 1;
        } else {
            beginner += 1;
        }
    }
    vec![
        CategoryCount {
            name: "Beginner".to_string(),
            count: beginner,
        },
        CategoryCount {
            name: "Intermediate".to_string(),
            count: intermediate,
        },
        CategoryCount {
            name: "Advanced".to_string(),
            count: advanced,
        },
    ]
}

/// Enrollments grouped by calendar month, chronological
fn enrollment_trend(enrollments: &[Enrollment]) -> Vec<MonthCount> {
    let mut counts: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for enrollment in enrollments {
        let date = enrollment.enrolled_at;
        *counts.entry((date.year(), date.month())).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((year, month), count)| {
            let label = chrono::NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{}-{:02}", year, month));
            MonthCount {
                month: label,
                count,
            }
        })
        .collect()
}
