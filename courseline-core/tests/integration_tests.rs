//! Integration tests for courseline-core services
//!
//! These tests run the real JSON file store against a temp directory; only
//! the simulated latency is turned off via settings.json.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use tempfile::TempDir;
use uuid::Uuid;

use courseline_core::domain::{Lesson, Section};
use courseline_core::services::{CourseDraft, CourseFilter, SignUpRequest};
use courseline_core::{CourselineContext, UserCategory};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a context over a temp directory with zero simulated latency
fn create_test_context(temp_dir: &TempDir) -> CourselineContext {
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"app": {"demoMode": false, "latencyMs": 0}}"#,
    )
    .expect("Failed to write settings");
    CourselineContext::new(temp_dir.path()).expect("Failed to create context")
}

fn sign_up_request(email: &str) -> SignUpRequest {
    SignUpRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        password: "Passw0rd!".to_string(),
        category: UserCategory::Student,
    }
}

fn course_draft(title: &str, lessons: usize) -> CourseDraft {
    let mut section = Section::new("Section One");
    for i in 0..lessons {
        section
            .lessons
            .push(Lesson::new(format!("Lesson {}", i), "A short description"));
    }
    CourseDraft {
        title: title.to_string(),
        description: "<p>Course body</p>".to_string(),
        thumbnail: None,
        category: "Programming".to_string(),
        difficulty: "Beginner".to_string(),
        sections: vec![section],
    }
}

// ============================================================================
// Auth Flow Tests
// ============================================================================

#[test]
fn test_sign_up_then_sign_in_persists_across_contexts() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ctx = create_test_context(&temp_dir);
        ctx.auth_service
            .sign_up(sign_up_request("ada@example.com"))
            .unwrap();
    }

    // A fresh context over the same directory sees the account
    let ctx = create_test_context(&temp_dir);
    let state = ctx
        .auth_service
        .sign_in("ada@example.com", "Passw0rd!", false)
        .unwrap();
    assert!(state.is_authenticated);

    // And the session survives another reload via the auth slice
    let ctx = create_test_context(&temp_dir);
    assert!(ctx.auth_service.state().unwrap().is_authenticated);
}

#[test]
fn test_wrong_password_vs_unknown_account() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    ctx.auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();

    let err = ctx
        .auth_service
        .sign_in("ada@example.com", "WrongPass1!", false)
        .unwrap_err();
    assert!(err.to_string().contains("Incorrect password"));

    let err = ctx
        .auth_service
        .sign_in("nobody@example.com", "Passw0rd!", false)
        .unwrap_err();
    assert!(err.to_string().contains("Account does not exist"));
}

#[test]
fn test_duplicate_sign_up_creates_no_record() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    ctx.auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();
    assert!(ctx
        .auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .is_err());
    assert_eq!(ctx.auth_service.users().unwrap().len(), 1);
}

#[test]
fn test_remember_me_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ctx = create_test_context(&temp_dir);
        ctx.auth_service
            .sign_up(sign_up_request("ada@example.com"))
            .unwrap();
        ctx.auth_service
            .sign_in("ada@example.com", "Passw0rd!", true)
            .unwrap();
    }

    let ctx = create_test_context(&temp_dir);
    let (email, password) = ctx.auth_service.remembered_credentials().unwrap().unwrap();
    assert_eq!(email, "ada@example.com");
    assert_eq!(password, "Passw0rd!");
}

#[test]
fn test_otp_gate() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    assert!(ctx.auth_service.verify_otp("0000").is_ok());
    for bad in ["1234", "0001", "00 0", "oooo"] {
        assert!(ctx.auth_service.verify_otp(bad).is_err(), "{} accepted", bad);
    }
}

#[test]
fn test_full_password_reset_flow() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    ctx.auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();

    ctx.auth_service.forgot_password("ada@example.com").unwrap();
    ctx.auth_service.verify_otp("0000").unwrap();
    ctx.auth_service
        .reset_password("ada@example.com", "Fresh1234!")
        .unwrap();

    assert!(ctx
        .auth_service
        .sign_in("ada@example.com", "Fresh1234!", false)
        .is_ok());
}

#[test]
fn test_delete_account_flow() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    ctx.auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();
    ctx.auth_service
        .sign_in("ada@example.com", "Passw0rd!", false)
        .unwrap();

    ctx.auth_service.delete_account().unwrap();
    assert!(ctx.auth_service.users().unwrap().is_empty());
    assert!(!ctx.auth_service.state().unwrap().is_authenticated);
    assert!(ctx.auth_service.take_account_deleted_flag().unwrap());

    // Signing in again now reports a missing account
    let err = ctx
        .auth_service
        .sign_in("ada@example.com", "Passw0rd!", false)
        .unwrap_err();
    assert!(err.to_string().contains("Account does not exist"));
}

// ============================================================================
// Catalog + Enrollment Tests
// ============================================================================

#[test]
fn test_progress_percentage_over_toggle_sequences() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let user = ctx
        .auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();
    let course = ctx
        .catalog_service
        .add_course(course_draft("A Course With Three Lessons", 3))
        .unwrap();
    ctx.enrollment_service.enroll(user.id, course.id).unwrap();

    let lesson_ids: Vec<Uuid> = course.sections[0].lessons.iter().map(|l| l.id).collect();

    // Arbitrary toggle sequence; percentage always tracks the set size
    ctx.enrollment_service
        .set_lesson_completed(user.id, course.id, lesson_ids[0], true)
        .unwrap();
    ctx.enrollment_service
        .set_lesson_completed(user.id, course.id, lesson_ids[1], true)
        .unwrap();
    ctx.enrollment_service
        .set_lesson_completed(user.id, course.id, lesson_ids[0], false)
        .unwrap();

    let enrollment = ctx
        .enrollment_service
        .find(user.id, course.id)
        .unwrap()
        .unwrap();
    let progress = enrollment.progress_for(&course);
    assert_eq!(progress.completed_lessons, 1);
    assert_eq!(progress.progress_percentage, 33);

    // Double toggle is a round trip
    let before = enrollment.progress.completed_lessons.clone();
    ctx.enrollment_service
        .set_lesson_completed(user.id, course.id, lesson_ids[2], true)
        .unwrap();
    ctx.enrollment_service
        .set_lesson_completed(user.id, course.id, lesson_ids[2], false)
        .unwrap();
    let after = ctx
        .enrollment_service
        .find(user.id, course.id)
        .unwrap()
        .unwrap();
    assert_eq!(after.progress.completed_lessons, before);
}

#[test]
fn test_deleting_course_leaves_dangling_enrollment_harmless() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let user = ctx
        .auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();
    let kept = ctx
        .catalog_service
        .add_course(course_draft("The Course That Survives", 1))
        .unwrap();
    let doomed = ctx
        .catalog_service
        .add_course(course_draft("The Course We Will Drop", 1))
        .unwrap();
    ctx.enrollment_service.enroll(user.id, kept.id).unwrap();
    ctx.enrollment_service.enroll(user.id, doomed.id).unwrap();

    ctx.catalog_service.delete_course(doomed.id).unwrap();

    // The enrollment still exists but every read-side surface skips it
    assert_eq!(ctx.enrollment_service.for_user(user.id).unwrap().len(), 2);

    let courses = ctx.catalog_service.all().unwrap();
    let mine = ctx
        .enrollment_service
        .my_courses(user.id, &courses, &CourseFilter::default())
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].course.id, kept.id);

    let summary = ctx.dashboard_service.summary(Some(user.id)).unwrap();
    assert_eq!(summary.enrolled_count, 1);
    assert_eq!(summary.total_enrollments, 2);
}

#[test]
fn test_bulk_course_delete_and_bulk_unenroll() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let user = ctx
        .auth_service
        .sign_up(sign_up_request("ada@example.com"))
        .unwrap();
    let mut course_ids = Vec::new();
    let mut enrollment_ids = Vec::new();
    for i in 0..3 {
        let course = ctx
            .catalog_service
            .add_course(course_draft(&format!("Bulk Deletion Course {:02}", i), 1))
            .unwrap();
        let enrollment = ctx.enrollment_service.enroll(user.id, course.id).unwrap();
        course_ids.push(course.id);
        enrollment_ids.push(enrollment.id);
    }

    ctx.catalog_service
        .delete_courses(&course_ids[..2])
        .unwrap();
    assert_eq!(ctx.catalog_service.all().unwrap().len(), 1);

    ctx.enrollment_service
        .unenroll_many(&enrollment_ids[..2])
        .unwrap();
    assert_eq!(ctx.enrollment_service.for_user(user.id).unwrap().len(), 1);
}

// ============================================================================
// Corruption Recovery Tests
// ============================================================================

#[test]
fn test_corrupt_slice_resets_to_default() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    ctx.catalog_service
        .add_course(course_draft("A Course Before The Crash", 1))
        .unwrap();

    for key in ["cms_users", "cms_courses", "cms_enrollments", "cms_auth"] {
        std::fs::write(temp_dir.path().join(format!("{}.json", key)), "{oops").unwrap();
    }

    let ctx = create_test_context(&temp_dir);
    assert!(ctx.catalog_service.all().unwrap().is_empty());
    assert!(ctx.auth_service.users().unwrap().is_empty());
    assert!(!ctx.auth_service.state().unwrap().is_authenticated);
    assert!(ctx.enrollment_service.all().unwrap().is_empty());

    // The corrupt files were removed, so a second read is clean too
    assert!(!temp_dir.path().join("cms_courses.json").exists());
}

#[test]
fn test_in_memory_context_smoke() {
    let ctx = CourselineContext::in_memory();
    let user = ctx
        .auth_service
        .sign_up(sign_up_request("mem@example.com"))
        .unwrap();
    let course = ctx
        .catalog_service
        .add_course(course_draft("A Course Held In Memory", 2))
        .unwrap();
    ctx.enrollment_service.enroll(user.id, course.id).unwrap();

    let summary = ctx.dashboard_service.summary(Some(user.id)).unwrap();
    assert_eq!(summary.total_courses, 1);
    assert_eq!(summary.enrolled_count, 1);
}

// ============================================================================
// Demo Mode Tests
// ============================================================================

#[test]
fn test_demo_mode_routes_to_seeded_store() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    ctx.catalog_service
        .add_course(course_draft("A Real Catalog Course", 1))
        .unwrap();

    ctx.demo_service.enable().unwrap();
    // Reopen with latency still zeroed; demo flag comes from settings.json
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"app": {"demoMode": true, "latencyMs": 0}}"#,
    )
    .unwrap();
    let demo_ctx = CourselineContext::new(temp_dir.path()).unwrap();
    assert!(demo_ctx.config.demo_mode);

    let demo_courses = demo_ctx.catalog_service.all().unwrap();
    assert!(!demo_courses.is_empty());
    assert!(demo_courses
        .iter()
        .all(|c| c.title != "A Real Catalog Course"));

    // The demo login works against the seeded users
    assert!(demo_ctx
        .auth_service
        .sign_in("demo@courseline.dev", "Learn123!", false)
        .is_ok());

    // Disabling demo mode returns to the real catalog
    demo_ctx.demo_service.disable(true).unwrap();
    let real_ctx = create_test_context(&temp_dir);
    let titles: Vec<String> = real_ctx
        .catalog_service
        .all()
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["A Real Catalog Course"]);
}
