//! Demo data generators for testing and onboarding
//!
//! Produces a small but realistic catalog: a handful of users, courses with
//! sections and lessons, and enrollments with partial progress, all with
//! fixed UUIDs so repeated seeding is stable.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::{Course, Enrollment, Lesson, Section, User, UserCategory};

fn fixed_id(fill: char) -> Uuid {
    let s: String = format!(
        "{f}{f}{f}{f}{f}{f}{f}{f}-{f}{f}{f}{f}-{f}{f}{f}{f}-{f}{f}{f}{f}-{f}{f}{f}{f}{f}{f}{f}{f}{f}{f}{f}{f}",
        f = fill
    );
    Uuid::parse_str(&s).expect("static uuid")
}

/// Generate demo users. The first one is the suggested demo login,
/// `demo@courseline.dev` / `Learn123!`.
pub fn generate_demo_users() -> Vec<User> {
    let mut demo = User::new(
        "Demo",
        "Learner",
        "demo@courseline.dev",
        "Learn123!",
        UserCategory::Student,
    );
    demo.id = fixed_id('1');
    demo.phone = Some("555-0100".to_string());

    let mut instructor = User::new(
        "Avery",
        "Castillo",
        "avery@courseline.dev",
        "Teach456!",
        UserCategory::Employed,
    );
    instructor.id = fixed_id('2');

    vec![demo, instructor]
}

/// Generate demo courses with sections and lessons
pub fn generate_demo_courses() -> Vec<Course> {
    let now = Utc::now();

    let mut rust_course = Course::new(
        "Rust Fundamentals for Beginners",
        "<p>Ownership, borrowing and the toolchain, from zero.</p>",
        "Programming",
        "Beginner",
    );
    rust_course.id = fixed_id('a');
    rust_course.thumbnail = Some("https://images.courseline.dev/rust.png".to_string());
    rust_course.created_at = now - Duration::days(40);
    rust_course.updated_at = rust_course.created_at;
    let mut basics = Section::new("Getting Started");
    let mut install = Lesson::new("Installing the toolchain", "rustup, cargo and friends");
    install.duration = Some(15);
    let mut hello = Lesson::new("Hello, world", "Your first binary crate");
    hello.duration = Some(10);
    basics.lessons.push(install);
    basics.lessons.push(hello);
    let mut ownership = Section::new("Ownership");
    ownership
        .lessons
        .push(Lesson::new("Moves and copies", "Why assignment moves"));
    ownership
        .lessons
        .push(Lesson::new("Borrowing", "Shared and exclusive references"));
    rust_course.sections.push(basics);
    rust_course.sections.push(ownership);

    let mut design_course = Course::new(
        "Practical Interface Design Basics",
        "<p>Layout, contrast and typography for working developers.</p>",
        "Design",
        "Intermediate",
    );
    design_course.id = fixed_id('b');
    design_course.created_at = now - Duration::days(25);
    design_course.updated_at = design_course.created_at;
    let mut foundations = Section::new("Foundations");
    foundations
        .lessons
        .push(Lesson::new("Visual hierarchy", "Guiding the eye"));
    foundations
        .lessons
        .push(Lesson::new("Color and contrast", "Accessible palettes"));
    design_course.sections.push(foundations);

    let mut data_course = Course::new(
        "Data Analysis with Spreadsheets",
        "<p>Pivot tables, lookups and charts without writing code.</p>",
        "Data",
        "Advanced",
    );
    data_course.id = fixed_id('c');
    data_course.created_at = now - Duration::days(10);
    data_course.updated_at = data_course.created_at;
    let mut pivots = Section::new("Pivot Tables");
    pivots
        .lessons
        .push(Lesson::new("Building a pivot", "Rows, columns, values"));
    data_course.sections.push(pivots);

    vec![rust_course, design_course, data_course]
}

/// Generate demo enrollments with partial progress for the demo learner
pub fn generate_demo_enrollments(users: &[User], courses: &[Course]) -> Vec<Enrollment> {
    let mut enrollments = Vec::new();
    let Some(learner) = users.first() else {
        return enrollments;
    };

    if let Some(rust_course) = courses.first() {
        let mut enrollment = Enrollment::new(learner.id, rust_course.id);
        enrollment.enrolled_at = Utc::now() - Duration::days(30);
        // Two of four lessons done
        for lesson in rust_course.sections[0].lessons.iter() {
            enrollment.set_lesson_completed(lesson.id, true);
        }
        enrollments.push(enrollment);
    }

    if let Some(design_course) = courses.get(1) {
        let mut enrollment = Enrollment::new(learner.id, design_course.id);
        enrollment.enrolled_at = Utc::now() - Duration::days(12);
        enrollments.push(enrollment);
    }

    enrollments
}
