//! Enrollment commands - enroll, drop, lesson completion, my-courses

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use uuid::Uuid;

use courseline_core::services::{CourseFilter, LogEvent};

use super::courses::{find_course, parse_sort};
use super::{get_context, get_logger, log_event, resolve_id};
use crate::output;

pub fn run_enroll(course_ref: &str) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = ctx.auth_service.require_user()?;

    let course = find_course(&ctx, course_ref)?;

    let pb = output::spinner("Enrolling...");
    let result = ctx.enrollment_service.enroll(user.id, course.id);
    pb.finish_and_clear();

    match result {
        Ok(_) => {
            log_event(&logger, LogEvent::new("enrolled").with_command("enroll"));
            output::success(&format!("Enrolled in '{}'", course.title));
            println!("{}", "Track progress with: crs my-courses".dimmed());
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

pub fn run_drop(course_refs: Vec<String>, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = ctx.auth_service.require_user()?;

    if course_refs.is_empty() {
        output::error("No course ids given");
        std::process::exit(1);
    }

    // Resolve course refs to this user's enrollment ids
    let mut enrollment_ids = Vec::new();
    let mut titles = Vec::new();
    for course_ref in &course_refs {
        let course = find_course(&ctx, course_ref)?;
        match ctx.enrollment_service.find(user.id, course.id)? {
            Some(enrollment) => {
                enrollment_ids.push(enrollment.id);
                titles.push(course.title);
            }
            None => {
                output::error(&format!("You are not enrolled in '{}'", course.title));
                std::process::exit(1);
            }
        }
    }

    if !force {
        let what = if titles.len() == 1 {
            format!("Remove '{}' from your courses?", titles[0])
        } else {
            format!("Remove {} courses from your courses?", titles.len())
        };
        if !Confirm::new().with_prompt(what).default(false).interact()? {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let pb = output::spinner("Removing...");
    let result = ctx.enrollment_service.unenroll_many(&enrollment_ids);
    pb.finish_and_clear();
    result?;

    log_event(&logger, LogEvent::new("unenrolled").with_command("drop"));
    if enrollment_ids.len() == 1 {
        output::success("Course removed successfully!");
    } else {
        output::success(&format!(
            "{} courses removed successfully!",
            enrollment_ids.len()
        ));
    }
    Ok(())
}

pub fn run_complete(course_ref: &str, lesson_ref: &str, undo: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = ctx.auth_service.require_user()?;

    let course = find_course(&ctx, course_ref)?;
    let lesson_ids: Vec<Uuid> = course
        .sections
        .iter()
        .flat_map(|s| s.lessons.iter().map(|l| l.id))
        .collect();
    let lesson_id = resolve_id(lesson_ref, &lesson_ids)?;
    let lesson = course.find_lesson(lesson_id).expect("resolved against course");

    let pb = output::spinner("Updating progress...");
    let result =
        ctx.enrollment_service
            .set_lesson_completed(user.id, course.id, lesson_id, !undo);
    pb.finish_and_clear();

    match result {
        Ok(enrollment) => {
            log_event(&logger, LogEvent::new("progress_updated").with_command("complete"));
            let progress = enrollment.progress_for(&course);
            if undo {
                output::warning(&format!("Marked '{}' as not completed", lesson.title));
            } else {
                output::success(&format!("Completed '{}'", lesson.title));
            }
            println!(
                "{}",
                output::progress_cell(
                    progress.completed_lessons,
                    progress.total_lessons,
                    progress.progress_percentage
                )
            );
            if progress.is_complete {
                output::success("Course complete, nice work!");
            }
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

pub fn run_my_courses(
    search: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    sort: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.auth_service.require_user()?;

    let filter = CourseFilter {
        search,
        category,
        difficulty,
        sort: parse_sort(sort.as_deref()),
    };
    let courses = ctx.catalog_service.all()?;
    let mine = ctx.enrollment_service.my_courses(user.id, &courses, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&mine)?);
        return Ok(());
    }

    if mine.is_empty() {
        output::warning("You aren't enrolled in any courses yet");
        println!("{}", "Browse the catalog with: crs courses list".dimmed());
        return Ok(());
    }

    println!("{}", "My Courses".bold());
    println!();
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Category", "Progress", "Status"]);
    for entry in &mine {
        let status = if entry.progress.is_complete {
            "COMPLETED".green().to_string()
        } else if entry.progress.completed_lessons == 0 {
            "Start Learning".to_string()
        } else {
            "Continue Learning".to_string()
        };
        table.add_row(vec![
            output::short_id(&entry.course.id),
            entry.course.title.clone(),
            entry.course.category.clone(),
            output::progress_cell(
                entry.progress.completed_lessons,
                entry.progress.total_lessons,
                entry.progress.progress_percentage,
            ),
            status,
        ]);
    }
    println!("{}", table);
    Ok(())
}
