//! Courses command - catalog browsing and management

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use uuid::Uuid;

use courseline_core::domain::{validate_title, Lesson, Section};
use courseline_core::services::{CourseDraft, CourseFilter, LogEvent, SortOrder};
use courseline_core::Course;

use super::{get_context, get_logger, log_event, resolve_id};
use crate::output;

#[derive(Subcommand)]
pub enum CourseCommands {
    /// List courses with filters and pagination
    List {
        /// Filter by title substring
        #[arg(long)]
        search: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Filter by difficulty
        #[arg(long)]
        difficulty: Option<String>,
        /// Sort order (a-z, z-a); default is newest first
        #[arg(long)]
        sort: Option<String>,
        /// Page number (6 courses per page)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one course with its sections and lessons
    Show {
        /// Course id (or unambiguous prefix)
        course: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a course
    New {
        /// Course title (10-60 characters)
        #[arg(long)]
        title: Option<String>,
        /// Description text
        #[arg(long)]
        description: Option<String>,
        /// Category
        #[arg(long)]
        category: Option<String>,
        /// Difficulty (Beginner, Intermediate, Advanced)
        #[arg(long)]
        difficulty: Option<String>,
        /// Thumbnail URL or data URI
        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// Edit a course
    Edit {
        /// Course id (or unambiguous prefix)
        course: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New difficulty
        #[arg(long)]
        difficulty: Option<String>,
        /// New thumbnail URL or data URI
        #[arg(long)]
        thumbnail: Option<String>,
        /// Rebuild sections and lessons interactively
        #[arg(long)]
        sections: bool,
    },

    /// Delete one or more courses
    Remove {
        /// Course ids (or unambiguous prefixes)
        courses: Vec<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: CourseCommands) -> Result<()> {
    match command {
        CourseCommands::List { search, category, difficulty, sort, page, json } => {
            run_list(search, category, difficulty, sort, page, json)
        }
        CourseCommands::Show { course, json } => run_show(&course, json),
        CourseCommands::New { title, description, category, difficulty, thumbnail } => {
            run_new(title, description, category, difficulty, thumbnail)
        }
        CourseCommands::Edit { course, title, description, category, difficulty, thumbnail, sections } => {
            run_edit(&course, title, description, category, difficulty, thumbnail, sections)
        }
        CourseCommands::Remove { courses, force } => run_remove(courses, force),
    }
}

pub fn parse_sort(sort: Option<&str>) -> Option<SortOrder> {
    match sort {
        Some("a-z") => Some(SortOrder::AToZ),
        Some("z-a") => Some(SortOrder::ZToA),
        _ => None,
    }
}

fn run_list(
    search: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    sort: Option<String>,
    page: usize,
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
    let listing = ctx.catalog_service.list(&filter, page)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.total == 0 {
        output::warning("No courses match");
        return Ok(());
    }

    println!("{}", "Course Catalog".bold());
    println!();
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Category", "Difficulty", "Lessons", "Enrolled"]);
    for course in &listing.courses {
        let enrolled = ctx
            .enrollment_service
            .find(user.id, course.id)?
            .map(|_| "yes")
            .unwrap_or("");
        table.add_row(vec![
            output::short_id(&course.id),
            course.title.clone(),
            course.category.clone(),
            course.difficulty.clone(),
            course.total_lessons().to_string(),
            enrolled.to_string(),
        ]);
    }
    println!("{}", table);
    println!(
        "Showing {} of {} courses (page {}/{})",
        listing.courses.len(),
        listing.total,
        listing.page,
        listing.total_pages.max(1)
    );
    Ok(())
}

fn run_show(course_ref: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.auth_service.require_user()?;

    let course = find_course(&ctx, course_ref)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&course)?);
        return Ok(());
    }

    println!("{}", course.title.bold());
    println!(
        "{} | {} | {} lessons",
        course.category, course.difficulty, course.total_lessons()
    );
    println!();

    let enrollment = ctx.enrollment_service.find(user.id, course.id)?;
    if let Some(enrollment) = &enrollment {
        let progress = enrollment.progress_for(&course);
        println!(
            "{} {}",
            "Progress:".bold(),
            output::progress_cell(
                progress.completed_lessons,
                progress.total_lessons,
                progress.progress_percentage
            )
        );
        println!();
    }

    for (i, section) in course.sections.iter().enumerate() {
        println!("{}", format!("{}. {}", i + 1, section.title).bold());
        for lesson in &section.lessons {
            let done = enrollment
                .as_ref()
                .map(|e| e.progress.completed_lessons.contains(&lesson.id))
                .unwrap_or(false);
            let marker = if done { "[x]".green() } else { "[ ]".normal() };
            let duration = lesson
                .duration
                .map(|d| format!(" ({} min)", d))
                .unwrap_or_default();
            println!(
                "  {} {}  {} - {}{}",
                marker,
                output::short_id(&lesson.id),
                lesson.title,
                lesson.description,
                duration
            );
        }
    }
    Ok(())
}

fn run_new(
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    thumbnail: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    let title = match title {
        Some(v) => v,
        None => Input::new()
            .with_prompt("Title (10-60 characters)")
            .validate_with(|input: &String| match validate_title(input) {
                Some(e) => Err(e.message),
                None => Ok(()),
            })
            .interact_text()?,
    };
    let description = match description {
        Some(v) => v,
        None => Input::new().with_prompt("Description").interact_text()?,
    };
    let category = match category {
        Some(v) => v,
        None => Input::new().with_prompt("Category").interact_text()?,
    };
    let difficulty = match difficulty {
        Some(v) => v,
        None => {
            let options = ["Beginner", "Intermediate", "Advanced"];
            let choice = Select::new()
                .with_prompt("Difficulty")
                .items(&options)
                .default(0)
                .interact()?;
            options[choice].to_string()
        }
    };

    let sections = build_sections_interactively(Vec::new())?;

    let pb = output::spinner("Creating course...");
    let result = ctx.catalog_service.add_course(CourseDraft {
        title,
        description,
        thumbnail,
        category,
        difficulty,
        sections,
    });
    pb.finish_and_clear();

    match result {
        Ok(course) => {
            log_event(&logger, LogEvent::new("course_created").with_command("courses"));
            output::success(&format!("Course '{}' created", course.title));
            println!("Id: {}", course.id);
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run_edit(
    course_ref: &str,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    thumbnail: Option<String>,
    rebuild_sections: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    let course = find_course(&ctx, course_ref)?;
    let sections = if rebuild_sections {
        build_sections_interactively(course.sections.clone())?
    } else {
        course.sections.clone()
    };

    let draft = CourseDraft {
        title: title.unwrap_or_else(|| course.title.clone()),
        description: description.unwrap_or_else(|| course.description.clone()),
        thumbnail: thumbnail.or_else(|| course.thumbnail.clone()),
        category: category.unwrap_or_else(|| course.category.clone()),
        difficulty: difficulty.unwrap_or_else(|| course.difficulty.clone()),
        sections,
    };

    let pb = output::spinner("Saving course...");
    let result = ctx.catalog_service.update_course(course.id, draft);
    pb.finish_and_clear();

    match result {
        Ok(course) => {
            log_event(&logger, LogEvent::new("course_updated").with_command("courses"));
            output::success(&format!("Course '{}' updated", course.title));
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run_remove(course_refs: Vec<String>, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    if course_refs.is_empty() {
        output::error("No course ids given");
        std::process::exit(1);
    }

    let mut ids = Vec::new();
    let mut titles = Vec::new();
    for course_ref in &course_refs {
        let course = find_course(&ctx, course_ref)?;
        ids.push(course.id);
        titles.push(course.title);
    }

    if !force {
        println!("\n{}", "This will permanently delete:".yellow());
        for title in &titles {
            println!("  - {}", title);
        }
        println!("{}\n", "Deleting a course cannot be undone.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let pb = output::spinner("Deleting...");
    let result = ctx.catalog_service.delete_courses(&ids);
    pb.finish_and_clear();
    result?;

    log_event(&logger, LogEvent::new("course_deleted").with_command("courses"));
    if ids.len() == 1 {
        output::success("Course deleted successfully!");
    } else {
        output::success(&format!("{} courses deleted successfully!", ids.len()));
    }
    Ok(())
}

/// Interactive section/lesson builder. A lesson needs a non-empty title and
/// description before another can be added; the same rule the form enforced.
fn build_sections_interactively(existing: Vec<Section>) -> Result<Vec<Section>> {
    let mut sections = Vec::new();

    if !existing.is_empty() {
        println!(
            "{}",
            format!("Rebuilding {} existing section(s)", existing.len()).dimmed()
        );
    }

    loop {
        let prompt = if sections.is_empty() {
            "Add a section?"
        } else {
            "Add another section?"
        };
        if !Confirm::new().with_prompt(prompt).default(sections.is_empty()).interact()? {
            break;
        }

        let title: String = Input::new()
            .with_prompt("Section title")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("All sections must have a title")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        let mut section = Section::new(title);

        loop {
            let lesson_title: String = Input::new()
                .with_prompt("Lesson title")
                .validate_with(|input: &String| {
                    if input.trim().is_empty() {
                        Err("Lesson title is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            let lesson_description: String = Input::new()
                .with_prompt("Lesson description")
                .validate_with(|input: &String| {
                    if input.trim().is_empty() {
                        Err("Lesson description is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            let duration: String = Input::new()
                .with_prompt("Duration in minutes (blank for none)")
                .allow_empty(true)
                .interact_text()?;

            let mut lesson = Lesson::new(lesson_title, lesson_description);
            lesson.duration = duration.trim().parse().ok();
            section.lessons.push(lesson);

            if !Confirm::new()
                .with_prompt("Add another lesson?")
                .default(false)
                .interact()?
            {
                break;
            }
        }

        sections.push(section);
    }

    Ok(sections)
}

/// Resolve a course reference (full id or prefix) to a course
pub fn find_course(
    ctx: &courseline_core::CourselineContext,
    course_ref: &str,
) -> Result<Course> {
    let courses = ctx.catalog_service.all()?;
    let ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
    let id = resolve_id(course_ref, &ids)?;
    Ok(ctx.catalog_service.get(id)?)
}
