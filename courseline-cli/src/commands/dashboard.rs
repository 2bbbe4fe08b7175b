//! Dashboard command - summary analytics

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.auth_service.current_user()?;
    let summary = ctx.dashboard_service.summary(user.as_ref().map(|u| u.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Courseline Dashboard".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Courses", &summary.total_courses.to_string()]);
    table.add_row(vec!["Users", &summary.total_users.to_string()]);
    table.add_row(vec!["Enrollments", &summary.total_enrollments.to_string()]);
    println!("{}", table);
    println!();

    if user.is_some() {
        println!("{}", "Your Learning".bold());
        println!(
            "  Enrolled: {}   In progress: {}   Completed: {}",
            summary.enrolled_count, summary.in_progress_count, summary.completed_count
        );
        if !summary.recent.is_empty() {
            println!();
            println!("{}", "Recently accessed".bold());
            for entry in &summary.recent {
                println!(
                    "  - {} ({}%)",
                    entry.course.title, entry.progress.progress_percentage
                );
            }
        }
        println!();
    }

    if !summary.categories.is_empty() {
        println!("{}", "Courses by Category".bold());
        for category in &summary.categories {
            println!("  {:<20} {}", category.name, "#".repeat(category.count));
        }
        println!();
    }

    println!("{}", "Courses by Difficulty".bold());
    for bucket in &summary.difficulties {
        println!("  {:<20} {}", bucket.name, bucket.count);
    }

    if !summary.enrollment_trend.is_empty() {
        println!();
        println!("{}", "Enrollment Trend".bold());
        for month in &summary.enrollment_trend {
            println!("  {:<10} {}", month.month, "#".repeat(month.count));
        }
    }

    Ok(())
}
