//! FAQ command - frequently asked questions

use anyhow::Result;
use colored::Colorize;

const FAQS: &[(&str, &str)] = &[
    (
        "How do I create a new course?",
        "Run 'crs courses new'. Fill in all required fields including title (10-60 characters), \
         description, category, and difficulty. Add sections and lessons as prompted.",
    ),
    (
        "What image formats are supported for thumbnails?",
        "You can reference PNG, JPG, or GIF images by external URL, or inline them as a data URI.",
    ),
    (
        "How do I edit a course?",
        "Find the course id with 'crs courses list', then run 'crs courses edit <id>' with the \
         fields you want to change.",
    ),
    (
        "Can I delete multiple courses at once?",
        "Yes! Pass several ids to 'crs courses remove' to delete them all at once.",
    ),
    (
        "How do I add sections and lessons to a course?",
        "When creating or editing a course, the section builder walks you through adding sections \
         and the lessons inside them. Every lesson needs a title and a short description.",
    ),
    (
        "What happens if I delete a course?",
        "Deleting a course is permanent and cannot be undone. Make sure you want to delete the \
         course before confirming the action.",
    ),
];

pub fn run() -> Result<()> {
    println!("{}", "Frequently Asked Questions".bold());
    println!();
    for (question, answer) in FAQS {
        println!("{}", question.bold());
        println!("{}", answer);
        println!();
    }
    Ok(())
}
