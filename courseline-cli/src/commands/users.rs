//! Users command - directory maintenance

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use uuid::Uuid;

use courseline_core::services::{LogEvent, ProfileUpdate};
use courseline_core::UserCategory;

use super::{get_context, get_logger, log_event, resolve_id};
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// List registered users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a user record
    Edit {
        /// User id (or unambiguous prefix)
        user: String,
        /// First name
        #[arg(long)]
        first_name: Option<String>,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Audience category (student, employed)
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove a user record
    Remove {
        /// User id (or unambiguous prefix)
        user: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: UserCommands) -> Result<()> {
    match command {
        UserCommands::List { json } => run_list(json),
        UserCommands::Edit { user, first_name, last_name, phone, category } => {
            run_edit(&user, first_name, last_name, phone, category)
        }
        UserCommands::Remove { user, force } => run_remove(&user, force),
    }
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth_service.require_user()?;

    let users = ctx.auth_service.users()?;
    if json {
        // The directory listing hides stored passwords
        let listing: Vec<serde_json::Value> = users
            .iter()
            .map(|u| {
                serde_json::json!({
                    "id": u.id,
                    "name": u.name,
                    "email": u.email,
                    "category": u.category.as_str(),
                    "phone": u.phone,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if users.is_empty() {
        output::warning("No registered users");
        return Ok(());
    }

    println!("{}", "Users".bold());
    println!();
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Email", "Category", "Phone"]);
    for user in &users {
        table.add_row(vec![
            output::short_id(&user.id),
            user.name.clone(),
            user.email.clone(),
            user.category.as_str().to_string(),
            user.phone.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn run_edit(
    user_ref: &str,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    let id = resolve_user_id(&ctx, user_ref)?;
    let updated = ctx.auth_service.update_user(
        id,
        ProfileUpdate {
            first_name,
            last_name,
            phone,
            profile_image: None,
            category: category.as_deref().map(UserCategory::parse_or_default),
        },
    )?;

    log_event(&logger, LogEvent::new("user_updated").with_command("users"));
    output::success(&format!("Updated {}", updated.name));
    Ok(())
}

fn run_remove(user_ref: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    let id = resolve_user_id(&ctx, user_ref)?;
    let users = ctx.auth_service.users()?;
    let user = users.iter().find(|u| u.id == id).expect("resolved id exists");

    if !force {
        println!(
            "\n{}",
            format!("This will remove the account for {}.", user.email).yellow()
        );
        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    ctx.auth_service.delete_user(id)?;
    log_event(&logger, LogEvent::new("user_removed").with_command("users"));
    output::success("User removed");
    Ok(())
}

fn resolve_user_id(ctx: &courseline_core::CourselineContext, user_ref: &str) -> Result<Uuid> {
    let ids: Vec<Uuid> = ctx.auth_service.users()?.iter().map(|u| u.id).collect();
    resolve_id(user_ref, &ids)
}
