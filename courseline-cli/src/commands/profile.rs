//! Profile command - show and edit the signed-in user

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};

use courseline_core::services::{LogEvent, ProfileUpdate};
use courseline_core::UserCategory;

use super::{get_context, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the signed-in profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit profile fields
    Edit {
        /// First name
        #[arg(long)]
        first_name: Option<String>,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Profile image URL or data URI
        #[arg(long)]
        image: Option<String>,
        /// Audience category (student, employed)
        #[arg(long)]
        category: Option<String>,
    },
    /// Change the account password
    Password,
    /// Delete the account
    Delete {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: Option<ProfileCommands>) -> Result<()> {
    match command {
        None => run_show(false),
        Some(ProfileCommands::Show { json }) => run_show(json),
        Some(ProfileCommands::Edit {
            first_name,
            last_name,
            phone,
            image,
            category,
        }) => run_edit(first_name, last_name, phone, image, category),
        Some(ProfileCommands::Password) => run_password(),
        Some(ProfileCommands::Delete { force }) => run_delete(force),
    }
}

fn run_show(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.auth_service.require_user()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{}", "Profile".bold());
    println!();
    let mut table = output::create_table();
    table.add_row(vec!["Name", &user.name]);
    table.add_row(vec!["Email", &user.email]);
    table.add_row(vec!["Category", user.category.as_str()]);
    table.add_row(vec!["Phone", user.phone.as_deref().unwrap_or("-")]);
    table.add_row(vec![
        "Image",
        user.profile_image.as_deref().unwrap_or("-"),
    ]);
    println!("{}", table);
    Ok(())
}

fn run_edit(
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    image: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    // With no flags, walk the editable fields interactively
    let update = if first_name.is_none()
        && last_name.is_none()
        && phone.is_none()
        && image.is_none()
        && category.is_none()
    {
        let current = ctx.auth_service.require_user()?;
        let first_name: String = Input::new()
            .with_prompt("First name")
            .default(current.first_name.clone())
            .interact_text()?;
        let last_name: String = Input::new()
            .with_prompt("Last name")
            .default(current.last_name.clone())
            .interact_text()?;
        let phone: String = Input::new()
            .with_prompt("Phone")
            .default(current.phone.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        ProfileUpdate {
            first_name: Some(first_name),
            last_name: Some(last_name),
            phone: if phone.is_empty() { None } else { Some(phone) },
            ..Default::default()
        }
    } else {
        ProfileUpdate {
            first_name,
            last_name,
            phone,
            profile_image: image,
            category: category.as_deref().map(UserCategory::parse_or_default),
        }
    };

    let pb = output::spinner("Saving profile...");
    let result = ctx.auth_service.update_profile(update);
    pb.finish_and_clear();

    match result {
        Ok(user) => {
            log_event(&logger, LogEvent::new("profile_updated").with_command("profile"));
            output::success("Profile updated successfully");
            println!("{}", user.name.bold());
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run_password() -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    ctx.auth_service.require_user()?;

    let current = Password::new().with_prompt("Current password").interact()?;
    let new = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "Passwords do not match")
        .interact()?;

    let pb = output::spinner("Changing password...");
    let result = ctx.auth_service.change_password(&current, &new);
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            log_event(&logger, LogEvent::new("password_changed").with_command("profile"));
            output::success("Password changed successfully");
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run_delete(force: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = ctx.auth_service.require_user()?;

    if !force {
        println!(
            "\n{}",
            format!("This will permanently delete the account for {}.", user.email).yellow()
        );
        println!("{}\n", "Your enrollments and progress will be orphaned.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let pb = output::spinner("Deleting account...");
    let result = ctx.auth_service.delete_account();
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            log_event(&logger, LogEvent::new("account_deleted").with_command("profile"));
            output::success("Account deleted successfully!");
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}
