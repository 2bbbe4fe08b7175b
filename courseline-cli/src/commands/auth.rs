//! Signup, signin and signout commands

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password, Select};

use courseline_core::services::{LogEvent, SignUpRequest};
use courseline_core::domain::{validate_email, validate_password};
use courseline_core::UserCategory;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run_signup(
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let first_name = match first_name {
        Some(v) => v,
        None => Input::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match last_name {
        Some(v) => v,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };
    let email = match email {
        Some(v) => v,
        None => Input::new()
            .with_prompt("Email")
            .validate_with(|input: &String| match validate_email(input) {
                Some(e) => Err(e.message),
                None => Ok(()),
            })
            .interact_text()?,
    };
    let category = match category {
        Some(v) => UserCategory::parse_or_default(&v),
        None => {
            let options = ["student", "employed"];
            let choice = Select::new()
                .with_prompt("Category")
                .items(&options)
                .default(0)
                .interact()?;
            UserCategory::parse_or_default(options[choice])
        }
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .validate_with(|input: &String| match validate_password(input) {
            Some(e) => Err(e.message),
            None => Ok(()),
        })
        .interact()?;

    let pb = output::spinner("Creating account...");
    let result = ctx.auth_service.sign_up(SignUpRequest {
        first_name,
        last_name,
        email,
        password,
        category,
    });
    pb.finish_and_clear();

    match result {
        Ok(user) => {
            log_event(&logger, LogEvent::new("signup_success").with_command("signup"));
            output::success("Account created successfully!");
            println!("Sign in with: crs signin {}", user.email);
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("signup_failed")
                    .with_command("signup")
                    .with_error(e.to_string()),
            );
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

pub fn run_signin(email: Option<String>, remember: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    // Surface the one-shot account-deleted notice, as the sign-in page does
    if ctx.auth_service.take_account_deleted_flag()? {
        output::success("Your account has been deleted successfully.");
    }

    let remembered = ctx.auth_service.remembered_credentials()?;
    let (email, password) = match email {
        Some(email) => {
            let password = Password::new().with_prompt("Password").interact()?;
            (email, password)
        }
        None => match remembered {
            Some((email, password)) => {
                println!("Using remembered credentials for {}", email.bold());
                (email, password)
            }
            None => {
                let email: String = Input::new().with_prompt("Email").interact_text()?;
                let password = Password::new().with_prompt("Password").interact()?;
                (email, password)
            }
        },
    };

    let pb = output::spinner("Signing in...");
    let result = ctx.auth_service.sign_in(&email, &password, remember);
    pb.finish_and_clear();

    match result {
        Ok(state) => {
            log_event(&logger, LogEvent::new("signin_success").with_command("signin"));
            let user = state.user.expect("authenticated state has a user");
            output::success(&format!("Welcome back, {}!", user.name));

            // First sign-in of a session gets the assistant's greeting
            if ctx.chatbot_service.greeting_pending(user.id)? {
                ctx.chatbot_service.mark_greeting_shown(user.id)?;
                println!();
                output::info("Edward: Hi there! I'm Edward, your personal learning assistant.");
                println!("{}", "Try 'crs chat' to ask about courses.".dimmed());
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("signin_failed")
                    .with_command("signin")
                    .with_error(e.to_string()),
            );
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

pub fn run_signout() -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    match ctx.auth_service.current_user()? {
        Some(user) => {
            ctx.auth_service.sign_out()?;
            log_event(&logger, LogEvent::new("signout").with_command("signout"));
            output::success(&format!("Signed out {}", user.email));
        }
        None => {
            output::warning("Nobody is signed in");
        }
    }
    Ok(())
}
