//! Reset command - the email / OTP / new password flow

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};

use courseline_core::domain::{validate_email, validate_password};
use courseline_core::services::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(email: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    // Step 1: email
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

    let pb = output::spinner("Sending OTP...");
    let result = ctx.auth_service.forgot_password(&email);
    pb.finish_and_clear();
    if let Err(e) = result {
        log_event(
            &logger,
            LogEvent::new("reset_failed")
                .with_command("reset")
                .with_error(e.to_string()),
        );
        output::error(&e.to_string());
        std::process::exit(1);
    }
    println!("Enter the OTP sent to your email");

    // Step 2: OTP, re-prompted inline on a wrong code
    loop {
        let otp: String = Input::new().with_prompt("OTP").interact_text()?;
        match ctx.auth_service.verify_otp(&otp) {
            Ok(()) => break,
            Err(e) => output::error(&e.to_string()),
        }
    }

    // Step 3: new password
    let new_password = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .validate_with(|input: &String| match validate_password(input) {
            Some(e) => Err(e.message),
            None => Ok(()),
        })
        .interact()?;

    ctx.auth_service.reset_password(&email, &new_password)?;
    log_event(&logger, LogEvent::new("reset_success").with_command("reset"));

    output::success("Password reset successfully!");
    println!("{}", "Sign in with your new password: crs signin".dimmed());
    Ok(())
}
