//! Courseline CLI - course management in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{
    auth, chat, courses, dashboard, demo, enroll, faq, logs, pages, profile, reset, users,
};

/// Courseline - course management in your terminal
#[derive(Parser)]
#[command(name = "crs", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Signup {
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// First name
        #[arg(long)]
        first_name: Option<String>,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
        /// Audience category (student, employed)
        #[arg(long)]
        category: Option<String>,
    },

    /// Sign in to an account
    Signin {
        /// Email address (falls back to remembered credentials)
        email: Option<String>,
        /// Remember these credentials for the next sign-in
        #[arg(long)]
        remember: bool,
    },

    /// Sign out of the current session
    Signout,

    /// Reset a forgotten password (email, OTP, new password)
    Reset {
        /// Email address
        email: Option<String>,
    },

    /// Show or edit the signed-in profile
    Profile {
        #[command(subcommand)]
        command: Option<profile::ProfileCommands>,
    },

    /// Browse and manage the course catalog
    Courses {
        #[command(subcommand)]
        command: courses::CourseCommands,
    },

    /// List your enrolled courses with progress
    MyCourses {
        /// Filter by title substring
        #[arg(long)]
        search: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Filter by difficulty
        #[arg(long)]
        difficulty: Option<String>,
        /// Sort order (a-z, z-a)
        #[arg(long)]
        sort: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enroll in a course
    Enroll {
        /// Course id (or unambiguous prefix)
        course: String,
    },

    /// Remove courses from your enrollments
    Drop {
        /// Course ids to drop (or unambiguous prefixes)
        courses: Vec<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Mark a lesson completed (or not, with --undo)
    Complete {
        /// Course id (or unambiguous prefix)
        course: String,
        /// Lesson id (or unambiguous prefix)
        lesson: String,
        /// Clear the completion instead of setting it
        #[arg(long)]
        undo: bool,
    },

    /// Show the dashboard summary
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the user directory
    Users {
        #[command(subcommand)]
        command: users::UserCommands,
    },

    /// Talk to Edward, the learning assistant
    Chat {
        /// One-shot message (omit for an interactive session)
        message: Option<String>,
    },

    /// Frequently asked questions
    Faq,

    /// Support contacts and common issues
    Support,

    /// Terms of service
    Terms,

    /// Privacy policy
    Privacy,

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// Show recent event log entries
    Logs {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Plain output when piped
    if atty::isnt(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup { email, first_name, last_name, category } => {
            auth::run_signup(email, first_name, last_name, category)
        }
        Commands::Signin { email, remember } => auth::run_signin(email, remember),
        Commands::Signout => auth::run_signout(),
        Commands::Reset { email } => reset::run(email),
        Commands::Profile { command } => profile::run(command),
        Commands::Courses { command } => courses::run(command),
        Commands::MyCourses { search, category, difficulty, sort, json } => {
            enroll::run_my_courses(search, category, difficulty, sort, json)
        }
        Commands::Enroll { course } => enroll::run_enroll(&course),
        Commands::Drop { courses, force } => enroll::run_drop(courses, force),
        Commands::Complete { course, lesson, undo } => {
            enroll::run_complete(&course, &lesson, undo)
        }
        Commands::Dashboard { json } => dashboard::run(json),
        Commands::Users { command } => users::run(command),
        Commands::Chat { message } => chat::run(message),
        Commands::Faq => faq::run(),
        Commands::Support => pages::run_support(),
        Commands::Terms => pages::run_terms(),
        Commands::Privacy => pages::run_privacy(),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { limit, json } => logs::run(limit, json),
    }
}
