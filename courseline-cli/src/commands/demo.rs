//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use courseline_core::services::DemoService;

use super::get_courseline_dir;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let courseline_dir = get_courseline_dir();
    std::fs::create_dir_all(&courseline_dir)?;
    let demo_service = DemoService::new(&courseline_dir);

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable()?;
            println!("{}", "Demo mode enabled".green());
            println!(
                "Demo data has been populated. Sign in with demo@courseline.dev / Learn123! \
                 and run 'crs courses list'."
            );
            Ok(())
        }
        Some(DemoCommands::Off) => {
            demo_service.disable(false)?; // Don't delete demo data by default
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
