use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backend;
mod commands;
mod config;

use commands::{AdvocacyCommand, ConfigCommand, DashboardCommand, MockCommand, PracticeCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "prep")]
#[command(version)]
#[command(about = "Training tools for interview preparation", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily tasks, streak and program weeks
    Dashboard(DashboardCommand),

    /// Core messages and custom practice questions
    Practice(PracticeCommand),

    /// Mock interview questions
    Mock(MockCommand),

    /// Advocacy plans
    Advocacy(AdvocacyCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prepdesk=warn,prepdesk_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Dashboard(cmd)) => cmd.run(&config)?,
        Some(Commands::Practice(cmd)) => cmd.run(&config)?,
        Some(Commands::Mock(cmd)) => cmd.run(&config)?,
        Some(Commands::Advocacy(cmd)) => cmd.run(&config)?,
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
