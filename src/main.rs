use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use staffboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration and stylesheet
    Setup,
    /// Display the dashboard in the terminal
    Show {
        /// Print the metrics as JSON instead
        #[arg(long)]
        json: bool,

        /// Re-render every N seconds until interrupted
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        refresh: Option<u64>,
    },
    /// Write the dashboard as an HTML page
    Export {
        /// Output file
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },
}

impl From<Commands> for staffboard::AppCommand {
    fn from(cmd: Commands) -> staffboard::AppCommand {
        match cmd {
            Commands::Show { json, refresh } => staffboard::AppCommand::Show { json, refresh },
            Commands::Export { output } => staffboard::AppCommand::Export { output },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => staffboard::cli::setup::setup_at_path(path),
            None => staffboard::cli::setup::setup(),
        },
        Some(cmd) => staffboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
