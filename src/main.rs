//! survey-prep - Main Entry Point

use clap::Parser;
use survey_prep::cli::{cmd_clean, cmd_info, cmd_interactive, cmd_stats, load_config, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survey_prep=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Clean { data, output }) => {
            cmd_clean(&data, &output, &config)?;
        }
        Some(Commands::Stats { data, top }) => {
            cmd_stats(&data, top, &config)?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data, &config)?;
        }
        None => {
            cmd_interactive(&config)?;
        }
    }

    Ok(())
}
