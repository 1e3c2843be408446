use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tcal_cli::commands::{convert, events, show};
use tcal_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Convert {
            input,
            output,
            location,
        }) => {
            let location = location.as_deref().or(config.location.as_deref());
            convert::run(input, output, location, config.year_policy)?;
        }
        Some(Commands::Show { file }) => {
            show::run(file, config.year_policy)?;
        }
        Some(Commands::Events { file, json }) => {
            events::run(file, *json, config.year_policy)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
