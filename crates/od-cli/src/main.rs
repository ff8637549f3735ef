use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use od_cli::commands::{correct, count};
use od_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Some(Commands::Correct { input, json }) => {
            correct::run(&input, json)?;
        }
        Some(Commands::Count {
            input,
            from,
            to,
            today,
            no_correct,
            per_document,
            json,
        }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");
            let options = count::CountOptions {
                from,
                to,
                today,
                no_correct,
                per_document,
                json,
            };
            count::run(&input, &options, &config)?;
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
