//! Wanted Display CLI
//!
//! Local and scheduled-job entry point. Running without a subcommand pushes
//! a freshly rendered bitmap to the plugin webhook.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wanted_display::{config::Settings, error::Result, models::Credentials, pipeline};

/// Wanted Display - e-ink renderer for the FBI Most Wanted listing
#[derive(Parser, Debug)]
#[command(
    name = "wanted-display",
    version,
    about = "Renders an FBI Most Wanted record for a TRMNL display"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Fetch, render, write artifacts and upload the bitmap (default)
    Push,

    /// Fetch and send merge variables to the webhook
    Merge,

    /// Fetch, render and write artifacts without publishing
    Snapshot,

    /// Validate the configuration file and report credentials
    Validate,

    /// Run the development HTTP server
    #[cfg(feature = "server")]
    Serve,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose || Credentials::from_env().debug);

    log::info!("Wanted Display starting...");

    let settings = Settings::load(&cli.config)?;
    let Settings {
        config,
        credentials,
    } = &settings;

    match cli.command.unwrap_or(Command::Push) {
        Command::Push => {
            pipeline::run_push(config, credentials)?;
        }

        Command::Merge => {
            pipeline::run_merge(config, credentials)?;
        }

        Command::Snapshot => {
            pipeline::run_snapshot(config, credentials)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            // Settings::load already validated the file
            log::info!("✓ Config OK ({})", cli.config.display());

            for (name, present) in [
                (Credentials::PLUGIN_UUID_VAR, credentials.plugin_uuid.is_some()),
                (Credentials::API_KEY_VAR, credentials.api_key.is_some()),
            ] {
                if present {
                    log::info!("✓ {} is set", name);
                } else {
                    log::warn!("✗ {} is not set", name);
                }
            }
        }

        #[cfg(feature = "server")]
        Command::Serve => {
            wanted_display::server::serve(&settings)?;
        }
    }

    log::info!("Done!");

    Ok(())
}
