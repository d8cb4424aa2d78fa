//! Modgen - project metadata, prompts and validation
//!
//! Main entry point for the `modgen` CLI.

use anyhow::{bail, Context, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use modgen::cli::{Cli, Commands};
use modgen::commands;
use modgen::commands::chat::ChatOptions;
use modgen::config::Config;
use modgen::validation::ValidationEngine;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("modgen.yaml");
    let mut config = Config::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;
    config.apply_root_override(cli.root.clone());

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Project { command } => {
            let store = commands::open_store(&config).context("Failed to open project store")?;
            commands::project::handle_project(&store, command)?;
            Ok(())
        }
        Commands::Validate { command } => {
            let engine = ValidationEngine::new();
            let result = commands::validate::handle_validate(&engine, command)?;
            if !result.is_valid() {
                bail!("Validation found {} issue(s)", result.issues.len());
            }
            Ok(())
        }
        Commands::Chat {
            prompt,
            model,
            system,
            temperature,
            max_tokens,
            json_object,
            raw,
        } => {
            tracing::debug!("Starting chat request");
            let options = ChatOptions {
                prompt,
                model,
                system,
                temperature,
                max_tokens,
                json_object,
            };
            commands::chat::run_chat(&config, options, raw)?;
            Ok(())
        }
    }
}

/// Initialize tracing on stderr
///
/// `RUST_LOG` takes precedence over the `--verbose` default.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "modgen=debug" } else { "modgen=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
