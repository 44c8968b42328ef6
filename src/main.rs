//! swbuild - service worker precache manifest builder
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use swbuild::cli::{Cli, Commands};
use swbuild::config::ConfigManager;
use swbuild::error::{SwBuildError, SwBuildResult};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SwBuildResult<()> {
    let cli = Cli::parse();

    // Init command doesn't need config loading
    if let Commands::Init(args) = cli.command {
        init_logging(cli.verbose, "text");
        return swbuild::cli::commands::init(args).await;
    }

    // --config wins, then the nearest swbuild.toml, then the user config
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| SwBuildError::io("getting current directory", e))?;
        match ConfigManager::find_local_config(&cwd) {
            Some(path) => ConfigManager::with_path(path),
            None => ConfigManager::new(),
        }
    };

    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Using config: {}", config_manager.path().display());

    match cli.command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::Manifest(args) => swbuild::cli::commands::manifest(args, &config).await,
        Commands::Inject => swbuild::cli::commands::inject(&config).await,
        Commands::Routes(args) => swbuild::cli::commands::routes(args, &config).await,
        Commands::Config(args) => {
            swbuild::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("swbuild=warn"),
        1 => EnvFilter::new("swbuild=info"),
        _ => EnvFilter::new("swbuild=debug"),
    };

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .init();
    }
}
