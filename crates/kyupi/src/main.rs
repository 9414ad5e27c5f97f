// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kyupi - like/match backend with match-gated chat.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kyupi_config::{ConfigError, KyupiConfig};

/// Kyupi - like/match backend with match-gated chat.
#[derive(Parser, Debug)]
#[command(name = "kyupi", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Validate configuration and report problems.
    Check,
    /// Print the effective configuration as TOML (secrets redacted).
    Show,
}

fn load_config(path: Option<&std::path::Path>) -> Result<KyupiConfig, Vec<ConfigError>> {
    match path {
        Some(path) => kyupi_config::load_and_validate_path(path),
        None => kyupi_config::load_and_validate(),
    }
}

fn render_redacted(config: &KyupiConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.gateway.bearer_token.is_some() {
        shown.gateway.bearer_token = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&shown)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config_path.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            kyupi_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("kyupi: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => {
            println!("kyupi: configuration is valid");
        }
        Some(Commands::Config {
            action: ConfigAction::Show,
        }) => match render_redacted(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("kyupi: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("kyupi: use --help for available commands");
        }
    }
}
