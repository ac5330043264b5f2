// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Version | Options | Inis | List | Build | Merge | Publish
//! ```

use std::process::ExitCode;

use modpipe::cli::{self, Cli, Command};
use modpipe::cmd::build::{run_build_command, run_merge_command, run_publish_command};
use modpipe::cmd::config::{run_inis_command, run_options_command};
use modpipe::cmd::list::run_list_command;
use modpipe::config::Config;
use modpipe::config::loader::ConfigLoader;
use modpipe::error::Result;
use modpipe::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_CONFIG_FILE: &str = "modpipe.toml";
const ENV_PREFIX: &str = "MODPIPE";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let command = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(Command::Inis) => {
            return match build_config_loader(&cli) {
                Ok(loader) => {
                    run_inis_command(&loader.format_loaded_files());
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            };
        }
        Some(command) => command,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch_command(command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {e:#}");
    ExitCode::FAILURE
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .with_file_format(config.global.log_format)
        .build()
}

async fn dispatch_command(command: &Command, config: &Config) -> Result<()> {
    let dry = config.global.dry;
    match command {
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::List(args) => run_list_command(args, config),
        Command::Build(args) => run_build_command(args, config, dry).await,
        Command::Merge => run_merge_command(config, dry).await,
        Command::Publish(args) => run_publish_command(args, config, dry).await,
        Command::Version | Command::Inis => Ok(()),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Layers modpipe.toml, --ini files, MODPIPE_* and CLI overrides.
fn build_config_loader(cli: &Cli) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for ini_path in &cli.global.inis {
        loader = loader.add_toml_file(ini_path);
    }

    let mut overrides = cli.global.to_config_overrides();
    match &cli.command {
        Some(Command::Build(args)) => overrides.extend(args.to_config_overrides()),
        Some(Command::Publish(args)) => overrides.extend(args.build.to_config_overrides()),
        _ => {}
    }

    loader
        .with_env_prefix(ENV_PREFIX)
        .apply_overrides(overrides.as_slice())
}

fn load_config(cli: &Cli) -> Result<Config> {
    build_config_loader(cli)?.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}
