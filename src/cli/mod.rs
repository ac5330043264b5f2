// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for modpipe using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! modpipe [global options] <command>
//! version
//! options
//! inis
//! list [--waves] [MODULE...]
//! build [--clean] [--no-compile] [--no-merge] [--conflicts P] [MODULE...]
//! merge
//! publish [--skip-build] [build options]
//! ```

pub mod build;
pub mod global;


use crate::cli::build::{BuildArgs, ListArgs, PublishArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Multi-platform mod build pipeline.
#[derive(Debug, Parser)]
#[command(
    name = "modpipe",
    author,
    version,
    about = "Multi-platform mod build pipeline",
    long_about = "modpipe Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Compiles the api, fabric and paper modules, expands version\n\
                  tokens in their platform manifests, packages each module and\n\
                  merges everything into one archive that loads on every\n\
                  platform. `modpipe publish` uploads that archive to Modrinth.",
    after_help = "CONFIG FILES:\n\n\
                  modpipe reads `modpipe.toml` from the current directory if it\n\
                  exists. Additional files can be given with --ini; later files\n\
                  override earlier ones. MODPIPE_SECTION__KEY environment variables\n\
                  and --set section/key=value override both.\n\n\
                  The upload token is read from MODRINTH_TOKEN and the changelog\n\
                  from COMMIT_MESSAGE when `publish` runs."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Lists modules and their compile order.
    List(ListArgs),

    /// Compiles, templates and packages modules, then merges them.
    Build(BuildArgs),

    /// Merges existing module archives into the root archive.
    Merge,

    /// Builds (unless --skip-build) and uploads the merged archive.
    Publish(PublishArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
