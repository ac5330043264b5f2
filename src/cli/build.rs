// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build, merge, publish and list command arguments.
//!
//! # Flag Effects
//!
//! ```text
//! build [MODULE...]   compile_only dependencies of MODULE are added
//!   --clean           remove staging, module archives and merged archive first
//!   --no-compile      use existing classes directories
//!   --no-merge        stop after packaging module archives
//!   --conflicts P     merge.conflicts override (overwrite|warn|fail)
//! publish --skip-build  upload the existing merged archive
//! ```

use clap::{Args, ValueEnum};

use crate::config::types::ConflictPolicy;
use crate::task::Stages;

/// Overwrite reporting policy accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    Overwrite,
    Warn,
    Fail,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Overwrite => Self::Overwrite,
            ConflictArg::Warn => Self::Warn,
            ConflictArg::Fail => Self::Fail,
        }
    }
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Removes staged resources and archives before building.
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Skips compile commands; classes directories must already exist.
    #[arg(long = "no-compile")]
    pub no_compile: bool,

    /// Packages module archives without merging them.
    #[arg(long = "no-merge")]
    pub no_merge: bool,

    /// How the merger reports paths supplied by more than one module.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub conflicts: Option<ConflictArg>,

    /// Modules to build. Globs like 'pa*' are supported.
    /// Merging always uses every module in merge.order.
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,
}

impl BuildArgs {
    /// Stages selected by the flags.
    #[must_use]
    pub fn stages(&self) -> Stages {
        let mut stages = Stages::BUILD;
        if self.no_compile {
            stages.remove(Stages::COMPILE);
        }
        if self.no_merge {
            stages.remove(Stages::MERGE);
        }
        stages
    }

    /// Converts build arguments to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        self.conflicts
            .map(|policy| format!("merge/conflicts={}", ConflictPolicy::from(policy)))
            .into_iter()
            .collect()
    }
}

/// Arguments for the `publish` command.
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Uploads the existing merged archive without building first.
    #[arg(long = "skip-build")]
    pub skip_build: bool,

    /// Build options, used unless --skip-build is given.
    #[command(flatten)]
    pub build: BuildArgs,
}

impl PublishArgs {
    #[must_use]
    pub fn stages(&self) -> Stages {
        if self.skip_build {
            Stages::PUBLISH
        } else {
            self.build.stages() | Stages::PUBLISH
        }
    }
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Shows the compile waves instead of module details.
    #[arg(short = 'w', long)]
    pub waves: bool,

    /// Lists only modules matching these names or globs, plus their
    /// compile-only dependencies.
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,
}
