// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::Parser;
use modpipe::cli::build::{BuildArgs, ConflictArg};
use modpipe::cli::global::GlobalOptions;
use modpipe::cli::{Cli, Command};
use modpipe::config::types::ConflictPolicy;
use modpipe::task::Stages;

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["modpipe", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["modpipe"]).unwrap();
    assert!(cli.command.is_none());
}

// =============================================================================
// Build Command
// =============================================================================

#[test]
fn cli_build_no_args() {
    let cli = Cli::try_parse_from(["modpipe", "build"]).unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert!(args.modules.is_empty());
    assert!(!args.clean);
    assert_eq!(args.stages(), Stages::BUILD);
}

#[test]
fn cli_build_with_modules() {
    let cli = Cli::try_parse_from(["modpipe", "build", "-c", "fabric", "paper"]).unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert!(args.clean);
    assert_eq!(args.modules, ["fabric", "paper"]);
}

#[test]
fn cli_build_conflict_policies() {
    for (value, expected) in [
        ("overwrite", ConflictPolicy::Overwrite),
        ("warn", ConflictPolicy::Warn),
        ("fail", ConflictPolicy::Fail),
    ] {
        let cli = Cli::try_parse_from(["modpipe", "build", "--conflicts", value]).unwrap();
        let Some(Command::Build(args)) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.conflicts.map(ConflictPolicy::from), Some(expected));
    }
}

#[test]
fn build_args_to_config_overrides() {
    let args = BuildArgs {
        conflicts: Some(ConflictArg::Warn),
        modules: vec!["pa*".to_string()],
        ..Default::default()
    };
    insta::assert_debug_snapshot!(args.to_config_overrides(), @r#"
    [
        "merge/conflicts=warn",
    ]
    "#);
}

#[test]
fn build_args_stage_flags() {
    let args = BuildArgs {
        no_compile: true,
        no_merge: true,
        ..Default::default()
    };
    assert_eq!(args.stages(), Stages::TEMPLATE | Stages::PACKAGE);
}

// =============================================================================
// Publish Command
// =============================================================================

#[test]
fn cli_publish_with_build_flags() {
    let cli = Cli::try_parse_from(["modpipe", "publish", "--no-compile", "--conflicts", "fail"])
        .unwrap();
    let Some(Command::Publish(args)) = cli.command else {
        panic!("expected publish command");
    };
    assert_eq!(
        args.stages(),
        Stages::TEMPLATE | Stages::PACKAGE | Stages::MERGE | Stages::PUBLISH
    );
    assert_eq!(args.build.to_config_overrides(), ["merge/conflicts=fail"]);
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_global_options_log_levels() {
    let cli = Cli::try_parse_from(["modpipe", "-l", "5", "--file-log-level", "3", "build"]).unwrap();
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(cli.global.file_log_level, Some(3));
}

#[test]
fn cli_global_options_multiple_inis() {
    let cli = Cli::try_parse_from(["modpipe", "-i", "base.toml", "-i", "ci.toml", "merge"]).unwrap();
    assert_eq!(
        cli.global.inis,
        [PathBuf::from("base.toml"), PathBuf::from("ci.toml")]
    );
}

#[test]
fn cli_global_options_after_subcommand_rejected() {
    assert!(Cli::try_parse_from(["modpipe", "build", "--dry"]).is_err());
}

#[test]
fn cli_global_options_to_config_overrides() {
    let opts = GlobalOptions {
        log_level: Some(4),
        file_log_level: Some(6),
        log_file: Some(PathBuf::from("build/modpipe.log")),
        root: Some(PathBuf::from("/work")),
        options: vec!["versions/minecraft=1.21.5".to_string()],
        ..Default::default()
    };
    insta::assert_debug_snapshot!(opts.to_config_overrides(), @r#"
    [
        "versions/minecraft=1.21.5",
        "global/output_log_level=4",
        "global/file_log_level=6",
        "global/log_file=build/modpipe.log",
        "paths/root=/work",
    ]
    "#);
}

// =============================================================================
// List Command
// =============================================================================

#[test]
fn cli_list_modules() {
    let cli = Cli::try_parse_from(["modpipe", "list", "paper"]).unwrap();
    let Some(Command::List(args)) = cli.command else {
        panic!("expected list command");
    };
    assert!(!args.waves);
    assert_eq!(args.modules, ["paper"]);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn cli_invalid_log_level() {
    assert!(Cli::try_parse_from(["modpipe", "-l", "10", "build"]).is_err());
}

#[test]
fn cli_unknown_command() {
    assert!(Cli::try_parse_from(["modpipe", "release"]).is_err());
}
