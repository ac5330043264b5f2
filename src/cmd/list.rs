// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for modpipe.

use crate::cli::build::ListArgs;
use crate::config::Config;
use crate::config::module::Module;
use crate::error::Result;
use crate::task::registry::TaskRegistry;

/// Formats one module line: name, state, dependencies and archive.
#[must_use]
pub fn describe_module(module: &Module) -> String {
    let state = if module.enabled() { "enabled" } else { "disabled" };
    let deps = if module.compile_only().is_empty() {
        "-".to_string()
    } else {
        module.compile_only().join(",")
    };
    format!(
        "{:<8} {:<8} compile_only={:<8} {}",
        module.name(),
        state,
        deps,
        module.archive().display()
    )
}

/// Lines printed by `list`: module details, or compile waves with `--waves`.
///
/// # Errors
///
/// Returns an error if a pattern matches no module or the dependencies
/// cannot be ordered.
pub fn list_lines(args: &ListArgs, config: &Config) -> Result<Vec<String>> {
    let registry = TaskRegistry::from_config(config);
    let selected = registry.resolve(&args.modules)?;
    let closure = registry.with_dependencies(&selected)?;

    if args.waves {
        return Ok(registry
            .waves(&closure)?
            .iter()
            .enumerate()
            .map(|(i, wave)| format!("wave {}: {}", i + 1, wave.join(", ")))
            .collect());
    }

    // Disabled modules are listed too when nothing was selected.
    let modules = config.modules();
    Ok(modules
        .iter()
        .filter(|m| args.modules.is_empty() || closure.contains(m.name()))
        .map(describe_module)
        .collect())
}

/// Main handler for list command.
///
/// # Errors
///
/// Returns an error if module resolution fails.
pub fn run_list_command(args: &ListArgs, config: &Config) -> Result<()> {
    let lines = match list_lines(args, config) {
        Ok(lines) => lines,
        Err(e) => {
            eprintln!("Failed to resolve module patterns: {e}");
            return Err(e);
        }
    };

    if lines.is_empty() {
        println!("No modules found");
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
    Ok(())
}
