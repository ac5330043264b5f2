// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::raw("./gradlew :fabric:classes")
//!   .cwd() .env() .capture_output()
//!   .run() / .run_with_cancellation(token)
//!       --> tokio::process::Command
//!           stream stdout/stderr into the log
//!           cancel: kill the child
//!       --> ProcessOutput { exit_code, stdout, stderr, interrupted }
//! ```

pub mod builder;
mod io;
mod runner;
