// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parallel file tree traversal for packaging.
//!
//! ```text
//! walk:  parallel_walk()  ignore::WalkParallel (multi-core)
//!        tree_files()     sorted relative paths, archive-ready
//! ```

pub mod walk;

#[cfg(test)]
mod tests;
