// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source-control queries.
//!
//! ```text
//!        query.rs (public API)
//!             |
//!             v
//!      ,----------------,
//!      | GitQuery trait |
//!      '--+---------+---'
//!         |         |
//!         v         v
//!    GixBackend  ShellBackend
//!    (gix)       (git CLI, fallback)
//! ```
//!
//! Only the commit hash stamped into the merged manifest is read. A
//! directory outside any checkout is not an error; it simply has no commit.

pub mod backend;
pub mod query;
