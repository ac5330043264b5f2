// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concrete task implementations.
//!
//! ```text
//! task::tasks
//! ModuleTask:  compile --> template --> package   (one per module)
//! MergeTask:   module archives --> root archive
//! PublishTask: root archive --> distribution service
//! ```

pub mod merge;
pub mod module;
pub mod publish;
