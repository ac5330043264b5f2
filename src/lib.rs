// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          build / merge / publish
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  modules, versions, merge |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              task     build_info   publish
//!            manager    version+git   Modrinth
//!               |
//!          +----+----+
//!          v         v
//!       tasks      tools
//!   module/merge  compile/templater/packer
//!                    |          |
//!                 template     jar
//!
//!   +-----------------------------------------+
//!   |  core   process runner                  |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod build_info;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod jar;
pub mod logging;
pub mod net;
pub mod publish;
pub mod task;
pub mod template;
pub mod utility;
