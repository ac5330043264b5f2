// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared HTTP plumbing.
//!
//! ```text
//! global_client()       OnceLock, connection pool, keep-alive
//!        |
//! upload_body(bytes)    chunked Body::wrap_stream
//!        |
//!   Progress display
//!     Bar     [=====>     ] 5MB/10MB
//!     Silent  (none)
//! ```

use std::sync::OnceLock;

use futures_util::stream;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Body, Client};

const CHUNK_SIZE: usize = 64 * 1024;

/// Global HTTP client, initialized once and reused.
///
/// Falls back to a basic client if custom configuration fails.
pub fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(user_agent())
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// `modpipe/<version>`
#[must_use]
pub fn user_agent() -> String {
    format!("modpipe/{}", env!("CARGO_PKG_VERSION"))
}

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} @ {binary_bytes_per_sec}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Progress display style for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// Show a visual progress bar with speed
    #[default]
    Bar,
    /// No visual progress
    Silent,
}

/// Wraps `bytes` in a streaming body that advances a progress bar as
/// chunks are sent.
///
/// Returns the body, its length, and the bar (if any) so the caller can
/// finish or abandon it.
#[must_use]
pub fn upload_body(bytes: Vec<u8>, display: ProgressDisplay) -> (Body, u64, Option<ProgressBar>) {
    let total = bytes.len() as u64;
    let bar = match display {
        ProgressDisplay::Silent => None,
        ProgressDisplay::Bar => {
            let bar = ProgressBar::new(total);
            bar.set_style(bar_style());
            Some(bar)
        }
    };

    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let tick = bar.clone();
    let body = Body::wrap_stream(stream::iter(chunks.into_iter().map(move |chunk| {
        if let Some(bar) = &tick {
            bar.inc(chunk.len() as u64);
        }
        Ok::<_, std::io::Error>(chunk)
    })));

    (body, total, bar)
}
