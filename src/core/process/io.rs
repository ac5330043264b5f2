// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output streaming for child processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks --> mpsc channels
//!   wait | cancel (kill)
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted }
//! ```

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::Result;

fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let name = process_name.to_string();
    stream.map(|stream| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stream).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                            debug!(process = %name, stream = stream_name, "{line}");
                        }
                        if flags.contains(StreamFlags::KEEP_IN_STRING) {
                            let _ = tx.send(line);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(process = %name, stream = stream_name, error = %e, "error reading stream");
                        break;
                    }
                }
            }
        })
    })
}

fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines.join("\n")
}

impl ProcessBuilder {
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: CancellationToken,
    ) -> Result<ProcessOutput> {
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel();

        let stdout_handle =
            spawn_reader(child.stdout.take(), self.streams(), name, "stdout", stdout_tx);
        let stderr_handle =
            spawn_reader(child.stderr.take(), self.streams(), name, "stderr", stderr_tx);

        let (status, interrupted) = tokio::select! {
            status = child.wait() => (status?, false),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                (child.wait().await?, true)
            }
        };

        for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
            let _ = handle.await;
        }

        Ok(ProcessOutput::new(
            status.code().unwrap_or(-1),
            collect_output(&mut stdout_rx),
            collect_output(&mut stderr_rx),
            interrupted,
        ))
    }
}
