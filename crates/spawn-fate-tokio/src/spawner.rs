// SPDX-License-Identifier: MIT OR Apache-2.0
//! Launching children and pumping their events.

use crate::handle::{HandleEvents, TokioProcessHandle};
use spawn_fate::{Broadcast, ExitPayload, SpawnRequest, Spawner};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Spawn primitive backed by `tokio::process`.
///
/// Launch failures never surface as a return value; they are latched on
/// the returned handle's error event, matching the [`Spawner`] contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl Spawner for TokioSpawner {
    type Handle = TokioProcessHandle;

    fn spawn(&self, request: &SpawnRequest) -> Arc<TokioProcessHandle> {
        spawn_child(request)
    }
}

fn spawn_child(request: &SpawnRequest) -> Arc<TokioProcessHandle> {
    let options = &request.options;
    let mut cmd = Command::new(&request.command);
    cmd.args(&request.args)
        .stdin(Stdio::null())
        .stdout(stdio_for(options.capture_stdout))
        .stderr(stdio_for(options.capture_stderr));

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (k, v) in &options.env {
        cmd.env(k, v);
    }

    let events = HandleEvents::new(options.capture_stdout, options.capture_stderr);

    match cmd.spawn() {
        Err(error) => {
            warn!(target: "spawn_fate.tokio", "failed to spawn `{}`: {error}", request.command);
            events.error.emit(Arc::new(error));
            Arc::new(TokioProcessHandle::new(events, None))
        }
        Ok(mut child) => {
            let pid = child.id();
            debug!(target: "spawn_fate.tokio", "spawned `{}` (pid {pid:?})", request.command);

            let mut pumps = Vec::new();
            if let Some(pipe) = child.stdout.take() {
                let feed = events.stdout.as_ref().expect("stdout captured").feed();
                pumps.push(tokio::spawn(pump(pipe, feed)));
            }
            if let Some(pipe) = child.stderr.take() {
                let feed = events.stderr.as_ref().expect("stderr captured").feed();
                pumps.push(tokio::spawn(pump(pipe, feed)));
            }

            tokio::spawn(reap(child, pumps, Arc::clone(&events)));
            Arc::new(TokioProcessHandle::new(events, pid))
        }
    }
}

fn stdio_for(capture: bool) -> Stdio {
    if capture { Stdio::piped() } else { Stdio::null() }
}

/// Copy one pipe into its broadcast until EOF.
async fn pump<R>(mut pipe: R, chunks: Arc<Broadcast<[u8]>>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = [0u8; 8192];
    loop {
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => chunks.emit(&buf[..n]),
            Err(error) => {
                warn!(target: "spawn_fate.tokio", "output pump read failed: {error}");
                break;
            }
        }
    }
}

/// Wait for the child, emit `exit`, then `close` once the pumps drain.
async fn reap(
    mut child: Child,
    pumps: Vec<tokio::task::JoinHandle<()>>,
    events: Arc<HandleEvents>,
) {
    let payload = match child.wait().await {
        Ok(status) => exit_payload(&status),
        Err(error) => {
            // The process was lost rather than reaped; that is a
            // launch-level failure, not a termination.
            warn!(target: "spawn_fate.tokio", "wait failed: {error}");
            events.error.emit(Arc::new(error));
            return;
        }
    };

    debug!(target: "spawn_fate.tokio", "child exited with status {}", payload.status);
    events.exit.emit(payload.clone());

    for pump in pumps {
        let _ = pump.await;
    }
    events.close.emit(payload);
}

fn exit_payload(status: &std::process::ExitStatus) -> ExitPayload {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signo) = status.signal() {
            // Shell convention for signal deaths.
            return ExitPayload::new(128 + signo, Some(signal_name(signo)));
        }
    }
    ExitPayload::new(status.code().unwrap_or(1), None)
}

#[cfg(unix)]
fn signal_name(signo: i32) -> String {
    match signo {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        6 => "SIGABRT",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        _ => return format!("SIG{signo}"),
    }
    .to_string()
}
