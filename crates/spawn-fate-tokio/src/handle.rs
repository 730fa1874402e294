// SPDX-License-Identifier: MIT OR Apache-2.0
//! Event-surface adapter over a `tokio::process` child.

use spawn_fate::{
    Broadcast, DataListener, ErrorListener, ExitPayload, Latch, OutputSource, ProcessHandle,
    TerminationEvent, TerminationListener,
};
use std::fmt;
use std::io;
use std::sync::Arc;

/// One captured output pipe, fed by a pump task.
pub(crate) struct PipeSource {
    chunks: Arc<Broadcast<[u8]>>,
}

impl PipeSource {
    pub(crate) fn new() -> Self {
        Self {
            chunks: Arc::new(Broadcast::new()),
        }
    }

    /// The feed end, held by the pump task.
    pub(crate) fn feed(&self) -> Arc<Broadcast<[u8]>> {
        Arc::clone(&self.chunks)
    }
}

impl OutputSource for PipeSource {
    fn on_data(&self, listener: DataListener) {
        self.chunks.subscribe(listener);
    }
}

/// Event registries shared between the handle and its background tasks.
pub(crate) struct HandleEvents {
    pub(crate) error: Latch<Arc<io::Error>>,
    pub(crate) close: Latch<ExitPayload>,
    pub(crate) exit: Latch<ExitPayload>,
    pub(crate) stdout: Option<PipeSource>,
    pub(crate) stderr: Option<PipeSource>,
}

impl HandleEvents {
    pub(crate) fn new(stdout: bool, stderr: bool) -> Arc<Self> {
        Arc::new(Self {
            error: Latch::new(),
            close: Latch::new(),
            exit: Latch::new(),
            stdout: stdout.then(PipeSource::new),
            stderr: stderr.then(PipeSource::new),
        })
    }
}

/// A process launched through [`TokioSpawner`](crate::TokioSpawner).
///
/// The sticky-delivery contract holds even though the pump and reaper
/// tasks run concurrently with listener attachment: events that fire
/// before the coordinator subscribes are replayed.
pub struct TokioProcessHandle {
    events: Arc<HandleEvents>,
    pid: Option<u32>,
}

impl TokioProcessHandle {
    pub(crate) fn new(events: Arc<HandleEvents>, pid: Option<u32>) -> Self {
        Self { events, pid }
    }

    /// OS process id, if the launch got that far.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }
}

impl fmt::Debug for TokioProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioProcessHandle")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl ProcessHandle for TokioProcessHandle {
    fn on_error(&self, listener: ErrorListener) {
        self.events.error.subscribe(listener);
    }

    fn on_termination(&self, event: TerminationEvent, listener: TerminationListener) {
        match event {
            TerminationEvent::Close => self.events.close.subscribe(listener),
            TerminationEvent::Exit => self.events.exit.subscribe(listener),
        }
    }

    fn stdout(&self) -> Option<&dyn OutputSource> {
        self.events.stdout.as_ref().map(|s| s as &dyn OutputSource)
    }

    fn stderr(&self) -> Option<&dyn OutputSource> {
        self.events.stderr.as_ref().map(|s| s as &dyn OutputSource)
    }
}
