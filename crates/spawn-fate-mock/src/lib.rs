//! Mock spawn primitive used for local testing.
//!
//! [`MockProcessHandle`] is a scriptable stand-in for a launched process:
//! tests emit output chunks, termination events, and launch errors in
//! whatever order the scenario calls for, synchronously. [`MockSpawner`]
//! returns a preset handle and records every request, so tests can assert
//! the coordinator called the primitive exactly once with the caller's
//! arguments.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use spawn_fate::{
    Broadcast, DataListener, ErrorListener, ExitPayload, Latch, OutputSource, ProcessHandle,
    SpawnRequest, Spawner, TerminationEvent, TerminationListener,
};
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

/// A subscription observed by a [`MockProcessHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// A launch-error listener was attached.
    Error,
    /// A termination listener was attached for the given event.
    Termination(TerminationEvent),
}

/// One scriptable output stream.
#[derive(Debug, Default)]
pub struct MockStream {
    chunks: Broadcast<[u8]>,
}

impl MockStream {
    /// Emit a data chunk to every subscribed listener.
    pub fn data(&self, chunk: impl AsRef<[u8]>) {
        self.chunks.emit(chunk.as_ref());
    }
}

impl OutputSource for MockStream {
    fn on_data(&self, listener: DataListener) {
        self.chunks.subscribe(listener);
    }
}

/// A scriptable process handle.
///
/// Error and termination events are sticky, per the `ProcessHandle`
/// contract: emitting before the coordinator subscribes still settles the
/// futures.
pub struct MockProcessHandle {
    error: Latch<Arc<io::Error>>,
    close: Latch<ExitPayload>,
    exit: Latch<ExitPayload>,
    stdout: Option<MockStream>,
    stderr: Option<MockStream>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl MockProcessHandle {
    /// A handle with both output streams present.
    pub fn new() -> Self {
        Self::build(true, true)
    }

    /// A handle with no output streams, as if stdio were discarded.
    pub fn without_streams() -> Self {
        Self::build(false, false)
    }

    fn build(stdout: bool, stderr: bool) -> Self {
        Self {
            error: Latch::new(),
            close: Latch::new(),
            exit: Latch::new(),
            stdout: stdout.then(MockStream::default),
            stderr: stderr.then(MockStream::default),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Emit a chunk on stdout.
    ///
    /// # Panics
    ///
    /// Panics if the handle was built without streams.
    pub fn emit_stdout(&self, chunk: impl AsRef<[u8]>) {
        self.stdout.as_ref().expect("stdout not captured").data(chunk);
    }

    /// Emit a chunk on stderr.
    ///
    /// # Panics
    ///
    /// Panics if the handle was built without streams.
    pub fn emit_stderr(&self, chunk: impl AsRef<[u8]>) {
        self.stderr.as_ref().expect("stderr not captured").data(chunk);
    }

    /// Emit the launch-level error event.
    pub fn emit_error(&self, error: io::Error) {
        self.error.emit(Arc::new(error));
    }

    /// Emit a single termination event.
    pub fn emit_termination(&self, event: TerminationEvent, status: i32, signal: Option<&str>) {
        let payload = ExitPayload::new(status, signal.map(str::to_owned));
        match event {
            TerminationEvent::Close => self.close.emit(payload),
            TerminationEvent::Exit => self.exit.emit(payload),
        }
    }

    /// Emit `exit` followed by `close` with the same payload, the order a
    /// real process produces them.
    pub fn terminate(&self, status: i32, signal: Option<&str>) {
        self.emit_termination(TerminationEvent::Exit, status, signal);
        self.emit_termination(TerminationEvent::Close, status, signal);
    }

    /// Every subscription observed so far, in order.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions
            .lock()
            .expect("subscription lock poisoned")
            .clone()
    }

    /// `true` if a listener was attached for the given termination event.
    pub fn termination_subscribed(&self, event: TerminationEvent) -> bool {
        self.subscriptions()
            .contains(&Subscription::Termination(event))
    }

    fn record(&self, subscription: Subscription) {
        self.subscriptions
            .lock()
            .expect("subscription lock poisoned")
            .push(subscription);
    }
}

impl Default for MockProcessHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProcessHandle")
            .field("streams", &self.stdout.is_some())
            .finish_non_exhaustive()
    }
}

impl ProcessHandle for MockProcessHandle {
    fn on_error(&self, listener: ErrorListener) {
        self.record(Subscription::Error);
        self.error.subscribe(listener);
    }

    fn on_termination(&self, event: TerminationEvent, listener: TerminationListener) {
        self.record(Subscription::Termination(event));
        match event {
            TerminationEvent::Close => self.close.subscribe(listener),
            TerminationEvent::Exit => self.exit.subscribe(listener),
        }
    }

    fn stdout(&self) -> Option<&dyn OutputSource> {
        self.stdout.as_ref().map(|s| s as &dyn OutputSource)
    }

    fn stderr(&self) -> Option<&dyn OutputSource> {
        self.stderr.as_ref().map(|s| s as &dyn OutputSource)
    }
}

/// A spawner that returns a preset handle and records every request.
pub struct MockSpawner {
    handle: Arc<MockProcessHandle>,
    requests: Mutex<Vec<SpawnRequest>>,
}

impl MockSpawner {
    /// A spawner around a fresh [`MockProcessHandle`].
    pub fn new() -> Self {
        Self::with_handle(Arc::new(MockProcessHandle::new()))
    }

    /// A spawner that hands out the given handle.
    pub fn with_handle(handle: Arc<MockProcessHandle>) -> Self {
        Self {
            handle,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The handle this spawner hands out.
    pub fn handle(&self) -> &Arc<MockProcessHandle> {
        &self.handle
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<SpawnRequest> {
        self.requests.lock().expect("request lock poisoned").clone()
    }
}

impl Default for MockSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSpawner")
            .field("requests", &self.requests().len())
            .finish_non_exhaustive()
    }
}

impl Spawner for MockSpawner {
    type Handle = MockProcessHandle;

    fn spawn(&self, request: &SpawnRequest) -> Arc<MockProcessHandle> {
        self.requests
            .lock()
            .expect("request lock poisoned")
            .push(request.clone());
        Arc::clone(&self.handle)
    }
}
