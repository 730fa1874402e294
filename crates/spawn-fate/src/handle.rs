// SPDX-License-Identifier: MIT OR Apache-2.0
//! The event surface of a launched process, as traits.

use crate::request::{SpawnRequest, TerminationEvent};
use std::fmt;
use std::io;
use std::sync::Arc;

/// Status code and signal name delivered with a termination event.
///
/// The two fields are independent: a process may exit with a status and no
/// signal, or be killed by a signal alongside a synthesized status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitPayload {
    /// Numeric exit status; `0` is the only success value.
    pub status: i32,
    /// Signal name, when the process was terminated by one.
    pub signal: Option<String>,
}

impl ExitPayload {
    /// Create a payload from a status and optional signal name.
    pub fn new(status: i32, signal: Option<String>) -> Self {
        Self { status, signal }
    }

    /// `true` when the status is zero.
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Listener invoked with each output chunk.
pub type DataListener = Box<dyn FnMut(&[u8]) + Send>;

/// Listener invoked when a termination event fires.
pub type TerminationListener = Box<dyn FnMut(ExitPayload) + Send>;

/// Listener invoked when the launch-level error event fires.
pub type ErrorListener = Box<dyn FnMut(Arc<io::Error>) + Send>;

/// Subscription surface of one captured output stream.
pub trait OutputSource: Send + Sync {
    /// Subscribe to data chunks. Listeners attached after chunks have been
    /// emitted only observe later chunks.
    fn on_data(&self, listener: DataListener);
}

/// Event surface of a launched process.
///
/// Subscription is the only operation this crate performs on a handle; it
/// never writes to the process or sends it signals. Implementations must
/// deliver the error and termination events *stickily*: a listener
/// subscribed after such an event has fired is invoked immediately with
/// the original payload. Without that guarantee a process that fails or
/// exits before the coordinator finishes attaching its listeners would
/// leave the futures pending forever.
pub trait ProcessHandle: fmt::Debug + Send + Sync {
    /// Subscribe to the launch-level error event. Fires at most once per
    /// handle.
    fn on_error(&self, listener: ErrorListener);

    /// Subscribe to the given termination event.
    fn on_termination(&self, event: TerminationEvent, listener: TerminationListener);

    /// The captured stdout stream, if any.
    fn stdout(&self) -> Option<&dyn OutputSource>;

    /// The captured stderr stream, if any.
    fn stderr(&self) -> Option<&dyn OutputSource>;
}

/// Shared reference to a type-erased process handle.
pub type SharedHandle = Arc<dyn ProcessHandle>;

/// The OS-level process launch primitive.
///
/// Launching always yields a handle; launch failures are reported through
/// the handle's error event, never as a direct return value.
pub trait Spawner {
    /// Concrete handle type produced by this spawner.
    type Handle: ProcessHandle + 'static;

    /// Launch the process described by `request`.
    fn spawn(&self, request: &SpawnRequest) -> Arc<Self::Handle>;
}
