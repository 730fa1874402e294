// SPDX-License-Identifier: MIT OR Apache-2.0
//! Settled values of a spawned process.

use crate::error::SpawnError;
use crate::handle::SharedHandle;
use crate::request::SpawnOptions;
use futures::future::{BoxFuture, Shared};

/// Immutable snapshot taken the instant a termination event fires.
///
/// The buffers reflect exactly the chunks whose data events fired before
/// the settling event; chunks arriving afterwards are absent even if they
/// land before the future is polled.
#[derive(Debug, Clone)]
pub struct TerminationInfo {
    /// Command the process was launched with.
    pub command: String,
    /// Arguments it was launched with.
    pub args: Vec<String>,
    /// Options it was launched under.
    pub options: SpawnOptions,
    /// Accumulated stdout.
    pub stdout: String,
    /// Accumulated stderr.
    pub stderr: String,
    /// Stdout and stderr interleaved in arrival order.
    pub output: String,
    /// Exit status; `0` is the only success value.
    pub status: i32,
    /// Signal that terminated the process, if any.
    pub signal: Option<String>,
    /// The process handle, unchanged.
    pub process: SharedHandle,
}

impl TerminationInfo {
    /// `true` when the process terminated with status 0.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Settled value of a termination future.
pub type TerminationResult = Result<TerminationInfo, SpawnError>;

/// A shareable, await-able termination outcome.
///
/// Cloning is cheap and every clone settles with the same value; a clone
/// that is never polled does nothing. Compare two of these with
/// [`Shared::ptr_eq`] to test whether they are the same underlying future.
pub type TerminationFuture = Shared<BoxFuture<'static, TerminationResult>>;
