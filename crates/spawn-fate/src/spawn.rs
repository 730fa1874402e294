// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dual-future coordination over a freshly launched process.

use crate::error::SpawnError;
use crate::failure::FailureChannel;
use crate::handle::{ExitPayload, ProcessHandle, SharedHandle, Spawner};
use crate::outcome::{TerminationFuture, TerminationInfo};
use crate::output::{OutputAccumulator, OutputSnapshot};
use crate::request::{SpawnRequest, TerminationEvent};
use futures::FutureExt;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A launched process plus its two await-able termination outcomes.
///
/// `onclose` keys on the `close` event (streams flushed), `onexit` on the
/// `exit` event (process reaped). A launch-level failure rejects both with
/// the same shared [`LaunchFailure`](crate::LaunchFailure); a status-based
/// settlement touches only the future whose event fired. Either future may
/// be cloned, awaited from several places, or ignored outright.
///
/// There is no timeout: if the handle never emits a termination event or a
/// launch error, both futures stay pending indefinitely.
pub struct Spawned<H: ProcessHandle> {
    /// The handle produced by the spawn primitive, unchanged.
    pub process: Arc<H>,
    /// Settles when the `close` (or pinned) event fires, or on launch failure.
    pub onclose: TerminationFuture,
    /// Settles when the `exit` (or pinned) event fires, or on launch failure.
    pub onexit: TerminationFuture,
}

impl<H: ProcessHandle> Spawned<H> {
    /// `true` when `onclose` and `onexit` are the same underlying future,
    /// i.e. the request pinned a single termination event.
    pub fn single_settlement(&self) -> bool {
        self.onclose.ptr_eq(&self.onexit)
    }
}

impl<H: ProcessHandle> fmt::Debug for Spawned<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spawned")
            .field("process", &self.process)
            .field("single_settlement", &self.single_settlement())
            .finish_non_exhaustive()
    }
}

/// Launch `request` through `spawner` and coordinate its termination
/// outcomes.
///
/// The primitive is called exactly once. Listener attachment is synchronous;
/// control returns to the caller before the process makes any progress
/// observable through the futures.
pub fn spawn_with<S: Spawner>(spawner: &S, request: SpawnRequest) -> Spawned<S::Handle> {
    let process = spawner.spawn(&request);
    let handle: SharedHandle = process.clone();

    debug!(target: "spawn_fate", "coordinating `{}` ({} args)", request.command, request.args.len());

    let output = OutputAccumulator::attach(handle.as_ref());
    let failures = FailureChannel::subscribe(&request, &handle);

    let (onclose, onexit) = match request.options.event {
        Some(event) => {
            let settled = termination_future(event, &request, &handle, &output, &failures);
            (settled.clone(), settled)
        }
        None => (
            termination_future(TerminationEvent::Close, &request, &handle, &output, &failures),
            termination_future(TerminationEvent::Exit, &request, &handle, &output, &failures),
        ),
    };

    Spawned {
        process,
        onclose,
        onexit,
    }
}

// The first settlement to reach the capacity-1 channel wins; everything
// after it is dropped. Settlement therefore follows emission order even
// though the shared future is lazy and may be polled much later.
enum Settled {
    Failure(SpawnError),
    Event(OutputSnapshot, ExitPayload),
}

fn termination_future(
    event: TerminationEvent,
    request: &SpawnRequest,
    handle: &SharedHandle,
    output: &OutputAccumulator,
    failures: &FailureChannel,
) -> TerminationFuture {
    let (tx, mut rx) = mpsc::channel::<Settled>(1);

    // Error subscription goes first so that a failure which predates this
    // future is replayed ahead of any already-fired termination event.
    let failure_tx = tx.clone();
    let channel = failures.clone();
    handle.on_error(Box::new(move |_error| {
        // The shared channel subscribed earlier on this handle, so the
        // failure is latched by the time this listener runs.
        if let Some(failure) = channel.failure() {
            let _ = failure_tx.try_send(Settled::Failure(failure));
        }
    }));

    // Snapshot inside the listener: the buffers must reflect exactly what
    // arrived before the event fired, not what arrived before first poll.
    let snapshots = output.clone();
    handle.on_termination(
        event,
        Box::new(move |payload| {
            let _ = tx.try_send(Settled::Event(snapshots.snapshot(), payload));
        }),
    );

    let request = request.clone();
    let process = Arc::clone(handle);
    async move {
        match rx.recv().await {
            Some(Settled::Failure(failure)) => {
                debug!(target: "spawn_fate", "{event} outcome rejected by launch failure");
                Err(failure)
            }
            Some(Settled::Event(snapshot, payload)) => {
                debug!(
                    target: "spawn_fate",
                    "{event} fired for `{}` with status {}", request.command, payload.status
                );
                let info = TerminationInfo {
                    command: request.command,
                    args: request.args,
                    options: request.options,
                    stdout: snapshot.stdout,
                    stderr: snapshot.stderr,
                    output: snapshot.output,
                    status: payload.status,
                    signal: payload.signal,
                    process,
                };
                if info.success() {
                    Ok(info)
                } else {
                    Err(SpawnError::Termination(Arc::new(info)))
                }
            }
            // Listeners gone without a settlement; stay pending forever.
            None => futures::future::pending().await,
        }
    }
    .boxed()
    .shared()
}
