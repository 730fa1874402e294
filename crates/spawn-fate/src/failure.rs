// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write-once failure channel shared by both termination futures.

use crate::error::{LaunchFailure, SpawnError};
use crate::handle::SharedHandle;
use crate::request::SpawnRequest;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Latches the first launch-level error of an invocation.
///
/// Exactly one channel exists per invocation. The first error event
/// constructs a [`SpawnError::Launch`] and stores it; every consumer then
/// observes clones of that one value, which all share the same inner
/// [`LaunchFailure`] allocation. Later error events are ignored.
#[derive(Debug, Clone, Default)]
pub struct FailureChannel {
    slot: Arc<Mutex<Option<SpawnError>>>,
}

impl FailureChannel {
    /// Subscribe a channel to `handle`'s error event.
    pub fn subscribe(request: &SpawnRequest, handle: &SharedHandle) -> Self {
        let channel = Self::default();
        let slot = Arc::clone(&channel.slot);
        let command = request.command.clone();
        let args = request.args.clone();
        let options = request.options.clone();
        // This closure is stored inside the handle's own listener registry;
        // holding the handle strongly here would keep it alive through itself.
        let process = Arc::downgrade(handle);
        handle.on_error(Box::new(move |error| {
            let Some(process) = process.upgrade() else {
                return;
            };
            let mut slot = slot.lock().expect("failure slot poisoned");
            if slot.is_some() {
                return;
            }
            debug!(target: "spawn_fate", "launch error latched for `{command}`: {error}");
            *slot = Some(SpawnError::Launch(Arc::new(LaunchFailure {
                command: command.clone(),
                args: args.clone(),
                options: options.clone(),
                process,
                error,
            })));
        }));
        channel
    }

    /// The latched failure, if the error event has fired.
    pub fn failure(&self) -> Option<SpawnError> {
        self.slot.lock().expect("failure slot poisoned").clone()
    }
}
