// SPDX-License-Identifier: MIT OR Apache-2.0
//! spawn-fate
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Termination coordination for spawned processes: one launch, two
//! await-able outcomes.
//!
//! [`spawn_with`] drives any [`Spawner`] implementation and returns a
//! [`Spawned`] value holding the process handle plus the `onclose` and
//! `onexit` futures. Each future settles exactly once, with a
//! [`TerminationInfo`] snapshot on a zero status and a [`SpawnError`]
//! otherwise; a launch-level failure rejects both futures with one shared
//! [`LaunchFailure`].
//!
//! The futures are [`futures::future::Shared`] values: cloning is cheap,
//! every clone settles with the same result, and a clone the caller never
//! polls simply does nothing. There is no timeout — if the process handle
//! never emits a termination event or a launch error, the futures stay
//! pending indefinitely.

pub mod emitter;
pub mod error;
pub mod failure;
pub mod handle;
pub mod outcome;
pub mod output;
pub mod request;
pub mod spawn;

pub use emitter::{Broadcast, Latch};
pub use error::{LaunchFailure, SpawnError};
pub use failure::FailureChannel;
pub use handle::{
    DataListener, ErrorListener, ExitPayload, OutputSource, ProcessHandle, SharedHandle, Spawner,
    TerminationListener,
};
pub use outcome::{TerminationFuture, TerminationInfo, TerminationResult};
pub use output::{OutputAccumulator, OutputSnapshot};
pub use request::{SpawnOptions, SpawnRequest, TerminationEvent};
pub use spawn::{Spawned, spawn_with};
