// SPDX-License-Identifier: MIT OR Apache-2.0
//! spawn-fate-tokio
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! `tokio::process`-backed spawn primitive for the `spawn-fate`
//! coordinator. [`spawn`] is the everyday entry point; [`TokioSpawner`]
//! plugs into [`spawn_fate::spawn_with`] for callers that inject the
//! primitive themselves.

mod handle;
mod spawner;

pub use handle::TokioProcessHandle;
pub use spawner::TokioSpawner;

use spawn_fate::{SpawnRequest, Spawned, spawn_with};

/// Launch a process and coordinate its termination outcomes.
///
/// Equivalent to `spawn_with(&TokioSpawner, request)`. Must be called from
/// within a tokio runtime: the handle drives its output pumps and reaper
/// as background tasks.
pub fn spawn(request: SpawnRequest) -> Spawned<TokioProcessHandle> {
    spawn_with(&TokioSpawner, request)
}
