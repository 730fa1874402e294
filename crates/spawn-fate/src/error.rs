// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failure kinds surfaced through termination futures.

use crate::handle::SharedHandle;
use crate::outcome::TerminationInfo;
use crate::request::SpawnOptions;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Context captured when the spawn primitive reports a launch-level error.
///
/// Built at most once per invocation and shared behind one `Arc`, so both
/// termination futures reject with the identical object.
#[derive(Debug, Error)]
#[error("failed to launch `{command}`: {error}")]
pub struct LaunchFailure {
    /// Command that failed to launch.
    pub command: String,
    /// Arguments it was invoked with.
    pub args: Vec<String>,
    /// Options it was launched under.
    pub options: SpawnOptions,
    /// Handle of the failed process.
    pub process: SharedHandle,
    /// The raw error reported by the primitive.
    #[source]
    pub error: Arc<io::Error>,
}

/// A spawned process's failure outcome.
#[derive(Debug, Clone, Error)]
pub enum SpawnError {
    /// The primitive could not start, or lost, the process.
    #[error(transparent)]
    Launch(Arc<LaunchFailure>),
    /// The process ran and terminated with a non-zero status.
    #[error("`{}` terminated with status {} (signal {:?})", .0.command, .0.status, .0.signal)]
    Termination(Arc<TerminationInfo>),
}

impl SpawnError {
    /// The launch failure, if this is a launch-level error.
    pub fn as_launch(&self) -> Option<&Arc<LaunchFailure>> {
        match self {
            Self::Launch(failure) => Some(failure),
            Self::Termination(_) => None,
        }
    }

    /// The termination snapshot, if the process ran and failed.
    pub fn as_termination(&self) -> Option<&Arc<TerminationInfo>> {
        match self {
            Self::Termination(info) => Some(info),
            Self::Launch(_) => None,
        }
    }

    /// `true` when both errors carry the same shared context instance.
    ///
    /// A launch failure settles both futures of an invocation with clones
    /// of one `Arc`, so this holds across the pair.
    pub fn same_failure(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Launch(a), Self::Launch(b)) => Arc::ptr_eq(a, b),
            (Self::Termination(a), Self::Termination(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SpawnOptions;

    fn launch_failure(process: SharedHandle) -> Arc<LaunchFailure> {
        Arc::new(LaunchFailure {
            command: "missing-bin".into(),
            args: vec!["--flag".into()],
            options: SpawnOptions::default(),
            process,
            error: Arc::new(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        })
    }

    #[derive(Debug)]
    struct NullHandle;

    impl crate::handle::ProcessHandle for NullHandle {
        fn on_error(&self, _listener: crate::handle::ErrorListener) {}
        fn on_termination(
            &self,
            _event: crate::request::TerminationEvent,
            _listener: crate::handle::TerminationListener,
        ) {
        }
        fn stdout(&self) -> Option<&dyn crate::handle::OutputSource> {
            None
        }
        fn stderr(&self) -> Option<&dyn crate::handle::OutputSource> {
            None
        }
    }

    #[test]
    fn launch_display_names_command_and_cause() {
        let failure = launch_failure(Arc::new(NullHandle));
        let error = SpawnError::Launch(failure);
        assert_eq!(
            error.to_string(),
            "failed to launch `missing-bin`: no such file"
        );
    }

    #[test]
    fn same_failure_is_pointer_identity_not_equality() {
        let process: SharedHandle = Arc::new(NullHandle);
        let shared = launch_failure(Arc::clone(&process));
        let a = SpawnError::Launch(Arc::clone(&shared));
        let b = SpawnError::Launch(shared);
        let unrelated = SpawnError::Launch(launch_failure(process));

        assert!(a.same_failure(&b));
        assert!(!a.same_failure(&unrelated));
    }
}
