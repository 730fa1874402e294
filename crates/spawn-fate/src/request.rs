// SPDX-License-Identifier: MIT OR Apache-2.0
//! Spawn request and launch option types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Termination event a future can key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationEvent {
    /// Process reaped and both standard streams flushed.
    Close,
    /// Process reaped; streams may still be open.
    Exit,
}

impl fmt::Display for TerminationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Close => "close",
            Self::Exit => "exit",
        };
        f.write_str(s)
    }
}

/// Launch configuration forwarded to the spawn primitive.
///
/// Only [`event`](Self::event) is interpreted by the coordinator; the
/// remaining fields are consumed by whichever primitive actually launches
/// the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnOptions {
    /// Pin both outcomes to a single termination event.
    pub event: Option<TerminationEvent>,
    /// Optional working directory override.
    pub cwd: Option<String>,
    /// Additional environment variables for the process.
    pub env: BTreeMap<String, String>,
    /// Capture stdout through the handle. A discarded stream exposes no
    /// output source and contributes nothing to the buffers.
    pub capture_stdout: bool,
    /// Capture stderr through the handle.
    pub capture_stderr: bool,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            event: None,
            cwd: None,
            env: BTreeMap::new(),
            capture_stdout: true,
            capture_stderr: true,
        }
    }
}

/// One process invocation: command, arguments, and launch options.
///
/// Created once per invocation and never mutated afterwards; the settled
/// [`TerminationInfo`](crate::TerminationInfo) echoes these fields back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Executable command to run.
    pub command: String,
    /// Arguments passed to the command.
    pub args: Vec<String>,
    /// Launch options.
    pub options: SpawnOptions,
}

impl SpawnRequest {
    /// Create a request with the given command and default args/options.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            options: SpawnOptions::default(),
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Pin both termination outcomes to one event.
    #[must_use]
    pub fn event(mut self, event: TerminationEvent) -> Self {
        self.options.event = Some(event);
        self
    }

    /// Replace the launch options wholesale.
    #[must_use]
    pub fn options(mut self, options: SpawnOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_capture_both_streams() {
        let options = SpawnOptions::default();
        assert!(options.capture_stdout);
        assert!(options.capture_stderr);
        assert!(options.event.is_none());
    }

    #[test]
    fn event_selector_deserializes_lowercase() {
        let options: SpawnOptions = serde_json::from_str(r#"{"event":"close"}"#).unwrap();
        assert_eq!(options.event, Some(TerminationEvent::Close));
        let options: SpawnOptions = serde_json::from_str(r#"{"event":"exit"}"#).unwrap();
        assert_eq!(options.event, Some(TerminationEvent::Exit));
    }

    #[test]
    fn builder_accumulates_args() {
        let request = SpawnRequest::new("git").arg("log").args(["-n", "1"]);
        assert_eq!(request.command, "git");
        assert_eq!(request.args, vec!["log", "-n", "1"]);
    }
}
