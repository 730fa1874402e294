// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output aggregation across a process's standard streams.

use crate::handle::ProcessHandle;
use std::sync::{Arc, Mutex};

/// The three output buffers at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSnapshot {
    /// Chunks that arrived on stdout, in order.
    pub stdout: String,
    /// Chunks that arrived on stderr, in order.
    pub stderr: String,
    /// All chunks from both streams, interleaved in arrival order.
    pub output: String,
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Stdout,
    Stderr,
}

/// Accumulates stdout, stderr, and combined output in arrival order.
///
/// Buffers grow without bound; there is no flow control. Chunks are decoded
/// lossily, so invalid UTF-8 bytes become replacement characters rather
/// than errors.
#[derive(Debug, Clone, Default)]
pub struct OutputAccumulator {
    buffers: Arc<Mutex<OutputSnapshot>>,
}

impl OutputAccumulator {
    /// Create an empty accumulator not attached to anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach data listeners to both streams of `handle`.
    ///
    /// An absent stream is skipped silently and leaves its buffer empty.
    pub fn attach(handle: &dyn ProcessHandle) -> Self {
        let acc = Self::new();
        if let Some(stdout) = handle.stdout() {
            let buffers = Arc::clone(&acc.buffers);
            stdout.on_data(Box::new(move |chunk| {
                append(&buffers, chunk, Channel::Stdout);
            }));
        }
        if let Some(stderr) = handle.stderr() {
            let buffers = Arc::clone(&acc.buffers);
            stderr.on_data(Box::new(move |chunk| {
                append(&buffers, chunk, Channel::Stderr);
            }));
        }
        acc
    }

    /// Clone of the accumulated buffers at this instant.
    pub fn snapshot(&self) -> OutputSnapshot {
        self.buffers.lock().expect("output lock poisoned").clone()
    }
}

// Per-stream and combined appends happen under one lock, so the combined
// buffer's interleaving is exactly chunk arrival order.
fn append(buffers: &Arc<Mutex<OutputSnapshot>>, chunk: &[u8], channel: Channel) {
    let text = String::from_utf8_lossy(chunk);
    let mut buffers = buffers.lock().expect("output lock poisoned");
    match channel {
        Channel::Stdout => buffers.stdout.push_str(&text),
        Channel::Stderr => buffers.stderr.push_str(&text),
    }
    buffers.output.push_str(&text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_interleaves_in_arrival_order() {
        let acc = OutputAccumulator::new();
        append(&acc.buffers, b"a", Channel::Stdout);
        append(&acc.buffers, b"c", Channel::Stderr);
        append(&acc.buffers, b"b", Channel::Stdout);

        let snapshot = acc.snapshot();
        assert_eq!(snapshot.stdout, "ab");
        assert_eq!(snapshot.stderr, "c");
        assert_eq!(snapshot.output, "acb");
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let acc = OutputAccumulator::new();
        append(&acc.buffers, b"before", Channel::Stdout);
        let snapshot = acc.snapshot();
        append(&acc.buffers, b" after", Channel::Stdout);

        assert_eq!(snapshot.output, "before");
        assert_eq!(acc.snapshot().output, "before after");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let acc = OutputAccumulator::new();
        append(&acc.buffers, &[0xff, 0xfe], Channel::Stderr);
        assert_eq!(acc.snapshot().stderr, "\u{fffd}\u{fffd}");
    }
}
