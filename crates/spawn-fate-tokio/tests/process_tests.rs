// SPDX-License-Identifier: MIT OR Apache-2.0
//! Real-process tests for the tokio spawn primitive.
//!
//! Exercises launch, output capture, non-zero exit, launch failure,
//! environment and working-directory forwarding, capture toggles, and
//! signal deaths against `sh`.

#![cfg(unix)]

use spawn_fate::{SpawnOptions, SpawnRequest, TerminationEvent};
use spawn_fate_tokio::spawn;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sh(script: &str) -> SpawnRequest {
    SpawnRequest::new("sh").args(["-c", script])
}

// ---------------------------------------------------------------------------
// 1. Clean exit with output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clean_exit_fulfils_with_captured_output() {
    let spawned = spawn(sh("printf ab; printf c >&2"));

    let info = spawned.onclose.clone().await.expect("onclose fulfils");
    assert_eq!(info.status, 0);
    assert_eq!(info.signal, None);
    assert_eq!(info.stdout, "ab");
    assert_eq!(info.stderr, "c");
    // The streams ride separate pipes, so only the per-stream order is
    // deterministic here.
    assert_eq!(info.output.len(), 3);

    let info = spawned.onexit.clone().await.expect("onexit fulfils");
    assert_eq!(info.status, 0);
}

#[tokio::test]
async fn close_snapshot_contains_everything_the_process_wrote() {
    // 64 KiB, comfortably past one pipe buffer read.
    let spawned = spawn(sh("i=0; while [ $i -lt 4096 ]; do printf 'abcdefghijklmnop'; i=$((i+1)); done"));
    let info = spawned.onclose.clone().await.unwrap();
    assert_eq!(info.stdout.len(), 65536);
}

// ---------------------------------------------------------------------------
// 2. Non-zero exit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nonzero_exit_rejects_both_futures() {
    let spawned = spawn(sh("exit 6"));

    let err = spawned.onclose.clone().await.unwrap_err();
    let info = err.as_termination().expect("termination failure");
    assert_eq!(info.status, 6);
    assert_eq!(info.signal, None);

    let err = spawned.onexit.clone().await.unwrap_err();
    assert_eq!(err.as_termination().unwrap().status, 6);
}

#[tokio::test]
async fn signal_death_reports_name_and_conventional_status() {
    let spawned = spawn(sh("kill -KILL $$"));

    let err = spawned.onclose.clone().await.unwrap_err();
    let info = err.as_termination().unwrap();
    assert_eq!(info.status, 128 + 9);
    assert_eq!(info.signal.as_deref(), Some("SIGKILL"));
}

// ---------------------------------------------------------------------------
// 3. Launch failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_executable_rejects_both_with_one_failure() {
    let spawned = spawn(SpawnRequest::new("spawn-fate-no-such-binary"));
    assert_eq!(spawned.process.pid(), None);

    let close_err = spawned.onclose.clone().await.unwrap_err();
    let exit_err = spawned.onexit.clone().await.unwrap_err();

    let failure = close_err.as_launch().expect("launch failure");
    assert_eq!(failure.command, "spawn-fate-no-such-binary");
    assert_eq!(failure.error.kind(), std::io::ErrorKind::NotFound);
    assert!(close_err.same_failure(&exit_err));
}

// ---------------------------------------------------------------------------
// 4. Option forwarding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn environment_variables_are_forwarded() {
    let mut request = sh("printf '%s' \"$SPAWN_FATE_TEST_ENV\"");
    request
        .options
        .env
        .insert("SPAWN_FATE_TEST_ENV".into(), "forwarded".into());

    let info = spawn(request).onclose.clone().await.unwrap();
    assert_eq!(info.stdout, "forwarded");
}

#[tokio::test]
async fn working_directory_is_forwarded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut request = sh("pwd");
    request.options.cwd = Some(dir.path().to_string_lossy().into_owned());

    let info = spawn(request).onclose.clone().await.unwrap();
    let expected = dir.path().file_name().unwrap().to_string_lossy();
    assert!(
        info.stdout.trim_end().ends_with(expected.as_ref()),
        "pwd reported {:?}",
        info.stdout
    );
}

#[tokio::test]
async fn discarded_streams_expose_no_sources_and_stay_empty() {
    let mut request = sh("echo noisy; echo noisier >&2");
    request.options = SpawnOptions {
        capture_stdout: false,
        capture_stderr: false,
        ..SpawnOptions::default()
    };

    let spawned = spawn(request);
    assert!(spawn_fate::ProcessHandle::stdout(&*spawned.process).is_none());
    assert!(spawn_fate::ProcessHandle::stderr(&*spawned.process).is_none());

    let info = spawned.onclose.clone().await.unwrap();
    assert_eq!(info.status, 0);
    assert_eq!(info.output, "");
}

// ---------------------------------------------------------------------------
// 5. Pinned event
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pinned_event_yields_a_single_shared_future() {
    let spawned = spawn(sh("exit 0").event(TerminationEvent::Close));
    assert!(spawned.single_settlement());

    assert_eq!(spawned.onclose.clone().await.unwrap().status, 0);
    assert_eq!(spawned.onexit.clone().await.unwrap().status, 0);
}

#[tokio::test]
async fn request_is_echoed_into_the_outcome() {
    let spawned = spawn(sh("exit 0"));
    let info = spawned.onclose.clone().await.unwrap();
    assert_eq!(info.command, "sh");
    assert_eq!(info.args, vec!["-c", "exit 0"]);
    assert_eq!(info.options, SpawnOptions::default());
}
