//! Integration tests for the process supervisor against real subprocesses
//!
//! Fake shell-script executables stand in for the recognition server and the
//! synthesis subprocess, so lifecycle and pipe behavior are exercised for
//! real without any inference binaries installed.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ai_speech::{
    AudioBuffer, LocalSttConfig, LocalTtsConfig, PiperBackend, ProcessSupervisor, ServerStatus,
    SpeechError, TextToSpeech, wav,
};
use tempfile::TempDir;

/// Write an executable shell script into `dir` and return its path
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn server_config(executable: PathBuf) -> LocalSttConfig {
    LocalSttConfig::new(executable, "/models/ggml-base.bin")
}

// =============================================================================
// Long-Running Server Lifecycle
// =============================================================================

#[tokio::test]
async fn ensure_started_twice_tracks_exactly_one_process() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("starts.log");
    let script = write_script(
        dir.path(),
        "fake-server",
        &format!("echo started >> {}\nsleep 30", marker.display()),
    );

    let supervisor = ProcessSupervisor::new();
    let config = server_config(script);

    supervisor.ensure_started(&config).await.unwrap();
    supervisor.ensure_started(&config).await.unwrap();
    assert_eq!(supervisor.status().await, ServerStatus::Running);

    // Give the script a moment to write its start marker.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let starts = std::fs::read_to_string(&marker).unwrap();
    assert_eq!(starts.lines().count(), 1, "expected a single server start");

    supervisor.stop().await;
    assert_eq!(supervisor.status().await, ServerStatus::Stopped);
}

#[tokio::test]
async fn server_is_restarted_after_it_exits_on_its_own() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("starts.log");
    // First invocation exits immediately; the supervisor should notice the
    // dead child on the next ensure_started and spawn a replacement.
    let script = write_script(
        dir.path(),
        "fake-server",
        &format!("echo started >> {}\nexit 0", marker.display()),
    );

    let supervisor = ProcessSupervisor::new();
    let config = server_config(script);

    supervisor.ensure_started(&config).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    supervisor.ensure_started(&config).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let starts = std::fs::read_to_string(&marker).unwrap();
    assert_eq!(starts.lines().count(), 2, "expected a restart after exit");

    supervisor.stop().await;
}

#[tokio::test]
async fn stop_is_idempotent_after_the_process_already_exited() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "fake-server", "exit 0");

    let supervisor = ProcessSupervisor::new();
    supervisor.ensure_started(&server_config(script)).await.unwrap();

    // Let the child exit on its own before stopping.
    tokio::time::sleep(Duration::from_millis(300)).await;
    supervisor.stop().await;
    supervisor.stop().await;
    assert_eq!(supervisor.status().await, ServerStatus::Stopped);
}

#[tokio::test]
async fn server_survives_writing_heavily_to_its_console_pipes() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("flushed");
    // A server that logs far more than one pipe buffer on both streams must
    // not wedge against the supervisor's drain tasks.
    let script = write_script(
        dir.path(),
        "fake-server",
        &format!(
            "i=0\n\
             while [ $i -lt 4000 ]; do\n\
             echo \"server log line $i with enough padding to fill pipes\"\n\
             echo \"server err line $i with enough padding to fill pipes\" >&2\n\
             i=$((i+1))\n\
             done\n\
             touch {}\nsleep 30",
            marker.display()
        ),
    );

    let supervisor = ProcessSupervisor::new();
    supervisor.ensure_started(&server_config(script)).await.unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while !marker.exists() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "server blocked on a full console pipe"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    supervisor.stop().await;
}

// =============================================================================
// One-Shot Pipe Protocol
// =============================================================================

#[tokio::test]
async fn one_shot_with_large_stdin_and_large_stderr_does_not_deadlock() {
    let dir = TempDir::new().unwrap();
    // Flood stderr with well over a pipe buffer's worth of diagnostics
    // before reading any input, then consume all of stdin. With a
    // sequential write-then-drain parent this wedges; with the concurrent
    // protocol it completes.
    let script = write_script(
        dir.path(),
        "noisy-tool",
        "i=0\n\
         while [ $i -lt 2000 ]; do\n\
         echo \"diagnostic line $i with padding padding padding padding\" >&2\n\
         i=$((i+1))\n\
         done\n\
         cat > /dev/null",
    );

    let supervisor = ProcessSupervisor::new();
    let input = "x".repeat(256 * 1024);

    let output = tokio::time::timeout(
        Duration::from_secs(20),
        supervisor.run_one_shot(&script, Vec::<String>::new(), &input),
    )
    .await
    .expect("one-shot subprocess deadlocked")
    .unwrap();

    assert!(output.status.success());
    assert!(output.stderr.contains("diagnostic line 1999"));
}

#[tokio::test]
async fn one_shot_surfaces_stderr_on_failure() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "failing-tool",
        "cat > /dev/null\necho 'model file is corrupt' >&2\nexit 1",
    );

    let supervisor = ProcessSupervisor::new();
    let output = supervisor
        .run_one_shot(&script, Vec::<String>::new(), "input text")
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.contains("model file is corrupt"));
}

// =============================================================================
// Piper Backend Over the One-Shot Protocol
// =============================================================================

#[tokio::test]
async fn piper_backend_reads_synthesized_wav_from_output_path() {
    let dir = TempDir::new().unwrap();

    // Pre-made WAV the fake piper copies to the requested output path.
    let samples: Vec<i16> = (0..441).map(|i| i * 3).collect();
    let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let wav_bytes = wav::encode_wav(&AudioBuffer::mono_16bit(pcm.clone(), 22050)).unwrap();
    let source_wav = dir.path().join("canned.wav");
    std::fs::write(&source_wav, wav_bytes).unwrap();

    // Args arrive as: --model M --input-file - --length-scale S --output_file PATH
    let script = write_script(
        dir.path(),
        "fake-piper",
        &format!("cat > /dev/null\ncp {} \"$8\"", source_wav.display()),
    );

    let config = LocalTtsConfig::new(script, "/models/voice.onnx").with_length_scale(0.9);
    let backend = PiperBackend::new(Arc::new(ProcessSupervisor::new()), config).unwrap();

    let audio = backend.synthesize("Hello from the test").await.unwrap();
    assert_eq!(audio.sample_rate, 22050);
    assert_eq!(audio.bits_per_sample, 16);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.pcm, pcm);
}

#[tokio::test]
async fn piper_backend_maps_clean_exit_without_output_to_output_missing() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "fake-piper", "cat > /dev/null\nexit 0");

    let config = LocalTtsConfig::new(script, "/models/voice.onnx");
    let backend = PiperBackend::new(Arc::new(ProcessSupervisor::new()), config).unwrap();

    let result = backend.synthesize("Hello").await;
    assert!(matches!(result, Err(SpeechError::OutputMissing)));
}

#[tokio::test]
async fn piper_backend_maps_nonzero_exit_to_process_failed_with_stderr() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "fake-piper",
        "cat > /dev/null\necho 'failed to load voice' >&2\nexit 2",
    );

    let config = LocalTtsConfig::new(script, "/models/voice.onnx");
    let backend = PiperBackend::new(Arc::new(ProcessSupervisor::new()), config).unwrap();

    match backend.synthesize("Hello").await {
        Err(SpeechError::ProcessFailed { stderr, .. }) => {
            assert!(stderr.contains("failed to load voice"));
        },
        other => panic!("Expected ProcessFailed, got {other:?}"),
    }
}
