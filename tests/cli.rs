//! Exit status and end-to-end behaviour of the `framecat` binary.

use std::{
    io::Write,
    process::{Command, Output, Stdio},
    time::Duration,
};

use framecat::{FAILURE_EXIT_CODE, Pattern, USAGE_EXIT_CODE, connect_or_bind, relay};

fn framecat(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_framecat"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn framecat");
    // The child may exit before reading, for example on a setup failure.
    let _ = child.stdin.take().expect("piped stdin").write_all(stdin);
    child.wait_with_output().expect("wait for framecat")
}

#[test]
fn missing_endpoint_is_a_usage_error() {
    let output = framecat(&["-t", "push"], b"");

    assert_eq!(output.status.code(), Some(i32::from(USAGE_EXIT_CODE)));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr was: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_pattern_is_a_usage_error() {
    let output = framecat(&["-t", "dealer", "-e", "tcp://127.0.0.1:1"], b"");

    assert_eq!(output.status.code(), Some(i32::from(USAGE_EXIT_CODE)));
}

#[test]
fn malformed_endpoint_is_a_transport_failure() {
    let output = framecat(&["-t", "push", "-e", "not-an-endpoint"], b"hello");

    assert_eq!(output.status.code(), Some(i32::from(FAILURE_EXIT_CODE)));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn pushes_stdin_to_a_pull_socket() {
    let mut pull = connect_or_bind(Pattern::Pull, "tcp://127.0.0.1:0", true, "")
        .await
        .expect("bind pull");
    let address = pull.address().to_owned();

    let sender = tokio::task::spawn_blocking(move || {
        framecat(&["-t", "PUSH", "-e", &address, "-v"], b"hello")
    });

    let mut received = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), relay(&mut pull, &mut received))
        .await
        .expect("message arrives")
        .expect("relay");
    let output = sender.await.expect("join sender");

    assert_eq!(received, b"hello");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connecting to"), "stderr was: {stderr}");
    assert!(stderr.contains("sending 5 bytes"), "stderr was: {stderr}");
    assert!(output.stdout.is_empty());
}
