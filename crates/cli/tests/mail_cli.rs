//! Tests for the `agentwire-mail` binary's argument handling.
//!
//! Every run gets an empty working directory and a config path that does
//! not exist, so no `.env` file or user config leaks in. Without a mail
//! password the commands stop before touching the network.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_agentwire-mail"))
        .args(args)
        .current_dir(dir.path())
        .env("AGENTWIRE_CONFIG", dir.path().join("config.toml"))
        .env_remove("GMAIL_PASSWORD")
        .env_remove("GMAIL_SENDER")
        .env_remove("GMAIL_USERNAME")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_subcommand_prints_help_and_exits_1() {
    let output = run(&[]);

    assert_eq!(output.status.code(), Some(1));
    let help = stdout(&output);
    assert!(help.contains("Usage"), "{help}");
    assert!(help.contains("send"));
    assert!(help.contains("get-recent"));
}

#[test]
fn send_without_password_reports_and_exits_0() {
    let output = run(&[
        "send",
        "--sender",
        "me@example.com",
        "--recipient",
        "friend@example.org",
        "--title",
        "Hi",
        "--body",
        "See you soon",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "Error: GMAIL_PASSWORD not set");
}

#[test]
fn send_without_any_sender_fails() {
    let output = run(&[
        "send",
        "--recipient",
        "friend@example.org",
        "--title",
        "Hi",
        "--body",
        "See you soon",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no sender given"));
}

#[test]
fn send_requires_recipient() {
    let output = run(&["send", "--title", "Hi", "--body", "text"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--recipient"));
}

#[test]
fn get_recent_without_password_reports_on_stderr() {
    let output = run(&["get-recent", "--email-address", "me@example.com"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Error: GMAIL_PASSWORD not set"));
}
