mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn api_cmd(session: &std::path::Path) -> Command {
  let mut cmd = Command::cargo_bin("feedback-report").unwrap();
  // the gate refuses before any request leaves the process, so the port
  // never needs to answer
  cmd.args([
    "--api-url",
    "http://127.0.0.1:9/api",
    "--session",
    session.to_str().unwrap(),
    "--report-type",
    "monthly",
    "--month",
    "5",
    "--year",
    "2024",
  ]);
  cmd
}

#[test]
fn missing_session_token_blocks_the_api_source() {
  let td = tempfile::TempDir::new().unwrap();
  let session = common::write_session(td.path(), None);

  api_cmd(&session)
    .assert()
    .failure()
    .stderr(predicate::str::contains("not signed in"));
}

#[test]
fn user_role_is_denied_with_a_notice() {
  let td = tempfile::TempDir::new().unwrap();
  let token = common::mint_token("user");
  let session = common::write_session(td.path(), Some(&token));

  api_cmd(&session)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Access denied"))
    .stderr(predicate::str::contains("cannot access the feedback API"));

  // role mismatch is not a decode failure; the token survives
  let raw = std::fs::read_to_string(&session).unwrap();
  assert!(raw.contains(&token));
}

#[test]
fn tampered_token_is_cleared_from_the_store() {
  let td = tempfile::TempDir::new().unwrap();
  let session = common::write_session(td.path(), Some("garbage-token"));

  api_cmd(&session)
    .assert()
    .failure()
    .stderr(predicate::str::contains("signed out"));

  let raw = std::fs::read_to_string(&session).unwrap();
  assert!(!raw.contains("garbage-token"), "decode failure clears the stored token");
}

#[test]
fn session_is_required_with_the_api_source() {
  let mut cmd = Command::cargo_bin("feedback-report").unwrap();
  cmd
    .args([
      "--api-url",
      "http://127.0.0.1:9/api",
      "--report-type",
      "monthly",
      "--month",
      "5",
      "--year",
      "2024",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--session"));
}
