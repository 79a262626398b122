// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! End-to-end tests of the `prism` binary.

mod helpers;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::reply_json;

/// `prism` run inside `dir`, isolated from the user's config and env.
fn prism(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prism").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("OPENAI_API_KEY", "test-key")
        .env("NO_COLOR", "1")
        .env_remove("PRISM_PROVIDER")
        .env_remove("PRISM_MODEL")
        .env_remove("PRISM_DEFAULT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".prism.toml"), config).unwrap();
    dir
}

#[test]
fn help_describes_tool() {
    let dir = tempfile::tempdir().unwrap();
    prism(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Translate text"))
        .stdout(predicate::str::contains("--override"));
}

#[test]
fn languages_lists_table() {
    let dir = tempfile::tempdir().unwrap();
    prism(dir.path())
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Japanese"))
        .stdout(predicate::str::contains("日本語"))
        .stdout(predicate::str::contains("zh-TW"));
}

#[test]
fn models_search_filters_and_marks_default() {
    let dir = project(
        r#"
default_model = "local:llama3.2"

[[providers]]
name = "local"
type = "ollama"
models = ["llama3.2", "qwen3:4b"]

[[providers]]
name = "fast"
type = "groq"
api_key = "gsk-test"

[overrides]
Japanese = "fast:llama-3.3-70b-versatile"
"#,
    );

    prism(dir.path())
        .args(["models", "--search", "llama"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local:llama3.2 (Global Default)"))
        .stdout(predicate::str::contains(
            "fast:llama-3.3-70b-versatile [Japanese]",
        ))
        .stdout(predicate::str::contains("qwen3:4b").not());
}

#[test]
fn config_redacts_api_keys() {
    let dir = project(
        r#"
[[providers]]
name = "fast"
type = "groq"
api_key = "gsk-very-secret"
"#,
    );

    prism(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key: configured"))
        .stdout(predicate::str::contains("gsk-very-secret").not());
}

#[test]
fn init_writes_user_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = prism(dir.path()).arg("init").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout
        .trim()
        .strip_prefix("Created config: ")
        .expect("init should print the config path");
    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.contains("[[providers]]"));

    // The template itself must load
    prism(dir.path()).arg("config").assert().success();
}

#[test]
fn init_keeps_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = prism(dir.path()).arg("init").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout.trim().strip_prefix("Created config: ").unwrap().to_string();
    std::fs::write(&path, "targets = [\"French\"]\n").unwrap();

    // No terminal on stdin, so nothing asks before refusing
    prism(dir.path())
        .arg("init")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "targets = [\"French\"]\n"
    );
}

#[test]
fn unknown_provider_fails() {
    let dir = tempfile::tempdir().unwrap();
    prism(dir.path())
        .args(["--provider", "skynet", "languages"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("skynet"));
}

#[test]
fn translate_without_targets_fails() {
    let dir = project(
        r#"
[[providers]]
name = "local"
type = "ollama"
"#,
    );

    prism(dir.path())
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("target"));
}

#[test]
fn completions_are_generated() {
    let dir = tempfile::tempdir().unwrap();
    prism(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prism"));
}

#[tokio::test]
async fn translate_prints_json_in_target_order() {
    let server = MockServer::start().await;

    let reply = serde_json::json!({
        "model": "llama3.2",
        "response": reply_json(&[("French", "fr", "Bonjour"), ("Japanese", "ja", "こんにちは")]),
        "done": true
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply))
        .expect(1)
        .mount(&server)
        .await;

    let dir = project(&format!(
        r#"
default_model = "local:llama3.2"

[[providers]]
name = "local"
type = "ollama"
base_url = "{}"
"#,
        server.uri()
    ));

    // The binary blocks, so keep it off the runtime serving the mock
    let output = tokio::task::spawn_blocking(move || {
        prism(dir.path())
            .args(["--json", "--to", "ja,fr", "Hello"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let codes: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["ja", "fr"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("local:llama3.2"), "{stderr}");
}
