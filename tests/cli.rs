//! Binary-level tests for the sommelier-rs CLI.
//!
//! Only commands that never reach the model are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sommelier() -> Command {
    let mut cmd = Command::cargo_bin("sommelier-rs").unwrap_or_else(|e| unreachable!("{e}"));
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("SOMMELIER_API_KEY")
        .env_remove("SOMMELIER_PROMPT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    sommelier()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("init-prompts"));
}

#[test]
fn roles_lists_registry_without_credentials() {
    sommelier()
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::contains("food_pairing"))
        .stdout(predicate::str::contains("concise_human"));
}

#[test]
fn roles_as_json() {
    let output = sommelier()
        .args(["--format", "json", "roles"])
        .output()
        .unwrap_or_else(|e| unreachable!("{e}"));
    assert!(output.status.success());
    let roles: serde_json::Value =
        serde_json::from_slice(&output.stdout).unwrap_or_else(|e| unreachable!("{e}"));
    assert_eq!(roles.as_array().map(Vec::len), Some(8));
    assert_eq!(roles[0]["id"], "wine_knowledge");
}

#[test]
fn ask_without_key_is_a_configuration_error() {
    let dir = TempDir::new().unwrap_or_else(|e| unreachable!("{e}"));
    sommelier()
        .current_dir(dir.path())
        .args(["ask", "What pairs well with grilled salmon?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn ask_rejects_malformed_context() {
    let dir = TempDir::new().unwrap_or_else(|e| unreachable!("{e}"));
    sommelier()
        .current_dir(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .args(["ask", "hi", "--context", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn ask_rejects_unknown_mode() {
    let dir = TempDir::new().unwrap_or_else(|e| unreachable!("{e}"));
    sommelier()
        .current_dir(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .args(["ask", "hi", "--mode", "robot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown chat mode"));
}

#[test]
fn init_prompts_writes_templates() {
    let dir = TempDir::new().unwrap_or_else(|e| unreachable!("{e}"));
    sommelier()
        .args(["init-prompts", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 4 prompt template(s)"));

    for file in ["classifier.md", "harmonizer.md", "compression.md", "critic.md"] {
        assert!(dir.path().join(file).exists(), "{file} missing");
    }

    sommelier()
        .args(["init-prompts", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));
}
