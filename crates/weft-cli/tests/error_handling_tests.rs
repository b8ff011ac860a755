//! Tests for error handling, suggestions and exit codes.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn weft() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("weft");
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

const MANIFEST: &str = r#"
[workspace]
name = "app"

[[entities]]
name      = "Geo"
strategy  = "struct"
languages = ["typescript", "json"]

[core]
language = "typescript"
package  = "@app/core"
path     = "core"

[[core.spiralers]]
key               = "mobile"
role              = "mobile-binding"
language          = "kotlin"
previous_language = "typescript"
package           = "app.mobile"
path              = "mobile"
"#;

#[test]
fn missing_workspace_exits_3() {
    let dir = TempDir::new().unwrap();
    weft()
        .arg("generate")
        .arg(dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("weft.toml"));
}

#[test]
fn unmapped_type_exits_2_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("weft.toml"), MANIFEST).unwrap();
    fs::create_dir_all(dir.path().join("managements")).unwrap();
    fs::write(
        dir.path().join("managements/places.toml"),
        "name = \"Places\"\nreach = \"public\"\n\n[[methods]]\nname = \"locate\"\nreturns = \"Geo\"\n",
    )
    .unwrap();

    weft()
        .arg("generate")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Geo"))
        .stderr(predicate::str::contains("kotlin"))
        .stderr(predicate::str::contains("Suggestions:"));

    assert!(!dir.path().join("mobile").exists());
}

#[test]
fn malformed_spec_names_the_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("weft.toml"), MANIFEST).unwrap();
    fs::create_dir_all(dir.path().join("managements")).unwrap();
    fs::write(dir.path().join("managements/broken.toml"), "name = [").unwrap();

    weft()
        .args(["list"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn explicit_missing_config_exits_4() {
    weft()
        .args(["--config", "/definitely/not/here.toml", "types"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unknown_language_is_rejected_by_clap() {
    weft()
        .args(["types", "--lang", "java"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("java"));
}

#[test]
fn json_errors_are_structured() {
    let dir = TempDir::new().unwrap();
    let out = weft()
        .args(["--quiet", "--output-format", "json", "list"])
        .arg(dir.path())
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();

    let err: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(err["exit_code"], 3);
    assert_eq!(err["category"], "NotFound");
}
