//! Integration tests for the AILingo CLI.

#![allow(clippy::unwrap_used)] // Tests can use unwrap for cleaner assertions

mod common;

use common::{StubServer, TestEnv};
use predicates::prelude::*;
use serde_json::json;

fn generate_ok(url: &str) -> StubServer {
    StubServer::builder().json("/generate", 200, json!({ "imageUrl": url })).spawn()
}

/// Test that the CLI shows help.
#[test]
fn test_help() {
    TestEnv::new().cmd().arg("--help").assert().success().stdout(predicate::str::contains("AILingo"));
}

/// Test that the CLI shows version.
#[test]
fn test_version() {
    TestEnv::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that unrecognized commands fail.
#[test]
fn test_unknown_command() {
    TestEnv::new().cmd().arg("unknown-command").assert().failure();
}

#[test]
fn test_locales_lists_native_names() {
    TestEnv::new()
        .cmd()
        .args(["--locale", "ja", "locales"])
        .assert()
        .success()
        .stdout(predicate::str::contains("日本語"))
        .stdout(predicate::str::contains("Français"));
}

#[test]
fn test_unsupported_locale() {
    TestEnv::new()
        .cmd()
        .args(["--locale", "tlh", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported locale"));
}

#[test]
fn test_strings_without_translation_service() {
    TestEnv::new()
        .cmd()
        .args(["--locale", "fr", "strings", "--key", "title"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Créez de superbes images par IA"))
        .stdout(predicate::str::contains("static"));
}

#[test]
fn test_strings_apply_remote_translation() {
    let stub = StubServer::builder()
        .json("/translate", 200, json!({ "translated": { "title": "Entfernter Titel" } }))
        .spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["--locale", "de", "strings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entfernter Titel"))
        .stdout(predicate::str::contains("remote"));

    let calls = stub.calls_to("/translate");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["sourceLocale"], "en");
    assert_eq!(calls[0].body["targetLocale"], "de");
    assert_eq!(calls[0].body["content"]["title"], "Create Stunning AI Images");
}

#[test]
fn test_strings_fall_back_on_service_error() {
    let stub = StubServer::builder().json("/translate", 500, json!({ "error": "boom" })).spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["--locale", "es", "-o", "json", "strings", "--key", "title"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"static-locale\""));
}

#[test]
fn test_strings_fall_back_on_error_body() {
    let stub = StubServer::builder()
        .json("/translate", 200, json!({ "error": "Translation failed: 500" }))
        .spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["--locale", "es", "-o", "json", "strings", "--key", "title"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"static-locale\""))
        .stdout(predicate::str::contains("Translation failed").not());
}

#[test]
fn test_generate_requires_login() {
    let stub = generate_ok("http://x/y.png");
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["generate", "a", "red", "fox"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Please create an account or log in"))
        .stderr(predicate::str::contains("ailingo register"))
        .stderr(predicate::str::contains("ailingo login").not());

    assert!(stub.calls_to("/generate").is_empty());
}

#[test]
fn test_generate_success_counts_once() {
    let stub = generate_ok("http://x/y.png");
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd().args(["login", "--token", "t0k3n"]).assert().success();
    env.cmd()
        .args(["generate", "a red fox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://x/y.png"))
        .stderr(predicate::str::contains("Image generated successfully!"));

    assert_eq!(env.entry("generationCount").as_deref(), Some("1"));
    let calls = stub.calls_to("/generate");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body, json!({ "prompt": "a red fox" }));
    assert_eq!(calls[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer test-key"));
}

#[test]
fn test_generate_quota_exhausted() {
    let stub = generate_ok("http://x/y.png");
    let env = TestEnv::new();
    env.use_stub(&stub);
    env.set_entry("token", "t0k3n");
    env.set_entry("generationCount", "2");

    env.cmd()
        .args(["generate", "a red fox"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("free generations"));

    assert!(stub.calls_to("/generate").is_empty());
}

#[test]
fn test_generate_empty_prompt() {
    let stub = generate_ok("http://x/y.png");
    let env = TestEnv::new();
    env.use_stub(&stub);
    env.set_entry("token", "t0k3n");

    env.cmd()
        .args(["generate", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please enter a prompt"));

    assert!(stub.calls_to("/generate").is_empty());
}

#[test]
fn test_generate_without_image_is_failure() {
    let stub = StubServer::builder().json("/generate", 200, json!({})).spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);
    env.set_entry("token", "t0k3n");
    env.set_entry("generationCount", "1");

    env.cmd()
        .args(["generate", "a red fox"])
        .assert()
        .code(11)
        .stderr(predicate::str::contains("Failed to generate image"));

    assert_eq!(env.entry("generationCount").as_deref(), Some("1"));
}

#[test]
fn test_generate_rate_limited() {
    let stub = StubServer::builder()
        .json("/generate", 429, json!({ "error": "Rate limits exceeded, try again later." }))
        .spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);
    env.set_entry("token", "t0k3n");

    env.cmd().args(["generate", "a red fox"]).assert().code(7);
    assert_eq!(env.entry("generationCount"), None);
}

#[test]
fn test_generate_payment_required() {
    let stub = StubServer::builder().json("/generate", 402, json!({})).spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);
    env.set_entry("token", "t0k3n");

    env.cmd()
        .args(["generate", "a red fox"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Payment required"));
}

#[test]
fn test_generate_and_download_data_url() {
    let stub = generate_ok("data:image/png;base64,aGVsbG8=");
    let env = TestEnv::new();
    env.use_stub(&stub);
    env.set_entry("token", "t0k3n");
    let out = env.path().join("images");

    env.cmd()
        .args(["generate", "a red fox", "--download"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Image downloaded!"));

    let files: Vec<_> = std::fs::read_dir(&out).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("generated-image-") && name.ends_with(".png"));
    assert_eq!(std::fs::read(&files[0]).unwrap(), b"hello");
}

#[test]
fn test_generate_and_download_http_url() {
    let stub = StubServer::builder().bytes("/images/fox.png", b"\x89PNG").spawn();
    let generator = generate_ok(&stub.url("/images/fox.png"));
    let env = TestEnv::new();
    env.use_stub(&generator);
    env.set_entry("token", "t0k3n");
    let out = env.path().join("images");

    env.cmd().args(["generate", "fox", "--download"]).arg(&out).assert().success();

    let files: Vec<_> = std::fs::read_dir(&out).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(std::fs::read(&files[0]).unwrap(), b"\x89PNG");
    assert_eq!(stub.calls_to("/images/fox.png").len(), 1);
}

#[test]
fn test_login_with_credentials() {
    let stub = StubServer::builder()
        .json("/api/auth/login", 200, json!({ "token": "issued-token" }))
        .spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["login", "--email", "ana@example.com", "--password", "hunter2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in"));

    assert_eq!(env.entry("token").as_deref(), Some("issued-token"));
    let calls = stub.calls_to("/api/auth/login");
    assert_eq!(calls[0].body, json!({ "email": "ana@example.com", "password": "hunter2" }));
}

#[test]
fn test_login_rejected() {
    let stub = StubServer::builder()
        .json("/api/auth/login", 401, json!({ "message": "Invalid credentials" }))
        .spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["login", "--email", "ana@example.com", "--password", "wrong"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid credentials"));

    assert_eq!(env.entry("token"), None);
}

#[test]
fn test_register() {
    let stub = StubServer::builder()
        .json("/api/auth/register", 201, json!({ "message": "User registered" }))
        .spawn();
    let env = TestEnv::new();
    env.use_stub(&stub);

    env.cmd()
        .args(["register", "--name", "Ana", "--email", "ana@example.com", "--password", "pw"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ailingo login --email ana@example.com"));

    let calls = stub.calls_to("/api/auth/register");
    assert_eq!(calls[0].body["name"], "Ana");
    // Registration does not log in.
    assert_eq!(env.entry("token"), None);
}

#[test]
fn test_logout() {
    let env = TestEnv::new();
    env.set_entry("token", "t0k3n");

    env.cmd().arg("logout").assert().success().stderr(predicate::str::contains("Logged out"));
    assert_eq!(env.entry("token"), None);

    env.cmd().arg("logout").assert().success().stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_status_json() {
    let env = TestEnv::new();
    env.set_entry("token", "t0k3n");
    env.set_entry("generationCount", "1");

    let output = env.cmd().args(["-o", "json", "status"]).output().unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["authenticated"], true);
    assert_eq!(status["generations_used"], 1);
    assert_eq!(status["free_limit"], 2);
    assert_eq!(status["remaining"], 1);
    assert_eq!(status["locale"], "en");
}

#[test]
fn test_status_with_corrupt_counter() {
    let env = TestEnv::new();
    env.set_entry("generationCount", "abc");

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Authenticated:  no"))
        .stdout(predicate::str::contains("Generations:    0/2"));
}

#[test]
fn test_generate_without_endpoint() {
    let env = TestEnv::new();
    env.set_entry("token", "t0k3n");

    env.cmd()
        .args(["generate", "fox"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No generation endpoint configured"));
}

#[test]
fn test_zero_timeout_is_config_error() {
    let env = TestEnv::new();
    env.write_config("timeout_secs: 0\n");

    env.cmd()
        .arg("status")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout_secs must be greater than 0"));
}

#[test]
fn test_completion_bash() {
    TestEnv::new()
        .cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ailingo"));
}
