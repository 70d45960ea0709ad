//! End-to-end CLI tests for the sharegate binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_sharegate_config(config_home: &std::path::Path, contents: &str) {
    let config_dir = config_home.join("sharegate");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

/// Command with an isolated, empty config home.
fn sharegate(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sharegate").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

async fn mount_share(server: &MockServer, slug: &str, password_required: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/api/share/{slug}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "slug": slug,
            "file_name": "report.pdf",
            "file_size": 11,
            "dl_count": 2,
            "max_downloads": 10,
            "expires_at": "2030-01-01 00:00:00",
            "password_required": password_required
        })))
        .mount(server)
        .await;
}

#[test]
fn test_binary_help_displays_usage() {
    let config_home = TempDir::new().unwrap();
    sharegate(&config_home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("<SLUG>"))
        .stdout(predicate::str::contains("Exit codes"));
}

#[test]
fn test_binary_version_displays_version() {
    let config_home = TempDir::new().unwrap();
    sharegate(&config_home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_binary_missing_slug_is_usage_error() {
    let config_home = TempDir::new().unwrap();
    sharegate(&config_home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<SLUG>"));
}

#[test]
fn test_binary_invalid_flag_is_usage_error() {
    let config_home = TempDir::new().unwrap();
    sharegate(&config_home)
        .args(["--invalid-flag", "abc"])
        .assert()
        .code(2);
}

#[test]
fn test_binary_invalid_config_file_fails() {
    let config_home = TempDir::new().unwrap();
    write_sharegate_config(config_home.path(), "read_timeout_secs = 0\n");
    sharegate(&config_home)
        .arg("abc123")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read_timeout_secs"));
}

#[test]
fn test_binary_invalid_server_url_fails() {
    let config_home = TempDir::new().unwrap();
    sharegate(&config_home)
        .args(["-s", "ftp://files.example.com", "abc123"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid server URL"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_unknown_share_exits_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/share/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "nope"]);

    run(cmd)
        .await
        .code(3)
        .stderr(predicate::str::contains("no longer available"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_trims_slug_argument() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/share/nope"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "  nope \n"]);

    run(cmd).await.code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_server_error_suggests_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/share/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "flaky"]);

    run(cmd)
        .await
        .code(1)
        .stderr(predicate::str::contains("Temporary failure"))
        .stderr(predicate::str::contains("Run the same command again to retry"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_info_prints_details_without_downloading() {
    let server = MockServer::start().await;
    mount_share(&server, "abc123", false).await;

    let config_home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "--info", "-o"])
        .arg(output.path())
        .arg("abc123");

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("report.pdf"))
        .stdout(predicate::str::contains("2 of 10 (8 left)"))
        .stdout(predicate::str::contains("2030-01-01"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "only the metadata request is expected");
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_downloads_public_share() {
    let server = MockServer::start().await;
    mount_share(&server, "abc123", false).await;
    Mock::given(method("GET"))
        .and(path("/api/download/abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="report.pdf""#)
                .set_body_bytes(b"PDF content".to_vec()),
        )
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_sharegate_config(
        config_home.path(),
        &format!(
            "server_url = \"{}\"\noutput_dir = \"{}\"\nprogress = false\n",
            server.uri(),
            output.path().to_string_lossy().replace('\\', "\\\\")
        ),
    );
    let mut cmd = sharegate(&config_home);
    cmd.arg("abc123");

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Saved"));

    assert_eq!(
        std::fs::read(output.path().join("report.pdf")).unwrap(),
        b"PDF content"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_reads_password_from_piped_stdin() {
    let server = MockServer::start().await;
    mount_share(&server, "secret9", true).await;
    Mock::given(method("GET"))
        .and(path("/api/download/secret9"))
        .and(query_param("password", "letmein"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip archive".to_vec()))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "--no-progress", "-o"])
        .arg(output.path())
        .arg("secret9")
        .write_stdin("letmein\n");

    run(cmd).await.success();

    assert_eq!(
        std::fs::read(output.path().join("report.pdf")).unwrap(),
        b"zip archive"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_wrong_password_exits_password_rejected() {
    let server = MockServer::start().await;
    mount_share(&server, "secret9", true).await;
    Mock::given(method("GET"))
        .and(path("/api/download/secret9"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "-p", "hunter2", "-o"])
        .arg(output.path())
        .arg("secret9");

    run(cmd)
        .await
        .code(4)
        .stderr(predicate::str::contains("Incorrect password"))
        .stderr(predicate::str::contains("hunter2").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_protected_share_without_password_input_exits_password_rejected() {
    let server = MockServer::start().await;
    mount_share(&server, "secret9", true).await;

    let config_home = TempDir::new().unwrap();
    let mut cmd = sharegate(&config_home);
    cmd.args(["-s", server.uri().as_str(), "secret9"]);

    run(cmd).await.code(4);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "no download request without a password");
}
