//! Integration tests for the `taskye` CLI binary.
//!
//! Every test runs against its own temporary data directory and config file,
//! so nothing touches the user's real snapshots, configuration or keyring.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Isolated home for one test: data dir, config path and `$HOME`.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Build a [`Command`] for the `taskye` binary with env isolation.
    fn cmd(&self) -> assert_cmd::Command {
        let root = self.dir.path();
        let mut cmd = cargo_bin_cmd!("taskye");
        cmd.env("HOME", root)
            .env("XDG_CONFIG_HOME", root.join("config"))
            .env("XDG_DATA_HOME", root.join("share"))
            .env("TASKYE_CONFIG", root.join("config.toml"))
            .env("TASKYE_DATA_DIR", root.join("data"))
            .env("NO_COLOR", "1")
            .env_remove("TASKYE_API_KEY")
            .env_remove("TASKYE_MODEL")
            .env_remove("TASKYE_OUTPUT")
            .env_remove("TASKYE_PASSWORD")
            .env_remove("TASKYE_PROVIDER__BASE_URL")
            .env_remove("RUST_LOG");
        cmd
    }

    fn logged_in(self) -> Self {
        self.cmd()
            .args(["login", "--email", "admin@axis.com", "--password", "admin123"])
            .assert()
            .success();
        self
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(["-o", "json"]).args(args).output().unwrap();
        assert!(
            output.status.success(),
            "`{}` failed:\n{}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = Sandbox::new().cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    Sandbox::new().cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("tickets")
            .and(predicate::str::contains("board"))
            .and(predicate::str::contains("inventory"))
            .and(predicate::str::contains("assist")),
    );
}

#[test]
fn test_version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taskye"));
}

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_subcommand() {
    Sandbox::new()
        .cmd()
        .arg("nonexistent")
        .assert()
        .failure()
        .code(2);
}

// ── Session ─────────────────────────────────────────────────────────

#[test]
fn test_tickets_require_login() {
    Sandbox::new()
        .cmd()
        .args(["tickets", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("taskye login"));
}

#[test]
fn test_wrong_password_is_rejected() {
    Sandbox::new()
        .cmd()
        .args(["login", "--email", "admin@axis.com", "--password", "nope"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_login_persists_until_logout() {
    let sb = Sandbox::new().logged_in();

    let me = sb.json(&["whoami"]);
    assert_eq!(me["email"], "admin@axis.com");
    assert!(me.get("password").is_none());

    sb.cmd().arg("logout").assert().success();
    sb.cmd().arg("whoami").assert().failure().code(3);
}

#[test]
fn test_whoami_json_shape() {
    let sb = Sandbox::new().logged_in();
    insta::assert_json_snapshot!(sb.json(&["whoami"]), @r#"
    {
      "email": "admin@axis.com",
      "id": "1",
      "name": "Administrador",
      "role": "admin"
    }
    "#);
}

// ── Tickets ─────────────────────────────────────────────────────────

#[test]
fn test_seed_tickets_are_listed() {
    let sb = Sandbox::new().logged_in();
    let tickets = sb.json(&["tickets", "list"]);
    let tickets = tickets.as_array().unwrap();
    assert!(!tickets.is_empty());
    assert!(tickets.iter().any(|t| t["id"] == "1"));
}

#[test]
fn test_list_filters_by_status() {
    let sb = Sandbox::new().logged_in();
    let open = sb.json(&["tickets", "list", "--status", "open"]);
    let open = open.as_array().unwrap();
    assert!(!open.is_empty());
    assert!(open.iter().all(|t| t["status"] == "Open"));
}

#[test]
fn test_create_comment_and_resolve() {
    let sb = Sandbox::new().logged_in();

    let created = sb.json(&[
        "tickets",
        "create",
        "--title",
        "VPN drops every hour",
        "--description",
        "The VPN client disconnects roughly every hour.",
        "--priority",
        "high",
        "--category",
        "network",
    ]);
    let id = created[0]["id"].as_str().unwrap().to_owned();
    assert_eq!(created[0]["priority"], "High");
    assert_eq!(created[0]["created_by"], "Administrador");

    let comment = sb.json(&["tickets", "comment", &id, "Restarted the client"]);
    assert_eq!(comment["author"], "Administrador");

    let resolved = sb.json(&["tickets", "resolve", &id, "--note", "Firmware updated"]);
    assert_eq!(resolved[0]["status"], "Resolved");
    assert!(resolved[0]["resolved_at"].is_string());

    let shown = sb.json(&["tickets", "show", &id]);
    assert_eq!(shown["title"], "VPN drops every hour");
    let timeline = shown["timeline"].as_array().unwrap();
    assert!(timeline.len() >= 2, "timeline: {timeline:?}");
}

#[test]
fn test_create_rejects_blank_title() {
    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .args(["tickets", "create", "--title", "  ", "--description", "x"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unknown_ticket_is_not_found() {
    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .args(["tickets", "show", "9999"])
        .assert()
        .failure()
        .code(4);
}

// ── Board and dashboard ─────────────────────────────────────────────

#[test]
fn test_board_move_updates_status() {
    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .args(["board", "move", "1", "done"])
        .assert()
        .success();

    let shown = sb.json(&["tickets", "show", "1"]);
    assert_eq!(shown["status"], "Resolved");
}

#[test]
fn test_board_plain_output_is_lane_and_id() {
    let sb = Sandbox::new().logged_in();
    let output = sb
        .cmd()
        .args(["-o", "plain", "board", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().all(|l| l.split('\t').count() == 2), "{stdout}");
}

#[test]
fn test_dashboard_counts_add_up() {
    let sb = Sandbox::new().logged_in();
    let m = sb.json(&["dashboard"]);
    let total = m["total"].as_u64().unwrap();
    assert!(total > 0);
    assert!(m["open"].as_u64().unwrap() + m["resolved"].as_u64().unwrap() <= total);
}

// ── Inventory ───────────────────────────────────────────────────────

#[test]
fn test_inventory_add_and_remove() {
    let sb = Sandbox::new().logged_in();

    let item = sb.json(&[
        "inventory",
        "add",
        "--name",
        "ThinkPad T14",
        "--kind",
        "laptop",
        "--location",
        "Room 12",
        "--serial",
        "TP-0042",
        "--warranty",
        "2027-01-31",
    ]);
    let id = item["id"].as_str().unwrap().to_owned();
    assert!(id.starts_with("INV-"));
    assert_eq!(item["warranty"], "2027-01-31");

    sb.cmd()
        .args(["inventory", "remove", &id, "-y"])
        .assert()
        .success();
    sb.cmd()
        .args(["inventory", "show", &id])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_inventory_remove_without_tty_requires_yes() {
    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .args(["inventory", "remove", "INV-001"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_inventory_rejects_bad_warranty_date() {
    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .args([
            "inventory", "add", "--name", "Monitor", "--kind", "monitor", "--location", "Lab",
            "--serial", "M-1", "--warranty", "31/01/2027",
        ])
        .assert()
        .failure()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_env() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_redacts_plaintext_key() {
    let sb = Sandbox::new();
    std::fs::write(
        sb.dir.path().join("config.toml"),
        "[provider]\napi_key = \"super-secret\"\n",
    )
    .unwrap();

    let output = sb
        .cmd()
        .args(["-o", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(!text.contains("super-secret"), "{text}");
}

#[test]
fn test_invalid_config_is_reported() {
    let sb = Sandbox::new();
    std::fs::write(
        sb.dir.path().join("config.toml"),
        "[provider]\nbase_url = \"not a url\"\n",
    )
    .unwrap();
    sb.cmd()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

// ── Assistant ───────────────────────────────────────────────────────

fn draft_response(json: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": json }] } }]
    }))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assist_creates_ticket_from_model_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(draft_response(
            r#"{"title":"Printer jam on floor 3","description":"Paper jams on every job.","priority":"Média","category":"Hardware"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let sb = Sandbox::new().logged_in();
    let created = sb
        .cmd()
        .env("TASKYE_PROVIDER__BASE_URL", format!("{}/v1beta/", server.uri()))
        .env("TASKYE_API_KEY", "k-test")
        .args([
            "-o",
            "json",
            "-y",
            "--model",
            "gemini-1.5-flash",
            "assist",
            "the printer on floor 3 jams all the time",
        ])
        .output()
        .unwrap();
    assert!(created.status.success(), "{}", combined_output(&created));

    let ticket: Value = serde_json::from_slice(&created.stdout).unwrap();
    assert_eq!(ticket["title"], "Printer jam on floor 3");
    assert_eq!(ticket["priority"], "Medium");
    assert_eq!(ticket["category"], "Hardware");
    assert_eq!(ticket["created_by"], "Administrador");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assist_dry_run_persists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(draft_response("not json at all"))
        .mount(&server)
        .await;

    let sb = Sandbox::new().logged_in();
    let before = sb.json(&["tickets", "list"]).as_array().unwrap().len();

    let preview = sb
        .cmd()
        .env("TASKYE_PROVIDER__BASE_URL", format!("{}/v1beta/", server.uri()))
        .env("TASKYE_API_KEY", "k-test")
        .args([
            "-o",
            "json",
            "--model",
            "gemini-1.5-flash",
            "assist",
            "--dry-run",
            "monitor flickers",
        ])
        .output()
        .unwrap();
    assert!(preview.status.success(), "{}", combined_output(&preview));
    let draft: Value = serde_json::from_slice(&preview.stdout).unwrap();
    assert_eq!(draft["source"], "Fallback");
    assert_eq!(draft["draft"]["title"], "monitor flickers");

    let after = sb.json(&["tickets", "list"]).as_array().unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assist_empty_response_fallback_names_pinned_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
        )
        .mount(&server)
        .await;

    let sb = Sandbox::new().logged_in();
    let preview = sb
        .cmd()
        .env("TASKYE_PROVIDER__BASE_URL", format!("{}/v1beta/", server.uri()))
        .env("TASKYE_API_KEY", "k-test")
        .args([
            "-o",
            "json",
            "-y",
            "--model",
            "models/gemini-1.5-flash",
            "assist",
            "--dry-run",
            "monitor flickers",
        ])
        .output()
        .unwrap();
    assert!(preview.status.success(), "{}", combined_output(&preview));

    let draft: Value = serde_json::from_slice(&preview.stdout).unwrap();
    assert_eq!(draft["source"], "Fallback");
    assert_eq!(draft["model"], "gemini-1.5-flash");
    assert_eq!(draft["draft"]["title"], "monitor flickers");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assist_rejected_key_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .env("TASKYE_PROVIDER__BASE_URL", format!("{}/v1beta/", server.uri()))
        .env("TASKYE_API_KEY", "bad")
        .args(["-y", "--model", "gemini-1.5-flash", "assist", "wifi is down"])
        .assert()
        .failure()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assist_quota_exits_with_quota_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let sb = Sandbox::new().logged_in();
    sb.cmd()
        .env("TASKYE_PROVIDER__BASE_URL", format!("{}/v1beta/", server.uri()))
        .env("TASKYE_API_KEY", "k-test")
        .args(["-y", "--model", "gemini-1.5-flash", "assist", "wifi is down"])
        .assert()
        .failure()
        .code(9);
}
