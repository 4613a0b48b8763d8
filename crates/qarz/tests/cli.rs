//! End-to-end tests for the qarz binary against an isolated home directory

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn qarz(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qarz").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("QARZ_CONFIG");
    cmd
}

fn json_output(home: &TempDir, args: &[&str]) -> Value {
    let output = qarz(home).arg("--json").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "qarz {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("emit"))
        .stdout(predicate::str::contains("notifications"))
        .stdout(predicate::str::contains("scheduled"));
}

#[test]
fn test_templates_seeded_on_first_run() {
    let home = TempDir::new().unwrap();
    let templates = json_output(&home, &["templates", "list"]);
    let ids: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 5);
    assert!(ids.contains(&"default-debt-added"));
    assert!(home.path().join(".qarz").join("qarz.db").exists());
}

#[test]
fn test_emit_fires_matching_rule() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .args([
            "rules",
            "add",
            "--name",
            "Big debts",
            "--condition",
            r#"{"type":"high_debt","threshold":1000000}"#,
            "--recipient",
            "admin-1",
            "--channel",
            "in_app",
            "--channel",
            "sms",
            "--priority",
            "high",
        ])
        .assert()
        .success();

    let below = json_output(
        &home,
        &[
            "emit",
            r#"{"type":"debt_added","data":{"amount":999999,"customerName":"Ahmad"}}"#,
        ],
    );
    assert_eq!(below.as_array().unwrap().len(), 0);

    let created = json_output(
        &home,
        &[
            "emit",
            r#"{"type":"debt_added","data":{"amount":1000000,"customerName":"Ahmad"}}"#,
        ],
    );
    let created = created.as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["userId"], "admin-1");
    assert_eq!(created[0]["type"], "high_debt");
    assert_eq!(created[0]["priority"], "high");

    let id = created[0]["id"].as_str().unwrap();
    let logs = json_output(&home, &["logs", "--notification", id]);
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["channel"], "in_app");
    assert_eq!(logs[0]["status"], "sent");
    // No SMS gateway configured
    assert_eq!(logs[1]["channel"], "sms");
    assert_eq!(logs[1]["status"], "failed");
    assert_eq!(
        logs[1]["errorMessage"],
        "no sender registered for channel sms"
    );
}

#[test]
fn test_emit_rejects_bad_json() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .args(["emit", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid event JSON"));
}

#[test]
fn test_notifications_read_flow() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .args([
            "send", "manager", "--manager", "admin-1", "--title", "Stock", "--message", "Checked",
        ])
        .assert()
        .success();

    let unread = json_output(&home, &["notifications", "list", "--unread"]);
    let unread = unread.as_array().unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["title"], "Stock");

    let id = unread[0]["id"].as_str().unwrap();
    qarz(&home)
        .args(["notifications", "read", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked as read"));

    let unread = json_output(&home, &["notifications", "list", "--unread"]);
    assert!(unread.as_array().unwrap().is_empty());

    qarz(&home)
        .args(["notifications", "remove", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Notification not found"));
}

#[test]
fn test_settings_set_is_a_merge() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .args(["settings", "set", "u1", "--sms", "true", "--phone", "07501234567"])
        .assert()
        .success();
    qarz(&home)
        .args(["settings", "set", "u1", "--high-debt-threshold", "500000"])
        .assert()
        .success();

    let settings = json_output(&home, &["settings", "show", "u1"]);
    assert_eq!(settings["smsEnabled"], true);
    assert_eq!(settings["phoneNumber"], "07501234567");
    assert_eq!(settings["highDebtThreshold"], 500000);
    assert_eq!(settings["inAppEnabled"], true);
}

#[test]
fn test_send_debt_respects_settings() {
    let home = TempDir::new().unwrap();
    let sent = json_output(
        &home,
        &[
            "send", "debt", "--user", "u1", "--customer", "Ahmad", "--amount", "5000", "--total",
            "25000",
        ],
    );
    let sent = sent.as_array().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]["message"].as_str().unwrap().contains("5,000"));

    qarz(&home)
        .args(["settings", "set", "u1", "--debt-notifications", "false"])
        .assert()
        .success();
    qarz(&home)
        .args([
            "send", "debt", "--user", "u1", "--customer", "Ahmad", "--amount", "5000", "--total",
            "25000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing sent"));
}

#[test]
fn test_scheduled_process() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .args([
            "scheduled", "add", "--user", "u1", "--title", "Now", "--message", "due", "--in", "0",
        ])
        .assert()
        .success();
    qarz(&home)
        .args([
            "scheduled", "add", "--user", "u1", "--title", "Later", "--message", "not yet", "--in",
            "1d",
        ])
        .assert()
        .success();

    let sent = json_output(&home, &["scheduled", "process"]);
    let sent = sent.as_array().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["title"], "Now");

    let pending = json_output(&home, &["scheduled", "list"]);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["draft"]["title"], "Later");
}

#[test]
fn test_gateway_config_round_trip() {
    let home = TempDir::new().unwrap();
    qarz(&home)
        .args(["gateway", "set", "sms", "--url", "http://127.0.0.1:9/sms"])
        .assert()
        .success();

    let config = home.path().join(".qarz").join("config.toml");
    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("http://127.0.0.1:9/sms"));

    qarz(&home)
        .args(["gateway", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:9/sms"));

    qarz(&home)
        .args(["gateway", "set", "in_app", "--url", "http://x"])
        .assert()
        .failure();
}

#[test]
fn test_explicit_missing_config_fails() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("missing.toml");
    qarz(&home)
        .args(["--config", missing.to_str().unwrap(), "templates", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
