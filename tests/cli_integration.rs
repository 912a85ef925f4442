// CLI integration tests for v0.1.0 command flows.
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_logprobe");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    parse_json(line)
}

#[test]
fn version_emits_json_when_piped() {
    let version = cmd().arg("version").output().expect("version");
    assert!(version.status.success());
    let version_json = parse_json_line(&version.stdout);
    assert_eq!(version_json.get("name").unwrap().as_str().unwrap(), "logprobe");
    assert_eq!(
        version_json.get("version").unwrap().as_str().unwrap(),
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn no_args_shows_help_with_usage_exit() {
    let bare = cmd().output().expect("bare invocation");
    assert_eq!(bare.status.code().unwrap(), 2);
    let help = String::from_utf8_lossy(&bare.stderr);
    assert!(help.contains("USAGE"));
    assert!(help.contains("run"));
}

#[test]
fn env_lists_visible_entries_and_redacts_sensitive_keys() {
    let env = cmd()
        .env_clear()
        .env("REGION", "eastus")
        .env("API_KEY", "xyz")
        .arg("env")
        .output()
        .expect("env");
    assert!(env.status.success());

    let stdout = String::from_utf8_lossy(&env.stdout);
    let region_lines = stdout.lines().filter(|line| *line == "REGION=eastus").count();
    assert_eq!(region_lines, 1);
    assert!(!stdout.contains("API_KEY"));
    assert!(!stdout.contains("xyz"));

    let notice = parse_json_line(&env.stderr);
    let notice = notice.get("notice").expect("notice envelope");
    assert_eq!(notice.get("kind").unwrap().as_str().unwrap(), "redacted");
    assert_eq!(notice.get("cmd").unwrap().as_str().unwrap(), "env");
    assert_eq!(notice.get("details").unwrap()["count"], 1);
    assert!(!String::from_utf8_lossy(&env.stderr).contains("xyz"));
}

#[test]
fn env_emits_no_notice_when_nothing_is_redacted() {
    let env = cmd()
        .env_clear()
        .env("REGION", "eastus")
        .arg("env")
        .output()
        .expect("env");
    assert!(env.status.success());
    assert!(env.stderr.is_empty());
}

#[test]
fn env_json_reports_visible_and_redacted_count() {
    let env = cmd()
        .env_clear()
        .env("REGION", "eastus")
        .env("DB_PASSWORD", "hunter2")
        .args(["env", "--json"])
        .output()
        .expect("env --json");
    assert!(env.status.success());

    let text = String::from_utf8_lossy(&env.stdout);
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("DB_PASSWORD"));

    let env_json = parse_json(&text);
    let report = env_json.get("env").expect("env envelope");
    assert_eq!(report["visible"]["REGION"].as_str().unwrap(), "eastus");
    assert_eq!(report.get("redacted_count").unwrap().as_u64().unwrap(), 1);
}

#[test]
fn check_reports_the_default_schedule() {
    let check = cmd().args(["check", "--json"]).output().expect("check");
    assert!(check.status.success());
    let check_json = parse_json(std::str::from_utf8(&check.stdout).expect("utf8"));
    let report = check_json.get("check").expect("check envelope");
    assert_eq!(report.get("status").unwrap().as_str().unwrap(), "valid");

    let schedule = report.get("schedule").expect("schedule");
    assert_eq!(schedule.get("ticks").unwrap().as_u64().unwrap(), 20);
    assert_eq!(schedule.get("stride").unwrap().as_u64().unwrap(), 5);
    assert_eq!(schedule.get("heartbeats").unwrap().as_u64().unwrap(), 4);
    assert_eq!(schedule.get("first_beat").unwrap().as_u64().unwrap(), 0);
    assert_eq!(schedule.get("last_beat").unwrap().as_u64().unwrap(), 15);
}

#[test]
fn check_human_output_describes_the_schedule() {
    let check = cmd().arg("check").output().expect("check");
    assert!(check.status.success());
    let text = String::from_utf8_lossy(&check.stdout);
    assert!(text.contains("Configuration valid."));
    assert!(text.contains("Heartbeats: 4"));
}

#[test]
fn zero_tick_is_a_usage_error() {
    let check = cmd()
        .args(["check", "--tick", "0s"])
        .output()
        .expect("check");
    assert_eq!(check.status.code().unwrap(), 2);
    let error_json = parse_json_line(&check.stderr);
    let error = error_json.get("error").expect("error envelope");
    assert_eq!(error.get("kind").unwrap().as_str().unwrap(), "Usage");
    assert_eq!(error.get("flag").unwrap().as_str().unwrap(), "--tick");
}

#[test]
fn interval_shorter_than_tick_is_a_usage_error() {
    let check = cmd()
        .args(["check", "--every", "500ms", "--tick", "1s"])
        .output()
        .expect("check");
    assert_eq!(check.status.code().unwrap(), 2);
    let error_json = parse_json_line(&check.stderr);
    let error = error_json.get("error").expect("error envelope");
    assert_eq!(error.get("kind").unwrap().as_str().unwrap(), "Usage");
    assert_eq!(error.get("flag").unwrap().as_str().unwrap(), "--every");
}

#[test]
fn malformed_duration_is_a_usage_error_with_hint() {
    let run = cmd()
        .args(["run", "--wait", "banana"])
        .output()
        .expect("run");
    assert_eq!(run.status.code().unwrap(), 2);
    let error_json = parse_json_line(&run.stderr);
    let error = error_json.get("error").expect("error envelope");
    assert_eq!(error.get("kind").unwrap().as_str().unwrap(), "Usage");
    assert_eq!(error.get("flag").unwrap().as_str().unwrap(), "--wait");
    assert!(error.get("hint").unwrap().as_str().unwrap().contains("ms|s|m|h"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let bogus = cmd().arg("frobnicate").output().expect("bogus subcommand");
    assert_eq!(bogus.status.code().unwrap(), 2);
    let error_json = parse_json_line(&bogus.stderr);
    let error = error_json.get("error").expect("error envelope");
    assert_eq!(error.get("kind").unwrap().as_str().unwrap(), "Usage");
}

#[test]
fn completion_script_names_the_binary() {
    let completion = cmd()
        .args(["completion", "bash"])
        .output()
        .expect("completion");
    assert!(completion.status.success());
    let script = String::from_utf8_lossy(&completion.stdout);
    assert!(script.contains("logprobe"));
}
