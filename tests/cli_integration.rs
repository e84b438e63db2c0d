/// CLI integration tests for nutrilog.
///
/// Each test spawns the compiled binary via the `assert_cmd::cargo_bin_cmd!`
/// macro and sets `NUTRILOG_HOME` to a fresh `TempDir` so tests are fully
/// isolated from the developer's real `~/.nutrilog` data. Only commands that
/// need no network are exercised.
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const DAY: &str = "2026-04-02";

// ── helpers ──────────────────────────────────────────────────────────────────

/// Returns a `Command` with `NUTRILOG_HOME` pointing at `dir`.
fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("nutrilog");
    c.env("NUTRILOG_HOME", dir.path());
    c.env_remove("RUST_LOG");
    c
}

fn init_dir(dir: &TempDir) {
    cmd_in(dir).args(["init", "--skip"]).assert().success();
}

/// Add a manual entry on `DAY`.
fn add_manual(dir: &TempDir, slot: &str, name: &str, calories: &str, grams: &str) {
    cmd_in(dir)
        .args([
            "add", slot, "--name", name, "--calories", calories, "--protein", "10", "--grams",
            grams, "--date", DAY,
        ])
        .assert()
        .success();
}

fn parse_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stdout.clone();
    serde_json::from_slice(&bytes).expect("stdout is not valid JSON")
}

fn parse_stderr_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stderr.clone();
    serde_json::from_slice(&bytes).expect("stderr is not valid JSON")
}

fn set(dir: &TempDir, key: &str, value: &str) {
    cmd_in(dir).args(["config", "set", key, value]).assert().success();
}

// ── init / config ────────────────────────────────────────────────────────────

#[test]
fn test_init_skip_creates_config_file() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["init", "--skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config initialized"));
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    set(&dir, "weight_kg", "70");
    set(&dir, "activity_level", "moderate");
    set(&dir, "backfill.enabled", "false");

    let out = cmd_in(&dir).args(["config", "show"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["config"]["profile"]["weight_kg"], 70.0);
    assert_eq!(
        json["data"]["config"]["profile"]["activity_level"],
        "moderately_active"
    );
    assert_eq!(json["data"]["config"]["backfill"]["enabled"], false);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert_eq!(err["status"], "error");
    assert_eq!(err["command"], "config");
}

// ── add / show ───────────────────────────────────────────────────────────────

/// Scenario: Given an empty diary, When a manual entry of 200 kcal/100 g is
/// added at 150 g, Then the reply carries the per-100 g entry and 300 kcal.
#[test]
fn test_add_manual_json_output() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir)
        .args([
            "add", "lunch", "--name", "Pasta", "--calories", "200", "--grams", "150g", "--date",
            DAY,
        ])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["command"], "add");
    assert_eq!(json["data"]["slot"], "lunch");
    assert_eq!(json["data"]["index"], 0);
    assert_eq!(json["data"]["entry"]["calories"], 200.0);
    assert_eq!(json["data"]["entry"]["quantity_grams"], 150.0);
    assert_eq!(json["data"]["totals"]["calories"], 300.0);
}

#[test]
fn test_add_rejects_invalid_serving() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir)
        .args(["add", "lunch", "--name", "X", "--calories", "10", "--grams", "abc"])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert_eq!(err["error"]["code"], "invalid_serving_size");
}

#[test]
fn test_add_requires_code_or_name() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir).args(["add", "lunch"]).assert().failure();
}

#[test]
fn test_show_sums_slots_and_day() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_manual(&dir, "breakfast", "Oats", "380", "50");
    add_manual(&dir, "dinner", "Salmon", "208", "150");
    add_manual(&dir, "dinner", "Rice", "130", "200");

    let out = cmd_in(&dir).args(["show", "--date", DAY]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["date"], DAY);
    let slots = json["data"]["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0]["slot"], "breakfast");
    assert_eq!(slots[0]["totals"]["calories"], 190.0);
    assert_eq!(slots[2]["slot"], "dinner");
    assert_eq!(slots[2]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(slots[2]["totals"]["calories"], 572.0);
    assert_eq!(json["data"]["total"]["calories"], 762.0);
}

#[test]
fn test_show_human_flag() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_manual(&dir, "snack", "Apple", "52", "180");
    cmd_in(&dir)
        .args(["show", "--date", DAY, "--human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Apple"))
        .stdout(predicate::str::contains("Day total"));
}

#[test]
fn test_show_empty_day() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["show", "--date", "2026-01-01", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries for 2026-01-01"));
}

// ── edit / remove ────────────────────────────────────────────────────────────

#[test]
fn test_edit_changes_serving() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_manual(&dir, "lunch", "Soup", "60", "300");

    let out = cmd_in(&dir)
        .args(["edit", "lunch", "0", "--grams", "500", "--date", DAY])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["entry"]["quantity_grams"], 500.0);
    assert_eq!(json["data"]["totals"]["calories"], 300.0);
}

#[test]
fn test_edit_missing_index_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir)
        .args(["edit", "lunch", "3", "--grams", "100", "--date", DAY])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert_eq!(err["command"], "edit");
    assert_eq!(err["error"]["code"], "entry_not_found");
}

/// Scenario: Given two lunch entries, When the first is removed, Then the
/// second becomes index 0.
#[test]
fn test_remove_shifts_indices() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_manual(&dir, "lunch", "First", "100", "100");
    add_manual(&dir, "lunch", "Second", "200", "100");

    let out = cmd_in(&dir)
        .args(["remove", "lunch", "0", "--date", DAY])
        .assert()
        .success();
    assert_eq!(parse_json(&out)["data"]["entry"]["name"], "First");

    let out = cmd_in(&dir).args(["show", "--date", DAY]).assert().success();
    let json = parse_json(&out);
    let lunch = &json["data"]["slots"][1]["entries"];
    assert_eq!(lunch.as_array().unwrap().len(), 1);
    assert_eq!(lunch[0]["index"], 0);
    assert_eq!(lunch[0]["entry"]["name"], "Second");
}

// ── energy / month ───────────────────────────────────────────────────────────

fn set_profile(dir: &TempDir) {
    set(dir, "weight_kg", "70");
    set(dir, "height_cm", "175");
    set(dir, "birth_year", "1996");
    set(dir, "gender", "male");
}

#[test]
fn test_energy_reports_bmr() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    set_profile(&dir);
    let out = cmd_in(&dir)
        .args(["energy", "--date", DAY])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["targets"]["bmr"], 1648.75);
    assert_eq!(json["data"]["profile"]["age"], 30);
}

#[test]
fn test_energy_without_profile_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir).args(["energy"]).assert().failure();
    assert_eq!(parse_stderr_json(&out)["error"]["code"], "invalid_profile");
}

#[test]
fn test_month_summary() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    set_profile(&dir);
    set(&dir, "daily_calorie_goal", "2000");
    add_manual(&dir, "lunch", "Pasta", "200", "500");

    let out = cmd_in(&dir)
        .args(["month", "--month", "2026-04"])
        .assert()
        .success();
    let json = parse_json(&out);
    let s = &json["data"]["summary"];
    assert_eq!(s["days_in_month"], 30);
    assert_eq!(s["daily_calorie_goal"], 2000.0);
    assert_eq!(s["total_calories_needed"], 60000.0);
    assert_eq!(s["total_calories_consumed"], 1000.0);
    assert_eq!(s["days_below_bmr"], 1);
    assert_eq!(s["daily_calories_consumed"][DAY], 1000.0);
}

#[test]
fn test_month_invalid_argument_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    set_profile(&dir);
    let out = cmd_in(&dir)
        .args(["month", "--month", "2026-13"])
        .assert()
        .failure();
    assert_eq!(parse_stderr_json(&out)["error"]["code"], "invalid_input");
}

// ── misc ─────────────────────────────────────────────────────────────────────

#[test]
fn test_backfill_with_nothing_to_do_stays_offline() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_manual(&dir, "lunch", "Bread", "265", "80");
    let out = cmd_in(&dir)
        .args(["backfill", "--date", DAY])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["report"]["examined"], 1);
    assert_eq!(json["data"]["report"]["qualified"], 0);
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nutrilog"));
}
