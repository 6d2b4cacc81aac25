use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "questforge-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run(dir: &Path, today: &str, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_questforge");
    Command::new(exe)
        .env_remove("QUESTFORGE_DATA_DIR")
        .arg("--data-dir")
        .arg(dir)
        .args(["--seed", "7", "--today", today, "--json"])
        .args(args)
        .output()
        .expect("run cli")
}

fn run_json(dir: &Path, today: &str, args: &[&str]) -> Value {
    let output = run(dir, today, args);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json report")
}

#[test]
fn fresh_status_shows_default_player_and_boss() {
    let dir = temp_path("fresh");
    let report = run_json(&dir, "2024-03-01", &["status"]);
    assert_eq!(report["stats"]["name"], "Hero");
    assert_eq!(report["stats"]["level"], 1);
    assert_eq!(report["stats"]["xpToNextLevel"], 100);
    assert_eq!(report["boss"]["currentHp"], 100);
    assert_eq!(report["quests"].as_array().map(Vec::len), Some(0));
    assert!(dir.join("questforge.stats.json").exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn add_then_done_grants_xp_and_persists() {
    let dir = temp_path("done");
    let added = run_json(&dir, "2024-03-01", &["add", "Read", "-d", "ten pages"]);
    assert_eq!(added["notices"].as_array().map(Vec::len), Some(0));
    assert_eq!(added["refreshed"]["quests"], true);
    let id = added["quests"][0]["id"].as_u64().expect("quest id");

    let done = run_json(&dir, "2024-03-01", &["done", &id.to_string()]);
    assert_eq!(done["stats"]["xp"], 10);
    assert_eq!(done["quests"][0]["streak"], 1);
    assert_eq!(done["quests"][0]["completedToday"], true);

    let next_day = run_json(&dir, "2024-03-02", &[]);
    assert_eq!(next_day["quests"][0]["completedToday"], false);
    assert_eq!(next_day["quests"][0]["streak"], 1);
    assert_eq!(next_day["stats"]["xp"], 10);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn undo_reverses_completion() {
    let dir = temp_path("undo");
    let added = run_json(&dir, "2024-03-01", &["add", "Stretch"]);
    let id = added["quests"][0]["id"].as_u64().expect("quest id").to_string();
    run_json(&dir, "2024-03-01", &["done", &id]);
    let undone = run_json(&dir, "2024-03-01", &["undo", &id]);
    assert_eq!(undone["stats"]["xp"], 0);
    assert_eq!(undone["quests"][0]["streak"], 0);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unknown_quest_id_fails() {
    let dir = temp_path("missing");
    let output = run(&dir, "2024-03-01", &["done", "42"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no quest with id 42"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn reset_clears_saved_slots() {
    let dir = temp_path("reset");
    run_json(&dir, "2024-03-01", &["add", "Walk"]);
    assert!(dir.join("questforge.quests.json").exists());
    let output = run(&dir, "2024-03-01", &["reset"]);
    assert!(output.status.success());
    assert!(!dir.join("questforge.quests.json").exists());
    assert!(!dir.join("questforge.stats.json").exists());
    let _ = std::fs::remove_dir_all(dir);
}
