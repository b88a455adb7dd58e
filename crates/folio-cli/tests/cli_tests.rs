//! Integration tests for the folio binary
//!
//! These stay offline: empty queries and status never touch the LLM service.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn folio_cmd(db_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env("FOLIO_DB", db_dir.path().join("test.sqlite"));
    cmd
}

fn seed_directory(db_dir: &TempDir) {
    let seed = serde_json::json!({
        "profiles": [
            {
                "handle": "mina",
                "display_name": "Mina K",
                "headline": "ML engineer",
                "skills": ["ai", "python"],
                "location": "Berlin, Germany",
                "availability": { "hire": true, "collaborate": false, "hiring": false }
            },
            {
                "handle": "bruno",
                "display_name": "Bruno S",
                "skills": ["music"]
            }
        ],
        "projects": [
            {
                "owner": "bruno",
                "name": "Synth Garden",
                "slug": "synth-garden",
                "oneliner": "Generative music toy",
                "featured": true
            }
        ]
    });
    let seed_path = db_dir.path().join("seed.json");
    fs::write(&seed_path, serde_json::to_string_pretty(&seed).unwrap()).unwrap();

    folio_cmd(db_dir)
        .arg("seed")
        .arg(&seed_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 profiles, 1 projects"));
}

#[test]
fn test_seed_then_status() {
    let db_dir = TempDir::new().unwrap();
    seed_directory(&db_dir);

    folio_cmd(&db_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profiles:        2"))
        .stdout(predicate::str::contains("Projects:        1"));
}

#[test]
fn test_status_json_reports_pending_embeddings() {
    let db_dir = TempDir::new().unwrap();
    seed_directory(&db_dir);

    let output = folio_cmd(&db_dir)
        .arg("status")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["profiles"], 2);
    // Nothing embedded yet, so every entity is pending
    assert_eq!(report["embeddings"]["pending"], 3);
    assert_eq!(report["embeddings"]["total_embeddings"], 0);
}

#[test]
fn test_empty_search_browses_directory() {
    let db_dir = TempDir::new().unwrap();
    seed_directory(&db_dir);

    folio_cmd(&db_dir)
        .arg("search")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mina K"))
        .stdout(predicate::str::contains("(browse)"));
}

#[test]
fn test_search_json_output() {
    let db_dir = TempDir::new().unwrap();
    seed_directory(&db_dir);

    let output = folio_cmd(&db_dir)
        .arg("search")
        .arg("--kind")
        .arg("profiles")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["total_count"], 2);
    assert_eq!(response["results"][0]["type"], "profile");
}

#[test]
fn test_projects_browse_featured() {
    let db_dir = TempDir::new().unwrap();
    seed_directory(&db_dir);

    folio_cmd(&db_dir)
        .arg("projects")
        .arg("--sort")
        .arg("featured")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synth Garden"));
}

#[test]
fn test_seed_unknown_owner_fails() {
    let db_dir = TempDir::new().unwrap();
    let seed_path = db_dir.path().join("bad.json");
    fs::write(
        &seed_path,
        r#"{"projects":[{"owner":"ghost","name":"X","slug":"x"}]}"#,
    )
    .unwrap();

    folio_cmd(&db_dir)
        .arg("seed")
        .arg(&seed_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_search_pagination() {
    let db_dir = TempDir::new().unwrap();
    seed_directory(&db_dir);

    let output = folio_cmd(&db_dir)
        .arg("search")
        .arg("--kind")
        .arg("profiles")
        .arg("-n")
        .arg("1")
        .arg("--page")
        .arg("2")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["total_count"], 2);
    assert_eq!(response["results"].as_array().unwrap().len(), 1);
    assert_eq!(response["results"][0]["rank"], 2);
}
