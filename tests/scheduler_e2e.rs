//! Full runs through the real subprocess extractor, driven against a
//! shell-script stand-in for Bandizip.
#![cfg(unix)]

mod common;

use autounpack::scheduler::NullObserver;
use autounpack::{EngineKind, ExtractionConfig, JobScheduler, OutputMode, RunPhase, RunRequest, RunStatistics};
use common::{fake_engine, locked_archive, plain_archive};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn config(engine: &Path, mode: OutputMode, delete_source: bool) -> ExtractionConfig {
    ExtractionConfig {
        engine_kind: EngineKind::Bandizip,
        engine_executable_path: engine.to_path_buf(),
        output_mode: mode,
        custom_output_path: None,
        delete_source_on_success: delete_source,
        max_workers: 2,
    }
}

#[tokio::test]
async fn hint_file_password_unlocks_encrypted_archive() {
    let engine = fake_engine("fake-bandizip-e2e.sh");
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    plain_archive(&root.join("a.zip"));
    locked_archive(&root.join("b.rar"), "secret");
    fs::write(root.join("note.txt"), "密码: secret\n").unwrap();

    let scheduler = JobScheduler::new(Arc::new(NullObserver));
    let outcome = scheduler
        .run(RunRequest {
            source_dir: root.to_path_buf(),
            manual_passwords: String::new(),
            config: config(&engine, OutputMode::CurrentSmart, false),
        })
        .await;

    assert_eq!(
        outcome.stats,
        RunStatistics {
            success: 2,
            fail: 0,
            total: 2
        }
    );
    assert!(!outcome.aborted);
    assert_eq!(outcome.phase, RunPhase::Completed);
    assert!(outcome.passwords.iter().any(|p| p == "secret"));

    assert!(root.join("a").join("a.zip.extracted").exists());
    assert!(root.join("b").join("b.rar.extracted").exists());
    assert!(root.join("b.rar").exists(), "sources kept by default");
}

#[tokio::test]
async fn wrong_passwords_fail_and_only_primary_volume_is_deleted() {
    let engine = fake_engine("fake-bandizip-e2e.sh");
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let nested = root.join("season1");
    fs::create_dir(&nested).unwrap();

    locked_archive(&root.join("c.7z"), "other");
    plain_archive(&nested.join("d.part1.rar"));
    plain_archive(&nested.join("d.part2.rar"));

    let scheduler = JobScheduler::new(Arc::new(NullObserver));
    let outcome = scheduler
        .run(RunRequest {
            source_dir: root.to_path_buf(),
            manual_passwords: "nope also-wrong".to_string(),
            config: config(&engine, OutputMode::CurrentFlat, true),
        })
        .await;

    assert_eq!(outcome.stats.total, 2);
    assert_eq!(outcome.stats.success, 1);
    assert_eq!(outcome.stats.fail, 1);
    assert_eq!(outcome.passwords, vec!["nope", "also-wrong"]);

    assert!(nested.join("d.part1.rar.extracted").exists());
    assert!(!nested.join("d.part1.rar").exists());
    assert!(nested.join("d.part2.rar").exists());
    assert!(root.join("c.7z").exists());
}
