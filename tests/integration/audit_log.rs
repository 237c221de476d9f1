use crate::fixtures::*;
use keyunlock_core::domain::{KeyId, Passphrase};
use keyunlock_core::infrastructure::keys::FileAuditLogger;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn audit_log_records_attempts_and_cache_events_without_passphrases() {
    let temp_dir = TempDir::new().expect("test setup: temp dir");
    let path = temp_dir.path().join("unlock-audit.log");
    let (orchestrator, _clock) = orchestrator_with([KeyRingFixture::default().build()]);
    let orchestrator = orchestrator.with_audit_logger(Arc::new(FileAuditLogger::new(&path).expect("audit logger")));

    orchestrator.unlock_or_prompt(TEST_MASTER_ID).await.expect("prompt");
    orchestrator.submit_passphrase(TEST_MASTER_ID, Passphrase::from(TEST_WRONG_PASSPHRASE)).await.expect("wrong");
    orchestrator.submit_passphrase(TEST_MASTER_ID, Passphrase::from(TEST_PASSPHRASE)).await.expect("right");
    orchestrator.submit_passphrase(KeyId::Symmetric, Passphrase::from("symmetric-secret")).await.expect("symmetric");
    orchestrator.lock_all().await;

    let content = std::fs::read_to_string(&path).expect("read audit log");
    let events: Vec<serde_json::Value> = content.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();

    let results: Vec<&str> = events
        .iter()
        .filter(|e| e["event_type"] == "unlock_attempt")
        .filter_map(|e| e["event"]["result"]["result"].as_str())
        .collect();
    assert_eq!(results, vec!["wrong_passphrase", "unlocked", "symmetric"]);

    let operations: Vec<&str> =
        events.iter().filter(|e| e["event_type"] == "cache").filter_map(|e| e["event"]["operation"].as_str()).collect();
    assert_eq!(operations, vec!["miss", "put", "put", "invalidate_all"]);

    assert!(!content.contains(TEST_PASSPHRASE));
    assert!(!content.contains(TEST_WRONG_PASSPHRASE));
    assert!(!content.contains("symmetric-secret"));
}
