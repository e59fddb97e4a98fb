//! Integration tests for BridgeWatch
//!
//! These tests drive the application context end to end: registry,
//! decision engine, journal and replay.

use bridgewatch_compliance::{ComplianceError, DecisionTier, ScreeningRequest, ThresholdPolicy};
use bridgewatch_core::{Address, Hash32, TransferId};
use bridgewatch_journal::{calculate_entry_hash, verify_chain, JournalEvent, JournalReader};
use bridgewatch_rpc::{audit_journal, AppConfig, AppContext, ContextError};
use bridgewatch_sanctions::{RegistryError, SanctionsTree};
use tempfile::TempDir;

fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

fn admin() -> Address {
    addr(0xad)
}

fn open(dir: &TempDir) -> AppContext {
    AppContext::open(dir.path(), &AppConfig::default()).unwrap()
}

fn initialized(dir: &TempDir) -> AppContext {
    let mut ctx = open(dir);
    ctx.initialize(admin(), ThresholdPolicy::default()).unwrap();
    ctx
}

/// Test: init → commit root → screen clean/flagged/sanctioned → status
#[test]
fn test_full_workflow() {
    let dir = TempDir::new().unwrap();
    let mut ctx = open(&dir);

    // 1. System should not be initialized
    assert!(!ctx.is_initialized());

    // 2. Initialize
    ctx.initialize(admin(), ThresholdPolicy::default()).unwrap();
    assert!(ctx.is_initialized());
    assert_eq!(ctx.last_sequence(), 1);

    // 3. Publish a sanctions list of three identities
    let sanctioned = [addr(0xb1), addr(0xb2), addr(0xb3)];
    let tree = SanctionsTree::new(&sanctioned);
    ctx.update_commitment(&admin(), tree.root()).unwrap();
    assert_eq!(ctx.last_sequence(), 2);

    // 4. Clean transfer
    let clean = ctx
        .screen(ScreeningRequest {
            transfer_id: TransferId::from_label("tx-clean"),
            sender: addr(1),
            recipient: addr(2),
            risk_score: 25,
            sender_proof: vec![],
            recipient_proof: vec![],
        })
        .unwrap();
    assert_eq!(clean.value, DecisionTier::Approved);

    // 5. Medium risk transfer
    let flagged = ctx
        .screen(ScreeningRequest {
            transfer_id: TransferId::from_label("tx-flag"),
            sender: addr(1),
            recipient: addr(2),
            risk_score: 55,
            sender_proof: vec![],
            recipient_proof: vec![],
        })
        .unwrap();
    assert_eq!(flagged.value, DecisionTier::Flagged);

    // 6. Low score but recipient is sanctioned
    let target = sanctioned[1];
    let blocked = ctx
        .screen(ScreeningRequest {
            transfer_id: TransferId::from_label("tx-sanctioned"),
            sender: addr(1),
            recipient: target,
            risk_score: 10,
            sender_proof: vec![],
            recipient_proof: tree.proof(&target).unwrap(),
        })
        .unwrap();
    assert_eq!(blocked.value, DecisionTier::Blocked);

    let record = ctx
        .get_record(&TransferId::from_label("tx-sanctioned"))
        .unwrap();
    assert!(record.sanctioned);
    assert_eq!(record.recipient, target);

    // 7. Status
    let status = ctx.status().unwrap();
    assert_eq!(status.root, tree.root());
    assert!(status.last_updated.is_some());
    assert_eq!(status.total_decisions, 3);
    assert_eq!(status.journal_sequence, 5);
    assert_eq!(ctx.audit().unwrap(), 5);
}

/// Test: state survives a restart via journal replay
#[test]
fn test_replay_after_restart() {
    let dir = TempDir::new().unwrap();
    let tree = SanctionsTree::new(&[addr(0xb1), addr(0xb2)]);

    {
        let mut ctx = initialized(&dir);
        ctx.update_commitment(&admin(), tree.root()).unwrap();
        ctx.update_thresholds(&admin(), 30, 70).unwrap();
        ctx.record_decision(TransferId::from_label("a"), addr(1), addr(2), 35, false)
            .unwrap();
        ctx.record_decision(TransferId::from_label("b"), addr(1), addr(2), 75, false)
            .unwrap();
    }

    let mut ctx = open(&dir);
    assert!(ctx.is_initialized());
    assert_eq!(ctx.last_sequence(), 5);

    let status = ctx.status().unwrap();
    assert_eq!(status.root, tree.root());
    assert_eq!(status.flag_threshold, 30);
    assert_eq!(status.block_threshold, 70);
    assert_eq!(status.total_decisions, 2);

    assert_eq!(
        ctx.get_record(&TransferId::from_label("a")).unwrap().tier,
        DecisionTier::Flagged
    );
    assert_eq!(
        ctx.get_record(&TransferId::from_label("b")).unwrap().tier,
        DecisionTier::Blocked
    );

    // Replayed ledger still refuses duplicates
    let result = ctx.record_decision(TransferId::from_label("a"), addr(1), addr(2), 0, false);
    assert!(matches!(
        result,
        Err(ContextError::Compliance(ComplianceError::DuplicateRecord(_)))
    ));

    // And the journal keeps chaining after reopen
    ctx.record_decision(TransferId::from_label("c"), addr(1), addr(2), 0, false)
        .unwrap();
    assert_eq!(ctx.audit().unwrap(), 6);
}

/// Test: unauthorized and invalid updates leave state and journal unchanged
#[test]
fn test_rejected_updates_have_no_effect() {
    let dir = TempDir::new().unwrap();
    let mut ctx = initialized(&dir);
    let before = ctx.status().unwrap();

    let intruder = addr(0x66);
    assert!(matches!(
        ctx.update_commitment(&intruder, Hash32::new([7; 32])),
        Err(ContextError::Registry(RegistryError::Unauthorized { .. }))
    ));
    assert!(matches!(
        ctx.update_thresholds(&intruder, 10, 20),
        Err(ContextError::Compliance(ComplianceError::Unauthorized { .. }))
    ));
    assert!(matches!(
        ctx.update_thresholds(&admin(), 50, 50),
        Err(ContextError::Compliance(ComplianceError::InvalidThreshold { .. }))
    ));
    assert!(matches!(
        ctx.update_thresholds(&admin(), 50, 101),
        Err(ContextError::Compliance(ComplianceError::InvalidThreshold { .. }))
    ));

    assert_eq!(ctx.status().unwrap(), before);
}

/// Test: missing records and duplicate screening
#[test]
fn test_lookup_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let mut ctx = initialized(&dir);

    let missing = TransferId::from_label("missing");
    assert!(matches!(
        ctx.get_record(&missing),
        Err(ContextError::Compliance(ComplianceError::NotFound(_)))
    ));

    let request = ScreeningRequest {
        transfer_id: TransferId::from_label("dup"),
        sender: addr(1),
        recipient: addr(2),
        risk_score: 90,
        sender_proof: vec![],
        recipient_proof: vec![],
    };
    ctx.screen(request.clone()).unwrap();

    let sequence = ctx.last_sequence();
    assert!(ctx.screen(request).is_err());
    assert_eq!(ctx.last_sequence(), sequence);
    assert_eq!(ctx.total_decisions().unwrap(), 1);
}

/// Test: check_and_report journals observations without changing state
#[test]
fn test_check_and_report_events() {
    let dir = TempDir::new().unwrap();
    let mut ctx = initialized(&dir);

    let members = [addr(0xb1), addr(0xb2), addr(0xb3), addr(0xb4)];
    let tree = SanctionsTree::new(&members);
    ctx.update_commitment(&admin(), tree.root()).unwrap();

    let proof = tree.proof(&members[0]).unwrap();
    let hit = ctx.check_and_report(&members[0], &proof).unwrap();
    assert!(hit.value);
    assert_eq!(hit.events.len(), 2);

    let miss = ctx.check_and_report(&addr(1), &proof).unwrap();
    assert!(!miss.value);
    assert_eq!(miss.events.len(), 1);

    let entries = JournalReader::from_path(ctx.journal_path())
        .read_all()
        .unwrap();
    verify_chain(&entries).unwrap();
    assert_eq!(entries.len(), 5);
    assert!(entries[2..]
        .iter()
        .all(|e| matches!(e.event, JournalEvent::Registry(_))));

    assert_eq!(ctx.status().unwrap().total_decisions, 0);
}

/// Test: a tampered journal refuses to open
#[test]
fn test_tampered_journal_rejected() {
    let dir = TempDir::new().unwrap();
    let journal_path = {
        let mut ctx = initialized(&dir);
        ctx.record_decision(TransferId::from_label("a"), addr(1), addr(2), 10, false)
            .unwrap();
        ctx.journal_path().to_path_buf()
    };

    let content = std::fs::read_to_string(&journal_path).unwrap();
    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    let mut entry: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    entry["timestamp"] = serde_json::json!("2020-01-01T00:00:00Z");
    lines[0] = entry.to_string();
    std::fs::write(&journal_path, lines.join("\n") + "\n").unwrap();

    let result = AppContext::open(dir.path(), &AppConfig::default());
    assert!(matches!(result, Err(ContextError::Journal(_))));
}

/// Test: custom journal file name from config
#[test]
fn test_config_journal_file() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        journal_file: "audit.jsonl".to_string(),
        ..AppConfig::default()
    };

    let mut ctx = AppContext::open(dir.path(), &config).unwrap();
    ctx.initialize(admin(), config.initial_policy).unwrap();

    assert!(dir.path().join("audit.jsonl").exists());
    assert!(!dir.path().join("journal.jsonl").exists());
}

/// Test: two writers on one data directory cannot both record an id
#[test]
fn test_concurrent_writer_rejected() {
    let dir = TempDir::new().unwrap();
    let mut a = initialized(&dir);

    // Second context on the same directory is refused while `a` is open
    assert!(matches!(
        AppContext::open(dir.path(), &AppConfig::default()),
        Err(ContextError::Locked(_))
    ));

    let id = TransferId::from_label("contended");
    assert_eq!(
        a.record_decision(id, addr(1), addr(2), 10, false).unwrap().value,
        DecisionTier::Approved
    );
    drop(a);

    // Once released, the next writer sees the recorded id
    let mut b = open(&dir);
    assert!(matches!(
        b.record_decision(id, addr(1), addr(2), 95, false),
        Err(ContextError::Compliance(ComplianceError::DuplicateRecord(_)))
    ));
    assert_eq!(b.get_record(&id).unwrap().tier, DecisionTier::Approved);
    assert_eq!(b.audit().unwrap(), 2);
}

/// Test: rewriting a decision and recomputing the chain is still detected
#[test]
fn test_rehashed_journal_rejected() {
    let dir = TempDir::new().unwrap();
    let journal_path = {
        let mut ctx = initialized(&dir);
        ctx.record_decision(TransferId::from_label("a"), addr(1), addr(2), 95, false)
            .unwrap();
        ctx.record_decision(TransferId::from_label("b"), addr(1), addr(2), 10, false)
            .unwrap();
        ctx.journal_path().to_path_buf()
    };

    // Downgrade the first decision to APPROVED and re-link every later entry
    let mut entries = JournalReader::from_path(&journal_path).read_all().unwrap();
    let mut edited: serde_json::Value = serde_json::to_value(&entries[1].event).unwrap();
    edited["event"]["record"]["risk_score"] = serde_json::json!(5);
    edited["event"]["record"]["tier"] = serde_json::json!("approved");
    entries[1].event = serde_json::from_value(edited).unwrap();
    for i in 1..entries.len() {
        entries[i].prev_hash = entries[i - 1].hash.clone();
        entries[i].hash = calculate_entry_hash(&entries[i]).unwrap();
    }
    verify_chain(&entries).unwrap();

    let lines: Vec<String> = entries
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    std::fs::write(&journal_path, lines.join("\n") + "\n").unwrap();

    assert!(matches!(
        AppContext::open(dir.path(), &AppConfig::default()),
        Err(ContextError::Journal(_))
    ));
    assert!(audit_journal(dir.path(), &AppConfig::default()).is_err());
}

/// Test: offline audit works without taking the lock
#[test]
fn test_offline_audit_while_open() {
    let dir = TempDir::new().unwrap();
    let ctx = initialized(&dir);

    assert_eq!(audit_journal(dir.path(), &AppConfig::default()).unwrap(), 1);
    assert_eq!(ctx.last_sequence(), 1);
}
