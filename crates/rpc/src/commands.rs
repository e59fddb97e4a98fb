//! CLI commands

use bridgewatch_compliance::{ComplianceResult, ScreeningRequest, ThresholdPolicy};
use bridgewatch_core::{Address, Hash32, TransferId};
use bridgewatch_sanctions::{compute_leaf, parse_proof, SanctionsTree};
use std::path::Path;

use crate::config::AppConfig;
use crate::context::{audit_journal, AppContext};

/// Parse a transfer id.
///
/// `0x`-prefixed input must be a 32-byte hash (`MalformedInput` otherwise).
/// Unprefixed input is taken as a hash when it is one, and hashed as a
/// label when it is not.
pub fn parse_transfer_id(raw: &str) -> ComplianceResult<TransferId> {
    let trimmed = raw.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        return Ok(trimmed.parse::<TransferId>()?);
    }

    Ok(trimmed
        .parse()
        .unwrap_or_else(|_| TransferId::from_label(raw)))
}

/// Initialize the system with an administrator and policy
pub fn init(
    ctx: &mut AppContext,
    admin: &str,
    policy: ThresholdPolicy,
) -> Result<(), anyhow::Error> {
    if ctx.is_initialized() {
        anyhow::bail!("System already initialized (sequence = {})", ctx.last_sequence());
    }

    let admin: Address = admin.parse()?;
    let entry = ctx.initialize(admin, policy)?;

    println!(
        "✅ System initialized (admin: {}, flag: {}, block: {}, seq: {})",
        admin,
        policy.flag_threshold(),
        policy.block_threshold(),
        entry.sequence
    );
    Ok(())
}

/// Publish a new sanctions commitment root
pub fn commit_root(ctx: &mut AppContext, caller: &str, root: &str) -> Result<(), anyhow::Error> {
    let caller: Address = caller.parse()?;
    let root: Hash32 = root.parse()?;

    let emitted = ctx.update_commitment(&caller, root)?;
    let seq = emitted.events.last().map_or(0, |e| e.sequence);

    println!("✅ Commitment root updated to {} (seq: {})", root, seq);
    Ok(())
}

/// Build a tree from a list of identities and print its root and proofs
pub fn build_root(addresses: &[String]) -> Result<(), anyhow::Error> {
    let identities = addresses
        .iter()
        .map(|a| a.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;
    let tree = SanctionsTree::new(&identities);

    println!("Root: {}", tree.root());
    println!("Identities: {} (depth {})", tree.len(), tree.depth());
    for identity in &identities {
        let proof = tree.proof(identity).unwrap_or_default();
        let proof: Vec<String> = proof.iter().map(ToString::to_string).collect();
        println!("  {} proof=[{}]", identity, proof.join(","));
    }
    Ok(())
}

/// Print the leaf for an identity
pub fn leaf(identity: &str) -> Result<(), anyhow::Error> {
    let identity: Address = identity.parse()?;
    println!("{}", compute_leaf(&identity));
    Ok(())
}

/// Verify membership; with `report`, journal the observation
pub fn check(
    ctx: &mut AppContext,
    identity: &str,
    proof: &[String],
    report: bool,
) -> Result<(), anyhow::Error> {
    let identity: Address = identity.parse()?;
    let proof = parse_proof(proof)?;

    let sanctioned = if report {
        let emitted = ctx.check_and_report(&identity, &proof)?;
        let seq = emitted.events.last().map_or(0, |e| e.sequence);
        println!("   Reported ({} events, seq: {})", emitted.events.len(), seq);
        emitted.value
    } else {
        ctx.verify_membership(&identity, &proof)?
    };

    if sanctioned {
        println!("🚫 {} is SANCTIONED", identity);
    } else {
        println!("✅ {} is not on the sanctions list", identity);
    }
    Ok(())
}

/// Record a decision with a precomputed sanction verdict
pub fn record(
    ctx: &mut AppContext,
    transfer_id: &str,
    sender: &str,
    recipient: &str,
    risk_score: u8,
    sanctioned: bool,
) -> Result<(), anyhow::Error> {
    let transfer_id = parse_transfer_id(transfer_id)?;
    let emitted = ctx.record_decision(
        transfer_id,
        sender.parse::<Address>()?,
        recipient.parse::<Address>()?,
        risk_score,
        sanctioned,
    )?;
    let seq = emitted.events.last().map_or(0, |e| e.sequence);

    println!("✅ Transfer {} → {} (seq: {})", transfer_id, emitted.value, seq);
    Ok(())
}

/// Screen a transfer against the registry and record the decision
#[allow(clippy::too_many_arguments)]
pub fn screen(
    ctx: &mut AppContext,
    transfer_id: &str,
    sender: &str,
    recipient: &str,
    risk_score: u8,
    sender_proof: &[String],
    recipient_proof: &[String],
) -> Result<(), anyhow::Error> {
    let request = ScreeningRequest {
        transfer_id: parse_transfer_id(transfer_id)?,
        sender: sender.parse::<Address>()?,
        recipient: recipient.parse::<Address>()?,
        risk_score,
        sender_proof: parse_proof(sender_proof)?,
        recipient_proof: parse_proof(recipient_proof)?,
    };
    let transfer_id = request.transfer_id;

    let emitted = ctx.screen(request)?;
    let seq = emitted.events.last().map_or(0, |e| e.sequence);

    println!("✅ Transfer {} → {} (seq: {})", transfer_id, emitted.value, seq);
    Ok(())
}

/// Update the threshold policy
pub fn thresholds(
    ctx: &mut AppContext,
    caller: &str,
    flag: u8,
    block: u8,
) -> Result<(), anyhow::Error> {
    let caller: Address = caller.parse()?;
    let emitted = ctx.update_thresholds(&caller, flag, block)?;
    let seq = emitted.events.last().map_or(0, |e| e.sequence);

    println!("✅ Thresholds updated: flag={}, block={} (seq: {})", flag, block, seq);
    Ok(())
}

/// Show a recorded decision
pub fn get(ctx: &AppContext, transfer_id: &str) -> Result<(), anyhow::Error> {
    let record = ctx.get_record(&parse_transfer_id(transfer_id)?)?;
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Show system status
pub fn status(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let status = ctx.status()?;

    println!("📊 BridgeWatch Status");
    println!("   Admin:         {}", status.admin);
    println!("   Root:          {}", status.root);
    match status.last_updated {
        Some(at) => println!("   Last updated:  {}", at.to_rfc3339()),
        None => println!("   Last updated:  never"),
    }
    println!(
        "   Thresholds:    flag={} block={}",
        status.flag_threshold, status.block_threshold
    );
    println!("   Decisions:     {}", status.total_decisions);
    println!("   Journal seq:   {}", status.journal_sequence);
    Ok(())
}

/// Verify the journal hash chain and signatures (offline, no lock taken)
///
/// Returns whether the journal verified.
pub fn audit(data_path: &Path, config: &AppConfig) -> Result<bool, anyhow::Error> {
    match audit_journal(data_path, config) {
        Ok(count) => {
            println!("✅ Hash chain and signatures verified ({} entries)", count);
            Ok(true)
        }
        Err(e) => {
            println!("❌ Journal verification failed: {}", e);
            Ok(false)
        }
    }
}
