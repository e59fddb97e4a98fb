//! BridgeWatch Compliance Engine
//!
//! Layer 2 of the screening pipeline: classify a transfer from its sanction
//! verdict and an externally supplied risk score, then record the decision
//! exactly once.
//!
//! ## Decision flow
//!
//! ```text
//! sanction verdict ─┐
//!                   ├─► classify(policy) ─► DecisionTier ─► DecisionLedger (append-only)
//! risk score ───────┘        │                                   │
//!                     ThresholdPolicy                   EngineEvent::DecisionRecorded
//! ```
//!
//! ## Key Components
//!
//! - [`config::ThresholdPolicy`] - Validated flag/block cutoffs
//! - [`decision::DecisionTier`] - Ordered outcome `Approved < Flagged < Blocked`
//! - [`ledger::DecisionLedger`] - Append-only record store keyed by transfer id
//! - [`engine::ComplianceDecisionEngine`] - Main orchestrator

pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;

pub use config::ThresholdPolicy;
pub use decision::{classify, DecisionRecord, DecisionTier};
pub use engine::{ComplianceDecisionEngine, ScreeningRequest};
pub use error::{ComplianceError, ComplianceResult};
pub use event::EngineEvent;
pub use ledger::DecisionLedger;
