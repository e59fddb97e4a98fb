//! BridgeWatch RPC - application context and CLI commands

pub mod commands;
pub mod config;
pub mod context;

pub use config::AppConfig;
pub use context::{audit_journal, AppContext, ContextError, ContextResult, Status};
