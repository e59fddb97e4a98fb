//! BridgeWatch CLI - Main entry point

use bridgewatch_compliance::ThresholdPolicy;
use bridgewatch_rpc::{commands, AppConfig, AppContext};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bridgewatch")]
#[command(about = "BridgeWatch - cross-chain compliance screening", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, env = "BRIDGEWATCH_DATA_DIR", default_value = "./data")]
    data: PathBuf,

    /// Optional JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the system with an administrator
    Init {
        /// Administrator address (0x-prefixed, 20 bytes)
        #[arg(long)]
        admin: String,
        /// Flag threshold (defaults to config)
        #[arg(long)]
        flag: Option<u8>,
        /// Block threshold (defaults to config)
        #[arg(long)]
        block: Option<u8>,
    },

    /// Publish a new sanctions commitment root
    CommitRoot {
        /// Caller address
        #[arg(long)]
        caller: String,
        /// New root (32-byte hex)
        root: String,
    },

    /// Build a commitment tree from identities (offline)
    BuildRoot {
        /// Identity addresses
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Print the leaf hash of an identity (offline)
    Leaf {
        identity: String,
    },

    /// Verify an identity against the current root
    Check {
        identity: String,
        /// Proof element (repeatable)
        #[arg(long)]
        proof: Vec<String>,
        /// Journal the observation events
        #[arg(long)]
        report: bool,
    },

    /// Record a decision with a precomputed sanction verdict
    Record {
        /// Transfer id (32-byte hex or free-form label)
        #[arg(long)]
        id: String,
        #[arg(long)]
        sender: String,
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        score: u8,
        #[arg(long)]
        sanctioned: bool,
    },

    /// Screen a transfer against the registry and record the decision
    Screen {
        #[arg(long)]
        id: String,
        #[arg(long)]
        sender: String,
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        score: u8,
        /// Sender proof element (repeatable)
        #[arg(long)]
        sender_proof: Vec<String>,
        /// Recipient proof element (repeatable)
        #[arg(long)]
        recipient_proof: Vec<String>,
    },

    /// Update the threshold policy
    Thresholds {
        #[arg(long)]
        caller: String,
        flag: u8,
        block: u8,
    },

    /// Show a recorded decision
    Get {
        id: String,
    },

    /// Show system status
    Status,

    /// Audit the journal (verify hash chain and signatures, offline)
    Audit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Offline commands need no context
    match &cli.command {
        Commands::BuildRoot { addresses } => return commands::build_root(addresses),
        Commands::Leaf { identity } => return commands::leaf(identity),
        Commands::Audit => {
            if !commands::audit(&cli.data, &config)? {
                std::process::exit(1);
            }
            return Ok(());
        }
        _ => {}
    }

    let mut ctx = AppContext::open(&cli.data, &config)?;

    match cli.command {
        Commands::Init { admin, flag, block } => {
            let policy = match (flag, block) {
                (None, None) => config.initial_policy,
                (flag, block) => ThresholdPolicy::new(
                    flag.unwrap_or(config.initial_policy.flag_threshold()),
                    block.unwrap_or(config.initial_policy.block_threshold()),
                )?,
            };
            commands::init(&mut ctx, &admin, policy)?;
        }

        Commands::CommitRoot { caller, root } => {
            commands::commit_root(&mut ctx, &caller, &root)?;
        }

        Commands::Check {
            identity,
            proof,
            report,
        } => {
            commands::check(&mut ctx, &identity, &proof, report)?;
        }

        Commands::Record {
            id,
            sender,
            recipient,
            score,
            sanctioned,
        } => {
            commands::record(&mut ctx, &id, &sender, &recipient, score, sanctioned)?;
        }

        Commands::Screen {
            id,
            sender,
            recipient,
            score,
            sender_proof,
            recipient_proof,
        } => {
            commands::screen(
                &mut ctx,
                &id,
                &sender,
                &recipient,
                score,
                &sender_proof,
                &recipient_proof,
            )?;
        }

        Commands::Thresholds {
            caller,
            flag,
            block,
        } => {
            commands::thresholds(&mut ctx, &caller, flag, block)?;
        }

        Commands::Get { id } => {
            commands::get(&ctx, &id)?;
        }

        Commands::Status => {
            commands::status(&ctx)?;
        }

        Commands::BuildRoot { .. } | Commands::Leaf { .. } | Commands::Audit => {}
    }

    Ok(())
}
