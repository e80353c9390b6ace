//! Configuration for the notary engine
//!
//! CLI arguments and environment variable handling using clap.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::chain::units::parse_native;
use crate::service::PipelineConfig;
use crate::types::{NotaryError, Result};

/// EquiChain notary - anchors welfare claim verdicts on a public ledger
#[derive(Parser, Debug, Clone)]
#[command(name = "equichain-notary")]
#[command(about = "Eligibility notarization engine for welfare scheme claims")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8085")]
    pub listen: SocketAddr,

    /// Ledger node JSON-RPC endpoint
    #[arg(long, env = "LEDGER_RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: String,

    /// Hex-encoded signing key for the notarization account (required).
    /// Accepted with or without the 0x prefix.
    #[arg(long, env = "SIGNING_KEY", hide_env_values = true)]
    pub signing_key: Option<String>,

    /// Path to the claim ledger database
    #[arg(long, env = "CLAIM_DB", default_value = "claims.db")]
    pub claim_db: PathBuf,

    /// Path to the trusted identity record dataset (JSON)
    #[arg(long, env = "TRUSTED_RECORDS", default_value = "data/trusted_records.json")]
    pub trusted_records: PathBuf,

    /// Minimum account balance, in native units, required before a
    /// submission is attempted
    #[arg(long, env = "FUNDS_FLOOR", default_value = "0.01")]
    pub funds_floor: String,

    /// How long to wait for transaction confirmation, in seconds
    #[arg(long, env = "CONFIRM_TIMEOUT_SECS", default_value = "180")]
    pub confirm_timeout_secs: u64,

    /// Delay between confirmation polls, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value = "2000")]
    pub poll_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.signing_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(NotaryError::Config(
                "SIGNING_KEY is required".to_string(),
            ));
        }

        parse_native(&self.funds_floor).map_err(|e| {
            NotaryError::Config(format!("FUNDS_FLOOR is not a valid amount: {}", e))
        })?;

        if self.poll_interval_ms == 0 {
            return Err(NotaryError::Config(
                "POLL_INTERVAL_MS must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Funds floor in base units
    pub fn funds_floor_base(&self) -> Result<u128> {
        parse_native(&self.funds_floor)
    }

    /// Pipeline tunables derived from the arguments
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig {
            funds_floor: self.funds_floor_base()?,
            confirm_timeout: Duration::from_secs(self.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}
