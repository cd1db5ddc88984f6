/// Service configuration from environment variables
///
/// Controls the node gateway endpoint, the memo contract address, and the
/// submission/confirmation parameters. Defaults target a local chain-mock.
use std::env;
use std::time::Duration;

/// Default gas limit for a plain value transfer (0x5208).
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

#[derive(Clone, Debug)]
pub struct Config {
    /// Node gateway base URL (wallet + contract endpoints)
    pub gateway_url: String,
    /// Deployed memo contract address
    pub contract_address: String,
    /// Gas limit attached to value transfers
    pub gas_limit: u64,
    /// Deadline for awaiting on-chain confirmation
    pub confirmation_timeout: Duration,
    /// Poll interval for confirmation and accounts-changed detection
    pub poll_interval: Duration,
    /// Base directory for persisted preferences
    pub data_dir: String,
    /// Bind address of the HTTP API server
    pub bind_address: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `GATEWAY_URL`: node gateway endpoint (default `http://localhost:8545`)
    /// - `CONTRACT_ADDRESS`: memo contract address
    /// - `GAS_LIMIT`: gas attached to transfers (default 21000)
    /// - `CONFIRMATION_TIMEOUT_SECS`: confirmation deadline (default 120)
    /// - `POLL_INTERVAL_MS`: gateway polling interval (default 500)
    /// - `DATA_DIR`: preferences directory (default `./data`)
    /// - `BIND_ADDRESS`: API bind address (default `0.0.0.0:4000`)
    pub fn from_env() -> Self {
        let gateway_url =
            env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8545".to_string());
        log::info!("Node gateway: {}", gateway_url);

        let contract_address = env::var("CONTRACT_ADDRESS")
            .unwrap_or_else(|_| "0x131E5339E3127B2Df20fe04157d4072dCc12F898".to_string());
        log::info!("Memo contract: {}", contract_address);

        let gas_limit = env::var("GAS_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(TRANSFER_GAS_LIMIT);

        let confirmation_timeout_secs = env::var("CONFIRMATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(120);

        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(500);

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:4000".to_string());

        Self {
            gateway_url,
            contract_address,
            gas_limit,
            confirmation_timeout: Duration::from_secs(confirmation_timeout_secs),
            poll_interval: Duration::from_millis(poll_interval_ms),
            data_dir,
            bind_address,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8545".to_string(),
            contract_address: "0x131E5339E3127B2Df20fe04157d4072dCc12F898".to_string(),
            gas_limit: TRANSFER_GAS_LIMIT,
            confirmation_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(500),
            data_dir: "./data".to_string(),
            bind_address: "0.0.0.0:4000".to_string(),
        }
    }
}
