/// In-memory chain state behind a mutex
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

pub type SharedState = Arc<Mutex<ChainState>>;

/// One entry of the append-only memo ledger.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub sender: String,
    pub receiver: String,
    pub amount_wei: u128,
    pub message: String,
    pub keyword: String,
    pub timestamp: u64,
}

#[derive(Debug, Default)]
pub struct ChainState {
    /// Accounts the mock wallet has granted to the application
    pub authorized: Vec<String>,
    /// Accounts handed out by the next authorization request
    pub wallet_accounts: Vec<String>,
    /// Simulate the user declining the authorization prompt
    pub reject_connect: bool,
    /// Confirm transactions immediately instead of waiting for /mine
    pub auto_confirm: bool,
    pub ledger: Vec<LedgerEntry>,
    pub tx_confirmed: HashMap<String, bool>,
    nonce: u64,
}

impl ChainState {
    pub fn new(wallet_accounts: Vec<String>) -> Self {
        Self {
            wallet_accounts,
            auto_confirm: true,
            ..Default::default()
        }
    }

    pub fn shared(wallet_accounts: Vec<String>) -> SharedState {
        Arc::new(Mutex::new(Self::new(wallet_accounts)))
    }

    /// Record a transaction and return its hash.
    pub fn register_tx(&mut self, from: &str, to: &str, value_wei: u128) -> String {
        self.nonce += 1;
        let mut hasher = Sha256::new();
        hasher.update(from.as_bytes());
        hasher.update(to.as_bytes());
        hasher.update(value_wei.to_be_bytes());
        hasher.update(self.nonce.to_be_bytes());
        let tx_hash = format!("0x{}", hex::encode(hasher.finalize()));

        self.tx_confirmed.insert(tx_hash.clone(), self.auto_confirm);
        tx_hash
    }

    /// Confirm every pending transaction. Returns how many were confirmed.
    pub fn mine(&mut self) -> usize {
        let mut confirmed = 0;
        for status in self.tx_confirmed.values_mut() {
            if !*status {
                *status = true;
                confirmed += 1;
            }
        }
        confirmed
    }
}
