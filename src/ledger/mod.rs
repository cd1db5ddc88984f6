/// Ledger contract boundary
///
/// The on-chain append-only transaction list, injected alongside the wallet
/// provider so it can be mocked in tests.
pub mod gateway;
pub mod records;

use async_trait::async_trait;

use crate::error::SessionError;
use records::RawRecord;

/// Confirmable handle returned by an append.
#[derive(Debug, Clone)]
pub struct PendingAppend {
    pub tx_hash: String,
}

#[async_trait]
pub trait LedgerContract: Send + Sync {
    /// Append a record to the ledger. Returns a handle that can be awaited
    /// for confirmation.
    async fn append(
        &self,
        from: &str,
        to: &str,
        amount_wei: u128,
        message: &str,
        keyword: &str,
    ) -> Result<PendingAppend, SessionError>;

    /// Resolve once the appended record is confirmed on-chain. The caller is
    /// responsible for applying a deadline.
    async fn wait_confirmed(&self, pending: &PendingAppend) -> Result<(), SessionError>;

    /// Fetch the full raw record list. O(n) in ledger size.
    async fn all_records(&self) -> Result<Vec<RawRecord>, SessionError>;

    /// Current number of ledger entries.
    async fn record_count(&self) -> Result<u64, SessionError>;
}

pub use gateway::GatewayLedger;
pub use records::{RawScalar, TransactionRecord};
