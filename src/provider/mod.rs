/// Wallet provider boundary
///
/// The external wallet (browser extension or node gateway) is injected as an
/// explicit dependency so the session logic can run against a test double.
pub mod gateway;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SessionError;

/// Payload of an accounts-changed notification: the provider's authoritative
/// current account list. Empty means disconnected.
pub type AccountsChanged = Vec<String>;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Interactive authorization request. May be rejected by the user.
    async fn request_accounts(&self) -> Result<Vec<String>, SessionError>;

    /// Silent query for accounts already authorized in a previous session.
    async fn authorized_accounts(&self) -> Result<Vec<String>, SessionError>;

    /// Send a raw value transfer. Returns the transaction hash.
    async fn send_transfer(
        &self,
        from: &str,
        to: &str,
        value_wei: u128,
        gas_limit: u64,
    ) -> Result<String, SessionError>;

    /// Subscribe to accounts-changed notifications. The session registers
    /// exactly one subscription for its lifetime.
    fn subscribe_accounts_changed(&self) -> mpsc::UnboundedReceiver<AccountsChanged>;
}

pub use gateway::GatewayProvider;
