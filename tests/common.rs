#![allow(dead_code)]

/// Common test utilities for session integration tests
///
/// Provides in-memory doubles for the wallet provider and the ledger
/// contract, plus a test environment with temp-dir preference storage.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use memopay::error::SessionError;
use memopay::ledger::records::{RawRecord, RawScalar};
use memopay::ledger::{LedgerContract, PendingAppend};
use memopay::provider::{AccountsChanged, WalletProvider};
use memopay::session::WalletSession;
use memopay::storage::PrefsStore;

pub const GAS_LIMIT: u64 = 21_000;

#[derive(Debug, Clone)]
pub struct SentTransfer {
    pub from: String,
    pub to: String,
    pub value_wei: u128,
    pub gas_limit: u64,
}

#[derive(Default)]
pub struct MockProvider {
    pub wallet_accounts: Mutex<Vec<String>>,
    pub authorized: Mutex<Vec<String>>,
    pub reject: AtomicBool,
    pub unavailable: AtomicBool,
    pub fail_send: AtomicBool,
    pub request_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub sent: Mutex<Vec<SentTransfer>>,
    changed_tx: Mutex<Option<mpsc::UnboundedSender<AccountsChanged>>>,
}

impl MockProvider {
    pub fn new(accounts: Vec<&str>) -> Arc<Self> {
        let provider = Self::default();
        *provider.wallet_accounts.lock().unwrap() =
            accounts.into_iter().map(String::from).collect();
        Arc::new(provider)
    }

    pub fn set_wallet_accounts(&self, accounts: Vec<&str>) {
        *self.wallet_accounts.lock().unwrap() = accounts.into_iter().map(String::from).collect();
    }

    pub fn set_authorized(&self, accounts: Vec<&str>) {
        *self.authorized.lock().unwrap() = accounts.into_iter().map(String::from).collect();
    }

    /// Push an accounts-changed notification through the subscription.
    pub fn push_accounts_changed(&self, accounts: Vec<&str>) {
        let payload: Vec<String> = accounts.into_iter().map(String::from).collect();
        let guard = self.changed_tx.lock().unwrap();
        guard
            .as_ref()
            .expect("no accounts-changed subscriber registered")
            .send(payload)
            .expect("accounts-changed receiver dropped");
    }

    pub fn provider_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst) + self.send_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, SessionError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::ProviderUnavailable(
                "no provider injected".to_string(),
            ));
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(SessionError::UserRejected(
                "user declined the prompt".to_string(),
            ));
        }
        let accounts = self.wallet_accounts.lock().unwrap().clone();
        *self.authorized.lock().unwrap() = accounts.clone();
        Ok(accounts)
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, SessionError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::ProviderUnavailable(
                "no provider injected".to_string(),
            ));
        }
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn send_transfer(
        &self,
        from: &str,
        to: &str,
        value_wei: u128,
        gas_limit: u64,
    ) -> Result<String, SessionError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::ProviderUnavailable(
                "no provider injected".to_string(),
            ));
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(SessionError::Submission("wallet rejected".to_string()));
        }
        self.sent.lock().unwrap().push(SentTransfer {
            from: from.to_string(),
            to: to.to_string(),
            value_wei,
            gas_limit,
        });
        Ok(format!("0xsend{:04}", self.send_calls.load(Ordering::SeqCst)))
    }

    fn subscribe_accounts_changed(&self) -> mpsc::UnboundedReceiver<AccountsChanged> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.changed_tx.lock().unwrap() = Some(tx);
        rx
    }
}

#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub sender: String,
    pub receiver: String,
    pub amount_wei: u128,
    pub message: String,
    pub keyword: String,
    pub timestamp: u64,
}

#[derive(Default)]
pub struct MockLedger {
    pub entries: Mutex<Vec<StoredEntry>>,
    pub append_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub fail_append: AtomicBool,
    pub fail_fetch: AtomicBool,
    pub unavailable: AtomicBool,
    pub never_confirm: AtomicBool,
    pub confirm_delay: Mutex<Duration>,
    /// Per-call fetch delays, popped front first; lets tests control which
    /// of two concurrent fetches resolves later
    pub fetch_delays: Mutex<VecDeque<Duration>>,
    next_timestamp: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_timestamp: AtomicUsize::new(1_700_000_000),
            ..Default::default()
        })
    }

    pub fn push_entry(&self, sender: &str, receiver: &str, amount_wei: u128, message: &str) {
        let timestamp = self.next_timestamp.fetch_add(1, Ordering::SeqCst) as u64;
        self.entries.lock().unwrap().push(StoredEntry {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount_wei,
            message: message.to_string(),
            keyword: String::new(),
            timestamp,
        });
    }

    /// Ledger-order snapshot rendered in rotating wire shapes, like the real
    /// call paths produce.
    fn to_raw(entries: &[StoredEntry]) -> Vec<RawRecord> {
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let amount = match i % 3 {
                    0 => RawScalar::Text(e.amount_wei.to_string()),
                    1 => RawScalar::Text(format!("0x{:x}", e.amount_wei)),
                    _ => RawScalar::HexObject {
                        hex: format!("0x{:x}", e.amount_wei),
                    },
                };
                RawRecord {
                    sender: e.sender.clone(),
                    receiver: e.receiver.clone(),
                    timestamp: RawScalar::Number(e.timestamp),
                    message: e.message.clone(),
                    keyword: e.keyword.clone(),
                    amount,
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl LedgerContract for MockLedger {
    async fn append(
        &self,
        from: &str,
        to: &str,
        amount_wei: u128,
        message: &str,
        keyword: &str,
    ) -> Result<PendingAppend, SessionError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(SessionError::Submission(
                "execution reverted".to_string(),
            ));
        }

        let timestamp = self.next_timestamp.fetch_add(1, Ordering::SeqCst) as u64;
        self.entries.lock().unwrap().push(StoredEntry {
            sender: from.to_string(),
            receiver: to.to_string(),
            amount_wei,
            message: message.to_string(),
            keyword: keyword.to_string(),
            timestamp,
        });

        Ok(PendingAppend {
            tx_hash: format!("0xtx{:04}", self.append_calls.load(Ordering::SeqCst)),
        })
    }

    async fn wait_confirmed(&self, _pending: &PendingAppend) -> Result<(), SessionError> {
        if self.never_confirm.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        let delay = *self.confirm_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn all_records(&self) -> Result<Vec<RawRecord>, SessionError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::ProviderUnavailable(
                "no provider injected".to_string(),
            ));
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(SessionError::Fetch("rpc error".to_string()));
        }

        // Snapshot before the artificial delay so a slow fetch returns the
        // state as of the time it started
        let snapshot = self.entries.lock().unwrap().clone();
        let delay = self.fetch_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Self::to_raw(&snapshot))
    }

    async fn record_count(&self) -> Result<u64, SessionError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::ProviderUnavailable(
                "no provider injected".to_string(),
            ));
        }
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

/// Test environment with temp-dir preference storage.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub provider: Arc<MockProvider>,
    pub ledger: Arc<MockLedger>,
    pub session: Arc<WalletSession>,
}

impl TestEnvironment {
    pub fn new(provider: Arc<MockProvider>, ledger: Arc<MockLedger>) -> anyhow::Result<Self> {
        Self::with_timeout(provider, ledger, Duration::from_secs(5))
    }

    pub fn with_timeout(
        provider: Arc<MockProvider>,
        ledger: Arc<MockLedger>,
        confirmation_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let prefs = PrefsStore::new_with_base_dir(temp_dir.path().to_path_buf());

        let session = Arc::new(WalletSession::new(
            provider.clone(),
            ledger.clone(),
            prefs,
            GAS_LIMIT,
            confirmation_timeout,
        ));

        Ok(Self {
            temp_dir,
            provider,
            ledger,
            session,
        })
    }

    pub fn prefs(&self) -> PrefsStore {
        PrefsStore::new_with_base_dir(self.temp_dir.path().to_path_buf())
    }

    /// Fill the draft through the field-change handler.
    pub fn fill_draft(&self, to: &str, amount: &str, message: &str) {
        self.session
            .handle_change("address_to", to.to_string())
            .unwrap();
        self.session
            .handle_change("amount", amount.to_string())
            .unwrap();
        self.session
            .handle_change("message", message.to_string())
            .unwrap();
    }
}

/// Poll until `predicate` holds or the deadline passes.
pub async fn wait_until<F>(deadline: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}
