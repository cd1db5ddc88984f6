/// Wallet session - account synchronization and transaction submission
///
/// Reconciles local belief about connected accounts against the injected
/// wallet provider, mediates memo-annotated value transfers against the
/// append-only ledger contract, and maintains a local mirror of the ledger
/// for display.
pub mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::ledger::records::TransactionRecord;
use crate::ledger::LedgerContract;
use crate::provider::WalletProvider;
use crate::storage::{PrefsStore, Theme};

pub use state::{FormDraft, SessionState, SubmitPhase};

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub tx_hash: String,
}

/// Read-only view of the session for presentation clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub active_account: Option<String>,
    pub accounts: Vec<String>,
    pub draft: FormDraft,
    pub pending: bool,
    pub phase: SubmitPhase,
    pub transaction_count: u64,
}

pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    ledger: Arc<dyn LedgerContract>,
    prefs: PrefsStore,
    gas_limit: u64,
    confirmation_timeout: Duration,
    state: Mutex<SessionState>,
    submitting: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl WalletSession {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        ledger: Arc<dyn LedgerContract>,
        prefs: PrefsStore,
        gas_limit: u64,
        confirmation_timeout: Duration,
    ) -> Self {
        let mut state = SessionState::default();
        match prefs.load() {
            Ok(saved) => state.transaction_count = saved.transaction_count,
            Err(e) => log::warn!("Could not load preferences: {}", e),
        }

        Self {
            provider,
            ledger,
            prefs,
            gas_limit,
            confirmation_timeout,
            state: Mutex::new(state),
            submitting: AtomicBool::new(false),
            listener: Mutex::new(None),
        }
    }

    /// Initialize the session: silently pick up already-authorized accounts,
    /// run the initial ledger refresh, and register the accounts-changed
    /// listener. Provider absence at this point is not an error.
    pub async fn start(self: Arc<Self>) {
        match self.provider.authorized_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                {
                    let mut state = self.lock_state();
                    state.merge_accounts(&accounts);
                }
                log::info!("Resumed session with {} authorized account(s)", accounts.len());
                if let Err(e) = self.refresh_ledger().await {
                    log::warn!("Initial ledger refresh failed: {}", e);
                }
            }
            Ok(_) => log::info!("No accounts authorized yet"),
            Err(e) => log::warn!("Could not query authorized accounts: {}", e),
        }

        if let Err(e) = self.refresh_count_cache().await {
            log::debug!("Transaction count refresh failed: {}", e);
        }

        self.register_listener();
    }

    /// Register the accounts-changed listener. Exactly one subscription per
    /// session lifetime; the task stops when the session is dropped.
    fn register_listener(self: Arc<Self>) {
        let mut slot = self.listener.lock().expect("listener lock poisoned");
        if slot.is_some() {
            log::warn!("accounts-changed listener already registered");
            return;
        }

        let mut rx = self.provider.subscribe_accounts_changed();
        let weak = Arc::downgrade(&self);
        let handle = tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                let Some(session) = weak.upgrade() else { break };
                session.handle_accounts_changed(payload).await;
            }
            log::debug!("accounts-changed listener stopped");
        });
        *slot = Some(handle);
    }

    /// Apply a provider-pushed account change. A non-empty payload replaces
    /// the account set wholesale (the provider is authoritative); an empty
    /// payload is a disconnection.
    pub async fn handle_accounts_changed(&self, payload: Vec<String>) {
        let disconnected = payload.is_empty();
        {
            let mut state = self.lock_state();
            state.replace_accounts(payload);
        }

        if disconnected {
            log::info!("Wallet disconnected");
        } else {
            log::info!("Provider switched accounts");
            if let Err(e) = self.refresh_ledger().await {
                log::warn!("Ledger refresh after account change failed: {}", e);
            }
        }
    }

    /// Request account access from the provider and merge the result into the
    /// known account set. Returns the full account list after the merge.
    pub async fn connect(&self) -> Result<Vec<String>, SessionError> {
        log::info!("Connecting to wallet...");
        let accounts = self.provider.request_accounts().await?;
        if accounts.is_empty() {
            return Err(SessionError::NoAccountsReturned);
        }

        let merged = {
            let mut state = self.lock_state();
            state.merge_accounts(&accounts);
            state.accounts.clone()
        };
        log::info!("Wallet connected: {} account(s) known", merged.len());
        Ok(merged)
    }

    /// Make a previously authorized account the active one and refresh the
    /// mirror for it.
    pub async fn switch_account(&self, address: &str) -> Result<(), SessionError> {
        {
            let mut state = self.lock_state();
            if !state.is_known_account(address) {
                return Err(SessionError::UnknownAccount(address.to_string()));
            }
            state.active_account = Some(address.to_string());
        }

        if let Err(e) = self.refresh_ledger().await {
            log::warn!("Ledger refresh after account switch failed: {}", e);
        }
        Ok(())
    }

    /// Update a single draft field (the form change handler).
    pub fn handle_change(&self, field: &str, value: String) -> Result<FormDraft, SessionError> {
        let mut state = self.lock_state();
        state
            .draft
            .set_field(field, value)
            .map_err(SessionError::InvalidInput)?;
        Ok(state.draft.clone())
    }

    pub fn set_draft(&self, draft: FormDraft) {
        self.lock_state().draft = draft;
    }

    /// Submit the current draft: validate, send the value transfer, append to
    /// the ledger, and await confirmation. Only one submission may be in
    /// flight at a time; a second call fails fast with SubmissionInProgress.
    pub async fn submit(&self) -> Result<SubmitReceipt, SessionError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::SubmissionInProgress);
        }

        let result = self.submit_inner().await;

        self.set_phase(SubmitPhase::Idle);
        self.submitting.store(false, Ordering::Release);
        result
    }

    async fn submit_inner(&self) -> Result<SubmitReceipt, SessionError> {
        self.set_phase(SubmitPhase::Validating);

        // Validation happens before any provider interaction
        let (draft, active) = {
            let state = self.lock_state();
            (state.draft.clone(), state.active_account.clone())
        };
        let amount_wei = draft.validate().map_err(SessionError::Validation)?;
        let from = active.ok_or(SessionError::NoActiveAccount)?;

        self.set_phase(SubmitPhase::Submitting);
        self.provider
            .send_transfer(&from, &draft.address_to, amount_wei, self.gas_limit)
            .await?;

        let pending = self
            .ledger
            .append(
                &from,
                &draft.address_to,
                amount_wei,
                &draft.message,
                &draft.keyword,
            )
            .await?;

        self.set_phase(SubmitPhase::AwaitingConfirmation);
        log::info!("Awaiting confirmation - {}", pending.tx_hash);

        tokio::time::timeout(self.confirmation_timeout, self.ledger.wait_confirmed(&pending))
            .await
            .map_err(|_| SessionError::ConfirmationTimeout(self.confirmation_timeout.as_secs()))??;

        log::info!("Confirmed - {}", pending.tx_hash);

        if let Err(e) = self.refresh_count_cache().await {
            log::warn!("Transaction count refresh failed: {}", e);
        }

        // Draft is cleared only on success
        self.lock_state().draft = FormDraft::default();

        if let Err(e) = self.refresh_ledger().await {
            log::warn!("Ledger refresh after submission failed: {}", e);
        }

        Ok(SubmitReceipt {
            tx_hash: pending.tx_hash,
        })
    }

    /// Replace the local mirror with the full ledger contents. Provider
    /// absence leaves the mirror untouched (nothing to show, not an error);
    /// fetch or parse failures also leave it untouched but are surfaced.
    pub async fn refresh_ledger(&self) -> Result<usize, SessionError> {
        let raw = match self.ledger.all_records().await {
            Ok(raw) => raw,
            Err(SessionError::ProviderUnavailable(msg)) => {
                log::debug!("No provider, mirror left as-is: {}", msg);
                return Ok(self.lock_state().mirror.len());
            }
            Err(e) => return Err(e),
        };

        let mut records = Vec::with_capacity(raw.len());
        for record in &raw {
            records.push(record.normalize()?);
        }

        let len = records.len();
        self.lock_state().mirror = records;
        log::debug!("Mirror refreshed: {} record(s)", len);
        Ok(len)
    }

    /// Refresh the persisted transaction-count cache from the ledger.
    pub async fn refresh_count_cache(&self) -> Result<u64, SessionError> {
        let count = self.ledger.record_count().await?;
        self.lock_state().transaction_count = count;

        let mut prefs = self.prefs.load()?;
        prefs.transaction_count = count;
        self.prefs.save(&prefs)?;
        Ok(count)
    }

    /// Mirror contents, most recent first.
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        let state = self.lock_state();
        state.mirror.iter().rev().cloned().collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            active_account: state.active_account.clone(),
            accounts: state.accounts.clone(),
            draft: state.draft.clone(),
            pending: state.phase != SubmitPhase::Idle,
            phase: state.phase,
            transaction_count: state.transaction_count,
        }
    }

    pub fn active_account(&self) -> Option<String> {
        self.lock_state().active_account.clone()
    }

    pub fn accounts(&self) -> Vec<String> {
        self.lock_state().accounts.clone()
    }

    pub fn theme(&self) -> Result<Theme, SessionError> {
        Ok(self.prefs.load()?.theme)
    }

    pub fn toggle_theme(&self) -> Result<Theme, SessionError> {
        let mut prefs = self.prefs.load()?;
        prefs.theme = prefs.theme.toggled();
        self.prefs.save(&prefs)?;
        Ok(prefs.theme)
    }

    fn set_phase(&self, phase: SubmitPhase) {
        self.lock_state().phase = phase;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // Never held across an await point
        self.state.lock().expect("session state lock poisoned")
    }
}

impl Drop for WalletSession {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}
