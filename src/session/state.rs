/// In-memory session state
///
/// Pure state container plus the account reconciliation rules. A
/// user-initiated connect merges (additive, supports multiple authorized
/// accounts); a provider-originated change event replaces, because the
/// provider's payload is its authoritative current state.
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ledger::records::{parse_ether, TransactionRecord};

/// Phases of a submission, observable through the API while in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPhase {
    Idle,
    Validating,
    Submitting,
    AwaitingConfirmation,
}

/// The in-progress transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    #[serde(default)]
    pub address_to: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub keyword: String,
}

impl FormDraft {
    /// Update a single named field. Unknown names are rejected.
    pub fn set_field(&mut self, field: &str, value: String) -> Result<(), String> {
        match field {
            "address_to" => self.address_to = value,
            "amount" => self.amount = value,
            "message" => self.message = value,
            "keyword" => self.keyword = value,
            other => return Err(format!("unknown draft field '{}'", other)),
        }
        Ok(())
    }

    /// Validate the draft before any network interaction. Returns the amount
    /// converted to wei on success.
    pub fn validate(&self) -> Result<u128, ValidationError> {
        if self.address_to.trim().is_empty() {
            return Err(ValidationError::MissingRecipient);
        }
        let wei = parse_ether(&self.amount).map_err(ValidationError::InvalidAmount)?;
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        Ok(wei)
    }
}

#[derive(Debug, Default)]
pub struct SessionState {
    /// Known accounts, insertion order = discovery order, no duplicates
    pub accounts: Vec<String>,
    /// Must be a member of `accounts`, or None when disconnected
    pub active_account: Option<String>,
    /// Local copy of the ledger, in ledger (append) order
    pub mirror: Vec<TransactionRecord>,
    pub draft: FormDraft,
    pub phase: SubmitPhase,
    /// Last-known ledger entry count (change signal only)
    pub transaction_count: u64,
}

impl Default for SubmitPhase {
    fn default() -> Self {
        SubmitPhase::Idle
    }
}

impl SessionState {
    /// Merge newly authorized accounts: set union preserving existing order,
    /// new addresses appended. Sets the active account if none is set.
    pub fn merge_accounts(&mut self, incoming: &[String]) {
        for account in incoming {
            if !self.accounts.contains(account) {
                self.accounts.push(account.clone());
            }
        }
        if self.active_account.is_none() {
            self.active_account = incoming.first().cloned();
        }
    }

    /// Apply a provider-pushed account list: wholesale replace. An empty
    /// payload is a disconnection and clears the active account too.
    pub fn replace_accounts(&mut self, incoming: Vec<String>) {
        self.active_account = incoming.first().cloned();
        self.accounts = incoming;
    }

    pub fn is_known_account(&self, address: &str) -> bool {
        self.accounts.iter().any(|a| a == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> String {
        format!("0x{:040x}", n)
    }

    #[test]
    fn test_merge_preserves_order_and_appends() {
        let mut state = SessionState::default();
        state.merge_accounts(&[addr(1), addr(2)]);
        state.merge_accounts(&[addr(2), addr(3)]);

        assert_eq!(state.accounts, vec![addr(1), addr(2), addr(3)]);
        assert_eq!(state.active_account, Some(addr(1)));
    }

    #[test]
    fn test_merge_keeps_existing_active() {
        let mut state = SessionState::default();
        state.merge_accounts(&[addr(1)]);
        state.merge_accounts(&[addr(5)]);

        assert_eq!(state.active_account, Some(addr(1)));
    }

    #[test]
    fn test_replace_is_not_a_merge() {
        let mut state = SessionState::default();
        state.merge_accounts(&[addr(1), addr(2)]);
        state.replace_accounts(vec![addr(9)]);

        assert_eq!(state.accounts, vec![addr(9)]);
        assert_eq!(state.active_account, Some(addr(9)));
    }

    #[test]
    fn test_empty_replace_disconnects() {
        let mut state = SessionState::default();
        state.merge_accounts(&[addr(1)]);
        state.replace_accounts(Vec::new());

        assert!(state.accounts.is_empty());
        assert_eq!(state.active_account, None);
    }

    #[test]
    fn test_draft_validation_order() {
        let draft = FormDraft {
            address_to: String::new(),
            amount: "1".to_string(),
            message: "hi".to_string(),
            keyword: String::new(),
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingRecipient));

        let draft = FormDraft {
            address_to: addr(1),
            amount: "abc".to_string(),
            message: "hi".to_string(),
            keyword: String::new(),
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidAmount(_))
        ));

        let draft = FormDraft {
            address_to: addr(1),
            amount: "0".to_string(),
            message: "hi".to_string(),
            keyword: String::new(),
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidAmount(_))
        ));

        let draft = FormDraft {
            address_to: addr(1),
            amount: "0.001".to_string(),
            message: String::new(),
            keyword: String::new(),
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingMessage));
    }

    #[test]
    fn test_unknown_draft_field_rejected() {
        let mut draft = FormDraft::default();
        assert!(draft.set_field("gasPrice", "1".to_string()).is_err());
        assert!(draft.set_field("amount", "2".to_string()).is_ok());
        assert_eq!(draft.amount, "2");
    }
}
