use serde::{Deserialize, Serialize};

use crate::ledger::records::TransactionRecord;
use crate::storage::Theme;
use crate::util::shorten_address;

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub accounts: Vec<String>,
    pub active_account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchAccountRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct SwitchAccountResponse {
    pub active_account: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftFieldRequest {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub record_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// A mirror record as served to presentation clients, with display-shortened
/// addresses alongside the full ones.
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub address_from: String,
    pub address_from_short: String,
    pub address_to: String,
    pub address_to_short: String,
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    pub amount: f64,
}

impl From<TransactionRecord> for TransactionView {
    fn from(record: TransactionRecord) -> Self {
        Self {
            address_from_short: shorten_address(&record.address_from),
            address_to_short: shorten_address(&record.address_to),
            address_from: record.address_from,
            address_to: record.address_to,
            timestamp: record.timestamp,
            message: record.message,
            keyword: record.keyword,
            amount: record.amount,
        }
    }
}
