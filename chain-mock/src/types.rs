use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::state::LedgerEntry;

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub from: String,
    pub to: String,
    pub value_wei: String,
    #[serde(default)]
    pub gas_limit: u64,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub tx_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub from: String,
    pub to: String,
    pub amount_wei: String,
    pub message: String,
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct TxStatusResponse {
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub accounts: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigRequest {
    pub reject_connect: Option<bool>,
    pub auto_confirm: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct MineResponse {
    pub confirmed: usize,
}

/// Serialize a ledger entry the way real call paths do: numeric fields come
/// back in different representations depending on the entry, so clients must
/// handle plain numbers, decimal strings, hex strings, and legacy hex
/// objects.
pub fn entry_to_wire(index: usize, entry: &LedgerEntry) -> Value {
    let amount: Value = match index % 4 {
        0 => match u64::try_from(entry.amount_wei) {
            Ok(n) => json!(n),
            Err(_) => json!(entry.amount_wei.to_string()),
        },
        1 => json!(entry.amount_wei.to_string()),
        2 => json!(format!("0x{:x}", entry.amount_wei)),
        _ => json!({ "_hex": format!("0x{:x}", entry.amount_wei) }),
    };

    json!({
        "sender": entry.sender,
        "receiver": entry.receiver,
        "timestamp": entry.timestamp,
        "message": entry.message,
        "keyword": entry.keyword,
        "amount": amount,
    })
}
