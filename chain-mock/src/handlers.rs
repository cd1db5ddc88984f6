use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::{LedgerEntry, SharedState};
use crate::types::*;

pub async fn health_check() -> &'static str {
    "ok"
}

/// Interactive authorization request. Hands out the wallet's accounts unless
/// the reject switch is set.
pub async fn request_accounts(State(state): State<SharedState>) -> impl IntoResponse {
    let mut chain = state.lock().unwrap();

    if chain.reject_connect {
        log::info!("Authorization request rejected (reject_connect set)");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "User rejected the request" })),
        )
            .into_response();
    }

    chain.authorized = chain.wallet_accounts.clone();
    log::info!("Authorized {} account(s)", chain.authorized.len());
    Json(AccountsResponse {
        accounts: chain.authorized.clone(),
    })
    .into_response()
}

/// Silent query for previously authorized accounts.
pub async fn authorized_accounts(State(state): State<SharedState>) -> Json<AccountsResponse> {
    let chain = state.lock().unwrap();
    Json(AccountsResponse {
        accounts: chain.authorized.clone(),
    })
}

/// Test helper: replace the authorized account list out-of-band, as the user
/// would by switching accounts inside the wallet.
pub async fn set_authorized(
    State(state): State<SharedState>,
    Json(req): Json<AuthorizeRequest>,
) -> Json<AccountsResponse> {
    let mut chain = state.lock().unwrap();
    chain.authorized = req.accounts.clone();
    log::info!("Authorized accounts set to {:?}", req.accounts);
    Json(AccountsResponse {
        accounts: chain.authorized.clone(),
    })
}

/// Raw value transfer.
pub async fn send_transaction(
    State(state): State<SharedState>,
    Json(req): Json<SendRequest>,
) -> impl IntoResponse {
    let value_wei = match req.value_wei.parse::<u128>() {
        Ok(v) => v,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid value_wei '{}'", req.value_wei) })),
            )
                .into_response()
        }
    };

    let mut chain = state.lock().unwrap();
    if !chain.authorized.contains(&req.from) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": format!("account {} not authorized", req.from) })),
        )
            .into_response();
    }

    let tx_hash = chain.register_tx(&req.from, &req.to, value_wei);
    log::info!(
        "Transfer {} wei {} -> {} (gas {})",
        value_wei,
        req.from,
        req.to,
        req.gas_limit
    );
    Json(SendResponse { tx_hash }).into_response()
}

/// Append a record to the memo contract's ledger.
pub async fn append_record(
    State(state): State<SharedState>,
    Path(_contract): Path<String>,
    Json(req): Json<AppendRequest>,
) -> impl IntoResponse {
    let amount_wei = match req.amount_wei.parse::<u128>() {
        Ok(v) => v,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid amount_wei '{}'", req.amount_wei) })),
            )
                .into_response()
        }
    };

    let mut chain = state.lock().unwrap();
    let tx_hash = chain.register_tx(&req.from, &req.to, amount_wei);
    chain.ledger.push(LedgerEntry {
        sender: req.from,
        receiver: req.to,
        amount_wei,
        message: req.message,
        keyword: req.keyword,
        timestamp: Utc::now().timestamp() as u64,
    });

    log::info!("Ledger entry {} appended", chain.ledger.len());
    Json(SendResponse { tx_hash }).into_response()
}

/// Full raw record list, with numeric fields in mixed representations.
pub async fn get_records(
    State(state): State<SharedState>,
    Path(_contract): Path<String>,
) -> Json<Vec<Value>> {
    let chain = state.lock().unwrap();
    let records = chain
        .ledger
        .iter()
        .enumerate()
        .map(|(i, entry)| entry_to_wire(i, entry))
        .collect();
    Json(records)
}

pub async fn get_record_count(
    State(state): State<SharedState>,
    Path(_contract): Path<String>,
) -> Json<CountResponse> {
    let chain = state.lock().unwrap();
    Json(CountResponse {
        count: chain.ledger.len() as u64,
    })
}

pub async fn get_tx_status(
    State(state): State<SharedState>,
    Path(tx_hash): Path<String>,
) -> impl IntoResponse {
    let chain = state.lock().unwrap();
    match chain.tx_confirmed.get(&tx_hash) {
        Some(confirmed) => Json(TxStatusResponse {
            confirmed: *confirmed,
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown transaction {}", tx_hash) })),
        )
            .into_response(),
    }
}

/// Confirm all pending transactions.
pub async fn mine(State(state): State<SharedState>) -> Json<MineResponse> {
    let mut chain = state.lock().unwrap();
    let confirmed = chain.mine();
    log::info!("Mined: {} transaction(s) confirmed", confirmed);
    Json(MineResponse { confirmed })
}

/// Flip test switches.
pub async fn configure(
    State(state): State<SharedState>,
    Json(req): Json<ConfigRequest>,
) -> StatusCode {
    let mut chain = state.lock().unwrap();
    if let Some(reject) = req.reject_connect {
        chain.reject_connect = reject;
    }
    if let Some(auto) = req.auto_confirm {
        chain.auto_confirm = auto;
    }
    StatusCode::NO_CONTENT
}
