use axum::{extract::State, Json};
use std::sync::Arc;

use super::types::{
    ConnectResponse, DraftFieldRequest, RefreshResponse, SwitchAccountRequest,
    SwitchAccountResponse, ThemeResponse, TransactionView,
};
use crate::error::SessionError;
use crate::session::{FormDraft, SessionSnapshot, SubmitReceipt, WalletSession};

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn get_session_handler(
    State(session): State<Arc<WalletSession>>,
) -> Json<SessionSnapshot> {
    Json(session.snapshot())
}

pub async fn connect_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<ConnectResponse>, SessionError> {
    let accounts = session.connect().await?;
    Ok(Json(ConnectResponse {
        accounts,
        active_account: session.active_account(),
    }))
}

pub async fn switch_account_handler(
    State(session): State<Arc<WalletSession>>,
    Json(req): Json<SwitchAccountRequest>,
) -> Result<Json<SwitchAccountResponse>, SessionError> {
    session.switch_account(&req.address).await?;
    Ok(Json(SwitchAccountResponse {
        active_account: req.address,
    }))
}

pub async fn update_draft_handler(
    State(session): State<Arc<WalletSession>>,
    Json(req): Json<DraftFieldRequest>,
) -> Result<Json<FormDraft>, SessionError> {
    let draft = session.handle_change(&req.field, req.value)?;
    Ok(Json(draft))
}

pub async fn submit_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<SubmitReceipt>, SessionError> {
    let receipt = session.submit().await?;
    Ok(Json(receipt))
}

pub async fn list_transactions_handler(
    State(session): State<Arc<WalletSession>>,
) -> Json<Vec<TransactionView>> {
    let views = session
        .transactions()
        .into_iter()
        .map(TransactionView::from)
        .collect();
    Json(views)
}

pub async fn refresh_transactions_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<RefreshResponse>, SessionError> {
    let record_count = session.refresh_ledger().await?;
    Ok(Json(RefreshResponse { record_count }))
}

pub async fn get_theme_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<ThemeResponse>, SessionError> {
    Ok(Json(ThemeResponse {
        theme: session.theme()?,
    }))
}

pub async fn toggle_theme_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<ThemeResponse>, SessionError> {
    Ok(Json(ThemeResponse {
        theme: session.toggle_theme()?,
    }))
}
