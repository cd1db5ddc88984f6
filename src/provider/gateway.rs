/// HTTP wallet provider
///
/// Talks JSON to a node gateway (chain-mock in development). Accounts-changed
/// notifications are synthesized by polling the authorized-account list and
/// pushing a payload whenever it differs from the last observed one.
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;

use super::{AccountsChanged, WalletProvider};
use crate::error::SessionError;

#[derive(Clone)]
pub struct GatewayProvider {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    tx_hash: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl GatewayProvider {
    pub fn new(base_url: &str, poll_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval,
        }
    }

    /// Extract the gateway's error message, falling back to the status line.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("gateway returned {}", status),
        }
    }
}

fn unreachable_error(e: reqwest::Error) -> SessionError {
    if e.is_connect() || e.is_timeout() {
        SessionError::ProviderUnavailable(e.to_string())
    } else {
        SessionError::Fetch(e.to_string())
    }
}

#[async_trait::async_trait]
impl WalletProvider for GatewayProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, SessionError> {
        let url = format!("{}/accounts/request", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(unreachable_error)?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(SessionError::UserRejected(
                Self::error_message(response).await,
            ));
        }
        if !response.status().is_success() {
            return Err(SessionError::Fetch(Self::error_message(response).await));
        }

        let body: AccountsResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Fetch(e.to_string()))?;
        Ok(body.accounts)
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, SessionError> {
        let url = format!("{}/accounts/authorized", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(unreachable_error)?;

        if !response.status().is_success() {
            return Err(SessionError::Fetch(Self::error_message(response).await));
        }

        let body: AccountsResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Fetch(e.to_string()))?;
        Ok(body.accounts)
    }

    async fn send_transfer(
        &self,
        from: &str,
        to: &str,
        value_wei: u128,
        gas_limit: u64,
    ) -> Result<String, SessionError> {
        let url = format!("{}/send", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "from": from,
                "to": to,
                "value_wei": value_wei.to_string(),
                "gas_limit": gas_limit,
            }))
            .send()
            .await
            .map_err(unreachable_error)?;

        if !response.status().is_success() {
            return Err(SessionError::Submission(
                Self::error_message(response).await,
            ));
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Submission(e.to_string()))?;
        Ok(body.tx_hash)
    }

    fn subscribe_accounts_changed(&self) -> mpsc::UnboundedReceiver<AccountsChanged> {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = self.clone();

        tokio::spawn(async move {
            let mut last_seen: Option<Vec<String>> = None;
            let mut ticker = tokio::time::interval(provider.poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let accounts = match provider.authorized_accounts().await {
                    Ok(accounts) => accounts,
                    Err(e) => {
                        log::debug!("accounts poll failed: {}", e);
                        continue;
                    }
                };

                let changed = last_seen.as_ref() != Some(&accounts);
                // First observation seeds the baseline without notifying
                if last_seen.is_some() && changed {
                    if tx.send(accounts.clone()).is_err() {
                        break;
                    }
                }
                if changed || last_seen.is_none() {
                    last_seen = Some(accounts);
                }
            }
            log::debug!("accounts-changed poller stopped");
        });

        rx
    }
}
