/// HTTP ledger contract client
///
/// Speaks JSON to the node gateway's contract endpoints. Amounts cross the
/// wire as decimal strings since wei values overflow JSON numbers.
use std::time::Duration;

use serde::Deserialize;

use super::{LedgerContract, PendingAppend};
use crate::error::SessionError;
use crate::ledger::records::RawRecord;

#[derive(Clone)]
pub struct GatewayLedger {
    client: reqwest::Client,
    base_url: String,
    contract_address: String,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    tx_hash: String,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct TxStatusResponse {
    confirmed: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl GatewayLedger {
    pub fn new(base_url: &str, contract_address: &str, poll_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            contract_address: contract_address.to_string(),
            poll_interval,
        }
    }

    fn contract_url(&self, tail: &str) -> String {
        format!(
            "{}/contract/{}/{}",
            self.base_url, self.contract_address, tail
        )
    }

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
impl LedgerContract for GatewayLedger {
    async fn append(
        &self,
        from: &str,
        to: &str,
        amount_wei: u128,
        message: &str,
        keyword: &str,
    ) -> Result<PendingAppend, SessionError> {
        let response = self
            .client
            .post(self.contract_url("append"))
            .json(&serde_json::json!({
                "from": from,
                "to": to,
                "amount_wei": amount_wei.to_string(),
                "message": message,
                "keyword": keyword,
            }))
            .send()
            .await
            .map_err(unreachable_error)?;

        if !response.status().is_success() {
            return Err(SessionError::Submission(
                Self::error_message(response).await,
            ));
        }

        let body: AppendResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Submission(e.to_string()))?;
        Ok(PendingAppend {
            tx_hash: body.tx_hash,
        })
    }

    async fn wait_confirmed(&self, pending: &PendingAppend) -> Result<(), SessionError> {
        let url = format!("{}/tx/{}/status", self.base_url, pending.tx_hash);
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(unreachable_error)?;

            if !response.status().is_success() {
                return Err(SessionError::Submission(
                    Self::error_message(response).await,
                ));
            }

            let status: TxStatusResponse = response
                .json()
                .await
                .map_err(|e| SessionError::Submission(e.to_string()))?;
            if status.confirmed {
                return Ok(());
            }
            log::debug!("tx {} not yet confirmed", pending.tx_hash);
        }
    }

    async fn all_records(&self) -> Result<Vec<RawRecord>, SessionError> {
        let response = self
            .client
            .get(self.contract_url("records"))
            .send()
            .await
            .map_err(unreachable_error)?;

        if !response.status().is_success() {
            return Err(SessionError::Fetch(Self::error_message(response).await));
        }

        response
            .json::<Vec<RawRecord>>()
            .await
            .map_err(|e| SessionError::Fetch(e.to_string()))
    }

    async fn record_count(&self) -> Result<u64, SessionError> {
        let response = self
            .client
            .get(self.contract_url("count"))
            .send()
            .await
            .map_err(unreachable_error)?;

        if !response.status().is_success() {
            return Err(SessionError::Fetch(Self::error_message(response).await));
        }

        let body: CountResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Fetch(e.to_string()))?;
        Ok(body.count)
    }
}
