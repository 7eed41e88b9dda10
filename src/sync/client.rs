//! Remote operations against the Verifactu backend, in either mode.
//!
//! Every operation returns a normalized [`SyncResult`] — transport
//! failures, non-2xx responses, and local validation rejections all come
//! back as `success = false` with an error description, never as a panic
//! or an `Err`. Retry policy belongs to the caller; this client performs
//! exactly one attempt per call.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{
    Customer, Invoice, SyncResult, ValidationError, VerifactuError, join_validation_errors,
    validate_customer, validate_invoice,
};

use super::config::{EngineConfig, EngineMode};
use super::wire::{self, ApiResponse, CancelRequest};

/// HTTP client for the Verifactu API.
///
/// In `Simulated` mode the same payload validation runs, but external
/// identifiers are fabricated from a monotonic sequence and no network
/// call is ever made.
#[derive(Debug)]
pub struct VerifactuClient {
    config: EngineConfig,
    http: Client,
    sim_seq: AtomicU64,
}

impl VerifactuClient {
    /// Create a client with the configured per-call timeout.
    pub fn new(config: EngineConfig) -> Result<Self, VerifactuError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("verifactu/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VerifactuError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(config: EngineConfig, http: Client) -> Self {
        Self {
            config,
            http,
            sim_seq: AtomicU64::new(1),
        }
    }

    /// The resolved operating mode.
    #[must_use]
    pub fn mode(&self) -> EngineMode {
        self.config.mode
    }

    // ── Customers ─────────────────────────────────────────────────────

    /// Register a customer with the remote system.
    pub async fn create_customer(&self, customer: &Customer) -> SyncResult {
        if let Some(rejected) = self.reject_invalid(validate_customer(customer)) {
            return rejected;
        }
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(self.next_sim_id("C"))
                .with_status("registered")
                .with_message("simulated registration"),
            EngineMode::Live => {
                self.post("customers", &wire::customer_payload(customer)).await
            }
        }
    }

    /// Update a previously registered customer.
    pub async fn update_customer(&self, external_id: &str, customer: &Customer) -> SyncResult {
        if let Some(rejected) = self.reject_invalid(validate_customer(customer)) {
            return rejected;
        }
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(external_id)
                .with_status("registered")
                .with_message("simulated update"),
            EngineMode::Live => {
                self.put(
                    &format!("customers/{external_id}"),
                    &wire::customer_payload(customer),
                )
                .await
            }
        }
    }

    /// Remove a customer from the remote system.
    pub async fn delete_customer(&self, external_id: &str) -> SyncResult {
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(external_id)
                .with_status("deleted")
                .with_message("simulated deletion"),
            EngineMode::Live => self.delete(&format!("customers/{external_id}")).await,
        }
    }

    // ── Invoices ──────────────────────────────────────────────────────

    /// Register an invoice with the remote system.
    pub async fn create_invoice(&self, invoice: &Invoice) -> SyncResult {
        if let Some(rejected) = self.reject_invalid(validate_invoice(invoice)) {
            return rejected;
        }
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(self.next_sim_id("F"))
                .with_status("pending")
                .with_message("simulated submission"),
            EngineMode::Live => self.post("invoices", &wire::invoice_payload(invoice)).await,
        }
    }

    /// Update a previously registered invoice.
    pub async fn update_invoice(&self, external_id: &str, invoice: &Invoice) -> SyncResult {
        if let Some(rejected) = self.reject_invalid(validate_invoice(invoice)) {
            return rejected;
        }
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(external_id)
                .with_status("pending")
                .with_message("simulated update"),
            EngineMode::Live => {
                self.put(
                    &format!("invoices/{external_id}"),
                    &wire::invoice_payload(invoice),
                )
                .await
            }
        }
    }

    /// Cancel an invoice. A non-empty human-readable reason is required.
    pub async fn cancel_invoice(&self, external_id: &str, reason: &str) -> SyncResult {
        if reason.trim().is_empty() {
            return SyncResult::failure(
                "cancellation requires a non-empty reason",
                self.config.is_simulated(),
            );
        }
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(external_id)
                .with_status("cancelled")
                .with_message(format!("simulated cancellation: {reason}")),
            EngineMode::Live => {
                self.post(
                    &format!("invoices/{external_id}/cancel"),
                    &CancelRequest {
                        reason: reason.to_string(),
                    },
                )
                .await
            }
        }
    }

    /// Poll the remote processing status of an invoice. Read-only.
    pub async fn invoice_status(&self, external_id: &str) -> SyncResult {
        match self.config.mode {
            EngineMode::Simulated => SyncResult::success(true)
                .with_external_id(external_id)
                .with_status("accepted")
                .with_message("simulated status"),
            EngineMode::Live => self.get(&format!("invoices/{external_id}/status")).await,
        }
    }

    // ── Shared plumbing ───────────────────────────────────────────────

    fn reject_invalid(&self, errors: Vec<ValidationError>) -> Option<SyncResult> {
        if errors.is_empty() {
            return None;
        }
        Some(SyncResult::failure(
            join_validation_errors(&errors),
            self.config.is_simulated(),
        ))
    }

    fn next_sim_id(&self, kind: &str) -> String {
        let seq = self.sim_seq.fetch_add(1, Ordering::Relaxed);
        format!("SIM-{kind}-{seq:06}")
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base_url)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> SyncResult {
        self.send(path, self.http.post(self.url(path)).json(body)).await
    }

    async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> SyncResult {
        self.send(path, self.http.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> SyncResult {
        self.send(path, self.http.delete(self.url(path))).await
    }

    async fn get(&self, path: &str) -> SyncResult {
        self.send(path, self.http.get(self.url(path))).await
    }

    async fn send(&self, path: &str, builder: reqwest::RequestBuilder) -> SyncResult {
        let builder = match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        };
        debug!(path, "verifactu request");
        match builder.send().await {
            Ok(response) => self.handle_response(path, response).await,
            Err(e) if e.is_timeout() => {
                warn!(path, "verifactu request timed out");
                SyncResult::failure("timeout", false)
            }
            Err(e) => {
                warn!(path, error = %e, "verifactu request failed");
                SyncResult::failure(format!("transport error: {e}"), false)
            }
        }
    }

    async fn handle_response(&self, path: &str, response: reqwest::Response) -> SyncResult {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(path, %status, "verifactu request rejected");
            return SyncResult::failure(format!("HTTP {status}: {body}"), false);
        }
        if body.trim().is_empty() {
            return SyncResult::success(false);
        }
        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(api) => {
                let mut result = SyncResult::success(false);
                result.external_id = api.id;
                result.status = api.status;
                result.message = api.message;
                result
            }
            Err(e) => SyncResult::failure(format!("unparseable response: {e}"), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_ids_are_monotonic() {
        let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
        assert_eq!(client.next_sim_id("C"), "SIM-C-000001");
        assert_eq!(client.next_sim_id("F"), "SIM-F-000002");
        assert_eq!(client.next_sim_id("F"), "SIM-F-000003");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = EngineConfig::live("https://api.example.es/v1/", "secret").unwrap();
        let client = VerifactuClient::with_http_client(config, Client::new());
        assert_eq!(client.url("customers"), "https://api.example.es/v1/customers");
    }
}
