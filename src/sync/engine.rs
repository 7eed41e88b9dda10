//! Entity-level synchronization orchestration.
//!
//! Owns the per-entity state machine (`Draft → Pending → Submitted →
//! Accepted | Rejected`, with `Cancelled` and `Error` branches), decides
//! when to call the client, and merges every result back into the local
//! state. Mutating operations on the same entity are serialized through a
//! per-entity async mutex; distinct entities synchronize fully in
//! parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::{
    Customer, Invoice, SyncResult, SyncStatus, VerifactuError, join_validation_errors,
    validate_customer, validate_invoice,
};

use super::client::VerifactuClient;

/// Default interval between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What kind of record an entity key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Invoice,
}

/// Synchronization state of one local entity, merged after every remote
/// call. The local business record itself is owned by the caller and is
/// never touched here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntityState {
    /// Current position in the sync lifecycle.
    pub status: SyncStatus,
    /// Identifier assigned by the external system, once known.
    pub external_id: Option<String>,
    /// Last informational message from the remote system.
    pub last_message: Option<String>,
    /// Last error description, if the most recent call failed.
    pub last_error: Option<String>,
    /// Whether the most recent result came from the stub path.
    pub simulated: bool,
    /// When this state last changed.
    pub updated_at: DateTime<Utc>,
}

impl EntityState {
    fn new() -> Self {
        Self {
            status: SyncStatus::Draft,
            external_id: None,
            last_message: None,
            last_error: None,
            simulated: false,
            updated_at: Utc::now(),
        }
    }
}

type EntityCell = Arc<AsyncMutex<EntityState>>;

/// Synchronization orchestrator.
///
/// Failure policy is local-first: a remote failure degrades the entity to
/// [`SyncStatus::Error`] and is reported in the returned snapshot, never
/// as an `Err` — the caller's local write must not be rolled back. `Err`
/// is reserved for local validation failures and invalid state
/// transitions, both of which are detected before any network call.
pub struct SyncEngine {
    client: Arc<VerifactuClient>,
    entities: Mutex<HashMap<(EntityKind, String), EntityCell>>,
}

impl SyncEngine {
    /// Create an engine around a configured client.
    #[must_use]
    pub fn new(client: VerifactuClient) -> Self {
        Self {
            client: Arc::new(client),
            entities: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &VerifactuClient {
        &self.client
    }

    /// Snapshot of an entity's sync state, if the engine has seen it.
    pub async fn state(&self, kind: EntityKind, local_id: &str) -> Option<EntityState> {
        let cell = {
            let entities = self.entities.lock().expect("entity registry poisoned");
            entities.get(&(kind, local_id.to_string())).cloned()
        }?;
        Some(cell.lock().await.clone())
    }

    // ── Customers ─────────────────────────────────────────────────────

    /// Register a customer remotely. `Draft → Pending` on success; a
    /// remote failure leaves the snapshot in `Error`.
    pub async fn create_customer(&self, customer: &Customer) -> Result<EntityState, VerifactuError> {
        Self::check_valid(validate_customer(customer))?;
        let cell = self.entry(EntityKind::Customer, &customer.local_id);
        let mut state = cell.lock().await;
        Self::check_transition(&state, SyncStatus::Pending)?;
        let result = self.client.create_customer(customer).await;
        Self::apply(&mut state, &result, SyncStatus::Pending);
        Ok(state.clone())
    }

    /// Push local changes to an already-registered customer.
    pub async fn update_customer(&self, customer: &Customer) -> Result<EntityState, VerifactuError> {
        Self::check_valid(validate_customer(customer))?;
        let cell = self.entry(EntityKind::Customer, &customer.local_id);
        let mut state = cell.lock().await;
        let external_id = Self::require_external_id(&state)?;
        Self::check_transition(&state, SyncStatus::Pending)?;
        let result = self.client.update_customer(&external_id, customer).await;
        Self::apply(&mut state, &result, SyncStatus::Pending);
        Ok(state.clone())
    }

    /// Soft-delete a customer remotely. The local record survives; the
    /// sync state moves to `Cancelled`.
    pub async fn delete_customer(&self, local_id: &str) -> Result<EntityState, VerifactuError> {
        let cell = self.entry(EntityKind::Customer, local_id);
        let mut state = cell.lock().await;
        if !state.status.can_cancel() {
            return Err(VerifactuError::InvalidTransition {
                from: state.status,
                to: SyncStatus::Cancelled,
            });
        }
        let external_id = Self::require_external_id(&state)?;
        let result = self.client.delete_customer(&external_id).await;
        Self::apply(&mut state, &result, SyncStatus::Cancelled);
        Ok(state.clone())
    }

    // ── Invoices ──────────────────────────────────────────────────────

    /// Register an invoice remotely. `Draft → Pending` on success; also
    /// the re-entry point for a corrected resubmission after `Rejected`
    /// or `Error`.
    pub async fn create_invoice(&self, invoice: &Invoice) -> Result<EntityState, VerifactuError> {
        Self::check_valid(validate_invoice(invoice))?;
        let cell = self.entry(EntityKind::Invoice, &invoice.local_id);
        let mut state = cell.lock().await;
        Self::check_transition(&state, SyncStatus::Pending)?;
        let result = self.client.create_invoice(invoice).await;
        Self::apply(&mut state, &result, SyncStatus::Pending);
        Ok(state.clone())
    }

    /// Push local changes to an already-registered invoice.
    pub async fn update_invoice(&self, invoice: &Invoice) -> Result<EntityState, VerifactuError> {
        Self::check_valid(validate_invoice(invoice))?;
        let cell = self.entry(EntityKind::Invoice, &invoice.local_id);
        let mut state = cell.lock().await;
        let external_id = Self::require_external_id(&state)?;
        Self::check_transition(&state, SyncStatus::Pending)?;
        let result = self.client.update_invoice(&external_id, invoice).await;
        Self::apply(&mut state, &result, SyncStatus::Pending);
        Ok(state.clone())
    }

    /// Hand a pending invoice to the tax authority's pipeline.
    /// `Pending → Submitted`; local transition, no remote call — the
    /// remote side received the invoice at create time and progresses it
    /// asynchronously from here.
    pub async fn submit_invoice(&self, local_id: &str) -> Result<EntityState, VerifactuError> {
        let cell = self.entry(EntityKind::Invoice, local_id);
        let mut state = cell.lock().await;
        if state.status != SyncStatus::Pending {
            return Err(VerifactuError::InvalidTransition {
                from: state.status,
                to: SyncStatus::Submitted,
            });
        }
        state.status = SyncStatus::Submitted;
        state.updated_at = Utc::now();
        Ok(state.clone())
    }

    /// Cancel an invoice with a human-readable reason. Valid from
    /// `Pending` or `Submitted` only.
    pub async fn cancel_invoice(
        &self,
        local_id: &str,
        reason: &str,
    ) -> Result<EntityState, VerifactuError> {
        let cell = self.entry(EntityKind::Invoice, local_id);
        let mut state = cell.lock().await;
        if !state.status.can_cancel() {
            return Err(VerifactuError::InvalidTransition {
                from: state.status,
                to: SyncStatus::Cancelled,
            });
        }
        let external_id = Self::require_external_id(&state)?;
        let result = self.client.cancel_invoice(&external_id, reason).await;
        Self::apply(&mut state, &result, SyncStatus::Cancelled);
        Ok(state.clone())
    }

    /// Poll the remote status of an invoice once and merge the outcome.
    /// `accepted` / `rejected` from the remote pipeline move the entity
    /// to its terminal state; other statuses leave it where it is.
    pub async fn check_invoice(&self, local_id: &str) -> Result<EntityState, VerifactuError> {
        let cell = self.entry(EntityKind::Invoice, local_id);
        let mut state = cell.lock().await;
        let external_id = Self::require_external_id(&state)?;
        let result = self.client.invoice_status(&external_id).await;
        state.simulated = result.simulated;
        state.updated_at = Utc::now();
        if result.success {
            state.last_error = None;
            if let Some(message) = &result.message {
                state.last_message = Some(message.clone());
            }
            let remote = match result.status.as_deref() {
                Some("accepted") => Some(SyncStatus::Accepted),
                Some("rejected") => Some(SyncStatus::Rejected),
                _ => None,
            };
            if let Some(next) = remote {
                if state.status.can_transition(next) {
                    debug!(local_id, from = ?state.status, to = ?next, "invoice status changed");
                    state.status = next;
                }
            }
        } else {
            state.status = SyncStatus::Error;
            state.last_error = result.error.clone();
        }
        Ok(state.clone())
    }

    /// Spawn a polling loop that checks an invoice on a fixed interval
    /// ([`DEFAULT_POLL_INTERVAL`] is a sensible choice) until a terminal
    /// status is observed or the watch is cancelled.
    ///
    /// The first poll happens immediately. Cancellation via
    /// [`StatusWatch::stop`] is deterministic: once it resolves, no timer
    /// remains.
    #[must_use]
    pub fn watch_invoice(
        self: &Arc<Self>,
        local_id: impl Into<String>,
        interval: Duration,
    ) -> StatusWatch {
        let engine = Arc::clone(self);
        let local_id = local_id.into();
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    () = child.cancelled() => {
                        debug!(%local_id, "status watch cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        match engine.check_invoice(&local_id).await {
                            Ok(state) if state.status.is_terminal() => {
                                debug!(%local_id, status = ?state.status, "status watch reached terminal state");
                                break;
                            }
                            Ok(_) => {}
                            Err(e) => {
                                warn!(%local_id, error = %e, "status watch aborted");
                                break;
                            }
                        }
                    }
                }
            }
        });
        StatusWatch { token, handle }
    }

    // ── Shared plumbing ───────────────────────────────────────────────

    fn entry(&self, kind: EntityKind, local_id: &str) -> EntityCell {
        let mut entities = self.entities.lock().expect("entity registry poisoned");
        entities
            .entry((kind, local_id.to_string()))
            .or_insert_with(|| Arc::new(AsyncMutex::new(EntityState::new())))
            .clone()
    }

    fn check_valid(errors: Vec<crate::core::ValidationError>) -> Result<(), VerifactuError> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(VerifactuError::Validation(join_validation_errors(&errors)))
        }
    }

    fn check_transition(state: &EntityState, to: SyncStatus) -> Result<(), VerifactuError> {
        if state.status.can_transition(to) {
            Ok(())
        } else {
            Err(VerifactuError::InvalidTransition {
                from: state.status,
                to,
            })
        }
    }

    fn require_external_id(state: &EntityState) -> Result<String, VerifactuError> {
        state.external_id.clone().ok_or_else(|| {
            VerifactuError::Validation("entity has no external id yet; create it first".into())
        })
    }

    fn apply(state: &mut EntityState, result: &SyncResult, on_success: SyncStatus) {
        state.simulated = result.simulated;
        state.updated_at = Utc::now();
        if result.success {
            if let Some(id) = &result.external_id {
                state.external_id = Some(id.clone());
            }
            state.status = on_success;
            state.last_message = result.message.clone();
            state.last_error = None;
        } else {
            state.status = SyncStatus::Error;
            state.last_error = result.error.clone();
        }
    }
}

/// Handle to a running status-polling loop.
#[derive(Debug)]
pub struct StatusWatch {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl StatusWatch {
    /// Signal the loop to stop without waiting for it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the loop to finish on its own (terminal status observed).
    pub async fn join(self) {
        let _ = self.handle.await;
    }

    /// Cancel the loop and wait until it has fully stopped.
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }

    /// Whether the loop has already finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::config::EngineConfig;

    fn engine() -> SyncEngine {
        SyncEngine::new(VerifactuClient::new(EngineConfig::simulated()).unwrap())
    }

    #[tokio::test]
    async fn unknown_entity_has_no_state() {
        assert!(engine().state(EntityKind::Invoice, "nope").await.is_none());
    }

    #[tokio::test]
    async fn submit_requires_pending() {
        let engine = engine();
        let err = engine.submit_invoice("inv-1").await.unwrap_err();
        assert!(matches!(
            err,
            VerifactuError::InvalidTransition {
                from: SyncStatus::Draft,
                to: SyncStatus::Submitted
            }
        ));
    }

    #[tokio::test]
    async fn check_requires_external_id() {
        let engine = engine();
        assert!(matches!(
            engine.check_invoice("inv-1").await.unwrap_err(),
            VerifactuError::Validation(_)
        ));
    }
}
