//! Verifactu synchronization engine.
//!
//! Wraps every create/update/cancel/status operation sent to the external
//! tax-compliance backend. The engine runs in one of two modes, resolved
//! once from configuration: **Live** (real HTTP calls) or **Simulated**
//! (no credential configured — the stub path runs the same validation and
//! shaping, fabricates external identifiers, and flags every result with
//! `simulated = true`).
//!
//! Failure policy is local-first: the caller's local write has already
//! happened by the time a remote call is attempted, so a remote failure
//! degrades the entity's [`SyncStatus`](crate::core::SyncStatus) to
//! `Error` but never rolls anything back and never aborts the caller.
//!
//! # Example
//!
//! ```ignore
//! use verifactu::sync::{EngineConfig, SyncEngine, VerifactuClient};
//!
//! let engine = SyncEngine::new(VerifactuClient::new(EngineConfig::simulated())?);
//!
//! let state = engine.create_invoice(&invoice).await?;
//! engine.submit_invoice(&invoice.local_id).await?;
//! let state = engine.check_invoice(&invoice.local_id).await?;
//! assert!(state.simulated);
//! ```

mod client;
mod config;
mod engine;
mod wire;

pub use client::VerifactuClient;
pub use config::{DEFAULT_TIMEOUT, EngineConfig, EngineMode};
pub use engine::{DEFAULT_POLL_INTERVAL, EntityKind, EntityState, StatusWatch, SyncEngine};
pub use wire::{
    ApiResponse, CancelRequest, CustomerPayload, InvoiceLinePayload, InvoicePayload,
    customer_payload, invoice_payload,
};
