//! # verifactu
//!
//! Spanish fiscal identifier validation (NIF/NIE/CIF) and synchronization
//! with the Verifactu tax-compliance backend.
//!
//! The crate has two halves: a pure validator for Spanish fiscal
//! identifiers, and a sync engine that mirrors local customer and invoice
//! records into the remote tax-authority system. The engine runs in
//! *Simulated* mode when no API credential is configured — every operation
//! goes through the same validation and shaping as the live path, but no
//! network call is made and every result carries `simulated = true`.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use verifactu::nif::{self, FiscalIdKind};
//!
//! assert!(nif::validate("12345678Z"));
//! assert!(!nif::validate("12345678A"));
//! assert_eq!(nif::classify("X1234567L"), FiscalIdKind::Nie);
//! assert_eq!(nif::classify("A28015865"), FiscalIdKind::Cif);
//! ```
//!
//! Synchronization (requires the `sync` feature):
//!
//! ```ignore
//! use verifactu::sync::{EngineConfig, SyncEngine, VerifactuClient};
//!
//! let config = EngineConfig::from_env()?;
//! let engine = SyncEngine::new(VerifactuClient::new(config)?);
//!
//! let state = engine.create_customer(&customer).await?;
//! assert!(state.simulated || state.external_id.is_some());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Fiscal identifier validation, domain types, document validation |
//! | `sync` | Verifactu sync client and orchestration engine |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod nif;

#[cfg(feature = "sync")]
pub mod sync;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
