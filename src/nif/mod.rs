//! Spanish fiscal identifier validation.
//!
//! Classifies and checksum-validates the three identifier families used by
//! the Spanish tax administration: NIF (individuals), NIE (foreign
//! residents), and CIF (organizations).
//!
//! # Example
//!
//! ```rust
//! use verifactu::nif::{self, FiscalIdKind};
//!
//! assert!(nif::validate("12345678Z"));
//! assert_eq!(nif::classify("X1234567L"), FiscalIdKind::Nie);
//! assert_eq!(nif::classify("not an id"), FiscalIdKind::Invalid);
//!
//! // Compute the check letter for a DNI number
//! assert_eq!(nif::check_letter(12_345_678), 'Z');
//! ```

mod validate;

pub use validate::{FiscalIdKind, check_letter, classify, normalize, validate};
