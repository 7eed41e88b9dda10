use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::types::{Customer, Invoice};
use crate::nif;

/// IVA rates in force (general, reduced, super-reduced, exempt).
fn is_known_iva_rate(rate: Decimal) -> bool {
    rate == dec!(0) || rate == dec!(4) || rate == dec!(10) || rate == dec!(21)
}

/// Validate a customer record before it is sent to the remote system.
/// Returns all validation errors found (not just the first).
#[must_use]
pub fn validate_customer(customer: &Customer) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if customer.local_id.trim().is_empty() {
        errors.push(ValidationError::new("local_id", "local id must not be empty"));
    }
    if customer.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "name must not be empty"));
    }
    if !nif::validate(&customer.fiscal_id) {
        errors.push(ValidationError::new(
            "fiscal_id",
            format!("'{}' is not a valid NIF/NIE/CIF", customer.fiscal_id),
        ));
    }
    if customer.address.city.trim().is_empty() {
        errors.push(ValidationError::new("address.city", "city must not be empty"));
    }
    if customer.address.postal_code.trim().is_empty() {
        errors.push(ValidationError::new(
            "address.postal_code",
            "postal code must not be empty",
        ));
    }
    if customer.address.country_code.len() != 2 {
        errors.push(ValidationError::new(
            "address.country_code",
            "country code must be 2 characters (ISO 3166-1)",
        ));
    }

    errors
}

/// Validate an invoice record before it is sent to the remote system.
/// Returns all validation errors found (not just the first).
#[must_use]
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.local_id.trim().is_empty() {
        errors.push(ValidationError::new("local_id", "local id must not be empty"));
    }
    if invoice.number.trim().is_empty() {
        errors.push(ValidationError::new("number", "invoice number must not be empty"));
    }
    if invoice.customer_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "customer_name",
            "customer name must not be empty",
        ));
    }
    if !nif::validate(&invoice.customer_fiscal_id) {
        errors.push(ValidationError::new(
            "customer_fiscal_id",
            format!("'{}' is not a valid NIF/NIE/CIF", invoice.customer_fiscal_id),
        ));
    }
    if invoice.lines.is_empty() {
        errors.push(ValidationError::new("lines", "invoice must have at least one line"));
    }

    for (i, line) in invoice.lines.iter().enumerate() {
        if line.description.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("lines[{i}].description"),
                "description must not be empty",
            ));
        }
        if line.quantity <= Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("lines[{i}].quantity"),
                "quantity must be positive",
            ));
        }
        if line.unit_price < Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("lines[{i}].unit_price"),
                "unit price must not be negative",
            ));
        }
        if !is_known_iva_rate(line.iva_rate) {
            errors.push(ValidationError::new(
                format!("lines[{i}].iva_rate"),
                format!("'{}' is not a known IVA rate (0, 4, 10, 21)", line.iva_rate),
            ));
        }
    }

    errors
}
