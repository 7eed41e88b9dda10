//! Typed wire representations of the remote API.
//!
//! The remote API speaks camelCase JSON; the conversions from the domain
//! types are total and pure, so the live and simulated paths shape
//! payloads identically.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{Customer, Invoice, InvoiceLine};

/// Customer payload sent on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub name: String,
    pub tax_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    pub city: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Invoice line payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLinePayload {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub amount: Decimal,
}

/// Invoice payload sent on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub number: String,
    pub issue_date: NaiveDate,
    pub customer_name: String,
    pub customer_tax_id: String,
    pub lines: Vec<InvoiceLinePayload>,
    pub net_total: Decimal,
    pub tax_total: Decimal,
    pub gross_total: Decimal,
}

/// Body of an invoice cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub reason: String,
}

/// Response body shared by all remote operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Identifier assigned by the remote system.
    pub id: Option<String>,
    /// Remote processing status ("pending", "processing", "accepted", ...).
    pub status: Option<String>,
    /// Informational message.
    pub message: Option<String>,
}

/// Shape a customer record for the wire.
#[must_use]
pub fn customer_payload(customer: &Customer) -> CustomerPayload {
    CustomerPayload {
        name: customer.name.clone(),
        tax_id: crate::nif::normalize(&customer.fiscal_id),
        street: customer.address.street.clone(),
        city: customer.address.city.clone(),
        postal_code: customer.address.postal_code.clone(),
        province: customer.address.province.clone(),
        country_code: customer.address.country_code.clone(),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
    }
}

/// Shape an invoice record for the wire, including computed totals.
#[must_use]
pub fn invoice_payload(invoice: &Invoice) -> InvoicePayload {
    InvoicePayload {
        number: invoice.number.clone(),
        issue_date: invoice.issue_date,
        customer_name: invoice.customer_name.clone(),
        customer_tax_id: crate::nif::normalize(&invoice.customer_fiscal_id),
        lines: invoice.lines.iter().map(line_payload).collect(),
        net_total: invoice.net_total(),
        tax_total: invoice.iva_total(),
        gross_total: invoice.gross_total(),
    }
}

fn line_payload(line: &InvoiceLine) -> InvoiceLinePayload {
    InvoiceLinePayload {
        description: line.description.clone(),
        quantity: line.quantity,
        unit_price: line.unit_price,
        tax_rate: line.iva_rate,
        amount: line.net_amount(),
    }
}
