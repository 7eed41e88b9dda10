use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Postal address of a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: Option<String>,
    /// City.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Province (e.g. "Madrid", "Barcelona").
    pub province: Option<String>,
    /// Country code (ISO 3166-1 alpha-2, "ES" for domestic customers).
    pub country_code: String,
}

/// A customer record as shaped by the local system of record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Identifier owned by the local system.
    pub local_id: String,
    /// Legal or trading name.
    pub name: String,
    /// Spanish fiscal identifier (NIF, NIE, or CIF).
    pub fiscal_id: String,
    /// Postal address.
    pub address: Address,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// A single invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// What was sold.
    pub description: String,
    /// Invoiced quantity.
    pub quantity: Decimal,
    /// Net price per unit.
    pub unit_price: Decimal,
    /// IVA rate percentage (0, 4, 10, or 21).
    pub iva_rate: Decimal,
}

impl InvoiceLine {
    /// Net line amount (quantity × unit price).
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// IVA amount for this line.
    #[must_use]
    pub fn iva_amount(&self) -> Decimal {
        self.net_amount() * self.iva_rate / Decimal::ONE_HUNDRED
    }
}

/// An invoice record as shaped by the local system of record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Identifier owned by the local system.
    pub local_id: String,
    /// Invoice number (series + sequential, e.g. "FAC-2026-001").
    pub number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Customer name.
    pub customer_name: String,
    /// Customer fiscal identifier (NIF, NIE, or CIF).
    pub customer_fiscal_id: String,
    /// Invoice lines.
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Sum of net line amounts.
    #[must_use]
    pub fn net_total(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::net_amount).sum()
    }

    /// Sum of IVA amounts.
    #[must_use]
    pub fn iva_total(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::iva_amount).sum()
    }

    /// Gross total (net + IVA).
    #[must_use]
    pub fn gross_total(&self) -> Decimal {
        self.net_total() + self.iva_total()
    }
}

/// Lifecycle state of a local entity's relationship with the remote
/// tax-authority system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Exists locally only; nothing sent to the remote system yet.
    Draft,
    /// Registered remotely; customers stay here once synced.
    Pending,
    /// Handed to the tax authority's processing pipeline (invoices).
    Submitted,
    /// The tax authority accepted the submission.
    Accepted,
    /// The tax authority rejected the submission.
    Rejected,
    /// Cancelled by the caller with a reason.
    Cancelled,
    /// A remote call failed; the local record is intact.
    Error,
}

impl SyncStatus {
    /// Terminal for the current submission cycle.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Cancelled)
    }

    /// Whether a cancel request is allowed from this state.
    #[must_use]
    pub fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Submitted)
    }

    /// Whether the state machine allows moving from `self` to `to`.
    ///
    /// Rejected, cancelled, and errored entities may start a new cycle by
    /// returning to `Pending`; an accepted submission is settled and
    /// allows no further transitions.
    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        if self == to {
            return true;
        }
        match self {
            Self::Draft => matches!(to, Self::Pending | Self::Error),
            Self::Pending => matches!(
                to,
                Self::Submitted | Self::Accepted | Self::Rejected | Self::Cancelled | Self::Error
            ),
            Self::Submitted => {
                matches!(to, Self::Accepted | Self::Rejected | Self::Cancelled | Self::Error)
            }
            Self::Accepted => false,
            Self::Rejected | Self::Cancelled => matches!(to, Self::Pending),
            Self::Error => !matches!(to, Self::Draft),
        }
    }
}

/// Normalized outcome of any remote (or simulated) call.
///
/// `success == false` implies `error` is set; the constructors enforce it.
/// `simulated` is true whenever the result was served by the stub path
/// rather than a live HTTP request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Identifier assigned by the external system, if any.
    pub external_id: Option<String>,
    /// Remote-side status string ("pending", "accepted", ...).
    pub status: Option<String>,
    /// Informational message from the remote system.
    pub message: Option<String>,
    /// Error description; always present when `success` is false.
    pub error: Option<String>,
    /// Whether the stub path served this result.
    pub simulated: bool,
}

impl SyncResult {
    /// A successful result.
    #[must_use]
    pub fn success(simulated: bool) -> Self {
        Self {
            success: true,
            external_id: None,
            status: None,
            message: None,
            error: None,
            simulated,
        }
    }

    /// A failed result with a non-empty error description.
    #[must_use]
    pub fn failure(error: impl Into<String>, simulated: bool) -> Self {
        let error = error.into();
        Self {
            success: false,
            external_id: None,
            status: None,
            message: None,
            error: Some(if error.is_empty() {
                "unknown error".into()
            } else {
                error
            }),
            simulated,
        }
    }

    /// Attach the external identifier.
    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Attach the remote status string.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Attach an informational message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// For callers that prefer `Result`-style handling: a failed call maps
    /// to [`VerifactuError::Transport`](crate::core::VerifactuError), and a
    /// business rejection reported by the remote pipeline maps to
    /// `Rejected` — the two need different follow-ups (retry later vs
    /// correct and resubmit).
    #[must_use]
    pub fn as_error(&self) -> Option<super::error::VerifactuError> {
        use super::error::VerifactuError;
        if let Some(error) = &self.error {
            return Some(VerifactuError::Transport(error.clone()));
        }
        if self.status.as_deref() == Some("rejected") {
            return Some(VerifactuError::Rejected(
                self.message
                    .clone()
                    .unwrap_or_else(|| "submission rejected".into()),
            ));
        }
        None
    }
}
