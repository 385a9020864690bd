//! Invoice domain types shared between the core services and the store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditEvent;
use super::status::EInvoiceStatus;

/// An invoice header as held by the store.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRecord {
    /// The invoice ID.
    pub id: Uuid,
    /// Unique invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer GSTIN.
    pub customer_gstin: Option<String>,
    /// Place of supply.
    pub place_of_supply: Option<String>,
    /// Export invoice flag.
    pub is_export: bool,
    /// Letter-of-Undertaking concession flag.
    pub lut_applicable: bool,
    /// Import-Export Code, for export invoices.
    pub iec: Option<String>,
    /// Invoice currency code.
    pub currency: String,
    /// IRN assigned by the authority, once submitted.
    pub einvoice_irn: Option<String>,
    /// Current lifecycle status.
    pub einvoice_status: EInvoiceStatus,
}

/// One invoice line as held by the store.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLineRecord {
    /// Line description.
    pub description: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Rate per unit.
    pub unit_rate: Decimal,
    /// Line amount.
    pub amount: Decimal,
    /// Integrated GST component.
    pub igst: Decimal,
    /// Central GST component.
    pub cgst: Decimal,
    /// State GST component.
    pub sgst: Decimal,
}

/// An invoice together with its lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithLines {
    /// The invoice header.
    pub invoice: InvoiceRecord,
    /// The invoice lines.
    pub lines: Vec<InvoiceLineRecord>,
}

impl InvoiceWithLines {
    /// Sum of the line amounts.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceInput {
    /// Unique invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer GSTIN.
    pub customer_gstin: Option<String>,
    /// Place of supply.
    pub place_of_supply: Option<String>,
    /// Export invoice flag.
    #[serde(default)]
    pub is_export: bool,
    /// Letter-of-Undertaking concession flag.
    #[serde(default)]
    pub lut_applicable: bool,
    /// Import-Export Code.
    pub iec: Option<String>,
    /// Invoice currency code.
    pub currency: String,
    /// Invoice lines.
    pub lines: Vec<InvoiceLineInput>,
}

/// Input for one invoice line.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceLineInput {
    /// Line description.
    pub description: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Rate per unit.
    pub unit_rate: Decimal,
    /// Line amount.
    pub amount: Decimal,
    /// Integrated GST component.
    #[serde(default)]
    pub igst: Decimal,
    /// Central GST component.
    #[serde(default)]
    pub cgst: Decimal,
    /// State GST component.
    #[serde(default)]
    pub sgst: Decimal,
}

/// A stored signed-document reference.
#[derive(Debug, Clone, Serialize)]
pub struct SignedDocumentRecord {
    /// The document ID.
    pub id: Uuid,
    /// The invoice the document belongs to.
    pub invoice_id: Uuid,
    /// Original filename.
    pub filename: String,
    /// Object-store locator.
    pub locator: String,
    /// When the document was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// Point-in-time lifecycle view of an invoice.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// The invoice ID.
    pub invoice_id: Uuid,
    /// IRN, once assigned.
    pub einvoice_irn: Option<String>,
    /// Current lifecycle status.
    pub status: EInvoiceStatus,
    /// Most recent audit events, newest first.
    pub events: Vec<AuditEvent>,
}
