//! Outbound e-invoice payload.
//!
//! Field order below is the wire order: the payload serializes with
//! `serde_json` compact separators, the resulting bytes are what gets
//! signed, and the SAME bytes are transmitted. Nothing may re-serialize
//! between signing and sending.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::InvoiceWithLines;

/// E-invoice payload submitted to the authority gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EInvoicePayload {
    /// Supplier legal name (filled by the embedding deployment).
    pub supplier_name: Option<String>,
    /// Supplier GSTIN.
    pub supplier_gstin: Option<String>,
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date (ISO 8601 date).
    pub date: String,
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
    /// Import-Export Code.
    pub iec: Option<String>,
    /// Invoice currency code.
    pub currency: String,
    /// Sum of line amounts.
    pub total_amount: Decimal,
    /// Invoice lines.
    pub lines: Vec<PayloadLine>,
}

/// One line of the outbound payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadLine {
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

impl EInvoicePayload {
    /// Builds the payload from a stored invoice and its lines.
    #[must_use]
    pub fn from_invoice(invoice: &InvoiceWithLines) -> Self {
        let header = &invoice.invoice;
        Self {
            supplier_name: None,
            supplier_gstin: None,
            invoice_number: header.invoice_number.clone(),
            date: header.invoice_date.to_string(),
            customer_name: header.customer_name.clone(),
            customer_gstin: header.customer_gstin.clone(),
            place_of_supply: header.place_of_supply.clone(),
            is_export: header.is_export,
            lut_applicable: header.lut_applicable,
            iec: header.iec.clone(),
            currency: header.currency.clone(),
            total_amount: invoice.total_amount(),
            lines: invoice
                .lines
                .iter()
                .map(|l| PayloadLine {
                    description: l.description.clone(),
                    quantity: l.quantity,
                    unit_rate: l.unit_rate,
                    amount: l.amount,
                    igst: l.igst,
                    cgst: l.cgst,
                    sgst: l.sgst,
                })
                .collect(),
        }
    }

    /// Serializes to the canonical byte form used for both signing and
    /// transmission.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialization fails.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::einvoice::status::EInvoiceStatus;
    use crate::einvoice::types::{InvoiceLineRecord, InvoiceRecord};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_invoice() -> InvoiceWithLines {
        InvoiceWithLines {
            invoice: InvoiceRecord {
                id: Uuid::new_v4(),
                invoice_number: "EXP-2026-017".to_string(),
                invoice_date: NaiveDate::from_ymd_opt(2026, 4, 12).unwrap(),
                customer_name: Some("Acme GmbH".to_string()),
                customer_gstin: None,
                place_of_supply: Some("96".to_string()),
                is_export: true,
                lut_applicable: true,
                iec: Some("IEC-9001".to_string()),
                currency: "USD".to_string(),
                einvoice_irn: None,
                einvoice_status: EInvoiceStatus::Draft,
            },
            lines: vec![InvoiceLineRecord {
                description: Some("consulting".to_string()),
                quantity: dec!(10),
                unit_rate: dec!(100),
                amount: dec!(1000),
                igst: dec!(0),
                cgst: dec!(0),
                sgst: dec!(0),
            }],
        }
    }

    #[test]
    fn test_payload_totals_and_flags() {
        let payload = EInvoicePayload::from_invoice(&sample_invoice());
        assert_eq!(payload.invoice_number, "EXP-2026-017");
        assert_eq!(payload.date, "2026-04-12");
        assert_eq!(payload.total_amount, dec!(1000));
        assert!(payload.is_export);
        assert!(payload.lut_applicable);
        assert_eq!(payload.lines.len(), 1);
    }

    #[test]
    fn test_canonical_bytes_are_compact_and_stable() {
        let payload = EInvoicePayload::from_invoice(&sample_invoice());
        let first = payload.to_canonical_bytes().unwrap();
        let second = payload.to_canonical_bytes().unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        // Compact separators, no pretty-printing.
        assert!(!text.contains(": "));
        assert!(!text.contains('\n'));
        // Field order starts with the supplier block.
        assert!(text.starts_with("{\"supplier_name\""));
    }
}
