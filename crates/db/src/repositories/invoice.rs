//! Invoice repository implementing the e-invoice store seam.
//!
//! Every status or IRN mutation validates the lifecycle transition against
//! the stored row and appends its audit event inside the same transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use gstbooks_core::einvoice::{
    AuditEvent, AuditEventKind, CreateInvoiceInput, EInvoiceError, EInvoiceStatus, EInvoiceStore,
    InvoiceLineRecord, InvoiceRecord, InvoiceWithLines, SignedDocumentRecord, StatusSnapshot,
};

use crate::entities::{einvoice_audit_events, invoice_lines, invoices, signed_documents};

/// GSTR-1 period summary: taxable value and tax totals by component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gstr1Summary {
    /// Sum of line amounts across the period.
    pub total_taxable: Decimal,
    /// Sum of IGST across the period.
    pub total_igst: Decimal,
    /// Sum of CGST across the period.
    pub total_cgst: Decimal,
    /// Sum of SGST across the period.
    pub total_sgst: Decimal,
    /// Number of invoices in the period.
    pub invoice_count: u64,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Summarizes invoices in a date range for a basic GSTR-1 report.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn gstr1_summary(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Gstr1Summary, EInvoiceError> {
        let period_invoices = invoices::Entity::find()
            .filter(invoices::Column::InvoiceDate.gte(period_start))
            .filter(invoices::Column::InvoiceDate.lte(period_end))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut summary = Gstr1Summary {
            total_taxable: Decimal::ZERO,
            total_igst: Decimal::ZERO,
            total_cgst: Decimal::ZERO,
            total_sgst: Decimal::ZERO,
            invoice_count: period_invoices.len() as u64,
        };

        for invoice in &period_invoices {
            let lines = lines_for(&self.db, invoice.id).await.map_err(db_err)?;
            for line in lines {
                summary.total_taxable += line.amount;
                summary.total_igst += line.igst;
                summary.total_cgst += line.cgst;
                summary.total_sgst += line.sgst;
            }
        }
        Ok(summary)
    }
}

impl EInvoiceStore for InvoiceRepository {
    async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice_number = input.invoice_number.clone();
        let model = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(input.invoice_number),
            invoice_date: Set(input.invoice_date),
            customer_name: Set(input.customer_name),
            customer_gstin: Set(input.customer_gstin),
            place_of_supply: Set(input.place_of_supply),
            is_export: Set(input.is_export),
            lut_applicable: Set(input.lut_applicable),
            iec: Set(input.iec),
            currency: Set(input.currency.to_uppercase()),
            einvoice_irn: Set(None),
            einvoice_status: Set(EInvoiceStatus::Draft.as_str().to_string()),
        }
        .insert(&txn)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                EInvoiceError::DuplicateInvoiceNumber(invoice_number)
            }
            _ => db_err(err),
        })?;

        for line in input.lines {
            invoice_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(model.id),
                description: Set(line.description),
                quantity: Set(line.quantity),
                unit_rate: Set(line.unit_rate),
                amount: Set(line.amount),
                igst: Set(line.igst),
                cgst: Set(line.cgst),
                sgst: Set(line.sgst),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        to_record(model)
    }

    async fn load_invoice(&self, invoice_id: Uuid) -> Result<InvoiceWithLines, EInvoiceError> {
        let model = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(EInvoiceError::InvoiceNotFound(invoice_id))?;

        let lines = lines_for(&self.db, invoice_id)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(to_line_record)
            .collect();

        Ok(InvoiceWithLines {
            invoice: to_record(model)?,
            lines,
        })
    }

    async fn mark_submitted(
        &self,
        invoice_id: Uuid,
        irn: &str,
        status: EInvoiceStatus,
        details: &str,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(EInvoiceError::InvoiceNotFound(invoice_id))?;
        parse_status(&model.einvoice_status)?.ensure_transition_to(status)?;

        let mut active: invoices::ActiveModel = model.into();
        active.einvoice_irn = Set(Some(irn.to_string()));
        active.einvoice_status = Set(status.as_str().to_string());
        let updated = active.update(&txn).await.map_err(db_err)?;

        insert_audit_on(&txn, invoice_id, AuditEventKind::IrnAssigned, details)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        to_record(updated)
    }

    async fn update_status_by_irn(
        &self,
        irn: &str,
        status: EInvoiceStatus,
        details: &str,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = invoices::Entity::find()
            .filter(invoices::Column::EinvoiceIrn.eq(irn))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| EInvoiceError::InvoiceNotFoundForIrn(irn.to_string()))?;
        parse_status(&model.einvoice_status)?.ensure_transition_to(status)?;

        let invoice_id = model.id;
        let mut active: invoices::ActiveModel = model.into();
        active.einvoice_status = Set(status.as_str().to_string());
        let updated = active.update(&txn).await.map_err(db_err)?;

        insert_audit_on(&txn, invoice_id, AuditEventKind::GstnStatusUpdate, details)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        to_record(updated)
    }

    async fn attach_signed_document(
        &self,
        invoice_id: Uuid,
        filename: &str,
        locator: &str,
    ) -> Result<SignedDocumentRecord, EInvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let exists = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if exists.is_none() {
            return Err(EInvoiceError::InvoiceNotFound(invoice_id));
        }

        let now = Utc::now();
        let document = signed_documents::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            filename: Set(filename.to_string()),
            locator: Set(locator.to_string()),
            uploaded_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        insert_audit_on(
            &txn,
            invoice_id,
            AuditEventKind::SignedDocUploaded,
            &format!("{filename} at {locator}"),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(SignedDocumentRecord {
            id: document.id,
            invoice_id: document.invoice_id,
            filename: document.filename,
            locator: document.locator,
            uploaded_at: document.uploaded_at.with_timezone(&Utc),
        })
    }

    async fn apply_lut(
        &self,
        invoice_id: Uuid,
        lut_ref: &str,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(EInvoiceError::InvoiceNotFound(invoice_id))?;

        let mut active: invoices::ActiveModel = model.into();
        active.lut_applicable = Set(true);
        let updated = active.update(&txn).await.map_err(db_err)?;

        insert_audit_on(
            &txn,
            invoice_id,
            AuditEventKind::LutApplied,
            &format!("lut_ref={lut_ref}"),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        to_record(updated)
    }

    async fn status_snapshot(
        &self,
        invoice_id: Uuid,
        limit: u64,
    ) -> Result<StatusSnapshot, EInvoiceError> {
        let model = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(EInvoiceError::InvoiceNotFound(invoice_id))?;

        let events = einvoice_audit_events::Entity::find()
            .filter(einvoice_audit_events::Column::InvoiceId.eq(invoice_id))
            .order_by_desc(einvoice_audit_events::Column::RecordedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(StatusSnapshot {
            invoice_id,
            einvoice_irn: model.einvoice_irn.clone(),
            status: parse_status(&model.einvoice_status)?,
            events: events.into_iter().map(to_audit_event).collect(),
        })
    }

    async fn record_audit(
        &self,
        invoice_id: Uuid,
        event: AuditEventKind,
        details: &str,
    ) -> Result<AuditEvent, EInvoiceError> {
        let model = insert_audit_on(&self.db, invoice_id, event, details)
            .await
            .map_err(db_err)?;
        Ok(to_audit_event(model))
    }
}

async fn lines_for<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
) -> Result<Vec<invoice_lines::Model>, DbErr> {
    invoice_lines::Entity::find()
        .filter(invoice_lines::Column::InvoiceId.eq(invoice_id))
        .all(conn)
        .await
}

async fn insert_audit_on<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
    event: AuditEventKind,
    details: &str,
) -> Result<einvoice_audit_events::Model, DbErr> {
    einvoice_audit_events::ActiveModel {
        id: Set(Uuid::new_v4()),
        invoice_id: Set(invoice_id),
        event: Set(event.as_str().to_string()),
        details: Set(Some(details.to_string())),
        recorded_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
}

fn to_record(model: invoices::Model) -> Result<InvoiceRecord, EInvoiceError> {
    Ok(InvoiceRecord {
        id: model.id,
        invoice_number: model.invoice_number,
        invoice_date: model.invoice_date,
        customer_name: model.customer_name,
        customer_gstin: model.customer_gstin,
        place_of_supply: model.place_of_supply,
        is_export: model.is_export,
        lut_applicable: model.lut_applicable,
        iec: model.iec,
        currency: model.currency,
        einvoice_irn: model.einvoice_irn,
        einvoice_status: parse_status(&model.einvoice_status)?,
    })
}

fn to_line_record(model: invoice_lines::Model) -> InvoiceLineRecord {
    InvoiceLineRecord {
        description: model.description,
        quantity: model.quantity,
        unit_rate: model.unit_rate,
        amount: model.amount,
        igst: model.igst,
        cgst: model.cgst,
        sgst: model.sgst,
    }
}

fn to_audit_event(model: einvoice_audit_events::Model) -> AuditEvent {
    AuditEvent {
        invoice_id: model.invoice_id,
        event: model.event,
        details: model.details,
        recorded_at: model.recorded_at.with_timezone(&Utc),
    }
}

fn parse_status(stored: &str) -> Result<EInvoiceStatus, EInvoiceError> {
    stored.parse()
}

fn db_err(err: DbErr) -> EInvoiceError {
    EInvoiceError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(status: &str) -> invoices::Model {
        invoices::Model {
            id: Uuid::new_v4(),
            invoice_number: "INV-1".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 4, 12).unwrap(),
            customer_name: None,
            customer_gstin: None,
            place_of_supply: None,
            is_export: false,
            lut_applicable: false,
            iec: None,
            currency: "USD".to_string(),
            einvoice_irn: None,
            einvoice_status: status.to_string(),
        }
    }

    #[test]
    fn test_to_record_parses_stored_status() {
        let record = to_record(model("IRN_ASSIGNED")).unwrap();
        assert_eq!(record.einvoice_status, EInvoiceStatus::IrnAssigned);
    }

    #[test]
    fn test_to_record_rejects_corrupt_status() {
        assert!(matches!(
            to_record(model("SUBMITTED")),
            Err(EInvoiceError::UnknownStatus(_))
        ));
    }
}
