//! `SeaORM` Entity for the invoices table.
//!
//! `invoice_number` carries a unique constraint; `einvoice_irn` stays null
//! until the authority assigns one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub invoice_date: Date,
    pub customer_name: Option<String>,
    pub customer_gstin: Option<String>,
    pub place_of_supply: Option<String>,
    pub is_export: bool,
    pub lut_applicable: bool,
    pub iec: Option<String>,
    pub currency: String,
    pub einvoice_irn: Option<String>,
    pub einvoice_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_lines::Entity")]
    InvoiceLines,
    #[sea_orm(has_many = "super::einvoice_audit_events::Entity")]
    EinvoiceAuditEvents,
    #[sea_orm(has_many = "super::signed_documents::Entity")]
    SignedDocuments,
    #[sea_orm(has_many = "super::fx_realizations::Entity")]
    FxRealizations,
}

impl Related<super::invoice_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceLines.def()
    }
}

impl Related<super::einvoice_audit_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EinvoiceAuditEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
