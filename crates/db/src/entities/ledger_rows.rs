//! `SeaORM` Entity for the ledger_rows table.
//!
//! Append-only: rows are never updated or deleted in normal operation. The
//! database enforces the one-sided invariant (exactly one of debit/credit
//! non-zero) alongside the posting constructors.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_rows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Row kind: `adding_inventory`, `clearance`, or `direct_cash`.
    pub kind: String,
    pub entry_receipt_id: Option<Uuid>,
    pub clearance_receipt_id: Option<Uuid>,
    pub description: Option<String>,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub is_discount: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::entry_receipts::Entity",
        from = "Column::EntryReceiptId",
        to = "super::entry_receipts::Column::Id"
    )]
    EntryReceipts,
    #[sea_orm(
        belongs_to = "super::clearance_receipts::Entity",
        from = "Column::ClearanceReceiptId",
        to = "super::clearance_receipts::Column::Id"
    )]
    ClearanceReceipts,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::entry_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryReceipts.def()
    }
}

impl Related<super::clearance_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClearanceReceipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
