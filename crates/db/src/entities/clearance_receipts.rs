//! `SeaORM` Entity for the clearance_receipts table.
//!
//! Clearance receipts are immutable once created: there is no update path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clearance_receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Sequential human-readable receipt number.
    #[sea_orm(unique)]
    pub receipt_no: i64,
    pub customer_id: Uuid,
    /// The entry receipt this clearance draws from.
    pub entry_receipt_id: Uuid,
    pub car_no: Option<String>,
    pub clearance_date: Date,
    pub description: Option<String>,
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
    #[sea_orm(has_many = "super::cleared_items::Entity")]
    ClearedItems,
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

impl Related<super::cleared_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClearedItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
