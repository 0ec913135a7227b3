//! `SeaORM` Entity for the cleared_items table.
//!
//! One clearance line referencing exactly one entry item. Holds a
//! non-owning foreign key plus a snapshot of the cleared amount — never a
//! copy of the entry item's mutable stock state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cleared_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub clearance_receipt_id: Uuid,
    pub entry_item_id: Uuid,
    pub quantity_cleared: Decimal,
    pub kj_quantity_cleared: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clearance_receipts::Entity",
        from = "Column::ClearanceReceiptId",
        to = "super::clearance_receipts::Column::Id"
    )]
    ClearanceReceipts,
    #[sea_orm(
        belongs_to = "super::entry_items::Entity",
        from = "Column::EntryItemId",
        to = "super::entry_items::Column::Id"
    )]
    EntryItems,
}

impl Related<super::clearance_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClearanceReceipts.def()
    }
}

impl Related<super::entry_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
