//! `SeaORM` Entity for the entry_items table.
//!
//! One stock line within an entry receipt. `remaining_quantity` is the only
//! mutable column with business meaning; it is decremented exclusively by
//! the clearance engine under a row lock, and the database enforces
//! `0 <= remaining_quantity <= original_quantity`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_receipt_id: Uuid,
    /// Product type (e.g. "apple").
    pub product_kind: String,
    /// Product subtype (e.g. "golden").
    pub product_variety: Option<String>,
    /// Packaging (e.g. "crate", "sack").
    pub pack_type: String,
    /// Storage room the goods sit in.
    pub room: String,
    /// Unit of measure for the primary quantity.
    pub unit: String,
    pub original_quantity: Decimal,
    pub remaining_quantity: Decimal,
    /// Secondary KJ dimension, for goods tracked in two units.
    pub kj_quantity: Option<Decimal>,
    pub remaining_kj_quantity: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::entry_receipts::Entity",
        from = "Column::EntryReceiptId",
        to = "super::entry_receipts::Column::Id"
    )]
    EntryReceipts,
    #[sea_orm(has_many = "super::cleared_items::Entity")]
    ClearedItems,
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
