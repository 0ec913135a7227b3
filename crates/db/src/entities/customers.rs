//! `SeaORM` Entity for the customers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry_receipts::Entity")]
    EntryReceipts,
    #[sea_orm(has_many = "super::clearance_receipts::Entity")]
    ClearanceReceipts,
    #[sea_orm(has_many = "super::ledger_rows::Entity")]
    LedgerRows,
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

impl Related<super::ledger_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
