//! `SeaORM` Entity for the entry_receipts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Sequential human-readable receipt number.
    #[sea_orm(unique)]
    pub receipt_no: i64,
    pub customer_id: Uuid,
    pub car_no: Option<String>,
    pub entry_date: Date,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::entry_items::Entity")]
    EntryItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::entry_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
