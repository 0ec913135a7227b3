//! Ledger repository: append-only row storage and balance reads.
//!
//! Rows enter the table only through `insert_posting`, which takes a
//! constructed `Posting` (already one-sided). There is no update or delete
//! path. Balances and statements are computed by the pure fold in the core
//! crate from facts read here.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use frigora_core::ledger::{
    balance_as_of, BalanceTotals, CashDirection, LedgerFact, LedgerRowKind, Posting, PostingError,
    Statement,
};
use frigora_shared::types::{ClearanceReceiptId, CustomerId, EntryReceiptId, LedgerRowId};

use crate::entities::{customers, ledger_rows};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The posting could not be constructed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// A stored row could not be read back as a valid fact.
    #[error("Corrupt ledger row {id}: {reason}")]
    Corrupt {
        /// The offending row.
        id: Uuid,
        /// What failed to parse.
        reason: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Ledger repository for posting rows and projecting balances.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one posting as a ledger row on the given connection.
    ///
    /// Associated function taking any connection so callers can append
    /// inside their own transaction (clearances and entries must commit
    /// their row atomically with the stock change).
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub async fn insert_posting<C: ConnectionTrait>(
        conn: &C,
        posting: &Posting,
    ) -> Result<ledger_rows::Model, DbErr> {
        let row = ledger_rows::ActiveModel {
            id: Set(LedgerRowId::new().into_inner()),
            customer_id: Set(posting.customer_id.into_inner()),
            kind: Set(posting.kind.as_str().to_string()),
            entry_receipt_id: Set(posting.entry_receipt_id.map(EntryReceiptId::into_inner)),
            clearance_receipt_id: Set(posting
                .clearance_receipt_id
                .map(ClearanceReceiptId::into_inner)),
            description: Set(posting.description.clone()),
            debit_amount: Set(posting.debit),
            credit_amount: Set(posting.credit),
            is_discount: Set(posting.is_discount),
            created_at: Set(Utc::now().into()),
        };
        row.insert(conn).await
    }

    /// Records a direct cash movement for a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` for an unknown customer and
    /// `Posting(InvalidAmount)` for a non-positive amount.
    pub async fn record_direct_cash(
        &self,
        customer_id: CustomerId,
        direction: CashDirection,
        amount: Decimal,
        description: Option<String>,
        is_discount: bool,
    ) -> Result<LedgerFact, LedgerError> {
        self.ensure_customer(customer_id).await?;

        let posting = Posting::direct_cash(customer_id, direction, amount, description, is_discount)?;
        let model = Self::insert_posting(&self.db, &posting).await?;

        tracing::info!(
            customer_id = %customer_id,
            amount = %amount,
            direction = ?direction,
            "Recorded direct cash movement"
        );

        fact_from_model(model)
    }

    /// Reads every ledger row of a customer, in `(created_at, id)` order.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` for an unknown customer.
    pub async fn facts_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<LedgerFact>, LedgerError> {
        self.ensure_customer(customer_id).await?;

        let rows = ledger_rows::Entity::find()
            .filter(ledger_rows::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_asc(ledger_rows::Column::CreatedAt)
            .order_by_asc(ledger_rows::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter().map(fact_from_model).collect()
    }

    /// Computes a customer's balance as of a cutoff instant (all rows when
    /// `as_of` is `None`).
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` for an unknown customer.
    pub async fn balance(
        &self,
        customer_id: CustomerId,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<BalanceTotals, LedgerError> {
        let facts = self.facts_for_customer(customer_id).await?;
        let in_window: Vec<LedgerFact> = facts
            .into_iter()
            .filter(|f| as_of.is_none_or(|c| f.created_at <= c))
            .collect();
        Ok(BalanceTotals::from_facts(&in_window))
    }

    /// Builds a customer statement over a time window, with the opening
    /// balance folded from every row before the window.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` for an unknown customer.
    pub async fn statement(
        &self,
        customer_id: CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Statement, LedgerError> {
        let facts = self.facts_for_customer(customer_id).await?;

        let (before, window): (Vec<LedgerFact>, Vec<LedgerFact>) = facts
            .into_iter()
            .filter(|f| to.is_none_or(|t| f.created_at <= t))
            .partition(|f| from.is_some_and(|start| f.created_at < start));

        let opening = balance_as_of(&before, None);
        Ok(Statement::new(opening, window))
    }

    async fn ensure_customer(&self, customer_id: CustomerId) -> Result<(), LedgerError> {
        customers::Entity::find_by_id(customer_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::CustomerNotFound(customer_id))?;
        Ok(())
    }
}

/// Converts a stored row into the core fact type.
///
/// # Errors
///
/// Returns `Corrupt` if the stored kind string is not a known row kind.
pub fn fact_from_model(model: ledger_rows::Model) -> Result<LedgerFact, LedgerError> {
    let kind = LedgerRowKind::from_str(&model.kind).map_err(|reason| LedgerError::Corrupt {
        id: model.id,
        reason,
    })?;

    Ok(LedgerFact {
        id: LedgerRowId::from_uuid(model.id),
        customer_id: CustomerId::from_uuid(model.customer_id),
        kind,
        debit: model.debit_amount,
        credit: model.credit_amount,
        is_discount: model.is_discount,
        description: model.description,
        entry_receipt_id: model.entry_receipt_id.map(EntryReceiptId::from_uuid),
        clearance_receipt_id: model.clearance_receipt_id.map(ClearanceReceiptId::from_uuid),
        created_at: model.created_at.with_timezone(&Utc),
    })
}
