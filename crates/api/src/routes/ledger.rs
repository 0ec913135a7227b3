//! Ledger routes: direct cash, balances, and statements.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use frigora_core::ledger::{CashDirection, Statement};
use frigora_db::LedgerRepository;
use frigora_db::repositories::ledger::LedgerError;
use frigora_shared::types::CustomerId;

use crate::AppState;

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer_id}/cash", post(record_cash))
        .route("/customers/{customer_id}/balance", get(get_balance))
        .route("/customers/{customer_id}/statement", get(get_statement))
}

/// Request body for a direct cash movement.
#[derive(Debug, Deserialize)]
pub struct RecordCashRequest {
    /// Which side of the ledger the amount lands on.
    pub direction: CashDirection,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether this movement is a discount.
    #[serde(default)]
    pub is_discount: bool,
}

/// Query parameters for a balance read.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Compute the balance as of this instant (RFC 3339). All rows when
    /// absent.
    pub as_of: Option<DateTime<Utc>>,
}

/// Query parameters for a statement window.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// Window start (RFC 3339, inclusive). Open-ended when absent.
    pub from: Option<DateTime<Utc>>,
    /// Window end (RFC 3339, inclusive). Open-ended when absent.
    pub to: Option<DateTime<Utc>>,
}

/// One statement line as serialized to the caller.
#[derive(Debug, Serialize)]
pub struct StatementRowResponse {
    /// Ledger row ID.
    pub id: Uuid,
    /// Row kind.
    pub kind: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Whether the row is a discount.
    pub is_discount: bool,
    /// Description.
    pub description: Option<String>,
    /// Balance effect of this row.
    pub delta: Decimal,
    /// Running balance through this row.
    pub running_balance: Decimal,
    /// Created at timestamp.
    pub created_at: String,
}

fn statement_body(statement: &Statement) -> Value {
    let rows: Vec<StatementRowResponse> = statement
        .rows()
        .map(|row| StatementRowResponse {
            id: row.fact.id.into_inner(),
            kind: row.fact.kind.as_str().to_string(),
            debit: row.fact.debit,
            credit: row.fact.credit,
            is_discount: row.fact.is_discount,
            description: row.fact.description.clone(),
            delta: row.delta,
            running_balance: row.running_balance,
            created_at: row.fact.created_at.to_rfc3339(),
        })
        .collect();

    json!({
        "opening_balance": statement.opening_balance(),
        "closing_balance": statement.closing_balance(),
        "rows": rows
    })
}

/// POST `/customers/{customer_id}/cash` - Record a direct cash movement.
async fn record_cash(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<RecordCashRequest>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo
        .record_direct_cash(
            CustomerId::from_uuid(customer_id),
            payload.direction,
            payload.amount,
            payload.description,
            payload.is_discount,
        )
        .await
    {
        Ok(fact) => (StatusCode::CREATED, Json(json!({ "row": fact }))).into_response(),
        Err(e) => {
            if matches!(e, LedgerError::Database(_) | LedgerError::Corrupt { .. }) {
                error!(error = %e, "Failed to record cash movement");
            }
            let (status, body) = error_response(&e);
            (status, Json(body)).into_response()
        }
    }
}

/// GET `/customers/{customer_id}/balance` - Current or as-of balance.
async fn get_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo
        .balance(CustomerId::from_uuid(customer_id), query.as_of)
        .await
    {
        Ok(totals) => (StatusCode::OK, Json(json!({ "balance": totals }))).into_response(),
        Err(e) => {
            if matches!(e, LedgerError::Database(_) | LedgerError::Corrupt { .. }) {
                error!(error = %e, "Failed to compute balance");
            }
            let (status, body) = error_response(&e);
            (status, Json(body)).into_response()
        }
    }
}

/// GET `/customers/{customer_id}/statement` - Statement over a window.
async fn get_statement(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo
        .statement(CustomerId::from_uuid(customer_id), query.from, query.to)
        .await
    {
        Ok(statement) => (StatusCode::OK, Json(statement_body(&statement))).into_response(),
        Err(e) => {
            if matches!(e, LedgerError::Database(_) | LedgerError::Corrupt { .. }) {
                error!(error = %e, "Failed to build statement");
            }
            let (status, body) = error_response(&e);
            (status, Json(body)).into_response()
        }
    }
}

/// Maps a ledger error to a status code and JSON body.
fn error_response(err: &LedgerError) -> (StatusCode, Value) {
    match err {
        LedgerError::CustomerNotFound(_) => (
            StatusCode::NOT_FOUND,
            json!({
                "error": "customer_not_found",
                "message": err.to_string()
            }),
        ),
        LedgerError::Posting(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "invalid_amount",
                "message": err.to_string()
            }),
        ),
        LedgerError::Corrupt { .. } | LedgerError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "internal_error",
                "message": "An error occurred"
            }),
        ),
    }
}
