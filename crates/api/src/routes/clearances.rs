//! Clearance routes.
//!
//! A clearance request names the customer, the entry receipt to draw from,
//! and the lines to clear. The handler hands the whole thing to the
//! clearance repository, which commits stock decrements, the receipt, and
//! the ledger posting atomically.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use frigora_core::clearance::{ClearanceError, ClearanceLine, ClearanceRequest};
use frigora_db::ClearanceRepository;
use frigora_shared::types::{CustomerId, EntryItemId};

use crate::AppState;

/// Creates the clearance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/customers/{customer_id}/clearances",
        post(create_clearance),
    )
}

/// Request body for one clearance line.
#[derive(Debug, Deserialize)]
pub struct ClearanceLineRequest {
    /// The stock line to clear from.
    pub entry_item_id: Uuid,
    /// Quantity to clear.
    pub quantity: Decimal,
    /// Optional secondary KJ quantity to clear.
    pub kj_quantity: Option<Decimal>,
}

/// Request body for creating a clearance.
#[derive(Debug, Deserialize)]
pub struct CreateClearanceRequest {
    /// Number of the entry receipt being cleared against.
    pub entry_receipt_no: i64,
    /// The lines to clear.
    pub lines: Vec<ClearanceLineRequest>,
    /// Vehicle number collecting the goods.
    pub car_no: Option<String>,
    /// Clearance date (defaults to today).
    pub date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether the posted value is a discount.
    #[serde(default)]
    pub is_discount: bool,
}

/// POST `/customers/{customer_id}/clearances` - Execute a clearance.
async fn create_clearance(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<CreateClearanceRequest>,
) -> impl IntoResponse {
    let request = ClearanceRequest {
        customer_id: CustomerId::from_uuid(customer_id),
        entry_receipt_no: payload.entry_receipt_no,
        lines: payload
            .lines
            .into_iter()
            .map(|line| ClearanceLine {
                entry_item_id: EntryItemId::from_uuid(line.entry_item_id),
                quantity: line.quantity,
                kj_quantity: line.kj_quantity,
            })
            .collect(),
        car_no: payload.car_no,
        date: payload.date,
        description: payload.description,
        is_discount: payload.is_discount,
    };

    let repo = ClearanceRepository::new((*state.db).clone(), state.valuer.clone());
    match repo.clear(&request).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({ "clearance": outcome })),
        )
            .into_response(),
        Err(e) => {
            if matches!(e, ClearanceError::Database(_)) {
                error!(error = %e, "Clearance failed");
            }
            let (status, body) = error_response(&e);
            (status, Json(body)).into_response()
        }
    }
}

/// Maps a clearance error to a status code and structured JSON body.
///
/// Stock shortfalls carry the offending item and the exact figures so the
/// caller can correct the request without another round trip.
fn error_response(err: &ClearanceError) -> (StatusCode, Value) {
    match err {
        ClearanceError::Validation(violations) => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": "validation_failed",
                "message": err.to_string(),
                "violations": violations
                    .iter()
                    .map(std::string::ToString::to_string)
                    .collect::<Vec<_>>()
            }),
        ),
        ClearanceError::EntryReceiptNotFound(_)
        | ClearanceError::EntryItemNotFound(_)
        | ClearanceError::CustomerNotFound(_) => (
            StatusCode::NOT_FOUND,
            json!({
                "error": "not_found",
                "message": err.to_string()
            }),
        ),
        ClearanceError::OwnershipMismatch { .. } | ClearanceError::ItemOutsideReceipt { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "receipt_mismatch",
                "message": err.to_string()
            }),
        ),
        ClearanceError::InsufficientStock {
            entry_item_id,
            requested,
            available,
        } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "insufficient_stock",
                "message": err.to_string(),
                "entry_item_id": entry_item_id,
                "requested": requested,
                "available": available
            }),
        ),
        ClearanceError::InvalidAmount(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "invalid_amount",
                "message": err.to_string()
            }),
        ),
        ClearanceError::Conflict { .. } => (
            StatusCode::CONFLICT,
            json!({
                "error": "conflict",
                "message": "The request conflicted with concurrent activity, please retry"
            }),
        ),
        ClearanceError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "internal_error",
                "message": "An error occurred"
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use frigora_core::clearance::Violation;

    #[rstest]
    #[case(ClearanceError::Validation(vec![Violation::EmptyRequest]), StatusCode::BAD_REQUEST)]
    #[case(ClearanceError::EntryReceiptNotFound(9), StatusCode::NOT_FOUND)]
    #[case(ClearanceError::CustomerNotFound(CustomerId::new()), StatusCode::NOT_FOUND)]
    #[case(
        ClearanceError::OwnershipMismatch {
            entry_receipt_no: 9,
            owner: CustomerId::new(),
            requested: CustomerId::new(),
        },
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case(ClearanceError::Conflict { attempts: 3 }, StatusCode::CONFLICT)]
    #[case(ClearanceError::Database("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status_mapping(#[case] err: ClearanceError, #[case] expected: StatusCode) {
        let (status, _) = error_response(&err);
        assert_eq!(status, expected);
    }

    #[test]
    fn test_insufficient_stock_body_carries_figures() {
        let id = EntryItemId::new();
        let err = ClearanceError::InsufficientStock {
            entry_item_id: id,
            requested: dec!(150),
            available: dec!(100),
        };
        let (status, body) = error_response(&err);

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "insufficient_stock");
        assert_eq!(body["entry_item_id"], json!(id));
        assert_eq!(body["requested"], json!(dec!(150)));
        assert_eq!(body["available"], json!(dec!(100)));
    }

    #[test]
    fn test_validation_body_lists_violations() {
        let err = ClearanceError::Validation(vec![Violation::EmptyRequest]);
        let (_, body) = error_response(&err);
        assert_eq!(body["violations"].as_array().map(Vec::len), Some(1));
    }
}
