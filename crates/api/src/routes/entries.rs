//! Entry receipt routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use frigora_db::EntryRepository;
use frigora_db::entities::{entry_items, entry_receipts};
use frigora_db::repositories::entry::{EntryError, NewEntryItem, NewEntryReceipt};
use frigora_shared::types::CustomerId;

use crate::AppState;

/// Creates the entry receipt routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer_id}/entries", post(create_entry))
        .route("/entries/{receipt_no}", get(get_entry))
}

/// Request body for one stock line of an entry.
#[derive(Debug, Deserialize)]
pub struct EntryItemRequest {
    /// Product kind.
    pub product_kind: String,
    /// Optional variety within the kind.
    pub product_variety: Option<String>,
    /// Packaging type.
    pub pack_type: String,
    /// Cold room the lot is stored in.
    pub room: String,
    /// Unit the quantity is counted in.
    pub unit: String,
    /// Quantity entering storage.
    pub quantity: Decimal,
    /// Optional secondary KJ quantity.
    pub kj_quantity: Option<Decimal>,
}

/// Request body for recording an entry receipt.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// The stock lines.
    pub items: Vec<EntryItemRequest>,
    /// Declared value of the goods, posted as a debit.
    pub value: Decimal,
    /// Vehicle number delivering the goods.
    pub car_no: Option<String>,
    /// Entry date (defaults to today).
    pub date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Response for one stock line.
#[derive(Debug, Serialize)]
pub struct EntryItemResponse {
    /// Stock line ID.
    pub id: Uuid,
    /// Product kind.
    pub product_kind: String,
    /// Variety within the kind.
    pub product_variety: Option<String>,
    /// Packaging type.
    pub pack_type: String,
    /// Cold room.
    pub room: String,
    /// Counting unit.
    pub unit: String,
    /// Quantity that entered storage.
    pub original_quantity: Decimal,
    /// Quantity still in storage.
    pub remaining_quantity: Decimal,
    /// Secondary KJ quantity that entered, if tracked.
    pub kj_quantity: Option<Decimal>,
    /// Secondary KJ quantity still in storage, if tracked.
    pub remaining_kj_quantity: Option<Decimal>,
}

impl From<entry_items::Model> for EntryItemResponse {
    fn from(model: entry_items::Model) -> Self {
        Self {
            id: model.id,
            product_kind: model.product_kind,
            product_variety: model.product_variety,
            pack_type: model.pack_type,
            room: model.room,
            unit: model.unit,
            original_quantity: model.original_quantity,
            remaining_quantity: model.remaining_quantity,
            kj_quantity: model.kj_quantity,
            remaining_kj_quantity: model.remaining_kj_quantity,
        }
    }
}

/// Response for an entry receipt with its stock lines.
#[derive(Debug, Serialize)]
pub struct EntryReceiptResponse {
    /// Receipt ID.
    pub id: Uuid,
    /// Sequential receipt number.
    pub receipt_no: i64,
    /// Owning customer ID.
    pub customer_id: Uuid,
    /// Vehicle number.
    pub car_no: Option<String>,
    /// Entry date.
    pub entry_date: String,
    /// Description.
    pub description: Option<String>,
    /// The stock lines.
    pub items: Vec<EntryItemResponse>,
}

impl EntryReceiptResponse {
    fn new(receipt: entry_receipts::Model, items: Vec<entry_items::Model>) -> Self {
        Self {
            id: receipt.id,
            receipt_no: receipt.receipt_no,
            customer_id: receipt.customer_id,
            car_no: receipt.car_no,
            entry_date: receipt.entry_date.to_string(),
            description: receipt.description,
            items: items.into_iter().map(EntryItemResponse::from).collect(),
        }
    }
}

/// POST `/customers/{customer_id}/entries` - Record goods entering storage.
async fn create_entry(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<CreateEntryRequest>,
) -> impl IntoResponse {
    let request = NewEntryReceipt {
        customer_id: CustomerId::from_uuid(customer_id),
        items: payload
            .items
            .into_iter()
            .map(|item| NewEntryItem {
                product_kind: item.product_kind,
                product_variety: item.product_variety,
                pack_type: item.pack_type,
                room: item.room,
                unit: item.unit,
                quantity: item.quantity,
                kj_quantity: item.kj_quantity,
            })
            .collect(),
        value: payload.value,
        car_no: payload.car_no,
        date: payload.date,
        description: payload.description,
    };

    let repo = EntryRepository::new((*state.db).clone());
    match repo.record_entry(&request).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "entry_receipt_id": outcome.entry_receipt_id,
                "receipt_no": outcome.receipt_no,
                "item_ids": outcome.item_ids,
                "ledger_row_id": outcome.ledger_row_id
            })),
        )
            .into_response(),
        Err(e) => {
            if matches!(e, EntryError::Database(_)) {
                error!(error = %e, "Failed to record entry receipt");
            }
            let (status, body) = error_response(&e);
            (status, Json(body)).into_response()
        }
    }
}

/// GET `/entries/{receipt_no}` - Fetch an entry receipt by number.
async fn get_entry(
    State(state): State<AppState>,
    Path(receipt_no): Path<i64>,
) -> impl IntoResponse {
    let repo = EntryRepository::new((*state.db).clone());
    match repo.find_by_receipt_no(receipt_no).await {
        Ok(Some((receipt, items))) => (
            StatusCode::OK,
            Json(json!({ "entry": EntryReceiptResponse::new(receipt, items) })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "entry_receipt_not_found",
                "message": format!("Entry receipt not found: {receipt_no}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch entry receipt");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// Maps an entry error to a status code and JSON body.
fn error_response(err: &EntryError) -> (StatusCode, Value) {
    match err {
        EntryError::EmptyReceipt | EntryError::NonPositiveQuantity { .. } => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": "validation_failed",
                "message": err.to_string()
            }),
        ),
        EntryError::CustomerNotFound(_) => (
            StatusCode::NOT_FOUND,
            json!({
                "error": "customer_not_found",
                "message": err.to_string()
            }),
        ),
        EntryError::Posting(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "invalid_amount",
                "message": err.to_string()
            }),
        ),
        EntryError::Conflict { .. } => (
            StatusCode::CONFLICT,
            json!({
                "error": "conflict",
                "message": "The request conflicted with concurrent activity, please retry"
            }),
        ),
        EntryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "internal_error",
                "message": "An error occurred"
            }),
        ),
    }
}
