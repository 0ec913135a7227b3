//! Customer management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use frigora_db::repositories::customer::{CustomerError, CustomerRepository};
use frigora_shared::types::CustomerId;

use crate::AppState;

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", post(create_customer))
        .route("/customers/{customer_id}", get(get_customer))
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer name.
    pub name: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// Response for a customer.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// Customer ID.
    pub id: Uuid,
    /// Customer name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Whether the customer is active.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<frigora_db::entities::customers::Model> for CustomerResponse {
    fn from(model: frigora_db::entities::customers::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// POST `/customers` - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Customer name must not be empty"
            })),
        )
            .into_response();
    }

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.create(payload.name, payload.phone).await {
        Ok(customer) => (
            StatusCode::CREATED,
            Json(json!({ "customer": CustomerResponse::from(customer) })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create customer");
            internal_error()
        }
    }
}

/// GET `/customers/{customer_id}` - Fetch one customer.
async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());
    match repo.get(CustomerId::from_uuid(customer_id)).await {
        Ok(customer) => (
            StatusCode::OK,
            Json(json!({ "customer": CustomerResponse::from(customer) })),
        )
            .into_response(),
        Err(CustomerError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "customer_not_found",
                "message": "Customer not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch customer");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
