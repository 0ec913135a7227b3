//! Customer repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use frigora_shared::types::CustomerId;

use crate::entities::customers;

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(CustomerId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub async fn create(
        &self,
        name: String,
        phone: Option<String>,
    ) -> Result<customers::Model, CustomerError> {
        let now = Utc::now();
        let customer = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            name: Set(name),
            phone: Set(phone),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(customer.insert(&self.db).await?)
    }

    /// Finds a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist.
    pub async fn get(&self, id: CustomerId) -> Result<customers::Model, CustomerError> {
        customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }
}
