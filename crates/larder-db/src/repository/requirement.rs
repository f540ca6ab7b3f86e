//! # Requirement Repository
//!
//! Database operations for per-product minimum quantities.
//!
//! ## Upsert Semantics
//! `(installation_id, product_id)` is unique. Setting a requirement for a
//! pair that already has one replaces the stored name and minimum while the
//! row keeps its original `id` and `created_at` - the caller never ends up
//! with two rows for one product.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use larder_core::store::RequirementStore;
use larder_core::{Requirement, StoreError};

const REQUIREMENT_COLUMNS: &str =
    "id, installation_id, product_id, product_name, minimum_quantity, created_at, updated_at";

/// Repository for requirement database operations.
#[derive(Debug, Clone)]
pub struct RequirementRepository {
    pool: SqlitePool,
}

impl RequirementRepository {
    /// Creates a new RequirementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RequirementRepository { pool }
    }

    /// Inserts the requirement, or replaces the existing row for the same
    /// `(installation_id, product_id)` pair.
    ///
    /// ## Returns
    /// The row as persisted: on replace it keeps the original `id` and
    /// `created_at`, with `product_name`, `minimum_quantity`, and
    /// `updated_at` taken from `requirement`.
    pub async fn upsert(&self, requirement: &Requirement) -> DbResult<Requirement> {
        debug!(
            installation_id = %requirement.installation_id,
            product_id = requirement.product_id,
            "Upserting requirement"
        );

        sqlx::query(
            "INSERT INTO requirements (\
                 id, installation_id, product_id, product_name, \
                 minimum_quantity, created_at, updated_at\
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT(installation_id, product_id) DO UPDATE SET \
                 product_name = excluded.product_name, \
                 minimum_quantity = excluded.minimum_quantity, \
                 updated_at = excluded.updated_at",
        )
        .bind(requirement.id)
        .bind(requirement.installation_id)
        .bind(requirement.product_id)
        .bind(&requirement.product_name)
        .bind(requirement.minimum_quantity)
        .bind(requirement.created_at)
        .bind(requirement.updated_at)
        .execute(&self.pool)
        .await?;

        // Read back: on replace the stored id differs from the input's
        self.find_by_product(requirement.installation_id, requirement.product_id)
            .await?
            .ok_or_else(|| {
                DbError::not_found("Requirement", requirement.product_id.to_string())
            })
    }

    /// All requirements for an installation, in creation order.
    pub async fn list(&self, installation_id: Uuid) -> DbResult<Vec<Requirement>> {
        let requirements = sqlx::query_as::<_, Requirement>(&format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM requirements \
             WHERE installation_id = ?1 ORDER BY created_at, id"
        ))
        .bind(installation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requirements)
    }

    /// The requirement for `(installation_id, product_id)`, if any.
    pub async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> DbResult<Option<Requirement>> {
        let requirement = sqlx::query_as::<_, Requirement>(&format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM requirements \
             WHERE installation_id = ?1 AND product_id = ?2"
        ))
        .bind(installation_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(requirement)
    }

    /// Writes back a modified requirement.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Requirement row no longer exists
    pub async fn update(&self, requirement: &Requirement) -> DbResult<()> {
        debug!(id = %requirement.id, "Updating requirement");

        let result = sqlx::query(
            "UPDATE requirements SET \
                 product_name = ?2, minimum_quantity = ?3, updated_at = ?4 \
             WHERE id = ?1",
        )
        .bind(requirement.id)
        .bind(&requirement.product_name)
        .bind(requirement.minimum_quantity)
        .bind(requirement.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Requirement",
                requirement.id.to_string(),
            ));
        }

        Ok(())
    }

    /// Deletes the requirement for `(installation_id, product_id)`.
    /// Returns whether a row was deleted.
    pub async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> DbResult<bool> {
        debug!(
            installation_id = %installation_id,
            product_id,
            "Deleting requirement"
        );

        let result = sqlx::query(
            "DELETE FROM requirements WHERE installation_id = ?1 AND product_id = ?2",
        )
        .bind(installation_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Builds a fresh requirement row for insertion.
pub fn new_requirement_row(
    installation_id: Uuid,
    product_id: i64,
    product_name: String,
    minimum_quantity: i64,
    now: DateTime<Utc>,
) -> Requirement {
    Requirement {
        id: Uuid::new_v4(),
        installation_id,
        product_id,
        product_name,
        minimum_quantity,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl RequirementStore for RequirementRepository {
    async fn upsert(&self, requirement: &Requirement) -> Result<Requirement, StoreError> {
        RequirementRepository::upsert(self, requirement)
            .await
            .map_err(StoreError::from)
    }

    async fn list(&self, installation_id: Uuid) -> Result<Vec<Requirement>, StoreError> {
        RequirementRepository::list(self, installation_id)
            .await
            .map_err(StoreError::from)
    }

    async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Requirement>, StoreError> {
        RequirementRepository::find_by_product(self, installation_id, product_id)
            .await
            .map_err(StoreError::from)
    }

    async fn update(&self, requirement: &Requirement) -> Result<(), StoreError> {
        RequirementRepository::update(self, requirement)
            .await
            .map_err(StoreError::from)
    }

    async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<bool, StoreError> {
        RequirementRepository::delete_by_product(self, installation_id, product_id)
            .await
            .map_err(StoreError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
