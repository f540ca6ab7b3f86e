//! # Installation Repository
//!
//! Database operations for installation identities.
//!
//! Installations are created once and never updated in place; deleting one
//! cascades to its pairing code, lots, and requirements via foreign keys.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use larder_core::store::InstallationStore;
use larder_core::{Installation, StoreError};

/// Repository for installation database operations.
#[derive(Debug, Clone)]
pub struct InstallationRepository {
    pool: SqlitePool,
}

impl InstallationRepository {
    /// Creates a new InstallationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InstallationRepository { pool }
    }

    /// Inserts a new installation.
    pub async fn insert(&self, installation: &Installation) -> DbResult<()> {
        debug!(id = %installation.id, "Inserting installation");

        sqlx::query("INSERT INTO installations (id, created_at) VALUES (?1, ?2)")
            .bind(installation.id)
            .bind(installation.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Checks whether an installation exists.
    pub async fn exists(&self, id: Uuid) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM installations WHERE id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Gets an installation by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Installation))` - Installation found
    /// * `Ok(None)` - Installation not found
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Installation>> {
        let installation = sqlx::query_as::<_, Installation>(
            "SELECT id, created_at FROM installations WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(installation)
    }

    /// Deletes an installation and everything scoped under it.
    ///
    /// Foreign keys cascade the delete to pairing codes, lots, and
    /// requirements. Returns whether a row was deleted.
    pub async fn delete(&self, id: Uuid) -> DbResult<bool> {
        debug!(id = %id, "Deleting installation");

        let result = sqlx::query("DELETE FROM installations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl InstallationStore for InstallationRepository {
    async fn insert(&self, installation: &Installation) -> Result<(), StoreError> {
        InstallationRepository::insert(self, installation)
            .await
            .map_err(StoreError::from)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        InstallationRepository::exists(self, id)
            .await
            .map_err(StoreError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
