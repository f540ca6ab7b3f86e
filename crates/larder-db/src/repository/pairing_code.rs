//! # Pairing Code Repository
//!
//! Database operations for pairing codes.
//!
//! ## Atomic Replacement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  replace(installation_id, new_code)                     │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │     │                                                                   │
//! │     ├── DELETE FROM pairing_codes WHERE installation_id = ?            │
//! │     │        (idempotent: fine if no row exists)                        │
//! │     │                                                                   │
//! │     ├── INSERT INTO pairing_codes (code, installation_id, expires_at)  │
//! │     │        (PRIMARY KEY on code → UniqueViolation on collision)      │
//! │     │                                                                   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  A concurrent find_by_code never observes "both codes present" or      │
//! │  "neither present": it sees the old row until commit, the new row      │
//! │  after.                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use larder_core::store::PairingCodeStore;
use larder_core::{PairingCode, StoreError};

/// Repository for pairing code database operations.
#[derive(Debug, Clone)]
pub struct PairingCodeRepository {
    pool: SqlitePool,
}

impl PairingCodeRepository {
    /// Creates a new PairingCodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PairingCodeRepository { pool }
    }

    /// Atomically replaces the installation's active code with `code`.
    ///
    /// Deletes any prior code row for the installation and inserts the new
    /// one in a single transaction. After this returns, the old code is gone
    /// entirely - joining with it reports an invalid code, not an expired one.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - `code.code` collides with another
    ///   installation's live code (caller retries with a fresh code)
    pub async fn replace(&self, installation_id: Uuid, code: &PairingCode) -> DbResult<()> {
        debug!(installation_id = %installation_id, "Replacing pairing code");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM pairing_codes WHERE installation_id = ?1")
            .bind(installation_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO pairing_codes (code, installation_id, expires_at) VALUES (?1, ?2, ?3)",
        )
        .bind(&code.code)
        .bind(code.installation_id)
        .bind(code.expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Reverse lookup: code string → pairing code row.
    ///
    /// ## Returns
    /// * `Ok(Some(PairingCode))` - Code exists (may still be expired)
    /// * `Ok(None)` - No such code (mistyped or rotated away)
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<PairingCode>> {
        let pairing_code = sqlx::query_as::<_, PairingCode>(
            "SELECT code, installation_id, expires_at FROM pairing_codes WHERE code = ?1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pairing_code)
    }

    /// The installation's currently active code, if any.
    pub async fn find_by_installation(
        &self,
        installation_id: Uuid,
    ) -> DbResult<Option<PairingCode>> {
        let pairing_code = sqlx::query_as::<_, PairingCode>(
            "SELECT code, installation_id, expires_at FROM pairing_codes \
             WHERE installation_id = ?1",
        )
        .bind(installation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pairing_code)
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl PairingCodeStore for PairingCodeRepository {
    async fn replace(&self, installation_id: Uuid, code: &PairingCode) -> Result<(), StoreError> {
        PairingCodeRepository::replace(self, installation_id, code)
            .await
            .map_err(StoreError::from)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<PairingCode>, StoreError> {
        PairingCodeRepository::find_by_code(self, code)
            .await
            .map_err(StoreError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use larder_core::Installation;

    async fn setup() -> (Database, Installation) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let installation = Installation::new(Utc::now());
        db.installations().insert(&installation).await.unwrap();
        (db, installation)
    }

    fn code_for(installation_id: Uuid, code: &str) -> PairingCode {
        PairingCode {
            code: code.to_string(),
            installation_id,
            expires_at: Utc::now() + Duration::minutes(15),
        }
    }

    #[tokio::test]
    async fn test_replace_supersedes_old_code() {
        let (db, installation) = setup().await;
        let repo = db.pairing_codes();

        let old = code_for(installation.id, "AAAAAA");
        repo.replace(installation.id, &old).await.unwrap();

        let new = code_for(installation.id, "BBBBBB");
        repo.replace(installation.id, &new).await.unwrap();

        // Old code gone entirely, new code live
        assert!(repo.find_by_code("AAAAAA").await.unwrap().is_none());
        let found = repo.find_by_code("BBBBBB").await.unwrap().unwrap();
        assert_eq!(found.installation_id, installation.id);

        // Exactly one code for the installation
        let active = repo.find_by_installation(installation.id).await.unwrap();
        assert_eq!(active.unwrap().code, "BBBBBB");
    }

    #[tokio::test]
    async fn test_replace_with_no_prior_code() {
        let (db, installation) = setup().await;
        let repo = db.pairing_codes();

        let code = code_for(installation.id, "CCCCCC");
        repo.replace(installation.id, &code).await.unwrap();

        assert!(repo.find_by_code("CCCCCC").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_code_collision_is_unique_violation() {
        let (db, first) = setup().await;
        let second = Installation::new(Utc::now());
        db.installations().insert(&second).await.unwrap();
        let repo = db.pairing_codes();

        repo.replace(first.id, &code_for(first.id, "SAME00"))
            .await
            .unwrap();

        let err = repo
            .replace(second.id, &code_for(second.id, "SAME00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Failed replace must not have dropped the second installation's
        // (nonexistent) code nor the first installation's live one
        assert!(repo.find_by_code("SAME00").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cascade_on_installation_delete() {
        let (db, installation) = setup().await;
        let repo = db.pairing_codes();

        repo.replace(installation.id, &code_for(installation.id, "DDDDDD"))
            .await
            .unwrap();

        db.installations().delete(installation.id).await.unwrap();
        assert!(repo.find_by_code("DDDDDD").await.unwrap().is_none());
    }
}
