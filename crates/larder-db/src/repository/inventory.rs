//! # Inventory Repository
//!
//! Database operations for inventory lots.
//!
//! ## Lot Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Lots vs Products                                   │
//! │                                                                         │
//! │  inventory_lots                                                         │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │ lot 1: product 3 "Milk"  qty 2  bb 2026-09-01│ ┐                    │
//! │  │ lot 2: product 3 "Milk"  qty 3  bb 2026-09-14│ ┘ same product,      │
//! │  │ lot 3: product 7 "Rice"  qty 1               │   separate rows      │
//! │  └──────────────────────────────────────────────┘                      │
//! │                                                                         │
//! │  Product-keyed operations (update/delete by product_id) target the     │
//! │  FIRST lot in creation order; lot-id operations are exact.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use larder_core::store::InventoryStore;
use larder_core::{InventoryLot, StoreError};

const LOT_COLUMNS: &str = "id, installation_id, product_id, product_name, quantity, \
     location, notes, best_before, created_at, updated_at";

/// Repository for inventory lot database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Inserts a new lot.
    pub async fn insert(&self, lot: &InventoryLot) -> DbResult<()> {
        debug!(id = %lot.id, product_id = lot.product_id, "Inserting inventory lot");

        sqlx::query(
            "INSERT INTO inventory_lots (\
                 id, installation_id, product_id, product_name, quantity, \
                 location, notes, best_before, created_at, updated_at\
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(lot.id)
        .bind(lot.installation_id)
        .bind(lot.product_id)
        .bind(&lot.product_name)
        .bind(lot.quantity)
        .bind(&lot.location)
        .bind(&lot.notes)
        .bind(lot.best_before)
        .bind(lot.created_at)
        .bind(lot.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All lots for an installation, in creation order.
    ///
    /// Creation order keeps the reconciliation output deterministic and makes
    /// "first lot" for product-keyed operations well defined.
    pub async fn list(&self, installation_id: Uuid) -> DbResult<Vec<InventoryLot>> {
        let lots = sqlx::query_as::<_, InventoryLot>(&format!(
            "SELECT {LOT_COLUMNS} FROM inventory_lots \
             WHERE installation_id = ?1 ORDER BY created_at, id"
        ))
        .bind(installation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lots)
    }

    /// Gets a lot by its ID.
    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<InventoryLot>> {
        let lot = sqlx::query_as::<_, InventoryLot>(&format!(
            "SELECT {LOT_COLUMNS} FROM inventory_lots WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lot)
    }

    /// First lot for `(installation_id, product_id)` in creation order.
    pub async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> DbResult<Option<InventoryLot>> {
        let lot = sqlx::query_as::<_, InventoryLot>(&format!(
            "SELECT {LOT_COLUMNS} FROM inventory_lots \
             WHERE installation_id = ?1 AND product_id = ?2 \
             ORDER BY created_at, id LIMIT 1"
        ))
        .bind(installation_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lot)
    }

    /// Writes back a modified lot.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Lot row no longer exists
    pub async fn update(&self, lot: &InventoryLot) -> DbResult<()> {
        debug!(id = %lot.id, "Updating inventory lot");

        let result = sqlx::query(
            "UPDATE inventory_lots SET \
                 quantity = ?2, location = ?3, notes = ?4, best_before = ?5, \
                 updated_at = ?6 \
             WHERE id = ?1",
        )
        .bind(lot.id)
        .bind(lot.quantity)
        .bind(&lot.location)
        .bind(&lot.notes)
        .bind(lot.best_before)
        .bind(lot.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryLot", lot.id.to_string()));
        }

        Ok(())
    }

    /// Deletes one lot by id. Returns whether a row was deleted.
    pub async fn delete_by_id(&self, id: Uuid) -> DbResult<bool> {
        debug!(id = %id, "Deleting inventory lot");

        let result = sqlx::query("DELETE FROM inventory_lots WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the first lot for `(installation_id, product_id)`.
    /// Returns whether a row was deleted.
    pub async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> DbResult<bool> {
        debug!(
            installation_id = %installation_id,
            product_id,
            "Deleting inventory lot by product"
        );

        let result = sqlx::query(
            "DELETE FROM inventory_lots WHERE id = (\
                 SELECT id FROM inventory_lots \
                 WHERE installation_id = ?1 AND product_id = ?2 \
                 ORDER BY created_at, id LIMIT 1\
             )",
        )
        .bind(installation_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts lots for an installation (for diagnostics and seeding).
    pub async fn count(&self, installation_id: Uuid) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_lots WHERE installation_id = ?1")
                .bind(installation_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn insert(&self, lot: &InventoryLot) -> Result<(), StoreError> {
        InventoryRepository::insert(self, lot)
            .await
            .map_err(StoreError::from)
    }

    async fn list(&self, installation_id: Uuid) -> Result<Vec<InventoryLot>, StoreError> {
        InventoryRepository::list(self, installation_id)
            .await
            .map_err(StoreError::from)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryLot>, StoreError> {
        InventoryRepository::find_by_id(self, id)
            .await
            .map_err(StoreError::from)
    }

    async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<Option<InventoryLot>, StoreError> {
        InventoryRepository::find_by_product(self, installation_id, product_id)
            .await
            .map_err(StoreError::from)
    }

    async fn update(&self, lot: &InventoryLot) -> Result<(), StoreError> {
        InventoryRepository::update(self, lot)
            .await
            .map_err(StoreError::from)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        InventoryRepository::delete_by_id(self, id)
            .await
            .map_err(StoreError::from)
    }

    async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<bool, StoreError> {
        InventoryRepository::delete_by_product(self, installation_id, product_id)
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
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, NaiveDate, Utc};
    use larder_core::Installation;

    async fn setup() -> (Database, Installation) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let installation = Installation::new(Utc::now());
        db.installations().insert(&installation).await.unwrap();
        (db, installation)
    }

    fn lot(installation_id: Uuid, product_id: i64, quantity: i64) -> InventoryLot {
        let now = Utc::now();
        InventoryLot {
            id: Uuid::new_v4(),
            installation_id,
            product_id,
            product_name: format!("Product {product_id}"),
            quantity,
            location: None,
            notes: None,
            best_before: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_round_trip() {
        let (db, installation) = setup().await;
        let repo = db.inventory();

        let mut first = lot(installation.id, 3, 2);
        first.location = Some("fridge".to_string());
        first.best_before = NaiveDate::from_ymd_opt(2026, 9, 1);
        repo.insert(&first).await.unwrap();

        let listed = repo.list(installation.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].location.as_deref(), Some("fridge"));
        assert_eq!(listed[0].best_before, NaiveDate::from_ymd_opt(2026, 9, 1));
    }

    #[tokio::test]
    async fn test_multiple_lots_per_product() {
        let (db, installation) = setup().await;
        let repo = db.inventory();

        let mut older = lot(installation.id, 3, 2);
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert(&older).await.unwrap();
        repo.insert(&lot(installation.id, 3, 3)).await.unwrap();

        assert_eq!(repo.count(installation.id).await.unwrap(), 2);

        // Product-keyed lookup targets the first lot in creation order
        let found = repo
            .find_by_product(installation.id, 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, older.id);
    }

    #[tokio::test]
    async fn test_update_missing_lot_is_not_found() {
        let (db, installation) = setup().await;
        let repo = db.inventory();

        let ghost = lot(installation.id, 1, 1);
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_by_product_takes_one_lot() {
        let (db, installation) = setup().await;
        let repo = db.inventory();

        repo.insert(&lot(installation.id, 5, 1)).await.unwrap();
        repo.insert(&lot(installation.id, 5, 4)).await.unwrap();

        assert!(repo.delete_by_product(installation.id, 5).await.unwrap());
        assert_eq!(repo.count(installation.id).await.unwrap(), 1);

        assert!(repo.delete_by_product(installation.id, 5).await.unwrap());
        assert!(!repo.delete_by_product(installation.id, 5).await.unwrap());
    }
}
