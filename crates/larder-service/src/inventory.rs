//! # Inventory Service
//!
//! Lot-level inventory operations for one installation.
//!
//! ## Update Addressing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways To Address A Lot                            │
//! │                                                                         │
//! │  By lot id (preferred)          By (installation, product)             │
//! │  ──────────────────────         ───────────────────────────            │
//! │  update_lot_by_id(lot_id)       update_lot(installation, product)      │
//! │  exact, unambiguous             convenience; targets the FIRST lot     │
//! │                                 in creation order and cannot tell      │
//! │                                 two lots of one product apart          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Partial Updates
//! Present fields overwrite, absent fields keep their stored value. A request
//! that changes nothing returns the current row without writing, so
//! `updated_at` only moves when data actually moved.

use tracing::{debug, info};
use uuid::Uuid;

use larder_core::clock::Clock;
use larder_core::store::InventoryStore;
use larder_core::validation::{validate_product_name, validate_quantity, validate_text_field};
use larder_core::{CoreError, CoreResult, InventoryLot, NewLot, UpdateLot};

/// Service for inventory lot operations.
pub struct InventoryService<S, C> {
    store: S,
    clock: C,
}

impl<S, C> InventoryService<S, C>
where
    S: InventoryStore,
    C: Clock,
{
    /// Creates a new InventoryService.
    pub fn new(store: S, clock: C) -> Self {
        InventoryService { store, clock }
    }

    /// Adds a new lot.
    ///
    /// Always inserts a fresh row, even when the installation already stocks
    /// the product - that is the point of the lot model.
    pub async fn add_lot(&self, installation_id: Uuid, request: NewLot) -> CoreResult<InventoryLot> {
        validate_product_name(&request.product_name)?;
        validate_quantity("quantity", request.quantity)?;
        validate_text_field("location", request.location.as_deref())?;
        validate_text_field("notes", request.notes.as_deref())?;

        let now = self.clock.now();
        let lot = InventoryLot {
            id: Uuid::new_v4(),
            installation_id,
            product_id: request.product_id,
            product_name: request.product_name.trim().to_string(),
            quantity: request.quantity,
            location: request.location,
            notes: request.notes,
            best_before: request.best_before,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&lot).await?;
        info!(lot_id = %lot.id, product_id = lot.product_id, "Added inventory lot");

        Ok(lot)
    }

    /// All lots for the installation, in creation order.
    pub async fn list_lots(&self, installation_id: Uuid) -> CoreResult<Vec<InventoryLot>> {
        Ok(self.store.list(installation_id).await?)
    }

    /// One lot by its id.
    ///
    /// ## Errors
    /// * `CoreError::LotIdNotFound` - no lot has this id
    pub async fn get_lot(&self, lot_id: Uuid) -> CoreResult<InventoryLot> {
        self.store
            .find_by_id(lot_id)
            .await?
            .ok_or(CoreError::LotIdNotFound(lot_id))
    }

    /// Partially updates the first lot for `(installation_id, product_id)`.
    ///
    /// Convenience path; cannot disambiguate several lots of one product -
    /// prefer [`update_lot_by_id`](Self::update_lot_by_id) when the caller
    /// knows the lot.
    ///
    /// ## Errors
    /// * `CoreError::LotNotFound` - the installation has no lot of this product
    pub async fn update_lot(
        &self,
        installation_id: Uuid,
        product_id: i64,
        request: UpdateLot,
    ) -> CoreResult<InventoryLot> {
        let lot = self
            .store
            .find_by_product(installation_id, product_id)
            .await?
            .ok_or(CoreError::LotNotFound {
                installation_id,
                product_id,
            })?;

        self.apply_update(lot, request).await
    }

    /// Partially updates one lot addressed by its id.
    ///
    /// ## Errors
    /// * `CoreError::LotIdNotFound` - no lot has this id
    pub async fn update_lot_by_id(
        &self,
        lot_id: Uuid,
        request: UpdateLot,
    ) -> CoreResult<InventoryLot> {
        let lot = self
            .store
            .find_by_id(lot_id)
            .await?
            .ok_or(CoreError::LotIdNotFound(lot_id))?;

        self.apply_update(lot, request).await
    }

    /// Deletes the first lot for `(installation_id, product_id)`.
    ///
    /// ## Errors
    /// * `CoreError::LotNotFound` - nothing matched
    pub async fn delete_lot(&self, installation_id: Uuid, product_id: i64) -> CoreResult<()> {
        let deleted = self
            .store
            .delete_by_product(installation_id, product_id)
            .await?;

        if !deleted {
            return Err(CoreError::LotNotFound {
                installation_id,
                product_id,
            });
        }

        info!(installation_id = %installation_id, product_id, "Deleted inventory lot");
        Ok(())
    }

    /// Deletes one lot by its id.
    ///
    /// ## Errors
    /// * `CoreError::LotIdNotFound` - no lot has this id
    pub async fn delete_lot_by_id(&self, lot_id: Uuid) -> CoreResult<()> {
        if !self.store.delete_by_id(lot_id).await? {
            return Err(CoreError::LotIdNotFound(lot_id));
        }

        info!(lot_id = %lot_id, "Deleted inventory lot");
        Ok(())
    }

    /// Validates and applies a partial update, writing only on change.
    async fn apply_update(
        &self,
        mut lot: InventoryLot,
        request: UpdateLot,
    ) -> CoreResult<InventoryLot> {
        if let Some(quantity) = request.quantity {
            validate_quantity("quantity", quantity)?;
        }
        validate_text_field("location", request.location.as_deref())?;
        validate_text_field("notes", request.notes.as_deref())?;

        if request.apply(&mut lot) {
            lot.updated_at = self.clock.now();
            self.store.update(&lot).await?;
            info!(lot_id = %lot.id, "Updated inventory lot");
        } else {
            debug!(lot_id = %lot.id, "Update request changed nothing, skipping write");
        }

        Ok(lot)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryInventoryStore;
    use chrono::{TimeZone, Utc};
    use larder_core::clock::FixedClock;

    fn service() -> InventoryService<MemoryInventoryStore, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap());
        InventoryService::new(MemoryInventoryStore::new(), clock)
    }

    fn new_lot(product_id: i64, quantity: i64) -> NewLot {
        NewLot {
            product_id,
            product_name: format!("Product {product_id}"),
            quantity,
            location: None,
            notes: None,
            best_before: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let service = service();
        let installation = Uuid::new_v4();

        service.add_lot(installation, new_lot(1, 2)).await.unwrap();
        service.add_lot(installation, new_lot(1, 3)).await.unwrap();

        let lots = service.list_lots(installation).await.unwrap();
        assert_eq!(lots.len(), 2);
        assert!(lots.iter().all(|lot| lot.product_id == 1));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let service = service();
        let installation = Uuid::new_v4();

        let mut bad_quantity = new_lot(1, 0);
        bad_quantity.quantity = 0;
        assert!(matches!(
            service.add_lot(installation, bad_quantity).await,
            Err(CoreError::Validation(_))
        ));

        let mut bad_name = new_lot(1, 2);
        bad_name.product_name = "  ".to_string();
        assert!(matches!(
            service.add_lot(installation, bad_name).await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_update_by_product() {
        let service = service();
        let installation = Uuid::new_v4();

        let created = service.add_lot(installation, new_lot(1, 2)).await.unwrap();

        let updated = service
            .update_lot(
                installation,
                1,
                UpdateLot {
                    quantity: Some(7),
                    ..UpdateLot::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.product_name, created.product_name);
    }

    #[tokio::test]
    async fn test_noop_update_leaves_updated_at() {
        let service = service();
        let installation = Uuid::new_v4();

        let created = service.add_lot(installation, new_lot(1, 2)).await.unwrap();

        // Clock moves on, but the request repeats stored values
        service.clock.advance(chrono::Duration::hours(1));
        let unchanged = service
            .update_lot_by_id(
                created.id,
                UpdateLot {
                    quantity: Some(2),
                    ..UpdateLot::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(unchanged.updated_at, created.updated_at);

        // An actual change does move it
        let changed = service
            .update_lot_by_id(
                created.id,
                UpdateLot {
                    quantity: Some(3),
                    ..UpdateLot::default()
                },
            )
            .await
            .unwrap();
        assert!(changed.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_pair_is_not_found() {
        let service = service();
        let installation = Uuid::new_v4();

        let err = service
            .update_lot(installation, 99, UpdateLot::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::LotNotFound { product_id: 99, .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_pair_is_not_found() {
        let service = service();
        let installation = Uuid::new_v4();

        let err = service.delete_lot(installation, 1).await.unwrap_err();
        assert!(matches!(err, CoreError::LotNotFound { .. }));

        let err = service.delete_lot_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::LotIdNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_by_id_targets_exact_lot() {
        let service = service();
        let installation = Uuid::new_v4();

        let first = service.add_lot(installation, new_lot(1, 2)).await.unwrap();
        let second = service.add_lot(installation, new_lot(1, 3)).await.unwrap();

        service.delete_lot_by_id(second.id).await.unwrap();

        let remaining = service.list_lots(installation).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, first.id);
    }
}
