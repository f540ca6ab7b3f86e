//! # In-Memory Store Implementations
//!
//! Vec-backed implementations of the storage ports, used by unit tests and
//! any caller that wants the full service stack without a database file.
//!
//! Rows live in a `tokio::sync::RwLock<Vec<_>>` in insertion order, which
//! matches the `ORDER BY created_at, id` the SQLite repositories use. The
//! fakes mirror the repositories' observable behavior exactly, including
//! conflict detection in [`MemoryPairingCodeStore::replace`] and
//! keep-id-on-replace in [`MemoryRequirementStore::upsert`].

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use larder_core::error::StoreError;
use larder_core::store::{InstallationStore, InventoryStore, PairingCodeStore, RequirementStore};
use larder_core::{Installation, InventoryLot, PairingCode, Requirement};

// =============================================================================
// Installations
// =============================================================================

/// In-memory [`InstallationStore`].
#[derive(Default)]
pub struct MemoryInstallationStore {
    rows: RwLock<Vec<Installation>>,
}

impl MemoryInstallationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstallationStore for MemoryInstallationStore {
    async fn insert(&self, installation: &Installation) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id == installation.id) {
            return Err(StoreError::conflict("installations.id"));
        }
        rows.push(installation.clone());
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.rows.read().await.iter().any(|row| row.id == id))
    }
}

// =============================================================================
// Pairing codes
// =============================================================================

/// In-memory [`PairingCodeStore`].
#[derive(Default)]
pub struct MemoryPairingCodeStore {
    rows: RwLock<Vec<PairingCode>>,
}

impl MemoryPairingCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PairingCodeStore for MemoryPairingCodeStore {
    async fn replace(&self, installation_id: Uuid, code: &PairingCode) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;

        // Conflict check before the delete, so a failed replace leaves the
        // installation's previous code intact (as a rolled-back transaction
        // would)
        if rows
            .iter()
            .any(|row| row.code == code.code && row.installation_id != installation_id)
        {
            return Err(StoreError::conflict("pairing_codes.code"));
        }

        rows.retain(|row| row.installation_id != installation_id);
        rows.push(code.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<PairingCode>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|row| row.code == code)
            .cloned())
    }
}

// =============================================================================
// Inventory lots
// =============================================================================

/// In-memory [`InventoryStore`].
#[derive(Default)]
pub struct MemoryInventoryStore {
    rows: RwLock<Vec<InventoryLot>>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn insert(&self, lot: &InventoryLot) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id == lot.id) {
            return Err(StoreError::conflict("inventory_lots.id"));
        }
        rows.push(lot.clone());
        Ok(())
    }

    async fn list(&self, installation_id: Uuid) -> Result<Vec<InventoryLot>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| row.installation_id == installation_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryLot>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<Option<InventoryLot>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|row| row.installation_id == installation_id && row.product_id == product_id)
            .cloned())
    }

    async fn update(&self, lot: &InventoryLot) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.id == lot.id) {
            Some(row) => {
                *row = lot.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("inventory_lot", lot.id.to_string())),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let target = rows
            .iter()
            .position(|row| row.installation_id == installation_id && row.product_id == product_id);
        match target {
            Some(index) => {
                rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// Requirements
// =============================================================================

/// In-memory [`RequirementStore`].
#[derive(Default)]
pub struct MemoryRequirementStore {
    rows: RwLock<Vec<Requirement>>,
}

impl MemoryRequirementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequirementStore for MemoryRequirementStore {
    async fn upsert(&self, requirement: &Requirement) -> Result<Requirement, StoreError> {
        let mut rows = self.rows.write().await;
        let existing = rows.iter_mut().find(|row| {
            row.installation_id == requirement.installation_id
                && row.product_id == requirement.product_id
        });
        match existing {
            Some(row) => {
                row.product_name = requirement.product_name.clone();
                row.minimum_quantity = requirement.minimum_quantity;
                row.updated_at = requirement.updated_at;
                Ok(row.clone())
            }
            None => {
                rows.push(requirement.clone());
                Ok(requirement.clone())
            }
        }
    }

    async fn list(&self, installation_id: Uuid) -> Result<Vec<Requirement>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| row.installation_id == installation_id)
            .cloned()
            .collect())
    }

    async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Requirement>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|row| row.installation_id == installation_id && row.product_id == product_id)
            .cloned())
    }

    async fn update(&self, requirement: &Requirement) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.id == requirement.id) {
            Some(row) => {
                *row = requirement.clone();
                Ok(())
            }
            None => Err(StoreError::not_found(
                "requirement",
                requirement.id.to_string(),
            )),
        }
    }

    async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| {
            !(row.installation_id == installation_id && row.product_id == product_id)
        });
        Ok(rows.len() < before)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn lot(installation_id: Uuid, product_id: i64, quantity: i64) -> InventoryLot {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
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
    async fn test_replace_conflict_preserves_previous_code() {
        let store = MemoryPairingCodeStore::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store
            .replace(
                first,
                &PairingCode {
                    code: "AAAAAA".into(),
                    installation_id: first,
                    expires_at: now + Duration::minutes(15),
                },
            )
            .await
            .unwrap();
        store
            .replace(
                second,
                &PairingCode {
                    code: "BBBBBB".into(),
                    installation_id: second,
                    expires_at: now + Duration::minutes(15),
                },
            )
            .await
            .unwrap();

        // Second installation tries to take the first's code
        let err = store
            .replace(
                second,
                &PairingCode {
                    code: "AAAAAA".into(),
                    installation_id: second,
                    expires_at: now + Duration::minutes(15),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Its previous code is still live
        let survivor = store.find_by_code("BBBBBB").await.unwrap().unwrap();
        assert_eq!(survivor.installation_id, second);
    }

    #[tokio::test]
    async fn test_find_by_product_returns_first_inserted() {
        let store = MemoryInventoryStore::new();
        let installation = Uuid::new_v4();

        let first = lot(installation, 1, 2);
        let second = lot(installation, 1, 3);
        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        let found = store.find_by_product(installation, 1).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_upsert_keeps_original_identity() {
        let store = MemoryRequirementStore::new();
        let installation = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

        let original = Requirement {
            id: Uuid::new_v4(),
            installation_id: installation,
            product_id: 1,
            product_name: "Milk".into(),
            minimum_quantity: 2,
            created_at: now,
            updated_at: now,
        };
        store.upsert(&original).await.unwrap();

        let replacement = Requirement {
            id: Uuid::new_v4(),
            minimum_quantity: 5,
            updated_at: now + Duration::minutes(5),
            ..original.clone()
        };
        let stored = store.upsert(&replacement).await.unwrap();

        assert_eq!(stored.id, original.id);
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.minimum_quantity, 5);
    }
}
