//! # Storage Ports
//!
//! Trait definitions for the durable stores the services orchestrate.
//!
//! ## Ports and Adapters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storage Ports                                     │
//! │                                                                         │
//! │  larder-service                    larder-core (THIS FILE)             │
//! │  ┌──────────────────┐              ┌──────────────────────┐            │
//! │  │ PairingCoordinator│─ depends on │ InstallationStore    │            │
//! │  │ InventoryService │──────────────► PairingCodeStore     │            │
//! │  │ RequirementSvc   │              │ InventoryStore       │            │
//! │  └──────────────────┘              │ RequirementStore     │            │
//! │                                    └──────────┬───────────┘            │
//! │                                               │ implemented by         │
//! │                      ┌────────────────────────┼─────────────┐          │
//! │                      ▼                        ▼             │          │
//! │          larder-db repositories     in-memory fakes (tests) │          │
//! │          (SQLite via sqlx)          (larder-service)        │          │
//! │                                                             │          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No trait here performs business logic; they are thin persistence contracts.
//! All methods return [`StoreError`] so services stay ignorant of sqlx.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Installation, InventoryLot, PairingCode, Requirement};

/// Durable set of installation identities.
#[async_trait]
pub trait InstallationStore: Send + Sync {
    /// Persists a new installation.
    async fn insert(&self, installation: &Installation) -> Result<(), StoreError>;

    /// Existence check used as the precondition for code rotation.
    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Durable mapping installation → currently active pairing code.
#[async_trait]
pub trait PairingCodeStore: Send + Sync {
    /// Atomically replaces the installation's active code.
    ///
    /// Deletes any existing code row for the installation (idempotent if none
    /// exists) and inserts `code` as a single unit: a concurrent
    /// [`find_by_code`](Self::find_by_code) never observes both codes present
    /// or neither present.
    ///
    /// ## Errors
    /// * `StoreError::Conflict` - `code.code` collides with a live code of
    ///   another installation (caller retries with a fresh code)
    async fn replace(&self, installation_id: Uuid, code: &PairingCode) -> Result<(), StoreError>;

    /// Reverse lookup code → pairing code row.
    async fn find_by_code(&self, code: &str) -> Result<Option<PairingCode>, StoreError>;
}

/// Durable multi-row ledger of on-hand quantities.
///
/// One row per lot; several lots may share `(installation_id, product_id)`.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Persists a new lot.
    async fn insert(&self, lot: &InventoryLot) -> Result<(), StoreError>;

    /// All lots for an installation, ordered by creation time.
    async fn list(&self, installation_id: Uuid) -> Result<Vec<InventoryLot>, StoreError>;

    /// Looks up one lot by its id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryLot>, StoreError>;

    /// First lot for `(installation_id, product_id)` in creation order.
    ///
    /// Convenience for the product-keyed update path; cannot disambiguate
    /// multiple lots of the same product.
    async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<Option<InventoryLot>, StoreError>;

    /// Writes back a modified lot.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - the lot row no longer exists
    async fn update(&self, lot: &InventoryLot) -> Result<(), StoreError>;

    /// Deletes one lot by id. Returns whether a row was deleted.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Deletes the first lot for `(installation_id, product_id)`.
    /// Returns whether a row was deleted.
    async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<bool, StoreError>;
}

/// Durable mapping `(installation, product)` → minimum required quantity.
#[async_trait]
pub trait RequirementStore: Send + Sync {
    /// Inserts the requirement, or replaces the existing row for the same
    /// `(installation_id, product_id)` pair.
    ///
    /// On replace the stored row keeps its original `id` and `created_at`;
    /// the returned row reflects what is now persisted.
    async fn upsert(&self, requirement: &Requirement) -> Result<Requirement, StoreError>;

    /// All requirements for an installation, ordered by creation time.
    async fn list(&self, installation_id: Uuid) -> Result<Vec<Requirement>, StoreError>;

    /// Looks up the requirement for `(installation_id, product_id)`.
    async fn find_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<Option<Requirement>, StoreError>;

    /// Writes back a modified requirement.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - the requirement row no longer exists
    async fn update(&self, requirement: &Requirement) -> Result<(), StoreError>;

    /// Deletes the requirement for `(installation_id, product_id)`.
    /// Returns whether a row was deleted.
    async fn delete_by_product(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> Result<bool, StoreError>;
}
