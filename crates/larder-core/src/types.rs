//! # Domain Types
//!
//! Core domain types used throughout Larder.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Installation   │   │  PairingCode    │   │  InventoryLot   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  code (6 chars) │   │  id (UUID)      │       │
//! │  │  created_at     │   │  installation   │   │  product_id     │       │
//! │  └─────────────────┘   │  expires_at     │   │  quantity       │       │
//! │                        └─────────────────┘   │  best_before    │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────┘       │
//! │  │  Requirement    │   │ShoppingListItem │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  product_id     │   │  current_qty    │                             │
//! │  │  minimum_qty    │   │  missing_qty    │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every entity below [`Installation`] is scoped by `installation_id`;
//! nothing is shared across installations. Deleting an installation cascades
//! (enforced by foreign keys in larder-db).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Installation
// =============================================================================

/// A household-level inventory namespace shared by paired devices.
///
/// Created once, never updated in place. Devices converge on one installation
/// id through the pairing flow.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Installation {
    /// Unique identifier (UUID v4).
    #[ts(as = "String")]
    pub id: Uuid,

    /// When the installation was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Installation {
    /// Creates a new installation with a fresh id.
    pub fn new(now: DateTime<Utc>) -> Self {
        Installation {
            id: Uuid::new_v4(),
            created_at: now,
        }
    }
}

// =============================================================================
// Pairing Code
// =============================================================================

/// Short-lived shared secret used to join a device to an installation.
///
/// A value object: it is looked up, found expired, or superseded by rotation.
/// It is never mutated after creation, and at most one code is live per
/// installation at any instant (the store's `replace` enforces this).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PairingCode {
    /// Six uppercase alphanumeric characters (A-Z, 0-9).
    pub code: String,

    /// Installation this code joins into.
    #[ts(as = "String")]
    pub installation_id: Uuid,

    /// Instant at which the code stops working.
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
}

impl PairingCode {
    /// True once the validity window has closed.
    ///
    /// The window is half-open: a code is usable strictly before
    /// `expires_at`, and already dead *at* that instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What a device receives after creating an installation or rotating a code.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PairingResponse {
    #[ts(as = "String")]
    pub installation_id: Uuid,

    /// The freshly issued code to show on screen.
    pub pairing_code: String,

    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Lot
// =============================================================================

/// One discrete quantity record of a product.
///
/// Multiple lots may share the same `(installation_id, product_id)`, e.g. two
/// purchases with different best-before dates. The effective on-hand quantity
/// for a product is the sum over its lots; see [`crate::reconcile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryLot {
    /// Unique identifier (UUID v4). The only key that can disambiguate
    /// several lots of the same product.
    #[ts(as = "String")]
    pub id: Uuid,

    /// Installation this lot belongs to.
    #[ts(as = "String")]
    pub installation_id: Uuid,

    /// Catalog product id (resolved by the separate product service).
    pub product_id: i64,

    /// Display name, denormalized from the catalog at insert time.
    pub product_name: String,

    /// Units on hand in this lot. Always at least 1.
    pub quantity: i64,

    /// Where the lot is kept (e.g. "freezer", "cellar").
    pub location: Option<String>,

    /// Free-form notes.
    pub notes: Option<String>,

    /// Best-before date, if the product carries one.
    #[ts(as = "Option<String>")]
    pub best_before: Option<NaiveDate>,

    /// When the lot was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the lot was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Request payload for adding a new inventory lot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLot {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub best_before: Option<NaiveDate>,
}

/// Partial update for an inventory lot.
///
/// Field-by-field semantics: a present field overwrites the stored value, an
/// absent field leaves it unchanged. There is deliberately no way to *clear*
/// location or notes through this request (matches the device app contract).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateLot {
    pub quantity: Option<i64>,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub best_before: Option<NaiveDate>,
}

impl UpdateLot {
    /// Applies present fields onto `lot`, returning whether anything changed.
    ///
    /// A request that repeats the stored values is reported as unchanged, so
    /// callers can skip the write and leave `updated_at` untouched.
    pub fn apply(&self, lot: &mut InventoryLot) -> bool {
        let mut changed = false;

        if let Some(quantity) = self.quantity {
            if lot.quantity != quantity {
                lot.quantity = quantity;
                changed = true;
            }
        }
        if let Some(location) = &self.location {
            if lot.location.as_deref() != Some(location.as_str()) {
                lot.location = Some(location.clone());
                changed = true;
            }
        }
        if let Some(notes) = &self.notes {
            if lot.notes.as_deref() != Some(notes.as_str()) {
                lot.notes = Some(notes.clone());
                changed = true;
            }
        }
        if let Some(best_before) = self.best_before {
            if lot.best_before != Some(best_before) {
                lot.best_before = Some(best_before);
                changed = true;
            }
        }

        changed
    }
}

// =============================================================================
// Requirement
// =============================================================================

/// A per-product minimum desired on-hand quantity for an installation.
///
/// Unique per `(installation_id, product_id)`: setting a requirement for a
/// pair that already has one replaces it instead of duplicating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Requirement {
    /// Unique identifier (UUID v4).
    #[ts(as = "String")]
    pub id: Uuid,

    /// Installation this requirement belongs to.
    #[ts(as = "String")]
    pub installation_id: Uuid,

    /// Catalog product id.
    pub product_id: i64,

    /// Display name, denormalized from the catalog.
    pub product_name: String,

    /// Desired minimum on-hand quantity. Always at least 1.
    pub minimum_quantity: i64,

    /// When the requirement was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the requirement was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Request payload for setting a requirement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewRequirement {
    pub product_id: i64,
    pub product_name: String,
    pub minimum_quantity: i64,
}

/// Partial update for a requirement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateRequirement {
    pub minimum_quantity: Option<i64>,
}

impl UpdateRequirement {
    /// Applies present fields onto `requirement`, returning whether anything changed.
    pub fn apply(&self, requirement: &mut Requirement) -> bool {
        let mut changed = false;

        if let Some(minimum_quantity) = self.minimum_quantity {
            if requirement.minimum_quantity != minimum_quantity {
                requirement.minimum_quantity = minimum_quantity;
                changed = true;
            }
        }

        changed
    }
}

// =============================================================================
// Shopping List
// =============================================================================

/// One line of the derived shopping list.
///
/// Emitted only for products whose aggregated on-hand quantity is below their
/// requirement; satisfied requirements produce no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShoppingListItem {
    pub product_id: i64,
    pub product_name: String,

    /// Sum of lot quantities currently on hand (0 when no lots exist).
    pub current_quantity: i64,

    /// The requirement's minimum quantity.
    pub required_quantity: i64,

    /// `required_quantity - current_quantity`; always positive in emitted items.
    pub missing_quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
