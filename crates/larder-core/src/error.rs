//! # Error Types
//!
//! Domain-specific error types for larder-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  larder-core errors (this file)                                        │
//! │  ├── CoreError        - Pairing and inventory domain errors            │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── StoreError       - What the storage ports may return              │
//! │                                                                         │
//! │  larder-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← StoreError ← DbError              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (installation id, product id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Installation cannot be found.
    ///
    /// ## When This Occurs
    /// - Rotating a code for an installation id that was never created
    /// - Installation was deleted (cascade removes codes, lots, requirements)
    #[error("Installation not found: {0}")]
    InstallationNotFound(Uuid),

    /// No inventory lot matches `(installation_id, product_id)`.
    ///
    /// ## When This Occurs
    /// - Updating or deleting a product the installation never stocked
    /// - The last lot for the product was already deleted
    #[error("Inventory lot not found for installation {installation_id}, product {product_id}")]
    LotNotFound {
        installation_id: Uuid,
        product_id: i64,
    },

    /// No inventory lot has the given lot id.
    #[error("Inventory lot not found: {0}")]
    LotIdNotFound(Uuid),

    /// No requirement row matches `(installation_id, product_id)`.
    #[error("Requirement not found for installation {installation_id}, product {product_id}")]
    RequirementNotFound {
        installation_id: Uuid,
        product_id: i64,
    },

    /// Pairing code does not exist.
    ///
    /// ## When This Occurs
    /// - The code was mistyped
    /// - The code was rotated away (superseded codes are deleted, not expired)
    ///
    /// ## Note
    /// A rotated-away code reports this variant, not [`CoreError::PairingCodeExpired`]:
    /// rotation deletes the row, so the store genuinely has no such code.
    #[error("Invalid pairing code")]
    InvalidPairingCode,

    /// Pairing code exists but its validity window has passed.
    ///
    /// A code is valid strictly *before* `expired_at`; joining at the expiry
    /// instant already fails.
    #[error("Pairing code expired at {expired_at}")]
    PairingCodeExpired { expired_at: DateTime<Utc> },

    /// A requirement for this `(installation, product)` pair already exists
    /// and could not be replaced.
    #[error("Requirement already exists for installation {installation_id}, product {product_id}")]
    DuplicateRequirement {
        installation_id: Uuid,
        product_id: i64,
    },

    /// The code generator kept colliding with stored codes.
    ///
    /// With a 36^6 code space this indicates a store problem, not bad luck.
    #[error("Could not generate a unique pairing code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage error (wraps StoreError).
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be at least 1.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed pairing code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors the storage ports in [`crate::store`] may return.
///
/// Kept deliberately small: the ports describe *what* can go wrong, the
/// database crate decides *how* its own failures map onto these variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced row is absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A uniqueness constraint was violated.
    ///
    /// ## When This Occurs
    /// - Inserting a pairing code that collides with a live one
    /// - A racing duplicate requirement slipping past the upsert
    #[error("Conflict on {constraint}")]
    Conflict { constraint: String },

    /// The backing store could not be reached or failed mid-operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Conflict error for a named constraint.
    pub fn conflict(constraint: impl Into<String>) -> Self {
        StoreError::Conflict {
            constraint: constraint.into(),
        }
    }

    /// True if this is a uniqueness conflict (retryable for code generation).
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
