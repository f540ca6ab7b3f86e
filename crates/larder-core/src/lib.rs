//! # larder-core: Pure Business Logic for Larder
//!
//! This crate is the **heart** of Larder. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Larder Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Device App (TypeScript)                      │   │
//! │  │    Pair screen ──► Pantry UI ──► Shopping list UI              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    larder-service                               │   │
//! │  │    PairingCoordinator, InventoryService, RequirementService    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ larder-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   code    │  │ reconcile │  │   store   │  │   │
//! │  │   │ Lot, Req  │  │ PairCode  │  │ Shopping  │  │  traits   │  │   │
//! │  │   │ Install.  │  │ generator │  │   list    │  │  (ports)  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    larder-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Installation, InventoryLot, Requirement, etc.)
//! - [`code`] - Pairing-code alphabet, TTL, and generator
//! - [`clock`] - Injected time source for lazy expiry checks
//! - [`reconcile`] - Pure shopping-list computation
//! - [`store`] - Storage trait ports implemented by larder-db
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic given its inputs
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Injected Time**: Nothing reads the wall clock directly; callers pass a [`clock::Clock`]
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod code;
pub mod error;
pub mod reconcile;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use larder_core::InventoryLot` instead of
// `use larder_core::types::InventoryLot`

pub use clock::{Clock, SystemClock};
pub use error::{CoreError, CoreResult, StoreError, ValidationError};
pub use reconcile::compute_shopping_list;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name.
///
/// Matches the device app's input limit; longer names are rejected before
/// they reach the database.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of free-text fields (location, notes).
pub const MAX_TEXT_FIELD_LEN: usize = 1000;
