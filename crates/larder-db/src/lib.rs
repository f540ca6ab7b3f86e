//! # larder-db: Database Layer for Larder
//!
//! This crate provides database access for the Larder system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Larder Data Flow                                │
//! │                                                                         │
//! │  larder-service (PairingCoordinator, InventoryService, ...)           │
//! │       │  through larder-core store traits                              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     larder-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ installation  │    │  (embedded)  │  │   │
//! │  │   │               │    │ pairing_code  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ inventory     │    │ 001_init.sql │  │   │
//! │  │   │ Management    │    │ requirement   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (larder.db, WAL mode)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations of the core store traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use larder_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/larder.db")).await?;
//! let lots = db.inventory().list(installation_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::installation::InstallationRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::pairing_code::PairingCodeRepository;
pub use repository::requirement::RequirementRepository;
