//! # Repository Module
//!
//! Database repository implementations for Larder.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Each repository owns the SQL for one table and implements the         │
//! │  matching larder-core store trait, so services depend on the trait     │
//! │  and tests can swap in in-memory fakes.                                │
//! │                                                                         │
//! │  Service                                                                │
//! │       │  store.replace(installation_id, &code)                         │
//! │       ▼                                                                 │
//! │  PairingCodeRepository (impl PairingCodeStore)                         │
//! │       │  BEGIN; DELETE ...; INSERT ...; COMMIT                         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`installation::InstallationRepository`] - Installation identities
//! - [`pairing_code::PairingCodeRepository`] - Active pairing codes
//! - [`inventory::InventoryRepository`] - Inventory lots
//! - [`requirement::RequirementRepository`] - Per-product minimums

pub mod installation;
pub mod inventory;
pub mod pairing_code;
pub mod requirement;
