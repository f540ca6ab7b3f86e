//! # larder-service: Orchestration Layer for Larder
//!
//! Services that drive the pairing lifecycle and the shared pantry. Each
//! service is generic over the storage ports defined in
//! [`larder_core::store`], so production wires in the larder-db repositories
//! while tests use the fakes in [`memory`].
//!
//! ## Services
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Layer                                    │
//! │                                                                         │
//! │  PairingCoordinator                                                    │
//! │  ├── create_installation()  → installation + first code                │
//! │  ├── rotate_code(id)        → supersedes the active code               │
//! │  └── join_by_code(code)     → installation id for a second device      │
//! │                                                                         │
//! │  InventoryService                                                      │
//! │  ├── add_lot / list_lots / get_lot                                     │
//! │  ├── update_lot[_by_id]     → field-by-field partial updates           │
//! │  └── delete_lot[_by_id]                                                │
//! │                                                                         │
//! │  RequirementService                                                    │
//! │  ├── set_requirement(s) / list / update / delete                       │
//! │  └── shopping_list()        → snapshots + core reconciliation          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pairing`] - Installation creation, code rotation, join-by-code
//! - [`inventory`] - Inventory lot CRUD with partial updates
//! - [`requirement`] - Requirements and the shopping list entry point
//! - [`memory`] - In-memory store implementations for tests

pub mod inventory;
pub mod memory;
pub mod pairing;
pub mod requirement;

pub use inventory::InventoryService;
pub use pairing::PairingCoordinator;
pub use requirement::RequirementService;
