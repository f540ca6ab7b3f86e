//! # Shopping-List Reconciliation
//!
//! Pure computation of the shopping list from two snapshots.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Shopping List Reconciliation                            │
//! │                                                                         │
//! │  Inventory lots                    Requirements                        │
//! │  ┌──────────────────┐              ┌──────────────────────┐            │
//! │  │ p1 qty 2 (fridge)│              │ p1 min 4             │            │
//! │  │ p1 qty 3 (cellar)│              │ p2 min 5 "Milk"      │            │
//! │  │ p3 qty 1         │              └──────────┬───────────┘            │
//! │  └────────┬─────────┘                         │                        │
//! │           ▼                                   │                        │
//! │  Sum per product:                             │                        │
//! │    p1 → 5, p3 → 1                             │                        │
//! │           │                                   │                        │
//! │           └────────────────┬──────────────────┘                        │
//! │                            ▼                                           │
//! │  For each requirement: missing = min − on_hand                         │
//! │    p1: 4 − 5 = −1  → satisfied, no entry                               │
//! │    p2: 5 − 0 =  5  → {p2, "Milk", 0, 5, 5}                             │
//! │                                                                         │
//! │  Output order = requirement order (stable and deterministic)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Properties
//! - Read-only and idempotent: same snapshots in, same list out
//! - No entry for satisfied or over-satisfied requirements
//! - Products with lots but no requirement never appear

use std::collections::HashMap;

use crate::types::{InventoryLot, Requirement, ShoppingListItem};

/// Derives the shopping list for one installation.
///
/// ## Arguments
/// * `lots` - Snapshot of all inventory lots for the installation
/// * `requirements` - Snapshot of all requirements for the installation
///
/// ## Returns
/// One [`ShoppingListItem`] per requirement whose aggregated on-hand quantity
/// is below its minimum, in requirement iteration order. Empty when nothing
/// is missing.
pub fn compute_shopping_list(
    lots: &[InventoryLot],
    requirements: &[Requirement],
) -> Vec<ShoppingListItem> {
    // Aggregate lots: several rows per product collapse into one total
    let mut on_hand: HashMap<i64, i64> = HashMap::new();
    for lot in lots {
        *on_hand.entry(lot.product_id).or_insert(0) += lot.quantity;
    }

    requirements
        .iter()
        .filter_map(|requirement| {
            let current_quantity = on_hand.get(&requirement.product_id).copied().unwrap_or(0);
            let missing_quantity = requirement.minimum_quantity - current_quantity;

            if missing_quantity > 0 {
                Some(ShoppingListItem {
                    product_id: requirement.product_id,
                    product_name: requirement.product_name.clone(),
                    current_quantity,
                    required_quantity: requirement.minimum_quantity,
                    missing_quantity,
                })
            } else {
                None
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

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

    fn requirement(
        installation_id: Uuid,
        product_id: i64,
        name: &str,
        minimum_quantity: i64,
    ) -> Requirement {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        Requirement {
            id: Uuid::new_v4(),
            installation_id,
            product_id,
            product_name: name.to_string(),
            minimum_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_multi_lot_aggregation_satisfies_requirement() {
        let installation = Uuid::new_v4();

        // Two lots of product 1 (e.g. different best-before dates): 2 + 3 = 5 >= 4
        let lots = vec![lot(installation, 1, 2), lot(installation, 1, 3)];
        let requirements = vec![requirement(installation, 1, "Pasta", 4)];

        let list = compute_shopping_list(&lots, &requirements);
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_product_gets_full_requirement() {
        let installation = Uuid::new_v4();
        let requirements = vec![requirement(installation, 2, "Milk", 5)];

        let list = compute_shopping_list(&[], &requirements);

        assert_eq!(
            list,
            vec![ShoppingListItem {
                product_id: 2,
                product_name: "Milk".to_string(),
                current_quantity: 0,
                required_quantity: 5,
                missing_quantity: 5,
            }]
        );
    }

    #[test]
    fn test_partial_shortfall() {
        let installation = Uuid::new_v4();
        let lots = vec![lot(installation, 3, 2)];
        let requirements = vec![requirement(installation, 3, "Eggs", 6)];

        let list = compute_shopping_list(&lots, &requirements);

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].current_quantity, 2);
        assert_eq!(list[0].missing_quantity, 4);
    }

    #[test]
    fn test_lots_without_requirement_are_ignored() {
        let installation = Uuid::new_v4();
        let lots = vec![lot(installation, 9, 50)];

        let list = compute_shopping_list(&lots, &[]);
        assert!(list.is_empty());
    }

    #[test]
    fn test_output_follows_requirement_order() {
        let installation = Uuid::new_v4();
        let requirements = vec![
            requirement(installation, 7, "Flour", 2),
            requirement(installation, 3, "Milk", 1),
            requirement(installation, 5, "Eggs", 6),
        ];

        let list = compute_shopping_list(&[], &requirements);
        let ids: Vec<i64> = list.iter().map(|item| item.product_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_idempotent_for_fixed_snapshot() {
        let installation = Uuid::new_v4();
        let lots = vec![lot(installation, 1, 1), lot(installation, 2, 4)];
        let requirements = vec![
            requirement(installation, 1, "Rice", 3),
            requirement(installation, 2, "Beans", 4),
        ];

        let first = compute_shopping_list(&lots, &requirements);
        let second = compute_shopping_list(&lots, &requirements);
        assert_eq!(first, second);
    }
}
