//! # Requirement Service
//!
//! Per-product minimum quantities and the shopping list entry point.
//!
//! ## Reconciliation Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    shopping_list(installation)                          │
//! │                                                                         │
//! │  RequirementStore ──list──► [Requirement]  ─┐                          │
//! │                                             ├──► compute_shopping_list │
//! │  InventoryStore  ──list──► [InventoryLot] ──┘         (larder-core)    │
//! │                                                                         │
//! │  Two independent snapshot reads; no cross-store transaction. The       │
//! │  output is advisory, so a write landing between the reads only means   │
//! │  the next call sees it.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requirements are unique per `(installation, product)`: setting one for a
//! product that already has one replaces it in place rather than failing.

use tracing::{debug, info};
use uuid::Uuid;

use larder_core::clock::Clock;
use larder_core::store::{InventoryStore, RequirementStore};
use larder_core::validation::{validate_product_name, validate_quantity};
use larder_core::{
    compute_shopping_list, CoreError, CoreResult, NewRequirement, Requirement, ShoppingListItem,
    UpdateRequirement,
};

/// Service for product requirements and shopping list derivation.
pub struct RequirementService<R, S, C> {
    requirements: R,
    inventory: S,
    clock: C,
}

impl<R, S, C> RequirementService<R, S, C>
where
    R: RequirementStore,
    S: InventoryStore,
    C: Clock,
{
    /// Creates a new RequirementService.
    pub fn new(requirements: R, inventory: S, clock: C) -> Self {
        RequirementService {
            requirements,
            inventory,
            clock,
        }
    }

    /// Sets the minimum quantity for a product.
    ///
    /// Inserts a new requirement, or replaces the existing one for the same
    /// product - an installation carries at most one requirement per product.
    pub async fn set_requirement(
        &self,
        installation_id: Uuid,
        request: NewRequirement,
    ) -> CoreResult<Requirement> {
        validate_product_name(&request.product_name)?;
        validate_quantity("minimum_quantity", request.minimum_quantity)?;

        let now = self.clock.now();
        let requirement = Requirement {
            id: Uuid::new_v4(),
            installation_id,
            product_id: request.product_id,
            product_name: request.product_name.trim().to_string(),
            minimum_quantity: request.minimum_quantity,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .requirements
            .upsert(&requirement)
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    CoreError::DuplicateRequirement {
                        installation_id,
                        product_id: request.product_id,
                    }
                } else {
                    err.into()
                }
            })?;

        info!(
            installation_id = %installation_id,
            product_id = stored.product_id,
            minimum = stored.minimum_quantity,
            "Set requirement"
        );
        Ok(stored)
    }

    /// Sets several requirements in one call.
    ///
    /// Applied in order; stops at the first failure, leaving earlier entries
    /// persisted.
    pub async fn set_requirements(
        &self,
        installation_id: Uuid,
        requests: Vec<NewRequirement>,
    ) -> CoreResult<Vec<Requirement>> {
        let mut stored = Vec::with_capacity(requests.len());
        for request in requests {
            stored.push(self.set_requirement(installation_id, request).await?);
        }
        Ok(stored)
    }

    /// All requirements for the installation, in creation order.
    pub async fn list_requirements(&self, installation_id: Uuid) -> CoreResult<Vec<Requirement>> {
        Ok(self.requirements.list(installation_id).await?)
    }

    /// Partially updates the requirement for `(installation_id, product_id)`.
    ///
    /// ## Errors
    /// * `CoreError::RequirementNotFound` - no requirement for this product
    pub async fn update_requirement(
        &self,
        installation_id: Uuid,
        product_id: i64,
        request: UpdateRequirement,
    ) -> CoreResult<Requirement> {
        if let Some(minimum) = request.minimum_quantity {
            validate_quantity("minimum_quantity", minimum)?;
        }

        let mut requirement = self
            .requirements
            .find_by_product(installation_id, product_id)
            .await?
            .ok_or(CoreError::RequirementNotFound {
                installation_id,
                product_id,
            })?;

        if request.apply(&mut requirement) {
            requirement.updated_at = self.clock.now();
            self.requirements.update(&requirement).await?;
            info!(
                installation_id = %installation_id,
                product_id,
                minimum = requirement.minimum_quantity,
                "Updated requirement"
            );
        } else {
            debug!(
                installation_id = %installation_id,
                product_id,
                "Update request changed nothing, skipping write"
            );
        }

        Ok(requirement)
    }

    /// Deletes the requirement for `(installation_id, product_id)`.
    ///
    /// ## Errors
    /// * `CoreError::RequirementNotFound` - no requirement for this product
    pub async fn delete_requirement(
        &self,
        installation_id: Uuid,
        product_id: i64,
    ) -> CoreResult<()> {
        let deleted = self
            .requirements
            .delete_by_product(installation_id, product_id)
            .await?;

        if !deleted {
            return Err(CoreError::RequirementNotFound {
                installation_id,
                product_id,
            });
        }

        info!(installation_id = %installation_id, product_id, "Deleted requirement");
        Ok(())
    }

    /// Derives the shopping list for the installation.
    ///
    /// Reads the requirement and inventory snapshots and hands them to the
    /// pure reconciliation engine. Output order follows requirement creation
    /// order; repeated calls over an unchanged store yield identical lists.
    pub async fn shopping_list(&self, installation_id: Uuid) -> CoreResult<Vec<ShoppingListItem>> {
        let requirements = self.requirements.list(installation_id).await?;
        let lots = self.inventory.list(installation_id).await?;

        let items = compute_shopping_list(&lots, &requirements);
        debug!(
            installation_id = %installation_id,
            requirements = requirements.len(),
            lots = lots.len(),
            missing = items.len(),
            "Computed shopping list"
        );
        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
