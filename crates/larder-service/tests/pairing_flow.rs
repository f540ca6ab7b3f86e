//! End-to-end tests running the service layer against real SQLite
//! repositories on an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use larder_core::clock::FixedClock;
use larder_core::code::RandomCodeGenerator;
use larder_core::{CoreError, NewLot, NewRequirement};
use larder_db::{Database, DbConfig};
use larder_service::{InventoryService, PairingCoordinator, RequirementService};

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap())
}

fn new_lot(product_id: i64, name: &str, quantity: i64) -> NewLot {
    NewLot {
        product_id,
        product_name: name.to_string(),
        quantity,
        location: None,
        notes: None,
        best_before: None,
    }
}

#[tokio::test]
async fn pairing_lifecycle_against_sqlite() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let clock = clock();
    let coordinator = PairingCoordinator::new(
        db.installations(),
        db.pairing_codes(),
        clock.clone(),
        RandomCodeGenerator,
    );

    // Device A creates the installation and shows its code
    let created = coordinator.create_installation().await.unwrap();
    assert_eq!(created.pairing_code.len(), 6);

    // Device B joins with the same code
    let joined = coordinator.join_by_code(&created.pairing_code).await.unwrap();
    assert_eq!(joined, created.installation_id);

    // Rotation supersedes the code
    let rotated = coordinator
        .rotate_code(created.installation_id)
        .await
        .unwrap();
    assert_ne!(rotated.pairing_code, created.pairing_code);

    let joined = coordinator.join_by_code(&rotated.pairing_code).await.unwrap();
    assert_eq!(joined, created.installation_id);

    let err = coordinator
        .join_by_code(&created.pairing_code)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidPairingCode));

    // The rotated code expires at the boundary
    clock.set(rotated.expires_at);
    let err = coordinator
        .join_by_code(&rotated.pairing_code)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PairingCodeExpired { .. }));
}

#[tokio::test]
async fn rotate_unknown_installation_against_sqlite() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let coordinator = PairingCoordinator::new(
        db.installations(),
        db.pairing_codes(),
        clock(),
        RandomCodeGenerator,
    );

    let missing = Uuid::new_v4();
    let err = coordinator.rotate_code(missing).await.unwrap_err();
    assert!(matches!(err, CoreError::InstallationNotFound(id) if id == missing));
}

#[tokio::test]
async fn pantry_to_shopping_list_against_sqlite() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let clock = clock();

    let coordinator = PairingCoordinator::new(
        db.installations(),
        db.pairing_codes(),
        clock.clone(),
        RandomCodeGenerator,
    );
    let inventory = InventoryService::new(db.inventory(), clock.clone());
    let requirements = RequirementService::new(db.requirements(), db.inventory(), clock.clone());

    let installation = coordinator.create_installation().await.unwrap().installation_id;

    // Stock the pantry: pasta split over two lots, milk short
    inventory
        .add_lot(installation, new_lot(1, "Penne Pasta", 2))
        .await
        .unwrap();
    clock.advance(Duration::seconds(1));
    inventory
        .add_lot(installation, new_lot(1, "Penne Pasta", 3))
        .await
        .unwrap();
    clock.advance(Duration::seconds(1));
    let milk = inventory
        .add_lot(installation, new_lot(2, "Whole Milk", 1))
        .await
        .unwrap();

    requirements
        .set_requirements(
            installation,
            vec![
                NewRequirement {
                    product_id: 1,
                    product_name: "Penne Pasta".into(),
                    minimum_quantity: 4,
                },
                NewRequirement {
                    product_id: 2,
                    product_name: "Whole Milk".into(),
                    minimum_quantity: 4,
                },
                NewRequirement {
                    product_id: 3,
                    product_name: "Tomato Passata".into(),
                    minimum_quantity: 3,
                },
            ],
        )
        .await
        .unwrap();

    // Pasta is satisfied across lots; milk is short by 3; passata fully missing
    let list = requirements.shopping_list(installation).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].product_name, "Whole Milk");
    assert_eq!(list[0].current_quantity, 1);
    assert_eq!(list[0].missing_quantity, 3);
    assert_eq!(list[1].product_name, "Tomato Passata");
    assert_eq!(list[1].missing_quantity, 3);

    // Buying more milk clears its entry
    clock.advance(Duration::seconds(1));
    inventory
        .update_lot_by_id(
            milk.id,
            larder_core::UpdateLot {
                quantity: Some(4),
                ..larder_core::UpdateLot::default()
            },
        )
        .await
        .unwrap();

    let list = requirements.shopping_list(installation).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].product_name, "Tomato Passata");
}
