//! # Seed Data Generator
//!
//! Populates a database with a demo installation for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p larder-db --bin seed
//!
//! # Specify database path
//! cargo run -p larder-db --bin seed -- --db ./data/larder.db
//! ```
//!
//! ## Generated Data
//! - One installation with an active pairing code
//! - A handful of inventory lots (some products split across two lots)
//! - Requirements for a few products, some deliberately unsatisfied
//!
//! Finishes by printing the derived shopping list so the data can be
//! eyeballed immediately.

use chrono::{Duration, NaiveDate, Utc};
use std::env;
use uuid::Uuid;

use larder_core::code::{pairing_code_ttl, CodeGenerator, RandomCodeGenerator};
use larder_core::{compute_shopping_list, Installation, InventoryLot, PairingCode};
use larder_db::repository::requirement::new_requirement_row;
use larder_db::{Database, DbConfig};

/// Demo pantry: (product_id, name, lot quantities, best_before per lot)
const LOTS: &[(i64, &str, &[i64])] = &[
    (1, "Whole Milk", &[2]),
    (2, "Penne Pasta", &[3, 2]), // two purchases, separate lots
    (3, "Eggs", &[6]),
    (4, "Basmati Rice", &[1]),
];

/// Demo requirements: (product_id, name, minimum)
const REQUIREMENTS: &[(i64, &str, i64)] = &[
    (1, "Whole Milk", 4),     // short by 2
    (2, "Penne Pasta", 4),    // satisfied across two lots
    (5, "Tomato Passata", 3), // nothing on hand
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./larder_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Larder Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./larder_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Larder Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Installation + pairing code
    let now = Utc::now();
    let installation = Installation::new(now);
    db.installations().insert(&installation).await?;

    let code = PairingCode {
        code: RandomCodeGenerator.generate(),
        installation_id: installation.id,
        expires_at: now + pairing_code_ttl(),
    };
    db.pairing_codes().replace(installation.id, &code).await?;

    println!();
    println!("Installation: {}", installation.id);
    println!("Pairing code: {} (valid until {})", code.code, code.expires_at);

    // Inventory lots
    let mut lot_count = 0;
    for (offset, (product_id, name, quantities)) in LOTS.iter().enumerate() {
        for (lot_idx, quantity) in quantities.iter().enumerate() {
            let created_at = now + Duration::seconds((offset * 10 + lot_idx) as i64);
            let lot = InventoryLot {
                id: Uuid::new_v4(),
                installation_id: installation.id,
                product_id: *product_id,
                product_name: name.to_string(),
                quantity: *quantity,
                location: (lot_idx == 0).then(|| "pantry".to_string()),
                notes: None,
                best_before: NaiveDate::from_ymd_opt(2026, 9, 1 + lot_idx as u32),
                created_at,
                updated_at: created_at,
            };
            db.inventory().insert(&lot).await?;
            lot_count += 1;
        }
    }
    println!("✓ Inserted {} inventory lots", lot_count);

    // Requirements
    for (offset, (product_id, name, minimum)) in REQUIREMENTS.iter().enumerate() {
        let row = new_requirement_row(
            installation.id,
            *product_id,
            name.to_string(),
            *minimum,
            now + Duration::seconds(offset as i64),
        );
        db.requirements().upsert(&row).await?;
    }
    println!("✓ Inserted {} requirements", REQUIREMENTS.len());

    // Show what the reconciliation makes of it
    let lots = db.inventory().list(installation.id).await?;
    let requirements = db.requirements().list(installation.id).await?;
    let shopping_list = compute_shopping_list(&lots, &requirements);

    println!();
    println!("Shopping list:");
    if shopping_list.is_empty() {
        println!("  (nothing missing)");
    }
    for item in &shopping_list {
        println!(
            "  {} - have {}, want {}, buy {}",
            item.product_name, item.current_quantity, item.required_quantity, item.missing_quantity
        );
    }

    Ok(())
}
