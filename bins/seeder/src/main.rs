//! Database seeder for Frigora development and testing.
//!
//! Seeds a demo customer with one entry receipt so clearances, balances,
//! and statements have something to work against locally.
//!
//! Usage: cargo run --bin seeder

use rust_decimal_macros::dec;

use frigora_db::repositories::entry::{NewEntryItem, NewEntryReceipt};
use frigora_db::{CustomerRepository, EntryRepository};
use frigora_shared::types::CustomerId;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = frigora_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo customer...");
    let customers = CustomerRepository::new(db.clone());
    let customer = customers
        .create("Demo Orchard Co".to_string(), Some("+92-300-0000000".to_string()))
        .await
        .expect("Failed to seed customer");

    println!("Seeding demo entry receipt...");
    let entries = EntryRepository::new(db);
    let outcome = entries
        .record_entry(&NewEntryReceipt {
            customer_id: CustomerId::from_uuid(customer.id),
            items: vec![
                NewEntryItem {
                    product_kind: "apple".to_string(),
                    product_variety: Some("golden".to_string()),
                    pack_type: "crate".to_string(),
                    room: "R1".to_string(),
                    unit: "pack".to_string(),
                    quantity: dec!(100),
                    kj_quantity: None,
                },
                NewEntryItem {
                    product_kind: "potato".to_string(),
                    product_variety: None,
                    pack_type: "sack".to_string(),
                    room: "R3".to_string(),
                    unit: "bag".to_string(),
                    quantity: dec!(250),
                    kj_quantity: Some(dec!(1250)),
                },
            ],
            value: dec!(3500),
            car_no: Some("KHI-2291".to_string()),
            date: None,
            description: Some("seed data".to_string()),
        })
        .await
        .expect("Failed to seed entry receipt");

    println!(
        "Seeding complete! customer={} entry_receipt_no={}",
        customer.id, outcome.receipt_no
    );
}
