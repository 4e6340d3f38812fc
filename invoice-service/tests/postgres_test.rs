//! PostgreSQL store round-trip test.
//!
//! Needs a reachable database: set `TEST_DATABASE_URL`. The test isolates
//! itself in a throwaway schema and is skipped when the variable is unset.

use chrono::NaiveDate;
use invoice_service::models::{InvoiceFilter, NewInvoice, NewPerson};
use invoice_service::store::{Database, InvoiceStore, PersonStore};
use rust_decimal::Decimal;

fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok()
}

async fn connect_isolated(base_url: &str, schema_name: &str) -> Database {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(base_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema_name))
        .execute(&pool)
        .await
        .ok();
    sqlx::query(&format!("CREATE SCHEMA {}", schema_name))
        .execute(&pool)
        .await
        .expect("Failed to create test schema");

    pool.close().await;

    // Use ? or & depending on whether URL already has query parameters
    let separator = if base_url.contains('?') { "&" } else { "?" };
    let url = format!(
        "{}{}options=-c search_path%3D{}",
        base_url, separator, schema_name
    );

    let db = Database::new(&url, 4, 1).await.expect("Failed to connect");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

async fn drop_schema(db: &Database, schema_name: &str) {
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema_name))
        .execute(db.pool())
        .await
        .ok();
}

fn new_person(name: &str, identification_number: &str) -> NewPerson {
    NewPerson {
        name: name.to_string(),
        identification_number: identification_number.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn postgres_round_trip() {
    let Some(base_url) = test_database_url() else {
        eprintln!("TEST_DATABASE_URL not set; skipping PostgreSQL test");
        return;
    };
    let schema_name = format!("test_invoice_{}", std::process::id());
    let db = connect_isolated(&base_url, &schema_name).await;

    let buyer = db.create_person(&new_person("Buyer Co", "111")).await.unwrap();
    let seller = db.create_person(&new_person("Seller Co", "222")).await.unwrap();

    let created = db
        .create_invoice(&NewInvoice {
            invoice_number: 20240001,
            issued: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            product: "Widget".to_string(),
            price: Decimal::new(10050, 2),
            vat: 21,
            note: Some("first".to_string()),
            buyer_id: buyer.person_id,
            seller_id: seller.person_id,
        })
        .await
        .unwrap();
    assert!(created.invoice_id > 0);

    // fetch
    let fetched = db.get_invoice(created.invoice_id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    // conjunctive filter with substring match
    let filter = InvoiceFilter {
        buyer_id: Some(buyer.person_id),
        product: Some("wid".to_string()),
        min_price: Some(Decimal::from(100)),
        ..Default::default()
    };
    let listed = db.list_invoices(&filter).await.unwrap();
    assert_eq!(listed.len(), 1);

    let none = db
        .list_invoices(&InvoiceFilter {
            min_price: Some(Decimal::from(500)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());

    // update rewrites the row
    let mut changed = fetched.clone();
    changed.product = "Widget Pro".to_string();
    changed.price = Decimal::from(150);
    let updated = db.update_invoice(&changed).await.unwrap().unwrap();
    assert_eq!(updated.product, "Widget Pro");
    assert_eq!(updated.invoice_id, created.invoice_id);

    // statistics
    let statistic = db.invoice_statistic().await.unwrap();
    assert_eq!(statistic.invoices_count, 1);
    assert_eq!(statistic.all_time_sum, Decimal::from(150));

    let sellers = db.seller_statistics().await.unwrap();
    assert_eq!(sellers.len(), 1);
    assert_eq!(sellers[0].person_id, seller.person_id);

    // hide the seller: listings shrink, the reference still resolves
    assert!(db.hide_person(seller.person_id).await.unwrap());
    assert_eq!(db.list_persons().await.unwrap().len(), 1);
    assert!(db.get_person(seller.person_id).await.unwrap().is_some());

    // delete
    assert!(db.delete_invoice(created.invoice_id).await.unwrap());
    assert!(!db.delete_invoice(created.invoice_id).await.unwrap());
    assert!(db.get_invoice(created.invoice_id).await.unwrap().is_none());

    drop_schema(&db, &schema_name).await;
}
