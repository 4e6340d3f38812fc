//! Invoice service tests over the in-memory store.

mod common;

use chrono::NaiveDate;
use common::{invoice_dto, memory_state, person_dto};
use invoice_service::models::InvoiceFilter;
use rust_decimal::Decimal;
use service_core::error::AppError;

#[tokio::test]
async fn add_then_get_round_trips() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();
    let seller = state.persons.add_person(&person_dto("Seller Co", "222")).await.unwrap();

    let created = state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget", 100))
        .await
        .unwrap();

    let id = created.id.expect("created invoice carries a generated id");
    assert_eq!(created.buyer.id, buyer.id);
    assert_eq!(created.seller.id, seller.id);
    assert_eq!(created.buyer.name, "Buyer Co");

    let fetched = state.invoices.get_invoice(id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_reflects_scalars_and_keeps_id() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();
    let seller = state.persons.add_person(&person_dto("Seller Co", "222")).await.unwrap();

    let created = state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget", 100))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let mut update = invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget Pro", 150);
    // a mismatched payload id must lose against the path id
    update.id = Some(9999);

    let updated = state.invoices.update_invoice(id, &update).await.unwrap();

    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.product, "Widget Pro");
    assert_eq!(updated.price, Decimal::from(150));
    assert_eq!(updated.buyer.id, buyer.id);
    assert_eq!(updated.seller.id, seller.id);
}

#[tokio::test]
async fn update_reattaches_reassigned_relations() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();
    let seller = state.persons.add_person(&person_dto("Seller Co", "222")).await.unwrap();
    let other = state.persons.add_person(&person_dto("Other Co", "333")).await.unwrap();

    let created = state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget", 100))
        .await
        .unwrap();

    let update = invoice_dto(buyer.id.unwrap(), other.id.unwrap(), "Widget", 100);
    let updated = state
        .invoices
        .update_invoice(created.id.unwrap(), &update)
        .await
        .unwrap();

    assert_eq!(updated.seller.id, other.id);
    assert_eq!(updated.seller.name, "Other Co");
}

#[tokio::test]
async fn missing_person_reference_fails_eagerly() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();

    let err = state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), 42, "Widget", 100))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // nothing may have been written
    let all = state
        .invoices
        .get_invoices(&InvoiceFilter::default())
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn update_with_unknown_seller_leaves_invoice_untouched() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();
    let seller = state.persons.add_person(&person_dto("Seller Co", "222")).await.unwrap();

    let created = state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget", 100))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let update = invoice_dto(buyer.id.unwrap(), 42, "Widget Pro", 150);
    let err = state.invoices.update_invoice(id, &update).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let fetched = state.invoices.get_invoice(id).await.unwrap();
    assert_eq!(fetched.product, "Widget");
    assert_eq!(fetched.seller.id, seller.id);
}

#[tokio::test]
async fn remove_missing_invoice_signals_not_found() {
    let state = memory_state();

    let err = state.invoices.remove_invoice(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn remove_deletes_the_invoice() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();
    let seller = state.persons.add_person(&person_dto("Seller Co", "222")).await.unwrap();

    let created = state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget", 100))
        .await
        .unwrap();
    let id = created.id.unwrap();

    state.invoices.remove_invoice(id).await.unwrap();

    let err = state.invoices.get_invoice(id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn list_honours_limit_and_buyer_filter() {
    let state = memory_state();
    let alice = state.persons.add_person(&person_dto("Alice", "111")).await.unwrap();
    let bob = state.persons.add_person(&person_dto("Bob", "222")).await.unwrap();

    for i in 0..4 {
        state
            .invoices
            .add_invoice(&invoice_dto(alice.id.unwrap(), bob.id.unwrap(), "Widget", 100 + i))
            .await
            .unwrap();
    }
    state
        .invoices
        .add_invoice(&invoice_dto(bob.id.unwrap(), alice.id.unwrap(), "Gadget", 50))
        .await
        .unwrap();

    let limited = state
        .invoices
        .get_invoices(&InvoiceFilter {
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let alices = state
        .invoices
        .get_invoices(&InvoiceFilter {
            buyer_id: alice.id,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(alices.len(), 4);
    assert!(alices.iter().all(|dto| dto.buyer.id == alice.id));
}

#[tokio::test]
async fn statistics_split_current_year_from_all_time() {
    let state = memory_state();
    let buyer = state.persons.add_person(&person_dto("Buyer Co", "111")).await.unwrap();
    let seller = state.persons.add_person(&person_dto("Seller Co", "222")).await.unwrap();

    state
        .invoices
        .add_invoice(&invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Widget", 150))
        .await
        .unwrap();

    let mut old = invoice_dto(buyer.id.unwrap(), seller.id.unwrap(), "Relic", 100);
    old.issued = NaiveDate::from_ymd_opt(2000, 1, 15).unwrap();
    old.due_date = NaiveDate::from_ymd_opt(2000, 1, 29).unwrap();
    state.invoices.add_invoice(&old).await.unwrap();

    let statistics = state.invoices.get_statistics().await.unwrap();
    assert_eq!(statistics.current_year_sum, Decimal::from(150));
    assert_eq!(statistics.all_time_sum, Decimal::from(250));
    assert_eq!(statistics.invoices_count, 2);
}

#[tokio::test]
async fn sales_and_purchases_follow_identification_number() {
    let state = memory_state();
    let alice = state.persons.add_person(&person_dto("Alice", "111")).await.unwrap();
    let bob = state.persons.add_person(&person_dto("Bob", "222")).await.unwrap();

    state
        .invoices
        .add_invoice(&invoice_dto(alice.id.unwrap(), bob.id.unwrap(), "Widget", 100))
        .await
        .unwrap();
    state
        .invoices
        .add_invoice(&invoice_dto(bob.id.unwrap(), alice.id.unwrap(), "Gadget", 60))
        .await
        .unwrap();

    let bobs_sales = state.invoices.get_sales("222").await.unwrap();
    assert_eq!(bobs_sales.len(), 1);
    assert_eq!(bobs_sales[0].product, "Widget");

    let bobs_purchases = state.invoices.get_purchases("222").await.unwrap();
    assert_eq!(bobs_purchases.len(), 1);
    assert_eq!(bobs_purchases[0].product, "Gadget");

    assert!(state.invoices.get_sales("999").await.unwrap().is_empty());
}
