//! Test helper module for invoice-service integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use invoice_service::api;
use invoice_service::dto::{InvoiceDto, PersonDto};
use invoice_service::services::{InvoiceService, PersonService};
use invoice_service::startup::AppState;
use invoice_service::store::MemoryStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Application state over an in-memory store.
pub fn memory_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState {
        invoices: Arc::new(InvoiceService::new(store.clone(), store.clone())),
        persons: Arc::new(PersonService::new(store.clone(), store)),
    }
}

/// API router over an in-memory store.
pub fn test_router() -> Router {
    api::router(memory_state())
}

pub fn person_dto(name: &str, identification_number: &str) -> PersonDto {
    PersonDto {
        name: name.to_string(),
        identification_number: identification_number.to_string(),
        city: Some("Prague".to_string()),
        ..Default::default()
    }
}

/// Bare person reference, the way inbound invoices carry buyer/seller.
pub fn person_ref(id: i64) -> PersonDto {
    PersonDto {
        id: Some(id),
        ..Default::default()
    }
}

pub fn invoice_dto(buyer_id: i64, seller_id: i64, product: &str, price: i64) -> InvoiceDto {
    let issued = Utc::now().date_naive();
    InvoiceDto {
        id: None,
        invoice_number: 20240001,
        issued,
        due_date: issued + Duration::days(14),
        product: product.to_string(),
        price: Decimal::from(price),
        vat: 21,
        note: None,
        buyer: person_ref(buyer_id),
        seller: person_ref(seller_id),
    }
}

/// Send a JSON request through the router and decode the JSON response.
/// Empty bodies (e.g. 204) come back as `Value::Null`.
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).expect("serialize body")))
            .expect("build request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("build request"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();

    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("decode JSON body")
    };

    (status, value)
}
