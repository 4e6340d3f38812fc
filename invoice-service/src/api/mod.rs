//! HTTP API surface for invoice-service.

pub mod invoices;
pub mod persons;

use axum::routing::get;
use axum::Router;

use crate::startup::AppState;

/// Build the API router. Health and metrics routes are attached separately
/// during startup.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/api/invoices/statistics", get(invoices::invoice_statistics))
        .route(
            "/api/invoices/:invoice_id",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route(
            "/api/persons",
            get(persons::list_persons).post(persons::create_person),
        )
        .route("/api/persons/statistics", get(persons::person_statistics))
        .route(
            "/api/persons/:person_id",
            get(persons::get_person)
                .put(persons::update_person)
                .delete(persons::delete_person),
        )
        .route(
            "/api/identification/:identification_number/sales",
            get(invoices::sales),
        )
        .route(
            "/api/identification/:identification_number/purchases",
            get(invoices::purchases),
        )
        .with_state(state)
}
