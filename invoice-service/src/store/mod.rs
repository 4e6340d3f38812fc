//! Persistence interfaces and their implementations.
//!
//! The service layer only ever sees these traits; `Database` is the
//! PostgreSQL implementation, `MemoryStore` backs the tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::Database;

use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::{
    Invoice, InvoiceFilter, InvoiceStatistic, NewInvoice, NewPerson, Person, PersonStatistic,
};

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create_invoice(&self, input: &NewInvoice) -> Result<Invoice, AppError>;

    /// Overwrite the row matching `invoice.invoice_id`. `None` when the row
    /// no longer exists.
    async fn update_invoice(&self, invoice: &Invoice) -> Result<Option<Invoice>, AppError>;

    async fn get_invoice(&self, invoice_id: i64) -> Result<Option<Invoice>, AppError>;

    /// `true` when a row was deleted.
    async fn delete_invoice(&self, invoice_id: i64) -> Result<bool, AppError>;

    /// Conjunction of the filter's present predicates, capped at the
    /// filter's limit.
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError>;

    /// Invoices whose seller carries the given identification number.
    async fn list_sales(&self, identification_number: &str) -> Result<Vec<Invoice>, AppError>;

    /// Invoices whose buyer carries the given identification number.
    async fn list_purchases(&self, identification_number: &str) -> Result<Vec<Invoice>, AppError>;

    async fn invoice_statistic(&self) -> Result<InvoiceStatistic, AppError>;

    /// Revenue per seller, for every person that has issued at least one
    /// invoice.
    async fn seller_statistics(&self) -> Result<Vec<PersonStatistic>, AppError>;
}

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn create_person(&self, input: &NewPerson) -> Result<Person, AppError>;

    async fn update_person(&self, person: &Person) -> Result<Option<Person>, AppError>;

    /// Resolves hidden persons too; invoices keep referencing them.
    async fn get_person(&self, person_id: i64) -> Result<Option<Person>, AppError>;

    /// Visible persons only.
    async fn list_persons(&self) -> Result<Vec<Person>, AppError>;

    /// Soft removal: flips `hidden`. `true` when the row exists.
    async fn hide_person(&self, person_id: i64) -> Result<bool, AppError>;
}
