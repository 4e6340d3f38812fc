//! Invoice model for invoice-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Invoice row. `buyer_id` and `seller_id` reference `persons` and must
/// resolve at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: i64,
    pub invoice_number: i32,
    pub issued: NaiveDate,
    pub due_date: NaiveDate,
    pub product: String,
    pub price: Decimal,
    pub vat: i32,
    pub note: Option<String>,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: i32,
    pub issued: NaiveDate,
    pub due_date: NaiveDate,
    pub product: String,
    pub price: Decimal,
    pub vat: i32,
    pub note: Option<String>,
    pub buyer_id: i64,
    pub seller_id: i64,
}

/// Filter parameters for listing invoices. Every field narrows the result
/// when present; absent fields contribute no predicate.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub buyer_id: Option<i64>,
    pub seller_id: Option<i64>,
    pub product: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: Option<i32>,
}

impl InvoiceFilter {
    pub const DEFAULT_LIMIT: i32 = 10;

    /// Result cap, clamped to 1..=100.
    pub fn effective_limit(&self) -> i64 {
        i64::from(self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, 100))
    }
}
