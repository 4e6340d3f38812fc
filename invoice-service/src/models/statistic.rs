//! Derived aggregates, recomputed on demand.

use rust_decimal::Decimal;
use sqlx::FromRow;

/// Revenue totals across all invoices.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct InvoiceStatistic {
    pub current_year_sum: Decimal,
    pub all_time_sum: Decimal,
    pub invoices_count: i64,
}

/// Per-seller revenue.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PersonStatistic {
    pub person_id: i64,
    pub person_name: String,
    pub revenue: Decimal,
}
