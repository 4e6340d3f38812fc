//! Transport representations exchanged at the API boundary.

pub mod mapper;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Person at the boundary. On inbound invoices only `id` has to be present;
/// the rest is filled in from the store when the invoice is mapped back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PersonDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "identification number must not be empty"))]
    pub identification_number: String,
    pub tax_number: Option<String>,
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
    pub iban: Option<String>,
    pub telephone: Option<String>,
    #[validate(email(message = "mail must be a valid address"))]
    pub mail: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub note: Option<String>,
}

/// Invoice at the boundary, with resolved buyer/seller sub-objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InvoiceDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub invoice_number: i32,
    pub issued: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(length(min = 1, message = "product must not be empty"))]
    pub product: String,
    pub price: Decimal,
    #[validate(range(min = 0, max = 100, message = "vat must be a percentage"))]
    pub vat: i32,
    #[serde(default)]
    pub note: Option<String>,
    pub buyer: PersonDto,
    pub seller: PersonDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceStatisticDto {
    pub current_year_sum: Decimal,
    pub all_time_sum: Decimal,
    pub invoices_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonStatisticDto {
    pub person_id: i64,
    pub person_name: String,
    pub revenue: Decimal,
}
