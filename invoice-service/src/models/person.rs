//! Person model: a business party referenced by invoices as buyer or seller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Person row. Persons are never deleted once referenced by an invoice;
/// removal flips `hidden` so existing invoices keep resolving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub person_id: i64,
    pub name: String,
    pub identification_number: String,
    pub tax_number: Option<String>,
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
    pub iban: Option<String>,
    pub telephone: Option<String>,
    pub mail: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub note: Option<String>,
    pub hidden: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a person.
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub name: String,
    pub identification_number: String,
    pub tax_number: Option<String>,
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
    pub iban: Option<String>,
    pub telephone: Option<String>,
    pub mail: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub note: Option<String>,
}
