//! Domain models for invoice-service.

mod invoice;
mod person;
mod statistic;

pub use invoice::{Invoice, InvoiceFilter, NewInvoice};
pub use person::{NewPerson, Person};
pub use statistic::{InvoiceStatistic, PersonStatistic};
