//! Services module for invoice-service.

pub mod invoice;
pub mod metrics;
pub mod person;

pub use invoice::InvoiceService;
pub use metrics::{get_metrics, init_metrics};
pub use person::PersonService;
