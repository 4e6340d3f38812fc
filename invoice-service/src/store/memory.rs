//! In-memory store implementation for tests.
//!
//! Mirrors the PostgreSQL semantics: conjunctive filtering with
//! case-insensitive product matching, primary-key ordering, the same limit
//! clamp, and hide-instead-of-delete for persons.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::sync::{Mutex, MutexGuard};

use crate::models::{
    Invoice, InvoiceFilter, InvoiceStatistic, NewInvoice, NewPerson, Person, PersonStatistic,
};
use crate::store::{InvoiceStore, PersonStore};

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    persons: Vec<Person>,
    invoices: Vec<Invoice>,
    next_person_id: i64,
    next_invoice_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                persons: Vec::new(),
                invoices: Vec::new(),
                next_person_id: 1,
                next_invoice_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("store lock poisoned")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(invoice: &Invoice, filter: &InvoiceFilter) -> bool {
    if let Some(buyer_id) = filter.buyer_id {
        if invoice.buyer_id != buyer_id {
            return false;
        }
    }
    if let Some(seller_id) = filter.seller_id {
        if invoice.seller_id != seller_id {
            return false;
        }
    }
    if let Some(product) = &filter.product {
        if !invoice
            .product
            .to_lowercase()
            .contains(&product.to_lowercase())
        {
            return false;
        }
    }
    if let Some(min_price) = filter.min_price {
        if invoice.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = filter.max_price {
        if invoice.price > max_price {
            return false;
        }
    }
    true
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn create_invoice(&self, input: &NewInvoice) -> Result<Invoice, AppError> {
        let mut inner = self.lock()?;
        let invoice = Invoice {
            invoice_id: inner.next_invoice_id,
            invoice_number: input.invoice_number,
            issued: input.issued,
            due_date: input.due_date,
            product: input.product.clone(),
            price: input.price,
            vat: input.vat,
            note: input.note.clone(),
            buyer_id: input.buyer_id,
            seller_id: input.seller_id,
            created_utc: Utc::now(),
        };
        inner.next_invoice_id += 1;
        inner.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<Option<Invoice>, AppError> {
        let mut inner = self.lock()?;
        match inner
            .invoices
            .iter_mut()
            .find(|row| row.invoice_id == invoice.invoice_id)
        {
            Some(row) => {
                let created_utc = row.created_utc;
                *row = Invoice {
                    created_utc,
                    ..invoice.clone()
                };
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn get_invoice(&self, invoice_id: i64) -> Result<Option<Invoice>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .invoices
            .iter()
            .find(|row| row.invoice_id == invoice_id)
            .cloned())
    }

    async fn delete_invoice(&self, invoice_id: i64) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        let before = inner.invoices.len();
        inner.invoices.retain(|row| row.invoice_id != invoice_id);
        Ok(inner.invoices.len() < before)
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .invoices
            .iter()
            .filter(|row| matches_filter(row, filter))
            .take(filter.effective_limit() as usize)
            .cloned()
            .collect())
    }

    async fn list_sales(&self, identification_number: &str) -> Result<Vec<Invoice>, AppError> {
        let inner = self.lock()?;
        let seller_ids: Vec<i64> = inner
            .persons
            .iter()
            .filter(|p| p.identification_number == identification_number)
            .map(|p| p.person_id)
            .collect();
        Ok(inner
            .invoices
            .iter()
            .filter(|row| seller_ids.contains(&row.seller_id))
            .cloned()
            .collect())
    }

    async fn list_purchases(&self, identification_number: &str) -> Result<Vec<Invoice>, AppError> {
        let inner = self.lock()?;
        let buyer_ids: Vec<i64> = inner
            .persons
            .iter()
            .filter(|p| p.identification_number == identification_number)
            .map(|p| p.person_id)
            .collect();
        Ok(inner
            .invoices
            .iter()
            .filter(|row| buyer_ids.contains(&row.buyer_id))
            .cloned()
            .collect())
    }

    async fn invoice_statistic(&self) -> Result<InvoiceStatistic, AppError> {
        let inner = self.lock()?;
        let current_year = Utc::now().date_naive().year();
        let mut current_year_sum = Decimal::ZERO;
        let mut all_time_sum = Decimal::ZERO;
        for invoice in &inner.invoices {
            all_time_sum += invoice.price;
            if invoice.issued.year() == current_year {
                current_year_sum += invoice.price;
            }
        }
        Ok(InvoiceStatistic {
            current_year_sum,
            all_time_sum,
            invoices_count: inner.invoices.len() as i64,
        })
    }

    async fn seller_statistics(&self) -> Result<Vec<PersonStatistic>, AppError> {
        let inner = self.lock()?;
        let mut statistics = Vec::new();
        for person in &inner.persons {
            let revenue: Decimal = inner
                .invoices
                .iter()
                .filter(|row| row.seller_id == person.person_id)
                .map(|row| row.price)
                .sum();
            let has_sales = inner
                .invoices
                .iter()
                .any(|row| row.seller_id == person.person_id);
            if has_sales {
                statistics.push(PersonStatistic {
                    person_id: person.person_id,
                    person_name: person.name.clone(),
                    revenue,
                });
            }
        }
        Ok(statistics)
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn create_person(&self, input: &NewPerson) -> Result<Person, AppError> {
        let mut inner = self.lock()?;
        let person = Person {
            person_id: inner.next_person_id,
            name: input.name.clone(),
            identification_number: input.identification_number.clone(),
            tax_number: input.tax_number.clone(),
            account_number: input.account_number.clone(),
            bank_code: input.bank_code.clone(),
            iban: input.iban.clone(),
            telephone: input.telephone.clone(),
            mail: input.mail.clone(),
            street: input.street.clone(),
            zip: input.zip.clone(),
            city: input.city.clone(),
            country: input.country.clone(),
            note: input.note.clone(),
            hidden: false,
            created_utc: Utc::now(),
        };
        inner.next_person_id += 1;
        inner.persons.push(person.clone());
        Ok(person)
    }

    async fn update_person(&self, person: &Person) -> Result<Option<Person>, AppError> {
        let mut inner = self.lock()?;
        match inner
            .persons
            .iter_mut()
            .find(|row| row.person_id == person.person_id)
        {
            Some(row) => {
                let (hidden, created_utc) = (row.hidden, row.created_utc);
                *row = Person {
                    hidden,
                    created_utc,
                    ..person.clone()
                };
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn get_person(&self, person_id: i64) -> Result<Option<Person>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .persons
            .iter()
            .find(|row| row.person_id == person_id)
            .cloned())
    }

    async fn list_persons(&self) -> Result<Vec<Person>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .persons
            .iter()
            .filter(|row| !row.hidden)
            .cloned()
            .collect())
    }

    async fn hide_person(&self, person_id: i64) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        match inner
            .persons
            .iter_mut()
            .find(|row| row.person_id == person_id)
        {
            Some(row) => {
                row.hidden = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
