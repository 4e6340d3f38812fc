//! Invoice orchestration: create, list, fetch, update, delete, statistics.
//!
//! Buyer and seller references are validated eagerly. A transport object
//! whose nested person ids do not resolve is rejected with NotFound before
//! anything is written, never deferred to a storage-layer failure.

use rust_decimal::prelude::ToPrimitive;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::dto::mapper;
use crate::dto::{InvoiceDto, InvoiceStatisticDto};
use crate::models::{Invoice, InvoiceFilter, Person};
use crate::services::metrics::{ERRORS_TOTAL, INVOICES_TOTAL, INVOICE_AMOUNT_TOTAL};
use crate::store::{InvoiceStore, PersonStore};

pub struct InvoiceService {
    invoices: Arc<dyn InvoiceStore>,
    persons: Arc<dyn PersonStore>,
}

impl InvoiceService {
    pub fn new(invoices: Arc<dyn InvoiceStore>, persons: Arc<dyn PersonStore>) -> Self {
        Self { invoices, persons }
    }

    #[instrument(skip(self, dto))]
    pub async fn add_invoice(&self, dto: &InvoiceDto) -> Result<InvoiceDto, AppError> {
        let input = mapper::new_invoice_from_dto(dto)?;

        let buyer = self.fetch_person(input.buyer_id).await?;
        let seller = self.fetch_person(input.seller_id).await?;

        let invoice = self.invoices.create_invoice(&input).await?;

        INVOICES_TOTAL.with_label_values(&["created"]).inc();
        INVOICE_AMOUNT_TOTAL.inc_by(invoice.price.to_f64().unwrap_or(0.0));
        info!(invoice_id = invoice.invoice_id, "Invoice added");

        Ok(mapper::invoice_to_dto(&invoice, &buyer, &seller))
    }

    #[instrument(skip(self, filter))]
    pub async fn get_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceDto>, AppError> {
        let invoices = self.invoices.list_invoices(filter).await?;
        self.to_dtos(invoices).await
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: i64) -> Result<InvoiceDto, AppError> {
        let invoice = self.fetch_invoice(invoice_id).await?;
        let buyer = self.fetch_person(invoice.buyer_id).await?;
        let seller = self.fetch_person(invoice.seller_id).await?;
        Ok(mapper::invoice_to_dto(&invoice, &buyer, &seller))
    }

    #[instrument(skip(self, dto))]
    pub async fn update_invoice(
        &self,
        invoice_id: i64,
        dto: &InvoiceDto,
    ) -> Result<InvoiceDto, AppError> {
        let mut invoice = self.fetch_invoice(invoice_id).await?;

        // The path id wins over whatever identifier the payload carries.
        let mut dto = dto.clone();
        dto.id = Some(invoice_id);

        mapper::apply_invoice_update(&dto, &mut invoice);

        let buyer = self
            .fetch_person(mapper::person_ref_id(&dto.buyer, "buyer")?)
            .await?;
        let seller = self
            .fetch_person(mapper::person_ref_id(&dto.seller, "seller")?)
            .await?;
        invoice.buyer_id = buyer.person_id;
        invoice.seller_id = seller.person_id;

        let updated = self
            .invoices
            .update_invoice(&invoice)
            .await?
            .ok_or_else(|| invoice_not_found(invoice_id))?;

        INVOICES_TOTAL.with_label_values(&["updated"]).inc();
        info!(invoice_id = updated.invoice_id, "Invoice updated");

        Ok(mapper::invoice_to_dto(&updated, &buyer, &seller))
    }

    #[instrument(skip(self))]
    pub async fn remove_invoice(&self, invoice_id: i64) -> Result<(), AppError> {
        let invoice = self.fetch_invoice(invoice_id).await?;
        self.invoices.delete_invoice(invoice.invoice_id).await?;

        INVOICES_TOTAL.with_label_values(&["deleted"]).inc();
        info!(invoice_id = invoice.invoice_id, "Invoice removed");

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_statistics(&self) -> Result<InvoiceStatisticDto, AppError> {
        let statistic = self.invoices.invoice_statistic().await?;
        Ok(mapper::statistic_to_dto(&statistic))
    }

    /// Invoices sold by the person with the given identification number.
    #[instrument(skip(self))]
    pub async fn get_sales(
        &self,
        identification_number: &str,
    ) -> Result<Vec<InvoiceDto>, AppError> {
        let invoices = self.invoices.list_sales(identification_number).await?;
        self.to_dtos(invoices).await
    }

    /// Invoices bought by the person with the given identification number.
    #[instrument(skip(self))]
    pub async fn get_purchases(
        &self,
        identification_number: &str,
    ) -> Result<Vec<InvoiceDto>, AppError> {
        let invoices = self.invoices.list_purchases(identification_number).await?;
        self.to_dtos(invoices).await
    }

    async fn to_dtos(&self, invoices: Vec<Invoice>) -> Result<Vec<InvoiceDto>, AppError> {
        let mut dtos = Vec::with_capacity(invoices.len());
        for invoice in &invoices {
            let buyer = self.fetch_person(invoice.buyer_id).await?;
            let seller = self.fetch_person(invoice.seller_id).await?;
            dtos.push(mapper::invoice_to_dto(invoice, &buyer, &seller));
        }
        Ok(dtos)
    }

    async fn fetch_invoice(&self, invoice_id: i64) -> Result<Invoice, AppError> {
        self.invoices
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| invoice_not_found(invoice_id))
    }

    async fn fetch_person(&self, person_id: i64) -> Result<Person, AppError> {
        self.persons.get_person(person_id).await?.ok_or_else(|| {
            ERRORS_TOTAL.with_label_values(&["not_found"]).inc();
            AppError::NotFound(anyhow::anyhow!(
                "Person with id {} was not found",
                person_id
            ))
        })
    }
}

fn invoice_not_found(invoice_id: i64) -> AppError {
    ERRORS_TOTAL.with_label_values(&["not_found"]).inc();
    AppError::NotFound(anyhow::anyhow!(
        "Invoice with id {} was not found",
        invoice_id
    ))
}
