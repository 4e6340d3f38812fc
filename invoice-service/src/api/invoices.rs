//! Invoice endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use service_core::error::AppError;
use validator::Validate;

use crate::dto::{InvoiceDto, InvoiceStatisticDto};
use crate::models::InvoiceFilter;
use crate::startup::AppState;

/// Query-string rendition of [`InvoiceFilter`].
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct InvoiceFilterQuery {
    pub buyer_id: Option<i64>,
    pub seller_id: Option<i64>,
    pub product: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i32>,
}

impl From<InvoiceFilterQuery> for InvoiceFilter {
    fn from(query: InvoiceFilterQuery) -> Self {
        InvoiceFilter {
            buyer_id: query.buyer_id,
            seller_id: query.seller_id,
            product: query.product,
            min_price: query.min_price,
            max_price: query.max_price,
            limit: query.limit,
        }
    }
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(dto): Json<InvoiceDto>,
) -> Result<(StatusCode, Json<InvoiceDto>), AppError> {
    dto.validate()?;
    let created = state.invoices.add_invoice(&dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceFilterQuery>,
) -> Result<Json<Vec<InvoiceDto>>, AppError> {
    query.validate()?;
    let invoices = state.invoices.get_invoices(&query.into()).await?;
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<InvoiceDto>, AppError> {
    let invoice = state.invoices.get_invoice(invoice_id).await?;
    Ok(Json(invoice))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
    Json(dto): Json<InvoiceDto>,
) -> Result<Json<InvoiceDto>, AppError> {
    dto.validate()?;
    let updated = state.invoices.update_invoice(invoice_id, &dto).await?;
    Ok(Json(updated))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.invoices.remove_invoice(invoice_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn invoice_statistics(
    State(state): State<AppState>,
) -> Result<Json<InvoiceStatisticDto>, AppError> {
    let statistics = state.invoices.get_statistics().await?;
    Ok(Json(statistics))
}

pub async fn sales(
    State(state): State<AppState>,
    Path(identification_number): Path<String>,
) -> Result<Json<Vec<InvoiceDto>>, AppError> {
    let invoices = state.invoices.get_sales(&identification_number).await?;
    Ok(Json(invoices))
}

pub async fn purchases(
    State(state): State<AppState>,
    Path(identification_number): Path<String>,
) -> Result<Json<Vec<InvoiceDto>>, AppError> {
    let invoices = state.invoices.get_purchases(&identification_number).await?;
    Ok(Json(invoices))
}
