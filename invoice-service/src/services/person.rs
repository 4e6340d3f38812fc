//! Person orchestration: party CRUD and revenue statistics.
//!
//! Removal never deletes a row. The person is hidden so every invoice that
//! references it keeps resolving; hidden persons simply drop out of listings.

use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::dto::mapper;
use crate::dto::{PersonDto, PersonStatisticDto};
use crate::models::Person;
use crate::services::metrics::ERRORS_TOTAL;
use crate::store::{InvoiceStore, PersonStore};

pub struct PersonService {
    persons: Arc<dyn PersonStore>,
    invoices: Arc<dyn InvoiceStore>,
}

impl PersonService {
    pub fn new(persons: Arc<dyn PersonStore>, invoices: Arc<dyn InvoiceStore>) -> Self {
        Self { persons, invoices }
    }

    #[instrument(skip(self, dto), fields(identification_number = %dto.identification_number))]
    pub async fn add_person(&self, dto: &PersonDto) -> Result<PersonDto, AppError> {
        let input = mapper::new_person_from_dto(dto);
        let person = self.persons.create_person(&input).await?;

        info!(person_id = person.person_id, "Person added");

        Ok(mapper::person_to_dto(&person))
    }

    #[instrument(skip(self))]
    pub async fn get_persons(&self) -> Result<Vec<PersonDto>, AppError> {
        let persons = self.persons.list_persons().await?;
        Ok(persons.iter().map(mapper::person_to_dto).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_person(&self, person_id: i64) -> Result<PersonDto, AppError> {
        let person = self.fetch_person(person_id).await?;
        Ok(mapper::person_to_dto(&person))
    }

    #[instrument(skip(self, dto))]
    pub async fn update_person(
        &self,
        person_id: i64,
        dto: &PersonDto,
    ) -> Result<PersonDto, AppError> {
        let mut person = self.fetch_person(person_id).await?;

        mapper::apply_person_update(dto, &mut person);

        let updated = self
            .persons
            .update_person(&person)
            .await?
            .ok_or_else(|| person_not_found(person_id))?;

        info!(person_id = updated.person_id, "Person updated");

        Ok(mapper::person_to_dto(&updated))
    }

    #[instrument(skip(self))]
    pub async fn remove_person(&self, person_id: i64) -> Result<(), AppError> {
        let person = self.fetch_person(person_id).await?;
        self.persons.hide_person(person.person_id).await?;

        info!(person_id = person.person_id, "Person hidden");

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_statistics(&self) -> Result<Vec<PersonStatisticDto>, AppError> {
        let statistics = self.invoices.seller_statistics().await?;
        Ok(statistics
            .iter()
            .map(mapper::person_statistic_to_dto)
            .collect())
    }

    async fn fetch_person(&self, person_id: i64) -> Result<Person, AppError> {
        self.persons
            .get_person(person_id)
            .await?
            .ok_or_else(|| person_not_found(person_id))
    }
}

fn person_not_found(person_id: i64) -> AppError {
    ERRORS_TOTAL.with_label_values(&["not_found"]).inc();
    AppError::NotFound(anyhow::anyhow!(
        "Person with id {} was not found",
        person_id
    ))
}
