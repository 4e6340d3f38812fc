//! Person endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

use crate::dto::{PersonDto, PersonStatisticDto};
use crate::startup::AppState;

pub async fn create_person(
    State(state): State<AppState>,
    Json(dto): Json<PersonDto>,
) -> Result<(StatusCode, Json<PersonDto>), AppError> {
    dto.validate()?;
    let created = state.persons.add_person(&dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_persons(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonDto>>, AppError> {
    let persons = state.persons.get_persons().await?;
    Ok(Json(persons))
}

pub async fn get_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<Json<PersonDto>, AppError> {
    let person = state.persons.get_person(person_id).await?;
    Ok(Json(person))
}

pub async fn update_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
    Json(dto): Json<PersonDto>,
) -> Result<Json<PersonDto>, AppError> {
    dto.validate()?;
    let updated = state.persons.update_person(person_id, &dto).await?;
    Ok(Json(updated))
}

pub async fn delete_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.persons.remove_person(person_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn person_statistics(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonStatisticDto>>, AppError> {
    let statistics = state.persons.get_statistics().await?;
    Ok(Json(statistics))
}
