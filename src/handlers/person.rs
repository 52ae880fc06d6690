use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::database::models::{NewPerson, Person};
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::parse_id;

/// GET /people - List every live person record. `Books` stays empty in
/// listings; fetching a single person resolves it.
pub async fn list(State(store): State<Store>) -> Result<Json<Vec<Person>>, ApiError> {
    let people = store.list_people().await?;
    Ok(Json(people))
}

/// GET /person/:id - Fetch a single person by id.
pub async fn get(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;

    let person = store
        .get_person(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("person {} not found", id)))?;

    Ok(Json(person))
}

/// POST /create/person - Create a person from the request body.
///
/// Absent body fields fall back to empty values; the unique email index is
/// what actually polices duplicates, surfaced as a 409.
pub async fn create(
    State(store): State<Store>,
    body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(new_person) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    let person = store.create_person(&new_person).await?;

    tracing::info!(id = person.id, "created person");
    Ok(Json(person))
}

/// DELETE /delete/person/:id - Soft-delete a person.
///
/// The row is stamped rather than removed, and the stamped record is echoed
/// back. Already-deleted and never-existing ids both come back as 404.
pub async fn delete(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;

    let person = store
        .delete_person(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("person {} not found", id)))?;

    tracing::info!(id = person.id, "deleted person");
    Ok(Json(person))
}
