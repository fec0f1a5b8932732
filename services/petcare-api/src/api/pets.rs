//! Pet CRUD handlers.
//!
//! # Purpose
//! Implements list/get/create/update/delete over the configured `PetStore`,
//! translating every store outcome into a JSON response.
use crate::api::error::{ApiError, api_bad_json, api_internal, api_pet_error};
use crate::api::types::{DeleteResponse, ErrorResponse};
use crate::app::AppState;
use crate::model::{NewPet, Pet, PetPatch};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/pets",
    tag = "pets",
    responses(
        (status = 200, description = "Every stored pet, unordered", body = [Pet]),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn list_pets(State(state): State<AppState>) -> Result<Json<Vec<Pet>>, ApiError> {
    let pets = state
        .store
        .list_pets()
        .await
        .map_err(|err| api_internal("Failed to fetch pets", &err))?;
    Ok(Json(pets))
}

#[utoipa::path(
    get,
    path = "/api/pets/{id}",
    tag = "pets",
    params(("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Fetch pet", body = Pet),
        (status = 404, description = "Pet not found", body = ErrorResponse),
        (status = 500, description = "Malformed id or store unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn get_pet(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Pet>, ApiError> {
    state
        .store
        .get_pet(&id)
        .await
        .map(Json)
        .map_err(|err| api_pet_error("Failed to fetch pet", err))
}

#[utoipa::path(
    post,
    path = "/api/pets",
    tag = "pets",
    request_body = NewPet,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Invalid pet", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn create_pet(
    State(state): State<AppState>,
    body: Result<Json<NewPet>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(api_bad_json)?;
    let created = state
        .store
        .create_pet(body)
        .await
        .map_err(|err| api_pet_error("Failed to create pet", err))?;
    tracing::info!(pet_id = %created.id, "pet created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/pets/{id}",
    tag = "pets",
    params(("id" = String, Path, description = "Pet identifier")),
    request_body = PetPatch,
    responses(
        (status = 200, description = "Merged pet", body = Pet),
        (status = 400, description = "Merged pet failed validation", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
        (status = 500, description = "Malformed id or store unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn update_pet(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Result<Json<PetPatch>, JsonRejection>,
) -> Result<Json<Pet>, ApiError> {
    let Json(patch) = body.map_err(api_bad_json)?;
    let updated = state
        .store
        .update_pet(&id, patch)
        .await
        .map_err(|err| api_pet_error("Failed to update pet", err))?;
    tracing::info!(pet_id = %updated.id, "pet updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/pets/{id}",
    tag = "pets",
    params(("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet deleted", body = DeleteResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
        (status = 500, description = "Malformed id or store unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_pet(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .store
        .delete_pet(&id)
        .await
        .map_err(|err| api_pet_error("Failed to delete pet", err))?;
    tracing::info!(pet_id = %id, "pet deleted");
    Ok(Json(DeleteResponse {
        message: "Pet deleted successfully".to_string(),
    }))
}
