//! Turkey CRUD handlers: create, read, update, delete.
//!
//! Handlers never map errors themselves. Every failure, including malformed input,
//! is returned as an [`AppError`] and answered by its `IntoResponse` impl.

use crate::error::AppError;
use crate::model::{NewTurkey, Turkey, TurkeyBody, TurkeyPatch};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

fn missing_id(method: &'static str) -> AppError {
    tracing::info!(method, "turkey request without id");
    AppError::bad_request(format!("{} /api/turkey requires an id", method))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<TurkeyBody>, JsonRejection>,
) -> Result<Json<Turkey>, AppError> {
    tracing::info!("POST /api/turkey: processing request");
    let Json(body) = body?;
    let species = body
        .species
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("no species given"))?;
    state.store.init().await?;
    let turkey = state
        .store
        .save(NewTurkey {
            species,
            location: body.location,
        })
        .await?;
    tracing::info!(id = %turkey.id, species = %turkey.species, "POST /api/turkey: saved new turkey");
    Ok(Json(turkey))
}

/// GET /api/turkey/:id
pub async fn read(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    find(&state, Some(&id)).await
}

/// GET /api/turkey without an id answers with the first stored turkey.
pub async fn read_first(State(state): State<AppState>) -> Result<Response, AppError> {
    find(&state, None).await
}

async fn find(state: &AppState, id: Option<&str>) -> Result<Response, AppError> {
    tracing::info!(id = ?id, "GET /api/turkey: processing request");
    match state.store.find_one(id).await? {
        Some(turkey) => Ok(Json(turkey).into_response()),
        None => {
            tracing::info!(id = ?id, "GET /api/turkey: no turkey found");
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}

/// PUT /api/turkey/:id
///
/// Responds with JSON `null` when no turkey has this id.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<TurkeyBody>, JsonRejection>,
) -> Result<Json<Option<Turkey>>, AppError> {
    let Path(id) = path?;
    let Json(body) = body?;
    state.store.init().await?;
    let updated = state.store.update_by_id(&id, TurkeyPatch::from(body)).await?;
    tracing::info!(id = %id, found = updated.is_some(), "PUT /api/turkey: updated turkey");
    Ok(Json(updated))
}

pub async fn update_without_id() -> Result<StatusCode, AppError> {
    Err(missing_id("PUT"))
}

/// DELETE /api/turkey/:id
///
/// Responds 204 whether or not a turkey was removed.
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let removed = state.store.remove_by_id(&id).await?;
    tracing::info!(id = %id, removed = removed.is_some(), "DELETE /api/turkey: done");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_without_id() -> Result<StatusCode, AppError> {
    Err(missing_id("DELETE"))
}
