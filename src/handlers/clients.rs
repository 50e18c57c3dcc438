//! Client handlers: list, read, create, update, soft delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::{JsonBody, PathParam, QueryParams};
use crate::model::{Client, ClientPayload, ListParams};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Base path of the client resource.
pub const CLIENTS_PATH: &str = "/api/clients";

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("client {} not found", id))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "clients",
    params(ListParams),
    responses(
        (status = 200, description = "Active clients, newest first", body = [Client]),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Client>>, AppError> {
    let pagination = RequestValidator::pagination(&params, state.max_page_size)?;
    let clients = state.clients.list(pagination).await?;
    Ok(Json(clients))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "The client", body = Client),
        (status = 404, description = "No active client with this id", body = ErrorBody),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = state.clients.get_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Created; Location points at the new client", body = Client),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Uniqueness violation", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ignored) = payload.id {
        tracing::debug!(%ignored, "ignoring client-supplied id on create");
    }
    let draft = RequestValidator::client(payload)?;
    let client = state.clients.create(&draft).await?;
    let location = format!("{}/{}", CLIENTS_PATH, client.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(client)))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    request_body = ClientPayload,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Validation failed or body id differs from path id", body = ErrorBody),
        (status = 404, description = "No active client with this id", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<ClientPayload>,
) -> Result<StatusCode, AppError> {
    let body_id = payload.id;
    let draft = RequestValidator::client(payload)?;
    if let Some(body_id) = body_id {
        if body_id != id {
            return Err(AppError::BadRequest(format!(
                "path id {} does not match body id {}",
                id, body_id
            )));
        }
    }
    if !state.clients.update(id, &draft).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 204, description = "Marked inactive"),
        (status = 404, description = "No active client with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.clients.soft_delete(id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
