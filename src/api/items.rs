//! `/items` REST handlers.
//!
//! Every handler delegates to the injected [`crate::items::ItemRepository`] and wraps the
//! outcome in an [`Envelope`] or, via [`ApiError`], an error envelope.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::envelope::{DeletedItem, Envelope, ErrorEnvelope};
use super::error::ApiError;
use super::handlers::AppState;
use crate::items::{Category, Item, ItemPatch, NewItem, Priority};

/// Body of `POST /items`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// Required, trimmed.
    pub title: Option<String>,
    /// Required, trimmed.
    pub description: Option<String>,
    /// Defaults to "General".
    pub category: Option<String>,
    /// Defaults to false.
    pub completed: Option<bool>,
    /// Defaults to "medium".
    pub priority: Option<String>,
}

impl CreateItemRequest {
    /// Check the required fields and fill in defaults.
    pub fn into_new_item(self) -> Result<NewItem, ApiError> {
        let (Some(title), Some(description)) =
            (non_blank(self.title), non_blank(self.description))
        else {
            return Err(ApiError::Validation("Title and description are required"));
        };

        Ok(NewItem {
            title,
            description,
            category: self
                .category
                .unwrap_or_else(|| Category::default().to_string()),
            completed: self.completed.unwrap_or(false),
            priority: self
                .priority
                .unwrap_or_else(|| Priority::default().to_string()),
        })
    }
}

/// Body of `PUT /items/{id}`. Absent fields are left unchanged; `id` and
/// timestamps are not accepted.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    /// Replacement title, trimmed and non-blank.
    pub title: Option<String>,
    /// Replacement description, trimmed and non-blank.
    pub description: Option<String>,
    /// Replacement category, stored as given.
    pub category: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// Replacement priority, stored as given.
    pub priority: Option<String>,
}

impl UpdateItemRequest {
    /// Trim text fields and reject blanks.
    pub fn into_patch(self) -> Result<ItemPatch, ApiError> {
        Ok(ItemPatch {
            title: replacement_text(self.title, "Title cannot be empty")?,
            description: replacement_text(self.description, "Description cannot be empty")?,
            category: self.category,
            completed: self.completed,
            priority: self.priority,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn replacement_text(
    value: Option<String>,
    message: &'static str,
) -> Result<Option<String>, ApiError> {
    match value {
        Some(text) => non_blank(Some(text))
            .map(Some)
            .ok_or(ApiError::Validation(message)),
        None => Ok(None),
    }
}

/// Parse a JSON body whatever its `Content-Type`.
fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// List all items.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "All items in insertion order", body = Envelope<Vec<Item>>),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Item>>>, ApiError> {
    let items = state
        .items
        .list()
        .map_err(|e| ApiError::from_store("Failed to retrieve items", e))?;

    debug!(count = items.len(), "Listed items");
    Ok(Json(Envelope::ok(items)))
}

/// Create an item.
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = Envelope<Item>),
        (status = 400, description = "Missing title or description", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<Item>>), ApiError> {
    let new_item = json_body::<CreateItemRequest>(&body)?.into_new_item()?;

    let item = state
        .items
        .add(new_item)
        .map_err(|e| ApiError::from_store("Failed to create item", e))?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(item))))
}

/// Fetch one item.
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "The item", body = Envelope<Item>),
        (status = 404, description = "Unknown id", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Item>>, ApiError> {
    let item = state
        .items
        .get(&id)
        .map_err(|e| ApiError::from_store("Failed to retrieve item", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(Envelope::ok(item)))
}

/// Merge fields into an item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "The updated item", body = Envelope<Item>),
        (status = 400, description = "Malformed body or blank title/description", body = ErrorEnvelope),
        (status = 404, description = "Unknown id", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<Item>>, ApiError> {
    let request: UpdateItemRequest = json_body(&body)?;

    // Unknown ids are reported before the fields are checked.
    state
        .items
        .get(&id)
        .map_err(|e| ApiError::from_store("Failed to update item", e))?
        .ok_or(ApiError::NotFound)?;
    let patch = request.into_patch()?;

    let item = state
        .items
        .update(&id, patch)
        .map_err(|e| ApiError::from_store("Failed to update item", e))?;

    Ok(Json(Envelope::ok(item)))
}

/// Remove an item.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item removed", body = Envelope<DeletedItem>),
        (status = 404, description = "Unknown id", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<DeletedItem>>, ApiError> {
    state
        .items
        .delete(&id)
        .map_err(|e| ApiError::from_store("Failed to delete item", e))?;

    Ok(Json(Envelope::ok(DeletedItem { id, deleted: true })))
}
