//! HTTP Handlers

use auth::AuthenticatedUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::item_cache::ItemCache;
use crate::domain::entities::Item;
use crate::domain::repository::ItemRepository;
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{ItemRequest, ItemResponse};

/// Shared state for catalog handlers
pub struct CatalogAppState<R>
where
    R: ItemRepository + Send + Sync + 'static,
{
    pub cache: ItemCache<R>,
}

impl<R> Clone for CatalogAppState<R>
where
    R: ItemRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

/// Route ids arrive as text so that a non-integer renders like any other
/// validation failure.
fn parse_id(raw: &str) -> CatalogResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| CatalogError::Validation(format!("Invalid item id: {raw}")))
}

/// Session subject for write logs. Routes mounted without the session
/// layer have no identity attached.
pub(crate) fn actor_name(actor: &Option<Extension<AuthenticatedUser>>) -> &str {
    actor
        .as_ref()
        .map(|Extension(user)| user.0.sub.as_str())
        .unwrap_or("anonymous")
}

/// GET /catalog/products
pub async fn list_items<R>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<ItemResponse>>>
where
    R: ItemRepository + Send + Sync + 'static,
{
    let items = state.cache.list().await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// POST /catalog/products
pub async fn create_item<R>(
    State(state): State<CatalogAppState<R>>,
    actor: Option<Extension<AuthenticatedUser>>,
    Json(req): Json<ItemRequest>,
) -> CatalogResult<(StatusCode, Json<ItemResponse>)>
where
    R: ItemRepository + Send + Sync + 'static,
{
    let item = state.cache.add(&req.name).await?;
    tracing::info!(user = actor_name(&actor), item_id = item.id, "Create item");
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /catalog/products/{id}
pub async fn get_item<R>(
    State(state): State<CatalogAppState<R>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<ItemResponse>>
where
    R: ItemRepository + Send + Sync + 'static,
{
    let item = state.cache.get_by_id(parse_id(&id)?).await?;
    Ok(Json(item.into()))
}

/// PUT /catalog/products/{id}
pub async fn update_item<R>(
    State(state): State<CatalogAppState<R>>,
    actor: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<String>,
    Json(req): Json<ItemRequest>,
) -> CatalogResult<Json<ItemResponse>>
where
    R: ItemRepository + Send + Sync + 'static,
{
    let item = Item {
        id: parse_id(&id)?,
        name: req.name,
    };
    let updated = state.cache.update(&item).await?;
    tracing::info!(user = actor_name(&actor), item_id = updated.id, "Update item");
    Ok(Json(updated.into()))
}

/// DELETE /catalog/products/{id}
pub async fn delete_item<R>(
    State(state): State<CatalogAppState<R>>,
    actor: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<String>,
) -> CatalogResult<StatusCode>
where
    R: ItemRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state.cache.remove(id).await?;
    tracing::info!(user = actor_name(&actor), item_id = id, "Delete item");
    Ok(StatusCode::NO_CONTENT)
}
