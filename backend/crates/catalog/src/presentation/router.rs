//! Catalog Router

use axum::{Router, routing::get};

use crate::domain::repository::ItemRepository;
use crate::infra::postgres::PgItemRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the Catalog router with PostgreSQL repository
pub fn catalog_router(state: CatalogAppState<PgItemRepository>) -> Router {
    catalog_router_generic(state)
}

/// Create a generic Catalog router for any repository implementation.
///
/// Routes are unauthenticated here; the binary layers the session guard
/// on top.
pub fn catalog_router_generic<R>(state: CatalogAppState<R>) -> Router
where
    R: ItemRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/catalog/products",
            get(handlers::list_items::<R>).post(handlers::create_item::<R>),
        )
        .route(
            "/catalog/products/{id}",
            get(handlers::get_item::<R>)
                .put(handlers::update_item::<R>)
                .delete(handlers::delete_item::<R>),
        )
        .with_state(state)
}
