//! API routes
//!
//! Everything here is nested under `axum_helpers::API_PREFIX` by
//! `axum_helpers::create_router`.

pub mod status;

use axum::Router;
use document_store::DocumentStore;
use domain_carriers::CarrierService;
use domain_categories::{CategoryService, ImageStore};
use domain_products::ProductService;
use domain_users::UserService;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    let store: Arc<dyn DocumentStore> = Arc::clone(&state.store);
    let images = ImageStore::new(state.config.assets.dir.clone());

    Router::new()
        .nest(
            "/categories",
            domain_categories::handlers::router(CategoryService::new(Arc::clone(&store), images)),
        )
        .nest(
            "/products",
            domain_products::handlers::router(ProductService::new(Arc::clone(&store))),
        )
        .nest(
            "/carriers",
            domain_carriers::handlers::router(CarrierService::new(Arc::clone(&store))),
        )
        .nest(
            "/users",
            domain_users::handlers::router(UserService::new(store)),
        )
        .merge(status::router(state.clone()))
}
