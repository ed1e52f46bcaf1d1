//! Menu API: REST service over the menu catalog.
//!
//! ```text
//! /api/v1/{categories,products,carriers,users}   resource routes
//! /api/v1, /api/v1/ready                         status, readiness
//! /health                                        liveness
//! /assets/*                                      uploaded images
//! /swagger-ui, /scalar, /api-docs/openapi.json   OpenAPI
//! ```

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::{create_router, health_router};
use std::io;
use tower_http::services::ServeDir;

pub use config::Config;
pub use state::AppState;

/// Full application router for `state`
pub fn app(state: &AppState) -> io::Result<Router> {
    let root = Router::new()
        .nest_service("/assets", ServeDir::new(&state.config.assets.dir))
        .merge(health_router(state.config.app));

    create_router::<openapi::ApiDoc>(api::routes(state), root, &state.config.server)
}
