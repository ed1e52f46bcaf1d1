//! Carriers Domain
//!
//! Shipping carriers and their per-order costs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, existence checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │DocumentStore│  ← MongoDB or in-memory
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_carriers::{CarrierService, handlers};
//! use std::sync::Arc;
//!
//! let service = CarrierService::new(Arc::new(store));
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{CarrierError, CarrierResult};
pub use handlers::ApiDoc;
pub use models::{Carrier, CreateCarrier, UpdateCarrier};
pub use service::CarrierService;
