//! Products Domain
//!
//! Menu products. Every read joins the referenced category, so listings can
//! be ordered by category name and scoped with `categorySlug`.
//!
//! A product whose category is gone is still returned, without `category`.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CreateProduct, ProductScope, ProductWithCategory, UpdateProduct};
pub use service::{COLLECTION, ProductService};
