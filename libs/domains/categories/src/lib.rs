//! Categories Domain
//!
//! Menu categories with a derived slug and an optional image stored under
//! the assets directory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart form
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌────────────┐
//! │   Service   │ ──► │ ImageStore │  ← <assets>/category/<id>.<ext>
//! └──────┬──────┘     └────────────┘
//!        │
//! ┌──────▼──────┐
//! │DocumentStore│  ← MongoDB or in-memory
//! └─────────────┘
//! ```
//!
//! Creating or updating with an image is two writes: the record, then the
//! file and its `imageUrl`. [`ImageOutcome`] reports how the second went.

pub mod error;
pub mod handlers;
pub mod images;
pub mod models;
pub mod service;
pub mod slug;

pub use error::{CategoryError, CategoryResult};
pub use handlers::ApiDoc;
pub use images::ImageStore;
pub use models::{
    Category, CategoryScope, CategoryWrite, CreateCategory, ImageOutcome, ImageUpload,
    UpdateCategory,
};
pub use service::{COLLECTION, CategoryService};
pub use slug::slugify;
