//! Document persistence and the listing engine shared by every resource.
//!
//! # Architecture
//!
//! ```text
//! Resource services (categories, products, carriers, users)
//!     ↓ FindQuery::from_params(..).join(..).with_field(..)
//! find()  ── count(filter) ──┐
//!         ── fetch(query) ───┤  DocumentStore
//!                            ├─ MongoDocumentStore     (aggregation pipeline)
//!                            └─ InMemoryDocumentStore  (evaluated in process)
//! ```
//!
//! Records carry a `deleted` flag. Deleting only sets the flag; listings
//! hide flagged records and strip the flag unless `deleted=true` is asked
//! for.

pub mod error;
pub mod find;
pub mod memory;
pub mod mongodb;
pub mod params;
pub mod pipeline;
pub mod query;
pub mod serde_helpers;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use find::{CreatedId, FindResult, find, find_first};
pub use memory::InMemoryDocumentStore;
pub use self::mongodb::MongoDocumentStore;
pub use params::PaginationParams;
pub use query::{FindQuery, Filter, JoinSpec, PageWindow, Sort, SortKey};
pub use serde_helpers::{object_id_hex, option_object_id_hex, parse_object_id};
pub use store::DocumentStore;

#[cfg(any(test, feature = "mock"))]
pub use store::MockDocumentStore;

/// Re-exported so dependants share one `bson` version
pub use ::mongodb::bson;
