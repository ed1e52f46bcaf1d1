//! Users Domain
//!
//! Registration and lookup. Passwords are hashed with Argon2id before they
//! reach the store; responses carry neither the password nor its hash.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, Role, UserResponse};
pub use service::{COLLECTION, UserService};
