//! Shared test utilities for the menu crates
//!
//! - [`TestMongo`]: MongoDB container with automatic cleanup
//! - [`TestDataBuilder`]: deterministic database names per test
//!
//! Container-backed tests need Docker and are marked
//! `#[ignore = "requires Docker"]`; run them with `cargo test -- --ignored`.

mod mongo;

pub use mongo::TestMongo;

/// Seed derived from the test name, so parallel tests never share a
/// database.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let a = TestDataBuilder::from_test_name("test_find_products");
    /// let b = TestDataBuilder::from_test_name("test_find_products");
    /// assert_eq!(a.database_name(), b.database_name());
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Database name unique to this test
    pub fn database_name(&self) -> String {
        format!("menu_test_{:x}", self.seed)
    }
}
