use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};

use crate::error::StoreResult;
use crate::query::{FindQuery, Filter};

/// Persistence over named collections of BSON documents.
///
/// Implementations never hard-delete and never retry. A write that breaks a
/// unique field fails with [`StoreError::Duplicate`](crate::StoreError::Duplicate);
/// any other write failure is [`StoreError::Persistence`](crate::StoreError::Persistence).
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `fields` with `deleted: false` and return the new id
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<ObjectId>;

    /// `$set` every non-null entry of `fields`. An unknown id is not an error.
    async fn update_by_id(&self, collection: &str, id: ObjectId, fields: Document)
    -> StoreResult<()>;

    /// Set `deleted: true`; repeating it is harmless
    async fn soft_delete_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<()>;

    /// Raw lookup, deleted records included
    async fn get_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>>;

    /// First record whose `field` equals `value`, deleted records included
    async fn find_one_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Option<Document>>;

    /// Number of records selected by `filter`, ignoring joins and paging
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Records for one listing: filter, join, sort, page, scrub
    async fn fetch(&self, collection: &str, query: &FindQuery) -> StoreResult<Vec<Document>>;

    /// Reject later writes that repeat an existing value of `field`.
    /// Such writes fail with [`StoreError::Duplicate`](crate::StoreError::Duplicate).
    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;

    /// Release the underlying connection
    async fn close(&self);
}

/// Keep only the entries an update should write
pub(crate) fn non_null_fields(fields: Document) -> Document {
    fields
        .into_iter()
        .filter(|(_, value)| !matches!(value, Bson::Null))
        .collect()
}

/// `fields` with `deleted: false`, overriding any caller value
pub(crate) fn with_active_flag(mut fields: Document) -> Document {
    fields.remove("_id");
    fields.insert("deleted", false);
    fields
}
