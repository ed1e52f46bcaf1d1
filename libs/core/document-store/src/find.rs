use mongodb::bson::{self, oid::ObjectId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use utoipa::ToSchema;

use crate::error::StoreResult;
use crate::query::FindQuery;
use crate::serde_helpers::object_id_hex;
use crate::store::DocumentStore;

/// Body of a successful create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CreatedId {
    #[serde(serialize_with = "object_id_hex::serialize")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11c0ffee1")]
    pub id: ObjectId,
}

/// Listing envelope.
///
/// `page` and `totalPages` are present only for paginated listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindResult<T> {
    pub items: Vec<T>,
    /// Records matching the filter, regardless of paging
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl<T> FindResult<T> {
    /// Convert every item, keeping the paging data
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> FindResult<U> {
        FindResult {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

/// Run a listing: count the filter, fetch the page, decode the records.
///
/// Count and fetch are separate round trips, so under concurrent writes the
/// count may not match the page exactly.
#[instrument(skip(store, query), fields(paginated = query.window.is_some()))]
pub async fn find<S, T>(store: &S, collection: &str, query: &FindQuery) -> StoreResult<FindResult<T>>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned,
{
    let count = store.count(collection, &query.filter).await?;
    let documents = store.fetch(collection, query).await?;

    let items = documents
        .into_iter()
        .map(bson::from_document)
        .collect::<Result<Vec<T>, _>>()?;

    Ok(FindResult {
        items,
        count,
        page: query.window.map(|window| window.page),
        total_pages: query.window.map(|window| window.total_pages(count)),
    })
}

/// First record a listing would return, without the count round trip
#[instrument(skip(store, query))]
pub async fn find_first<S, T>(store: &S, collection: &str, query: &FindQuery) -> StoreResult<Option<T>>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned,
{
    let documents = store.fetch(collection, query).await?;

    Ok(documents
        .into_iter()
        .next()
        .map(bson::from_document)
        .transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::params::PaginationParams;
    use crate::query::SortKey;
    use crate::store::MockDocumentStore;
    use mongodb::bson::{Document, doc};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn query(paginated: bool, page: u64, per_page: u64) -> FindQuery {
        let params = PaginationParams {
            paginated,
            page,
            per_page,
            ..Default::default()
        };
        FindQuery::from_params(&params, &[SortKey::Id])
    }

    #[tokio::test]
    async fn test_paginated_envelope() {
        let mut store = MockDocumentStore::new();
        store
            .expect_count()
            .withf(|collection, filter| collection == "carriers" && !filter.include_deleted)
            .times(1)
            .returning(|_, _| Ok(7));
        store
            .expect_fetch()
            .times(1)
            .returning(|_, _| Ok(vec![doc! { "name": "UPS" }, doc! { "name": "GLS" }]));

        let result: FindResult<Named> = find(&store, "carriers", &query(true, 2, 5)).await.unwrap();

        assert_eq!(result.count, 7);
        assert_eq!(result.page, Some(2));
        assert_eq!(result.total_pages, Some(2));
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].name, "UPS");
    }

    #[tokio::test]
    async fn test_unpaginated_envelope_omits_paging() {
        let mut store = MockDocumentStore::new();
        store.expect_count().returning(|_, _| Ok(1));
        store
            .expect_fetch()
            .returning(|_, _| Ok(vec![doc! { "name": "DHL" }]));

        let result: FindResult<Named> = find(&store, "carriers", &query(false, 1, 10)).await.unwrap();
        let json = serde_json::to_value(result.map(|item| item.name)).unwrap();

        assert_eq!(json, serde_json::json!({ "items": ["DHL"], "count": 1 }));
    }

    #[tokio::test]
    async fn test_total_pages_rounds_up() {
        let mut store = MockDocumentStore::new();
        store.expect_count().returning(|_, _| Ok(11));
        store.expect_fetch().returning(|_, _| Ok(Vec::<Document>::new()));

        let result: FindResult<Named> = find(&store, "carriers", &query(true, 9, 5)).await.unwrap();
        assert_eq!(result.total_pages, Some(3));
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn test_count_failure_skips_fetch() {
        let mut store = MockDocumentStore::new();
        store.expect_count().returning(|collection, _| {
            Err(StoreError::Query {
                collection: collection.to_string(),
                reason: "timeout".to_string(),
            })
        });
        store.expect_fetch().never();

        let result = find::<_, Named>(&store, "carriers", &query(true, 1, 10)).await;
        assert!(matches!(result, Err(StoreError::Query { .. })));
    }

    #[tokio::test]
    async fn test_undecodable_record_is_an_error() {
        let mut store = MockDocumentStore::new();
        store.expect_count().returning(|_, _| Ok(1));
        store
            .expect_fetch()
            .returning(|_, _| Ok(vec![doc! { "title": "no name" }]));

        let result = find::<_, Named>(&store, "carriers", &query(true, 1, 10)).await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_find_first_takes_first_document() {
        let mut store = MockDocumentStore::new();
        store.expect_count().never();
        store
            .expect_fetch()
            .returning(|_, _| Ok(vec![doc! { "name": "SDA" }, doc! { "name": "BRT" }]));

        let first: Option<Named> = find_first(&store, "carriers", &FindQuery::active())
            .await
            .unwrap();
        assert_eq!(first.unwrap().name, "SDA");
    }

    #[tokio::test]
    async fn test_find_first_on_empty_result() {
        let mut store = MockDocumentStore::new();
        store.expect_fetch().returning(|_, _| Ok(Vec::new()));

        let id = ObjectId::new();
        let first: Option<Named> = find_first(&store, "carriers", &FindQuery::by_id(id))
            .await
            .unwrap();
        assert!(first.is_none());
    }

    #[test]
    fn test_created_id_is_hex() {
        let id = ObjectId::new();
        let json = serde_json::to_value(CreatedId { id }).unwrap();
        assert_eq!(json, serde_json::json!({ "id": id.to_hex() }));
    }
}
