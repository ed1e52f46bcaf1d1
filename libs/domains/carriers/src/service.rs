//! Carrier Service - Business logic layer

use document_store::bson::{doc, oid::ObjectId};
use document_store::{
    DocumentStore, FindQuery, FindResult, PaginationParams, SortKey, find, find_first,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{CarrierError, CarrierResult};
use crate::models::{Carrier, CreateCarrier, UpdateCarrier};

pub const COLLECTION: &str = "carriers";

/// `orderBy` values carriers accept
pub const SORT_KEYS: &[SortKey] = &[SortKey::Id, SortKey::Name];

pub struct CarrierService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for CarrierService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore + ?Sized> CarrierService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateCarrier) -> CarrierResult<ObjectId> {
        input
            .validate()
            .map_err(|e| CarrierError::Validation(e.to_string()))?;

        let id = self
            .store
            .insert(COLLECTION, doc! { "name": input.name, "costs": input.costs })
            .await?;

        info!(%id, "Created carrier");
        Ok(id)
    }

    /// Merge the provided fields into an active carrier
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ObjectId, input: UpdateCarrier) -> CarrierResult<()> {
        input
            .validate()
            .map_err(|e| CarrierError::Validation(e.to_string()))?;

        self.get(id).await?;

        self.store
            .update_by_id(COLLECTION, id, doc! { "name": input.name, "costs": input.costs })
            .await?;
        Ok(())
    }

    /// Soft delete; repeating it is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> CarrierResult<()> {
        if self.store.get_by_id(COLLECTION, id).await?.is_none() {
            return Err(CarrierError::NotFound(id));
        }

        self.store.soft_delete_by_id(COLLECTION, id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> CarrierResult<Carrier> {
        find_first(self.store.as_ref(), COLLECTION, &FindQuery::by_id(id))
            .await?
            .ok_or(CarrierError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn find(&self, params: &PaginationParams) -> CarrierResult<FindResult<Carrier>> {
        let query = FindQuery::from_params(params, SORT_KEYS);
        Ok(find(self.store.as_ref(), COLLECTION, &query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document_store::{InMemoryDocumentStore, MockDocumentStore, StoreError};

    fn service() -> CarrierService<InMemoryDocumentStore> {
        CarrierService::new(Arc::new(InMemoryDocumentStore::new()))
    }

    fn carrier(name: &str, costs: f64) -> CreateCarrier {
        CreateCarrier {
            name: name.to_string(),
            costs,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let id = service.create(carrier("DHL", 6.9)).await.unwrap();

        let stored = service.get(id).await.unwrap();
        assert_eq!(stored.name, "DHL");
        assert_eq!(stored.costs, 6.9);
        assert_eq!(stored.deleted, None);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_costs() {
        let result = service().create(carrier("DHL", -1.0)).await;
        assert!(matches!(result, Err(CarrierError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_merges_present_fields() {
        let service = service();
        let id = service.create(carrier("DHL", 6.9)).await.unwrap();

        service
            .update(
                id,
                UpdateCarrier {
                    costs: Some(4.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = service.get(id).await.unwrap();
        assert_eq!(stored.name, "DHL");
        assert_eq!(stored.costs, 4.5);
    }

    #[tokio::test]
    async fn test_update_of_deleted_carrier_is_not_found() {
        let service = service();
        let id = service.create(carrier("UPS", 9.0)).await.unwrap();
        service.delete(id).await.unwrap();

        let result = service
            .update(
                id,
                UpdateCarrier {
                    name: Some("UPS Standard".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(CarrierError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_hides_from_get_and_default_find() {
        let service = service();
        let id = service.create(carrier("GLS", 5.0)).await.unwrap();
        service.create(carrier("SDA", 4.0)).await.unwrap();

        service.delete(id).await.unwrap();
        service.delete(id).await.unwrap();

        assert!(matches!(service.get(id).await, Err(CarrierError::NotFound(_))));

        let active = service.find(&PaginationParams::default()).await.unwrap();
        assert_eq!(active.count, 1);

        let all = service
            .find(&PaginationParams {
                deleted: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let gls = all.items.iter().find(|c| c.id == id).unwrap();
        assert_eq!(gls.deleted, Some(true));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let result = service().delete(ObjectId::new()).await;
        assert!(matches!(result, Err(CarrierError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_sort_keys() {
        let service = service();
        service.create(carrier("Bartolini", 7.0)).await.unwrap();
        service.create(carrier("Aramex", 3.0)).await.unwrap();

        let by_name = service
            .find(&PaginationParams {
                order_by: "name".into(),
                ascending: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = by_name.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Aramex", "Bartolini"]);

        let query = FindQuery::from_params(
            &PaginationParams {
                order_by: "price".into(),
                ..Default::default()
            },
            SORT_KEYS,
        );
        assert_eq!(query.sort, None);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockDocumentStore::new();
        store.expect_insert().returning(|collection, _| {
            Err(StoreError::Persistence {
                operation: "insert",
                collection: collection.to_string(),
                reason: "not acknowledged".into(),
            })
        });

        let service = CarrierService::new(Arc::new(store));
        let result = service.create(carrier("DHL", 1.0)).await;
        assert!(matches!(
            result,
            Err(CarrierError::Store(StoreError::Persistence { .. }))
        ));
    }
}
