use async_trait::async_trait;
use database::common::RetryConfig;
use database::mongodb::{MongoConfig, connect_from_config_with_retry, ping as ping_database};
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc, oid::ObjectId};
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::pipeline::{filter_document, find_pipeline};
use crate::query::{FindQuery, Filter};
use crate::store::{DocumentStore, non_null_fields, with_active_flag};

/// [`DocumentStore`] backed by a MongoDB database.
///
/// Cloning is cheap: the driver client is reference counted.
#[derive(Clone)]
pub struct MongoDocumentStore {
    client: Client,
    db: Database,
}

impl MongoDocumentStore {
    /// Connect with retry and select the configured database
    pub async fn open(config: &MongoConfig) -> StoreResult<Self> {
        let client = connect_from_config_with_retry(config, Some(RetryConfig::default())).await?;
        let db = client.database(config.database());
        info!(database = %config.database(), "MongoDB document store ready");
        Ok(Self { client, db })
    }

    pub fn from_client(client: Client, database: &str) -> Self {
        let db = client.database(database);
        Self { client, db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    #[instrument(skip(self, fields))]
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<ObjectId> {
        let result = self
            .collection(collection)
            .insert_one(with_active_flag(fields))
            .await
            .map_err(|e| write_error("insert", collection, e))?;

        match result.inserted_id {
            Bson::ObjectId(id) => {
                info!(%id, collection, "Inserted document");
                Ok(id)
            }
            other => Err(StoreError::persistence(
                "insert",
                collection,
                format!("unexpected inserted id {other}"),
            )),
        }
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> StoreResult<()> {
        let changes = non_null_fields(fields);
        if changes.is_empty() {
            debug!("Nothing to update");
            return Ok(());
        }

        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": changes })
            .await
            .map_err(|e| write_error("update", collection, e))?;

        debug!(matched = result.matched_count, "Updated document");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn soft_delete_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<()> {
        self.collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": { "deleted": true } })
            .await
            .map_err(|e| StoreError::persistence("delete", collection, e))?;

        info!(%id, collection, "Soft-deleted document");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>> {
        self.collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::query(collection, e))
    }

    #[instrument(skip(self, value))]
    async fn find_one_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Option<Document>> {
        let mut filter = Document::new();
        filter.insert(field, value);

        self.collection(collection)
            .find_one(filter)
            .await
            .map_err(|e| StoreError::query(collection, e))
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.collection(collection)
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| StoreError::query(collection, e))
    }

    #[instrument(skip(self, query))]
    async fn fetch(&self, collection: &str, query: &FindQuery) -> StoreResult<Vec<Document>> {
        let pipeline = find_pipeline(query);
        debug!(?pipeline, "Running aggregation");

        let cursor = self
            .collection(collection)
            .aggregate(pipeline)
            .await
            .map_err(|e| StoreError::query(collection, e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::query(collection, e))
    }

    #[instrument(skip(self))]
    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let created = self
            .collection(collection)
            .create_index(index)
            .await
            .map_err(|e| StoreError::persistence("create index", collection, e))?;

        info!(index = %created.index_name, collection, "Unique index ready");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        ping_database(&self.db).await.map_err(StoreError::from)
    }

    async fn close(&self) {
        info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(error: &DriverError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(failure)) if failure.code == DUPLICATE_KEY
    )
}

fn write_error(operation: &'static str, collection: &str, error: DriverError) -> StoreError {
    if is_duplicate_key(&error) {
        StoreError::Duplicate {
            collection: collection.to_string(),
            reason: error.to_string(),
        }
    } else {
        StoreError::persistence(operation, collection, error)
    }
}
