//! Product Service - Business logic layer

use document_store::bson::{self, doc, oid::ObjectId};
use document_store::{
    DocumentStore, FindQuery, FindResult, JoinSpec, PaginationParams, SortKey, StoreError, find,
    find_first, parse_object_id,
};
use domain_categories::Category;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ProductScope, ProductWithCategory, UpdateProduct};

pub const COLLECTION: &str = "products";

/// `orderBy` values products accept
pub const SORT_KEYS: &[SortKey] = &[
    SortKey::Id,
    SortKey::Name,
    SortKey::Price,
    SortKey::CategoryName,
];

/// `categoryId` → category `_id`, attached as `category`
fn category_join() -> JoinSpec {
    JoinSpec::new(domain_categories::COLLECTION, "categoryId", "_id", "category")
}

pub struct ProductService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ProductService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore + ?Sized> ProductService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The category is referenced, not checked: it may not exist yet
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<ObjectId> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let category_id = parse_object_id(&input.category_id)?;
        let id = self
            .store
            .insert(
                COLLECTION,
                doc! {
                    "name": input.name,
                    "price": input.price,
                    "categoryId": category_id,
                    "descriptionShort": input.description_short,
                },
            )
            .await?;

        info!(%id, %category_id, "Created product");
        Ok(id)
    }

    /// Merge the provided fields into an active product
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<()> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let category_id = input
            .category_id
            .as_deref()
            .map(parse_object_id)
            .transpose()?;

        self.get(id).await?;

        self.store
            .update_by_id(
                COLLECTION,
                id,
                doc! {
                    "name": input.name,
                    "price": input.price,
                    "categoryId": category_id,
                    "descriptionShort": input.description_short,
                },
            )
            .await?;
        Ok(())
    }

    /// Soft delete; repeating it is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> ProductResult<()> {
        if self.store.get_by_id(COLLECTION, id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        self.store.soft_delete_by_id(COLLECTION, id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> ProductResult<ProductWithCategory> {
        let query = FindQuery::by_id(id).join(category_join());

        find_first(self.store.as_ref(), COLLECTION, &query)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Listing joined with categories, optionally restricted to the category
    /// named by `categorySlug`
    #[instrument(skip(self))]
    pub async fn find(
        &self,
        params: &PaginationParams,
        scope: &ProductScope,
    ) -> ProductResult<FindResult<ProductWithCategory>> {
        let mut query = FindQuery::from_params(params, SORT_KEYS).join(category_join());

        if let Some(slug) = scope.category_slug.as_deref().filter(|slug| !slug.is_empty()) {
            let category_id = self.resolve_category(slug).await?;
            query = query.with_field("categoryId", category_id);
        }

        Ok(find(self.store.as_ref(), COLLECTION, &query).await?)
    }

    /// Any category with the slug, deleted ones included
    async fn resolve_category(&self, slug: &str) -> ProductResult<ObjectId> {
        let document = self
            .store
            .find_one_by_field(domain_categories::COLLECTION, "slug", slug.into())
            .await?
            .ok_or_else(|| ProductError::CategoryNotFound(slug.to_string()))?;

        let category: Category = bson::from_document(document).map_err(StoreError::from)?;
        debug!(category_id = %category.id, slug, "Resolved category slug");
        Ok(category.id)
    }
}
