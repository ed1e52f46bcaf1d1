//! Category Service - Business logic layer

use document_store::bson::{doc, oid::ObjectId};
use document_store::{
    DocumentStore, FindQuery, FindResult, PaginationParams, SortKey, find, find_first,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::images::ImageStore;
use crate::models::{
    Category, CategoryScope, CategoryWrite, CreateCategory, ImageOutcome, ImageUpload,
    UpdateCategory,
};
use crate::slug::slugify;

pub const COLLECTION: &str = "categories";

/// `orderBy` values categories accept
pub const SORT_KEYS: &[SortKey] = &[SortKey::Id, SortKey::Name];

pub struct CategoryService<S: ?Sized> {
    store: Arc<S>,
    images: ImageStore,
}

impl<S: ?Sized> Clone for CategoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            images: self.images.clone(),
        }
    }
}

impl<S: DocumentStore + ?Sized> CategoryService<S> {
    pub fn new(store: Arc<S>, images: ImageStore) -> Self {
        Self { store, images }
    }

    /// Insert the category, then store its image if one was sent
    #[instrument(skip(self, input, image), fields(name = %input.name, with_image = image.is_some()))]
    pub async fn create(
        &self,
        input: CreateCategory,
        image: Option<ImageUpload>,
    ) -> CategoryResult<CategoryWrite> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let slug = slugify(&input.name);
        let id = self
            .store
            .insert(COLLECTION, doc! { "name": input.name, "slug": slug.as_str() })
            .await?;
        info!(%id, %slug, "Created category");

        let image = self.attach_image(id, image).await;
        Ok(CategoryWrite { id, image })
    }

    /// Rename an active category (recomputing its slug) and replace its image
    /// if one was sent
    #[instrument(skip(self, input, image), fields(with_image = image.is_some()))]
    pub async fn update(
        &self,
        id: ObjectId,
        input: UpdateCategory,
        image: Option<ImageUpload>,
    ) -> CategoryResult<CategoryWrite> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        self.get(id).await?;

        let slug = slugify(&input.name);
        self.store
            .update_by_id(COLLECTION, id, doc! { "name": input.name, "slug": slug })
            .await?;

        let image = self.attach_image(id, image).await;
        Ok(CategoryWrite { id, image })
    }

    /// Soft delete; products keep pointing at the category
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> CategoryResult<()> {
        if self.store.get_by_id(COLLECTION, id).await?.is_none() {
            return Err(CategoryError::NotFound(id));
        }

        self.store.soft_delete_by_id(COLLECTION, id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> CategoryResult<Category> {
        find_first(self.store.as_ref(), COLLECTION, &FindQuery::by_id(id))
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> CategoryResult<Category> {
        let query = FindQuery::active().with_field("slug", slug);

        find_first(self.store.as_ref(), COLLECTION, &query)
            .await?
            .ok_or_else(|| CategoryError::SlugNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn find(
        &self,
        params: &PaginationParams,
        scope: &CategoryScope,
    ) -> CategoryResult<FindResult<Category>> {
        let mut query = FindQuery::from_params(params, SORT_KEYS);
        if let Some(slug) = scope.slug.as_deref().filter(|slug| !slug.is_empty()) {
            query = query.with_field("slug", slug);
        }

        Ok(find(self.store.as_ref(), COLLECTION, &query).await?)
    }

    /// Best effort: failures are reported in the outcome, never rolled back
    async fn attach_image(&self, id: ObjectId, image: Option<ImageUpload>) -> ImageOutcome {
        let Some(upload) = image else {
            return ImageOutcome::None;
        };

        let url = match self.images.save(id, &upload).await {
            Ok(url) => url,
            Err(e) => {
                warn!(%id, error = %e, "Failed to write category image");
                return ImageOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match self
            .store
            .update_by_id(COLLECTION, id, doc! { "imageUrl": url.as_str() })
            .await
        {
            Ok(()) => ImageOutcome::Stored { url },
            Err(e) => {
                warn!(%id, error = %e, "Failed to record category image URL");
                ImageOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
