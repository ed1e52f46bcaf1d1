//! HTTP handlers for Categories API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ObjectIdPath, ValidatedQuery,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use document_store::{DocumentStore, FindResult, PaginationParams};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{
    Category, CategoryForm, CategoryScope, CategoryWrite, CreateCategory, ImageOutcome,
    ImageUpload, UpdateCategory,
};
use crate::service::CategoryService;

/// Largest accepted multipart body
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        get_category_by_slug,
        update_category,
        delete_category,
    ),
    components(
        schemas(Category, CategoryForm, CategoryWrite, ImageOutcome),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Menu categories and their images")
    )
)]
pub struct ApiDoc;

pub fn router<S: DocumentStore + ?Sized + 'static>(service: CategoryService<S>) -> Router {
    Router::new()
        .route("/", get(list_categories::<S>).post(create_category::<S>))
        .route("/bySlug/{slug}", get(get_category_by_slug::<S>))
        .route(
            "/{id}",
            get(get_category::<S>)
                .put(update_category::<S>)
                .delete(delete_category::<S>),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(Arc::new(service))
}

/// Fields of the create/update form
struct FormFields {
    name: String,
    image: Option<ImageUpload>,
}

/// Read `name` and the optional `image` file; other parts are skipped.
/// An empty file part counts as no image.
async fn read_form(mut multipart: Multipart) -> CategoryResult<FormFields> {
    let mut name = String::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("name") => name = field.text().await?,
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(FormFields { name, image })
}

/// List categories
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    params(PaginationParams, CategoryScope),
    responses(
        (status = 200, description = "Page of categories", body = FindResult<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CategoryService<S>>>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
    Query(scope): Query<CategoryScope>,
) -> CategoryResult<Json<FindResult<Category>>> {
    Ok(Json(service.find(&params, &scope).await?))
}

/// Create a category, optionally with an image
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body(content = CategoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Category created; see `image` for the upload", body = CategoryWrite),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CategoryService<S>>>,
    multipart: Multipart,
) -> CategoryResult<impl IntoResponse> {
    let form = read_form(multipart).await?;
    let write = service
        .create(CreateCategory { name: form.name }, form.image)
        .await?;
    Ok((StatusCode::CREATED, Json(write)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CategoryService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<Category>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/bySlug/{slug}",
    tag = "Categories",
    params(("slug" = String, Path, description = "Category slug", example = "pizze")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category_by_slug<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CategoryService<S>>>,
    Path(slug): Path<String>,
) -> CategoryResult<Json<Category>> {
    Ok(Json(service.get_by_slug(&slug).await?))
}

/// Rename a category and optionally replace its image
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    request_body(content = CategoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Category updated", body = CategoryWrite),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CategoryService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
    multipart: Multipart,
) -> CategoryResult<Json<CategoryWrite>> {
    let form = read_form(multipart).await?;
    let write = service
        .update(id, UpdateCategory { name: form.name }, form.image)
        .await?;
    Ok(Json(write))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CategoryService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
