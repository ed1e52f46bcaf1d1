//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use document_store::{CreatedId, DocumentStore, FindResult, PaginationParams};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CreateProduct, ProductScope, ProductWithCategory, UpdateProduct};
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product, update_product, delete_product),
    components(
        schemas(ProductWithCategory, CreateProduct, UpdateProduct, CreatedId),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Menu products and their categories")
    )
)]
pub struct ApiDoc;

pub fn router<S: DocumentStore + ?Sized + 'static>(service: ProductService<S>) -> Router {
    Router::new()
        .route("/", get(list_products::<S>).post(create_product::<S>))
        .route(
            "/{id}",
            get(get_product::<S>)
                .put(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .with_state(Arc::new(service))
}

/// List products with their categories
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(PaginationParams, ProductScope),
    responses(
        (status = 200, description = "Page of products", body = FindResult<ProductWithCategory>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<S: DocumentStore + ?Sized>(
    State(service): State<Arc<ProductService<S>>>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
    Query(scope): Query<ProductScope>,
) -> ProductResult<Json<FindResult<ProductWithCategory>>> {
    Ok(Json(service.find(&params, &scope).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = CreatedId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<S: DocumentStore + ?Sized>(
    State(service): State<Arc<ProductService<S>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let id = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    responses(
        (status = 200, description = "Product found", body = ProductWithCategory),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: DocumentStore + ?Sized>(
    State(service): State<Arc<ProductService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductWithCategory>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    request_body = UpdateProduct,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<S: DocumentStore + ?Sized>(
    State(service): State<Arc<ProductService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<StatusCode> {
    service.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<S: DocumentStore + ?Sized>(
    State(service): State<Arc<ProductService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
