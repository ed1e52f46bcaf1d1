//! HTTP handlers for Carriers API

use axum::{
    Json, Router,
    extract::State,
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

use crate::error::CarrierResult;
use crate::models::{Carrier, CreateCarrier, UpdateCarrier};
use crate::service::CarrierService;

#[derive(OpenApi)]
#[openapi(
    paths(list_carriers, create_carrier, get_carrier, update_carrier, delete_carrier),
    components(
        schemas(Carrier, CreateCarrier, UpdateCarrier, CreatedId),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Carriers", description = "Shipping carriers")
    )
)]
pub struct ApiDoc;

pub fn router<S: DocumentStore + ?Sized + 'static>(service: CarrierService<S>) -> Router {
    Router::new()
        .route("/", get(list_carriers::<S>).post(create_carrier::<S>))
        .route(
            "/{id}",
            get(get_carrier::<S>)
                .put(update_carrier::<S>)
                .delete(delete_carrier::<S>),
        )
        .with_state(Arc::new(service))
}

/// List carriers
#[utoipa::path(
    get,
    path = "",
    tag = "Carriers",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of carriers", body = FindResult<Carrier>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_carriers<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CarrierService<S>>>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> CarrierResult<Json<FindResult<Carrier>>> {
    Ok(Json(service.find(&params).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Carriers",
    request_body = CreateCarrier,
    responses(
        (status = 201, description = "Carrier created", body = CreatedId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_carrier<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CarrierService<S>>>,
    ValidatedJson(input): ValidatedJson<CreateCarrier>,
) -> CarrierResult<impl IntoResponse> {
    let id = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Carriers",
    params(("id" = String, Path, description = "Carrier ObjectId")),
    responses(
        (status = 200, description = "Carrier found", body = Carrier),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_carrier<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CarrierService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CarrierResult<Json<Carrier>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Carriers",
    params(("id" = String, Path, description = "Carrier ObjectId")),
    request_body = UpdateCarrier,
    responses(
        (status = 204, description = "Carrier updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_carrier<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CarrierService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCarrier>,
) -> CarrierResult<StatusCode> {
    service.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Carriers",
    params(("id" = String, Path, description = "Carrier ObjectId")),
    responses(
        (status = 204, description = "Carrier deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_carrier<S: DocumentStore + ?Sized>(
    State(service): State<Arc<CarrierService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CarrierResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
