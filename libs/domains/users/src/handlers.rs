//! HTTP handlers for Users API

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
        BadRequestObjectIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use document_store::{CreatedId, DocumentStore, FindResult, PaginationParams};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{CreateUser, Role, UserResponse};
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, delete_user),
    components(
        schemas(UserResponse, CreateUser, Role, CreatedId),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User registration and lookup")
    )
)]
pub struct ApiDoc;

pub fn router<S: DocumentStore + ?Sized + 'static>(service: UserService<S>) -> Router {
    Router::new()
        .route("/", get(list_users::<S>).post(create_user::<S>))
        .route("/{id}", get(get_user::<S>).delete(delete_user::<S>))
        .with_state(Arc::new(service))
}

/// List users; `search` matches the e-mail
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = FindResult<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<S: DocumentStore + ?Sized>(
    State(service): State<Arc<UserService<S>>>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> UserResult<Json<FindResult<UserResponse>>> {
    Ok(Json(service.find(&params).await?))
}

/// Register a user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = CreatedId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<S: DocumentStore + ?Sized>(
    State(service): State<Arc<UserService<S>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let id = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<S: DocumentStore + ?Sized>(
    State(service): State<Arc<UserService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<S: DocumentStore + ?Sized>(
    State(service): State<Arc<UserService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> UserResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
