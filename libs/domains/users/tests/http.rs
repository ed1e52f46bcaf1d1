use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use document_store::InMemoryDocumentStore;
use domain_users::{UserService, handlers};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    handlers::router(UserService::new(Arc::new(InMemoryDocumentStore::new())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(body: Value) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn signup(email: &str) -> Value {
    json!({
        "email": email,
        "password": "capricciosa",
        "confirmPassword": "capricciosa",
        "firstName": "Giulia",
        "lastName": "Bianchi"
    })
}

#[tokio::test]
async fn register_then_fetch() {
    let app = app();

    let (status, created) = send(&app, post(signup("giulia@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let request = Request::get(format!("/{id}")).body(Body::empty()).unwrap();
    let (status, user) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "giulia@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let (status, body) = send(&app, post(signup("giulia@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let request = Request::get("/?search=giulia").body(Body::empty()).unwrap();
    let (_, page) = send(&app, request).await;
    assert_eq!(page["count"], 1);
}

#[tokio::test]
async fn invalid_signup_is_rejected() {
    let app = app();

    let mut body = signup("not-an-email");
    body["confirmPassword"] = json!("diavola!");
    let (status, response) = send(&app, post(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["details"]["email"].is_array());
    assert!(response["details"]["confirmPassword"].is_array());
}
