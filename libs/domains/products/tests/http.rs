use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use document_store::bson::doc;
use document_store::{DocumentStore, InMemoryDocumentStore};
use domain_products::{ProductService, handlers};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn pizze_diavola_end_to_end() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pizze = store
        .insert("categories", doc! { "name": "Pizze", "slug": "pizze" })
        .await
        .unwrap()
        .to_hex();
    let app = handlers::router(ProductService::new(store));

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/",
            json!({ "name": "Diavola", "price": 8.5, "categoryId": pizze }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, page) = send(&app, get("/?categorySlug=pizze")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(
        page["items"][0],
        json!({
            "_id": id,
            "name": "Diavola",
            "price": 8.5,
            "categoryId": pizze,
            "category": { "_id": pizze, "name": "Pizze", "slug": "pizze" }
        })
    );

    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/{id}"), json!({ "price": 9.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, product) = send(&app, get(&format!("/{id}"))).await;
    assert_eq!(product["price"], 9.0);
    assert_eq!(product["category"]["name"], "Pizze");

    let delete = Request::delete(format!("/{id}")).body(Body::empty()).unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_references_are_rejected() {
    let app = handlers::router(ProductService::new(Arc::new(InMemoryDocumentStore::new())));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/",
            json!({ "name": "Diavola", "price": 8.5, "categoryId": "pizze" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OBJECT_ID");

    let (status, body) = send(&app, get("/?categorySlug=fritti")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = send(&app, get("/?perPage=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["perPage"].is_array());
}
