use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use document_store::InMemoryDocumentStore;
use domain_categories::{CategoryService, ImageStore, handlers};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "menu-boundary";

fn app(assets: &TempDir) -> Router {
    let store = Arc::new(InMemoryDocumentStore::new());
    handlers::router(CategoryService::new(store, ImageStore::new(assets.path())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn form(method: &str, uri: &str, name: &str, image: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n"
    )
    .into_bytes();
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn category_lifecycle_with_image() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);

    let (status, created) = send(&app, form("POST", "/", "Secondi Piatti", None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["image"]["status"], "none");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, category) = send(&app, get("/bySlug/secondi-piatti")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["_id"], id.as_str());
    assert!(category.get("imageUrl").is_none());

    let (status, updated) = send(
        &app,
        form("PUT", &format!("/{id}"), "Secondi", Some(("menu.JPG", b"jpeg"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = format!("/assets/category/{id}.jpg");
    assert_eq!(updated["image"]["status"], "stored");
    assert_eq!(updated["image"]["url"], url.as_str());

    let (_, category) = send(&app, get(&format!("/{id}"))).await;
    assert_eq!(category["slug"], "secondi");
    assert_eq!(category["imageUrl"], url.as_str());
    let stored = assets.path().join("category").join(format!("{id}.jpg"));
    assert_eq!(std::fs::read(stored).unwrap(), b"jpeg");

    let delete = Request::delete(format!("/{id}")).body(Body::empty()).unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get("/bySlug/secondi")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (_, listed) = send(&app, get("/?deleted=true")).await;
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["items"][0]["deleted"], true);
}

#[tokio::test]
async fn list_filters_by_slug() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);
    for name in ["Pizze", "Pizze Bianche", "Dolci"] {
        send(&app, form("POST", "/", name, None)).await;
    }

    let (status, all) = send(&app, get("/?orderBy=name&ascending=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 3);
    assert_eq!(all["items"][0]["name"], "Dolci");

    let (_, scoped) = send(&app, get("/?slug=pizze")).await;
    assert_eq!(scoped["count"], 1);
    assert_eq!(scoped["items"][0]["name"], "Pizze");

    let (_, searched) = send(&app, get("/?search=PIZ")).await;
    assert_eq!(searched["count"], 2);
}

#[tokio::test]
async fn invalid_forms_are_rejected() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);

    let (status, _) = send(&app, form("POST", "/", "", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = format!("/{}", document_store::bson::oid::ObjectId::new().to_hex());
    let (status, _) = send(&app, form("PUT", &missing, "Contorni", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, form("PUT", "/nope", "Contorni", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OBJECT_ID");

    let delete = Request::delete(missing).body(Body::empty()).unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
