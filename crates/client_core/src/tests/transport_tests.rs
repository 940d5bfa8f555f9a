use super::*;
use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct CaptureState {
    tx: Arc<Mutex<Option<oneshot::Sender<HashMap<String, String>>>>>,
}

async fn handle_products(
    State(state): State<CaptureState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(params);
    }
    Json(json!({
        "productsData": [
            {
                "id": 7,
                "brand": "Lumix",
                "product_name": "DMC-G7",
                "picture_url": "https://cdn.example.test/7.jpg"
            }
        ],
        "hasMore": true
    }))
}

async fn spawn_catalog_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn request(name: &str, page: u32, limit: u32) -> SearchRequest {
    SearchRequest {
        name: name.to_string(),
        page,
        limit,
    }
}

#[tokio::test]
async fn search_sends_query_parameters_and_decodes_envelope() {
    let (tx, params_rx) = oneshot::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/products", get(handle_products))
        .with_state(state);
    let server_url = spawn_catalog_server(app).await;

    let client = HttpCatalogClient::new(&server_url).expect("client");
    let page = client
        .search(&request("Camera", 2, 9))
        .await
        .expect("search");

    let params = params_rx.await.expect("captured params");
    assert_eq!(params.get("name").map(String::as_str), Some("Camera"));
    assert_eq!(params.get("page").map(String::as_str), Some("2"));
    assert_eq!(params.get("limit").map(String::as_str), Some("9"));

    assert!(page.has_more);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].brand, "Lumix");
    assert_eq!(page.items[0].product_name, "DMC-G7");
}

#[tokio::test]
async fn service_error_envelope_maps_to_service_error() {
    let app = Router::new().route(
        "/products",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"code": "internal", "message": "recommender offline"})),
            )
        }),
    );
    let server_url = spawn_catalog_server(app).await;

    let client = HttpCatalogClient::new(&server_url).expect("client");
    let err = client
        .search(&request("Camera", 1, 9))
        .await
        .expect_err("must fail");

    match err {
        SearchError::Service { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("recommender offline"), "got: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_still_maps_to_service_error() {
    let app = Router::new().route(
        "/products",
        get(|| async { (StatusCode::NOT_FOUND, "no such route") }),
    );
    let server_url = spawn_catalog_server(app).await;

    let client = HttpCatalogClient::new(&server_url).expect("client");
    let err = client
        .search(&request("Camera", 1, 9))
        .await
        .expect_err("must fail");

    match err {
        SearchError::Service { status, .. } => assert_eq!(status, 404),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_maps_to_network_error() {
    let app = Router::new().route(
        "/products",
        get(|| async { Json(json!({"unexpected": true})) }),
    );
    let server_url = spawn_catalog_server(app).await;

    let client = HttpCatalogClient::new(&server_url).expect("client");
    let err = client
        .search(&request("Camera", 1, 9))
        .await
        .expect_err("must fail");

    match err {
        SearchError::Network(message) => {
            assert!(message.contains("invalid catalog response"), "got: {message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_maps_to_network_error() {
    // Bind then drop to find a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = HttpCatalogClient::new(&format!("http://{addr}")).expect("client");
    let err = client
        .search(&request("Camera", 1, 9))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SearchError::Network(_)));
}

#[test]
fn rejects_an_unparseable_base_url() {
    let err = HttpCatalogClient::new("not a url").expect_err("must fail");
    assert!(matches!(err, SearchError::Network(_)));
}
