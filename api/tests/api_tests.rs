use std::sync::Arc;

use api::{AppState, build_router};
use embedding_service::MockEmbedder;
use function_executor::FunctionExecutor;
use rag_manager::{ManagerConfig, RetrievalManager};
use rag_store::InMemoryStore;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn spawn_app() -> (String, Arc<MockEmbedder>) {
    let embedder = Arc::new(MockEmbedder::new(16));
    let manager = RetrievalManager::new(
        embedder.clone(),
        Arc::new(InMemoryStore::new()),
        ManagerConfig::default(),
    )
    .await;
    let state = Arc::new(AppState::new(Arc::new(FunctionExecutor::new(Arc::new(
        manager,
    )))));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    (format!("http://{addr}"), embedder)
}

async fn call(client: &Client, base: &str, function: &str, parameters: Value) -> reqwest::Response {
    client
        .post(format!("{base}/functions/{function}"))
        .json(&json!({ "parameters": parameters }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn catalog_lists_every_function() {
    let (base, _) = spawn_app().await;
    let resp = reqwest::get(format!("{base}/functions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body[0]["id"], "rag");
    let functions = body[0]["functions"].as_object().unwrap();
    assert!(functions.contains_key("add_to_database"));
    assert!(functions.contains_key("collection_info"));
}

#[tokio::test]
async fn create_add_search_over_http() {
    let (base, _) = spawn_app().await;
    let client = Client::new();

    let resp = call(&client, &base, "create_collection", json!({ "collection_name": "docs" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "creation_result": "docs" }));

    let resp = call(
        &client,
        &base,
        "add_to_database",
        json!({ "text": "hello world", "collection_name": "docs" }),
    )
    .await;
    let added: Value = resp.json().await.unwrap();
    let id = added["addition_result"]["id"].as_u64().unwrap();

    let resp = call(
        &client,
        &base,
        "search_documents",
        json!({ "query": "hello", "collection_name": "docs", "threshold": 0.1 }),
    )
    .await;
    let found: Value = resp.json().await.unwrap();
    assert_eq!(found["search_result"][0]["id"], id);
}

#[tokio::test]
async fn functions_without_outputs_answer_null() {
    let (base, _) = spawn_app().await;
    let client = Client::new();
    call(&client, &base, "create_collection", json!({ "collection_name": "tmp" })).await;

    let resp = call(&client, &base, "delete_collection", json!({ "collection_name": "tmp" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn caller_errors_map_to_400_with_code() {
    let (base, _) = spawn_app().await;
    let client = Client::new();

    let resp = call(&client, &base, "unknown_fn", json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "UNKNOWN_FUNCTION");
    assert_eq!(body["message"], "Unknown function: unknown_fn");

    let resp = call(&client, &base, "delete_collection", json!({ "collection_name": "missing" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "COLLECTION_STATE_ERROR");

    let resp = call(&client, &base, "create_collection", json!({})).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "PARAMETER_ERROR");
    assert_eq!(body["message"], "Parameter 'collection_name' is required");
}

#[tokio::test]
async fn provider_failure_maps_to_500() {
    let (base, embedder) = spawn_app().await;
    let client = Client::new();
    call(&client, &base, "create_collection", json!({ "collection_name": "docs" })).await;
    embedder.set_ready(false);

    let resp = call(
        &client,
        &base,
        "add_to_database",
        json!({ "text": "x", "collection_name": "docs" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "PROVIDER_ERROR");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (base, _) = spawn_app().await;
    let resp = Client::new()
        .post(format!("{base}/functions/collections_list"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn request_id_is_echoed_or_assigned() {
    let (base, _) = spawn_app().await;
    let client = Client::new();

    let resp = client
        .get(format!("{base}/functions"))
        .header("X-Request-Id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "abc-123");

    let resp = client.get(format!("{base}/functions")).send().await.unwrap();
    let assigned = resp.headers()["x-request-id"].to_str().unwrap();
    assert!(assigned.starts_with("req-"));
}

#[tokio::test]
async fn health_reflects_provider_state() {
    let (base, embedder) = spawn_app().await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["embedding_dimension"], 16);

    embedder.set_ready(false);
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (base, _) = spawn_app().await;
    let resp = reqwest::get(format!("{base}/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
