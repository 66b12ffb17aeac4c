use std::sync::Arc;

use embedding_service::MockEmbedder;
use function_executor::{DispatchError, FunctionExecutor};
use rag_manager::{ManagerConfig, RetrievalManager};
use rag_store::InMemoryStore;
use serde_json::{Map, Value, json};

const DIM: usize = 32;

async fn executor() -> (FunctionExecutor, Arc<MockEmbedder>) {
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let store = Arc::new(InMemoryStore::new());
    let manager =
        RetrievalManager::new(embedder.clone(), store, ManagerConfig::default()).await;
    (FunctionExecutor::new(Arc::new(manager)), embedder)
}

fn params(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

async fn create(ex: &FunctionExecutor, name: &str) {
    ex.execute("create_collection", &params(json!({ "collection_name": name })))
        .await
        .unwrap();
}

fn parameter_message(e: DispatchError) -> String {
    match e {
        DispatchError::Parameter(m) => m,
        other => panic!("expected parameter error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_twice_is_a_collection_state_error() {
    let (ex, _) = executor().await;
    let p = params(json!({ "collection_name": "docs" }));

    let first = ex.execute("create_collection", &p).await.unwrap();
    assert_eq!(first, Some(json!({ "creation_result": "docs" })));

    let err = ex.execute("create_collection", &p).await.unwrap_err();
    assert!(matches!(err, DispatchError::CollectionState(_)));
    assert_eq!(err.to_string(), "Collection 'docs' already exists");
}

#[tokio::test]
async fn deleting_a_missing_collection_fails() {
    let (ex, _) = executor().await;
    let err = ex
        .execute("delete_collection", &params(json!({ "collection_name": "missing" })))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::CollectionState(_)));
    assert_eq!(err.to_string(), "Collection 'missing' doesn't exist");
}

#[tokio::test]
async fn unknown_function_is_rejected() {
    let (ex, _) = executor().await;
    let err = ex.execute("unknown_fn", &Map::new()).await.unwrap_err();
    assert!(matches!(err, DispatchError::UnknownFunction(_)));
    assert_eq!(err.code(), "UNKNOWN_FUNCTION");
    assert_eq!(err.to_string(), "Unknown function: unknown_fn");
}

#[tokio::test]
async fn add_search_delete_scenario() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;

    let added = ex
        .execute(
            "add_to_database",
            &params(json!({ "text": "hello world", "collection_name": "docs" })),
        )
        .await
        .unwrap()
        .unwrap();
    let id = added["addition_result"]["id"].as_u64().unwrap();
    assert_eq!(added["addition_result"]["payload"], json!({ "text": "hello world" }));

    let search = params(json!({ "query": "hello", "collection_name": "docs", "threshold": 0.1 }));
    let found = ex.execute("search_documents", &search).await.unwrap().unwrap();
    let hits = found["search_result"].as_array().unwrap();
    let hit = hits.iter().find(|h| h["id"] == id).unwrap();
    assert!(hit["score"].as_f64().unwrap() >= 0.1);

    let deleted = ex
        .execute("delete_by_id", &params(json!({ "id": id, "collection_name": "docs" })))
        .await
        .unwrap();
    assert_eq!(deleted, None);

    let found = ex.execute("search_documents", &search).await.unwrap().unwrap();
    assert!(found["search_result"].as_array().unwrap().iter().all(|h| h["id"] != id));
}

#[tokio::test]
async fn metadata_search_with_empty_or_null_filters_is_empty() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;
    ex.execute(
        "add_to_database",
        &params(json!({ "text": "a", "collection_name": "docs", "metadata": { "lang": "en" } })),
    )
    .await
    .unwrap();

    for filters in [json!({}), json!({ "lang": null }), json!({ "lang": "" })] {
        let out = ex
            .execute(
                "search_by_metadata",
                &params(json!({ "collection_name": "docs", "metadata_filters": filters })),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out, json!({ "search_result": [] }));
    }
}

#[tokio::test]
async fn metadata_search_matches_all_constraints() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;
    for (text, lang, page) in [("a", "en", "1"), ("b", "en", "2"), ("c", "de", "1")] {
        ex.execute(
            "add_to_database",
            &params(json!({
                "text": text,
                "collection_name": "docs",
                "metadata": { "lang": lang, "page": page }
            })),
        )
        .await
        .unwrap();
    }

    let out = ex
        .execute(
            "search_by_metadata",
            &params(json!({
                "collection_name": "docs",
                "metadata_filters": { "lang": "en", "page": 1 }
            })),
        )
        .await
        .unwrap()
        .unwrap();
    let hits = out["search_result"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["payload"]["text"], "a");
}

#[tokio::test]
async fn metadata_search_ignores_numeric_payload_fields() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;
    ex.execute(
        "add_to_database",
        &params(json!({ "text": "a", "collection_name": "docs", "metadata": { "page": 1 } })),
    )
    .await
    .unwrap();

    let out = ex
        .execute(
            "search_by_metadata",
            &params(json!({ "collection_name": "docs", "metadata_filters": { "page": 1 } })),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(out, json!({ "search_result": [] }));
}

#[tokio::test]
async fn legacy_alias_routes_to_metadata_search() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;
    ex.execute(
        "add_to_database",
        &params(json!({ "text": "a", "collection_name": "docs", "metadata": { "k": "v" } })),
    )
    .await
    .unwrap();

    let out = ex
        .execute(
            "search_by_payload",
            &params(json!({ "collection_name": "docs", "params": { "k": "v" } })),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(out["search_result"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn legacy_delete_params_are_accepted() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;
    let added = ex
        .execute("add_to_database", &params(json!({ "text": "a", "collection_name": "docs" })))
        .await
        .unwrap()
        .unwrap();
    let id = added["addition_result"]["id"].clone();

    ex.execute(
        "delete_by_id",
        &params(json!({ "params": { "id": id }, "collection_name": "docs" })),
    )
    .await
    .unwrap();

    let info = ex
        .execute("collection_info", &params(json!({ "collection_name": "docs" })))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info["collection_info"]["point_count"], 0);
}

#[tokio::test]
async fn parameter_errors_name_the_field() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;

    let cases = [
        ("add_to_database", json!({ "collection_name": "docs" }), "text"),
        ("add_to_database", json!({ "text": "x" }), "collection_name"),
        ("search_documents", json!({ "query": "", "collection_name": "docs" }), "query"),
        ("search_by_metadata", json!({ "collection_name": "docs" }), "metadata_filters"),
        ("delete_by_id", json!({ "collection_name": "docs" }), "id"),
        ("create_collection", json!({}), "collection_name"),
        ("batch_add_to_database", json!({ "collection_name": "docs" }), "documents"),
    ];
    for (function, p, field) in cases {
        let err = ex.execute(function, &params(p)).await.unwrap_err();
        assert_eq!(err.code(), "PARAMETER_ERROR");
        assert_eq!(
            parameter_message(err),
            format!("Parameter '{field}' is required"),
            "{function}"
        );
    }
}

#[tokio::test]
async fn operations_on_missing_collections_fail_before_the_provider() {
    let (ex, embedder) = executor().await;
    let before = embedder.calls();

    for (function, p) in [
        ("add_to_database", json!({ "text": "x", "collection_name": "nope" })),
        ("search_documents", json!({ "query": "x", "collection_name": "nope" })),
        ("collection_info", json!({ "collection_name": "nope" })),
        ("delete_by_id", json!({ "id": 1, "collection_name": "nope" })),
    ] {
        let err = ex.execute(function, &params(p)).await.unwrap_err();
        assert!(matches!(err, DispatchError::CollectionState(_)), "{function}");
    }
    assert_eq!(embedder.calls(), before);
}

#[tokio::test]
async fn batch_add_reports_count_and_ids() {
    let (ex, _) = executor().await;
    create(&ex, "docs").await;

    let out = ex
        .execute(
            "batch_add_to_database",
            &params(json!({
                "documents": ["one", "two", "three"],
                "metadatas": [{ "n": 1 }, { "n": 2 }],
                "collection_name": "docs"
            })),
        )
        .await
        .unwrap()
        .unwrap();
    let batch = &out["batch_result"];
    assert_eq!(batch["status"], "success");
    assert_eq!(batch["count"], 3);
    assert_eq!(batch["ids"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn collection_lifecycle_through_dispatch() {
    let (ex, _) = executor().await;
    create(&ex, "a").await;
    create(&ex, "b").await;

    let listed = ex.execute("collections_list", &Map::new()).await.unwrap().unwrap();
    let mut names: Vec<_> = listed["collections_list"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b"]);

    let info = ex
        .execute("collection_info", &params(json!({ "collection_name": "a" })))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info["collection_info"]["id"], "a");
    assert_eq!(info["collection_info"]["vector_size"], DIM);

    let gone = ex
        .execute("delete_collection", &params(json!({ "collection_name": "a" })))
        .await
        .unwrap();
    assert_eq!(gone, None);
}

#[tokio::test]
async fn provider_failures_are_not_caller_errors() {
    let (ex, embedder) = executor().await;
    create(&ex, "docs").await;
    embedder.set_ready(false);

    let err = ex
        .execute(
            "search_documents",
            &params(json!({ "query": "x", "collection_name": "docs" })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Provider(_)));
    assert!(!err.is_caller_error());
}

#[tokio::test]
async fn concurrent_creates_admit_exactly_one() {
    let (ex, _) = executor().await;
    let ex = Arc::new(ex);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let ex = ex.clone();
            tokio::spawn(async move {
                ex.execute("create_collection", &params(json!({ "collection_name": "race" })))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for t in tasks {
        match t.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, DispatchError::CollectionState(_))),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn catalog_is_stable_and_complete() {
    let (ex, _) = executor().await;
    let first = serde_json::to_value(ex.catalog()).unwrap();
    let second = serde_json::to_value(ex.catalog()).unwrap();
    assert_eq!(first, second);

    let functions = first[0]["functions"].as_object().unwrap();
    assert_eq!(functions.len(), 9);
    assert!(functions.contains_key("search_by_metadata"));
    assert!(!functions.contains_key("search_by_payload"));
}
