use std::sync::Arc;

use embedding_service::{EmbeddingProvider, MockEmbedder};
use rag_manager::{DimensionSource, ManagerConfig, RagManagerError, RetrievalManager};
use rag_store::{DistanceKind, InMemoryStore, StoreError, VectorStore};
use serde_json::{Map, Value, json};

const DIM: usize = 64;

async fn manager() -> (RetrievalManager, Arc<MockEmbedder>, Arc<InMemoryStore>) {
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let store = Arc::new(InMemoryStore::new());
    let m = RetrievalManager::new(embedder.clone(), store.clone(), ManagerConfig::default()).await;
    (m, embedder, store)
}

fn map(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

#[tokio::test]
async fn dimension_is_probed_at_startup() {
    let (m, _, _) = manager().await;
    assert_eq!(m.embedding_dimension(), DIM);
    assert_eq!(m.dimension_source(), DimensionSource::Probed);
}

#[tokio::test]
async fn failed_probe_falls_back_to_default() {
    let embedder = Arc::new(MockEmbedder::new(DIM));
    embedder.set_ready(false);
    let m = RetrievalManager::new(
        embedder,
        Arc::new(InMemoryStore::new()),
        ManagerConfig::default(),
    )
    .await;
    assert_eq!(m.embedding_dimension(), 1024);
    assert_eq!(m.dimension_source(), DimensionSource::Fallback);
}

#[tokio::test]
async fn dimension_mismatch_is_advisory() {
    // Probe fails, so the manager expects 1024 while the provider later yields DIM.
    let embedder = Arc::new(MockEmbedder::new(DIM));
    embedder.set_ready(false);
    let store = Arc::new(InMemoryStore::new());
    let m = RetrievalManager::new(embedder.clone(), store.clone(), ManagerConfig::default()).await;
    embedder.set_ready(true);

    store
        .create_collection("docs", DIM, DistanceKind::Cosine)
        .await
        .unwrap();
    assert!(!m.check_dimension(&vec![0.0; DIM]));

    let added = m.add_document("hello world", "docs", None).await.unwrap();
    assert!(added.id > 0);
}

#[tokio::test]
async fn add_then_search_finds_the_document_first() {
    let (m, _, _) = manager().await;
    assert!(m.create_collection("docs").await.unwrap());

    m.add_document("the quick brown fox", "docs", None).await.unwrap();
    let added = m
        .add_document("hello world", "docs", Some(&json!({ "lang": "en" })))
        .await
        .unwrap();
    assert_eq!(added.payload["text"], "hello world");
    assert_eq!(added.payload["lang"], "en");

    let found = m.search("hello world", "docs", None).await.unwrap();
    assert_eq!(found.results[0].id, added.id);
    assert_eq!(found.results[0].payload["text"], "hello world");
    let top = found.results[0].score;
    assert!(found.results.iter().all(|h| h.score <= top));
}

#[tokio::test]
async fn example_scenario_add_search_delete() {
    let (m, _, _) = manager().await;
    m.create_collection("docs").await.unwrap();

    let added = m.add_document("hello world", "docs", None).await.unwrap();
    assert_eq!(Value::Object(added.payload.clone()), json!({ "text": "hello world" }));

    let hits = m.search("hello", "docs", Some(0.1)).await.unwrap().results;
    let hit = hits.iter().find(|h| h.id == added.id).expect("added document is found");
    assert!(hit.score >= 0.1);

    m.delete_document("docs", added.id).await.unwrap();
    let hits = m.search("hello", "docs", Some(0.1)).await.unwrap().results;
    assert!(hits.iter().all(|h| h.id != added.id));
}

#[tokio::test]
async fn default_threshold_filters_weak_matches() {
    let (m, _, _) = manager().await;
    m.create_collection("docs").await.unwrap();
    m.add_document("alpha beta gamma delta", "docs", None).await.unwrap();

    let none = m.search("zeta", "docs", None).await.unwrap();
    assert!(none.results.is_empty());
}

#[tokio::test]
async fn metadata_search_and_delete() {
    let (m, _, _) = manager().await;
    m.create_collection("docs").await.unwrap();
    let a = m
        .add_document("a", "docs", Some(&json!({ "lang": "en", "page": "1" })))
        .await
        .unwrap();
    m.add_document("b", "docs", Some(&json!({ "lang": "de", "page": "1" })))
        .await
        .unwrap();

    let en = m
        .search_by_metadata("docs", &map(json!({ "lang": "en", "page": 1 })))
        .await
        .unwrap();
    assert_eq!(en.results.len(), 1);
    assert_eq!(en.results[0].id, a.id);

    let page1 = m
        .search_by_metadata("docs", &map(json!({ "page": "1", "lang": null })))
        .await
        .unwrap();
    assert_eq!(page1.results.len(), 2);

    m.delete_document("docs", a.id).await.unwrap();
    let en = m
        .search_by_metadata("docs", &map(json!({ "lang": "en" })))
        .await
        .unwrap();
    assert!(en.results.is_empty());
}

#[tokio::test]
async fn empty_or_null_filters_return_empty_list() {
    let (m, _, _) = manager().await;
    m.create_collection("docs").await.unwrap();
    m.add_document("a", "docs", None).await.unwrap();

    for filters in [json!({}), json!({ "lang": null, "x": "" })] {
        let out = m.search_by_metadata("docs", &map(filters)).await.unwrap();
        assert!(out.results.is_empty());
    }
}

#[tokio::test]
async fn metadata_search_on_missing_collection_is_empty() {
    let (m, _, _) = manager().await;
    let out = m
        .search_by_metadata("missing", &map(json!({ "lang": "en" })))
        .await
        .unwrap();
    assert!(out.results.is_empty());
}

#[tokio::test]
async fn batch_add_uses_one_provider_call() {
    let (m, embedder, _) = manager().await;
    m.create_collection("docs").await.unwrap();
    let before = embedder.calls();

    let docs = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let metas = vec![json!({ "n": 1 }), json!({ "n": 2 })];
    let out = m
        .batch_add_documents(&docs, Some(&metas), "docs")
        .await
        .unwrap();

    assert_eq!(embedder.calls(), before + 1);
    assert_eq!(out.count, 3);
    assert_eq!(out.ids.len(), 3);
    assert_eq!(out.status, "success");
    assert!(out.operation_id.is_some());

    let two = m
        .search_by_metadata("docs", &map(json!({ "n": 2 })))
        .await
        .unwrap();
    assert_eq!(two.results[0].payload["text"], "two");
    assert_eq!(m.collection_info("docs").await.unwrap().point_count, 3);
}

#[tokio::test]
async fn empty_batch_skips_provider() {
    let (m, embedder, _) = manager().await;
    let before = embedder.calls();
    let out = m.batch_add_documents(&[], None, "docs").await.unwrap();
    assert_eq!(out.count, 0);
    assert_eq!(embedder.calls(), before);
}

#[tokio::test]
async fn provider_failures_surface_unchanged() {
    let (m, embedder, _) = manager().await;
    m.create_collection("docs").await.unwrap();
    embedder.set_ready(false);

    let err = m.add_document("x", "docs", None).await.unwrap_err();
    assert!(err.is_provider());
    assert!(matches!(err, RagManagerError::Embedding(_)));

    embedder.set_ready(true);
    let err = m.add_document("x", "nope", None).await.unwrap_err();
    assert!(matches!(err, RagManagerError::Store(StoreError::CollectionNotFound(_))));
}

#[tokio::test]
async fn collection_lifecycle() {
    let (m, _, _) = manager().await;
    assert!(m.create_collection("a").await.unwrap());
    assert!(!m.create_collection("a").await.unwrap());
    m.create_collection("b").await.unwrap();
    assert_eq!(m.list_collections().await.unwrap(), vec!["a", "b"]);

    let info = m.collection_info("a").await.unwrap();
    assert_eq!(info.vector_size, Some(DIM as u64));
    assert_eq!(info.point_count, 0);

    assert!(m.delete_collection("a").await.unwrap());
    assert!(!m.delete_collection("a").await.unwrap());
    assert!(!m.collection_exists("a").await.unwrap());
}

#[tokio::test]
async fn embedding_dimension_is_stable() {
    let (_, embedder, _) = manager().await;
    let a = embedder.embed("some text").await.unwrap();
    let b = embedder.embed("some text").await.unwrap();
    assert_eq!(a.len(), b.len());
}

#[tokio::test]
async fn health_reports_both_adapters() {
    let (m, embedder, _) = manager().await;
    let h = m.health().await;
    assert!(h.ok);
    assert_eq!(h.embedding_dimension, DIM);

    embedder.set_ready(false);
    let h = m.health().await;
    assert!(!h.ok);
    assert!(!h.embedding.ok);
    assert!(h.store.ok);
}
