// Contract tests for the store client against a wiremock double of the
// vector-store product API.

use entities::{Entity, EntityKind};
use serde_json::json;
use store::{SearchOptions, StoreClient, StoreConfig, StoreError};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StoreClient {
    StoreClient::new(StoreConfig::new(server.uri())).unwrap()
}

fn bare_entity(id: &str, title: &str) -> Entity {
    Entity {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        created_at: None,
        updated_at: None,
        extra: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn upsert_stamps_timestamps_and_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product"))
        .and(body_partial_json(json!({
            "index": "assistant_tasks",
            "entity_type": "task",
            "id": "tsk_1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stored = client
        .upsert(EntityKind::Task, bare_entity("tsk_1", "Call landlord"))
        .await
        .unwrap();

    assert!(stored.created_at.is_some());
    assert_eq!(stored.created_at, stored.updated_at);
    assert_eq!(stored.extra.get("entity_type"), Some(&json!("task")));
}

#[tokio::test]
async fn upsert_keeps_existing_created_at() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let mut entity = bare_entity("mem_1", "Wifi password");
    entity.created_at = Some("2025-11-02T10:00:00+00:00".to_string());

    let client = client_for(&server);
    let stored = client.upsert(EntityKind::Memory, entity).await.unwrap();

    assert_eq!(
        stored.created_at.as_deref(),
        Some("2025-11-02T10:00:00+00:00")
    );
    assert_ne!(stored.updated_at, stored.created_at);
}

#[tokio::test]
async fn upsert_surfaces_status_and_body_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index locked"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .upsert(EntityKind::Task, bare_entity("tsk_1", "x"))
        .await
        .unwrap_err();

    match err {
        StoreError::Write { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "index locked");
        }
        other => panic!("expected write error, got {other}"),
    }
}

#[tokio::test]
async fn get_maps_store_404_to_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let fetched = client.get(EntityKind::Task, "tsk_missing").await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
async fn get_scopes_the_lookup_to_the_kind_namespace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(query_param("index", "assistant_events"))
        .and(query_param("id", "evt_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt_1",
            "title": "Standup",
            "start_time": "2026-02-01T09:00:00+00:00",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let fetched = client.get(EntityKind::Event, "evt_1").await.unwrap().unwrap();

    assert_eq!(fetched.title, "Standup");
    assert_eq!(
        fetched.extra.get("start_time"),
        Some(&json!("2026-02-01T09:00:00+00:00"))
    );
}

#[tokio::test]
async fn get_propagates_non_404_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get(EntityKind::Task, "tsk_1").await.unwrap_err();
    assert!(matches!(err, StoreError::Read { status: 502, .. }));
}

#[tokio::test]
async fn get_many_skips_network_for_empty_input() {
    // no mocks mounted: any request would come back unmatched
    let server = MockServer::start().await;
    let client = client_for(&server);

    let fetched = client.get_many(EntityKind::Task, &[]).await.unwrap();
    assert!(fetched.is_empty());
}

#[tokio::test]
async fn get_many_accepts_single_object_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(query_param("id", "tsk_1,tsk_2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "tsk_1", "title": "only" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids = vec!["tsk_1".to_string(), "tsk_2".to_string()];
    let fetched = client.get_many(EntityKind::Task, &ids).await.unwrap();

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, "tsk_1");
}

#[tokio::test]
async fn delete_sends_namespace_and_ids() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/product"))
        .and(body_partial_json(json!({
            "index": "assistant_places",
            "ids": ["plc_1"],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .delete(EntityKind::Place, &["plc_1".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_tolerates_absent_ids() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .delete(EntityKind::Task, &["tsk_gone".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn search_lowercases_the_query_and_pins_the_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "index": "assistant_memories",
            "query": "rust book",
            "filters": { "entity_type": "memory" },
            "type": "hybrid",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "mem_1", "title": "Rust book notes", "_score": 0.7 }],
            "total": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .search(EntityKind::Memory, &SearchOptions::new("Rust BOOK"))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].score, Some(0.7));
}

#[tokio::test]
async fn search_merges_caller_filters_with_the_kind_pin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "filters": { "category": "idea", "entity_type": "memory" },
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": [], "total": 0 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = SearchOptions::new("startup")
        .with_filters([("category".to_string(), json!("idea"))].into());
    let page = client.search(EntityKind::Memory, &options).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn search_surfaces_failures_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("shard down"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .search(EntityKind::Task, &SearchOptions::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Search { status: 500, .. }));
}

#[tokio::test]
async fn stats_defaults_when_namespace_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/assistant_things"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stats = client.stats(EntityKind::Thing).await.unwrap();
    assert_eq!(stats.total, 0);
    assert!(!stats.has_data);
}

#[tokio::test]
async fn stats_decodes_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/assistant_tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_products": 12,
            "has_data": true,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stats = client.stats(EntityKind::Task).await.unwrap();
    assert_eq!(stats.total, 12);
    assert!(stats.has_data);
}

#[tokio::test]
async fn bearer_token_rides_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("Authorization", "Bearer secret-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "tsk_1", "title": "x" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client =
        StoreClient::new(StoreConfig::new(server.uri()).with_api_key("secret-key")).unwrap();
    let fetched = client.get(EntityKind::Task, "tsk_1").await.unwrap();
    assert!(fetched.is_some());
}
