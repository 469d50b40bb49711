//! Client tests against a mock item service: wire spellings, status
//! mapping, authentication, and retry behavior.

use cardstack_kanban::{Item, ItemPatch, ItemService, Lane, Priority, ServiceError};
use cardstack_remote::{ItemsClient, RemoteConfig};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_RETRY_DELAY: Duration = Duration::from_millis(10);

fn client_for(server: &MockServer) -> ItemsClient {
    let config = RemoteConfig::new(&server.uri(), "user-1")
        .unwrap()
        .with_token("secret")
        .with_retries(3, TEST_RETRY_DELAY);
    ItemsClient::new(config)
}

fn wire_item(id: &str, task: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "userId": "user-1",
        "task": task,
        "status": status,
    })
}

#[test_log::test(tokio::test)]
async fn test_list_items_maps_wire_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("userId", "user-1"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            wire_item("a1", "First", "Planned"),
            wire_item("b2", "Second", "In-Progress"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server).list_items().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "First");
    assert_eq!(items[1].lane, Lane::InProgress);
}

#[test_log::test(tokio::test)]
async fn test_missing_token_fails_before_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = RemoteConfig::new(&server.uri(), "user-1").unwrap();
    let err = ItemsClient::new(config).list_items().await.unwrap_err();
    assert_eq!(err, ServiceError::Unauthorized);
}

#[test_log::test(tokio::test)]
async fn test_create_sends_wire_spellings() {
    let server = MockServer::start().await;
    let item = Item::new("Ship it").with_priority(Priority::NoRush);

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(body_partial_json(serde_json::json!({
            "task": "Ship it",
            "userId": "user-1",
            "status": "Planned",
            "priority": "No Rush",
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(wire_item(item.id.as_str(), "Ship it", "Planned")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server).create_item(&item).await.unwrap();
    assert_eq!(created.id, item.id);
}

#[test_log::test(tokio::test)]
async fn test_update_patches_single_item() {
    let server = MockServer::start().await;
    let item = Item::new("Card");

    Mock::given(method("PATCH"))
        .and(path(format!("/api/items/{}", item.id)))
        .and(body_partial_json(serde_json::json!({
            "status": "Completed",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(wire_item(item.id.as_str(), "Card", "Completed")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let patch = ItemPatch::new().lane(Lane::Completed);
    let updated = client_for(&server)
        .update_item(&item.id, &patch)
        .await
        .unwrap();
    assert_eq!(updated.lane, Lane::Completed);
}

#[test_log::test(tokio::test)]
async fn test_delete_item() {
    let server = MockServer::start().await;
    let item = Item::new("Card");

    Mock::given(method("DELETE"))
        .and(path(format!("/api/items/{}", item.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete_item(&item.id).await.unwrap();
}

#[test_log::test(tokio::test)]
async fn test_auth_statuses_map_to_unauthorized_without_retry() {
    for status in [401, 403] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).list_items().await.unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized, "status {status}");
    }
}

#[test_log::test(tokio::test)]
async fn test_not_found_maps_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .delete_item(&Item::new("gone").id)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::NotFound);
}

#[test_log::test(tokio::test)]
async fn test_server_errors_retry_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server).list_items().await.unwrap();
    assert!(items.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_retry_budget_exhaustion_is_transient() {
    let server = MockServer::start().await;
    // 1 initial attempt + 3 retries
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let err = client_for(&server).list_items().await.unwrap_err();
    assert!(matches!(err, ServiceError::Transient(_)));
}

#[test_log::test(tokio::test)]
async fn test_rate_limiting_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).list_items().await.unwrap();
}
