//! Wire level tests of the HTTP transport

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{basic_auth, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use marathon_client::errors::ClientError;
use marathon_client::http::client::HttpClient;
use marathon_client::http::Transport;
use marathon_client::resources::Application;

fn redis(instances: u32) -> serde_json::Value {
    json!({
        "app": {
            "id": "/infra/redis-1",
            "instances": instances,
            "cpus": 0.5,
            "mem": 256.0,
            "container": {
                "type": "DOCKER",
                "docker": { "image": "docker.io/redis-ha:5.0.5" }
            },
            "tasksRunning": 1
        }
    })
}

#[tokio::test]
async fn test_scale_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/infra/redis-1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(redis(1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v2/apps/infra/redis-1"))
        .and(query_param("force", "true"))
        .and(body_partial_json(json!({ "id": "/infra/redis-1", "instances": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deploymentId": "5ed4c0c5-9ff8-4a6f-a0cd-f57f59a34b43",
            "version": "2024-05-01T10:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport: Arc<dyn Transport> = Arc::new(HttpClient::new(&server.uri()).unwrap());
    let mut app = Application::new(transport);
    app.get("/infra/redis-1").await.unwrap().scale(2, true).await.unwrap();

    assert_eq!(app.instances(), 2);
    assert_eq!(
        app.deployment_id(),
        Some("5ed4c0c5-9ff8-4a6f-a0cd-f57f59a34b43")
    );
}

#[tokio::test]
async fn test_conflict_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/infra/redis-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(redis(1)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "App is locked by one or more deployments.",
            "deployments": [{ "id": "97c136bf-5a28-4821-9d94-480d9fbb01c8" }]
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let mut app = Application::new(Arc::new(client));
    app.get("/infra/redis-1").await.unwrap();

    let err = app.stop(false).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("locked"));
}

#[tokio::test]
async fn test_not_found_resets_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "App '/infra/missing' does not exist"
        })))
        .mount(&server)
        .await;

    let mut app = Application::new(Arc::new(HttpClient::new(&server.uri()).unwrap()));
    let err = app.get("/infra/missing").await.err().unwrap();
    assert!(matches!(err, ClientError::NotFound(ref m) if m.contains("does not exist")));
    assert_eq!(app.instances(), -1);
}

#[tokio::test]
async fn test_basic_auth_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(basic_auth("admin", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("http://admin:secret@{}", server.address());
    let client = HttpClient::new(&url).unwrap();
    assert!(!client.base_url().contains("secret"));
    client.ping().await.unwrap();
}

#[tokio::test]
async fn test_empty_body_decodes_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/deployments/abc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let value = client
        .send(marathon_client::http::Request::delete("/v2/deployments/abc"))
        .await
        .unwrap();
    assert!(value.is_null());
}
