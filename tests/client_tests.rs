//! Integration tests for connecting to a Resolwe server.
//!
//! These tests verify the login handshake, the headers attached to later
//! requests, connection failures and the per-connection process cache.

use resolwe_sdk::{Password, Resolwe, ResolweConfig, RestError, ServerUrl, Username};
use serde_json::json;
use wiremock::matchers::{header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ResolweConfig {
    ResolweConfig::builder()
        .url(ServerUrl::new(server.uri()).unwrap())
        .build()
        .unwrap()
}

fn authenticated_config_for(server: &MockServer) -> ResolweConfig {
    ResolweConfig::builder()
        .url(ServerUrl::new(server.uri()).unwrap())
        .credentials(
            Username::new("admin").unwrap(),
            Password::new("secret").unwrap(),
        )
        .user_agent_prefix("pipeline-runner/2.0")
        .build()
        .unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rest-auth/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "csrftoken=csrf-abc; Path=/")
                .append_header("Set-Cookie", "sessionid=sess-123; HttpOnly; Path=/")
                .set_body_json(json!({"key": "ignored"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_attaches_session_to_later_requests() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/collection/"))
        .and(header("X-CSRFToken", "csrf-abc"))
        .and(header("Cookie", "sessionid=sess-123; csrftoken=csrf-abc"))
        .and(header("Referer", server.uri().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Mine"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Resolwe::connect(authenticated_config_for(&server))
        .await
        .unwrap();
    let collections = client.collection().into_vec().await.unwrap();

    assert_eq!(collections.len(), 1);
    let session = client.session().unwrap();
    assert_eq!(session.session_id(), "sess-123");
    assert_eq!(session.csrf_token(), "csrf-abc");
}

#[tokio::test]
async fn test_user_agent_carries_prefix_and_sdk_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest-auth/login/"))
        .and(header_regex(
            "User-Agent",
            r"^pipeline-runner/2\.0 \| Resolwe SDK for Rust v\d+\.\d+\.\d+",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "csrftoken=csrf-abc; Path=/")
                .append_header("Set-Cookie", "sessionid=sess-123; HttpOnly; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Resolwe::connect(authenticated_config_for(&server))
        .await
        .unwrap();

    assert!(client.config().credentials().is_some());
}

#[tokio::test]
async fn test_rejected_credentials_fail_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest-auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })))
        .mount(&server)
        .await;

    let result = Resolwe::connect(authenticated_config_for(&server)).await;

    match result {
        Err(RestError::AuthenticationFailed { reason }) => {
            assert!(reason.contains("Invalid credentials?"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_fails_connect() {
    let config = ResolweConfig::builder()
        .url(ServerUrl::new("http://127.0.0.1:1").unwrap())
        .build()
        .unwrap();

    assert!(matches!(
        Resolwe::connect(config).await,
        Err(RestError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn test_anonymous_connect_probes_api_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "/api/data"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Resolwe::connect(config_for(&server)).await.unwrap();

    assert!(client.session().is_none());
}

// ============================================================================
// Process Cache Tests
// ============================================================================

#[tokio::test]
async fn test_latest_process_is_cached_until_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/process/"))
        .and(query_param("slug", "alignment-star"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "slug": "alignment-star", "version": "1.2.0"},
            {"id": 8, "slug": "alignment-star", "version": "1.10.0"},
        ])))
        .expect(2)
        .mount(&server)
        .await;
    let client = Resolwe::connect(config_for(&server)).await.unwrap();

    let first = client.latest_process("alignment-star").await.unwrap();
    let second = client.latest_process("alignment-star").await.unwrap();
    assert_eq!(first.id, Some(8));
    assert_eq!(second.id, Some(8));

    client.clear_cache();
    let third = client.latest_process("alignment-star").await.unwrap();
    assert_eq!(third.id, Some(8));
}

#[tokio::test]
async fn test_two_connections_do_not_share_process_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/process/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "slug": "upload-fastq-single", "version": 1}])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let one = Resolwe::connect(config_for(&server)).await.unwrap();
    let two = Resolwe::connect(config_for(&server)).await.unwrap();

    one.latest_process("upload-fastq-single").await.unwrap();
    two.latest_process("upload-fastq-single").await.unwrap();
}
