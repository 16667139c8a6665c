//! Directory lookups against a mock service.

use rollcall_core::{CredentialId, FailureCode, Outcome};
use rollcall_network::{ClientConfig, DirectoryResolver, HolderDirectory, NetworkError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIRECTORY: &str = "/api/collections/students/records";

fn resolver(server: &MockServer) -> DirectoryResolver {
    let config = ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(2),
    };
    DirectoryResolver::new(&config).unwrap()
}

fn credential() -> CredentialId {
    "04ABCDEF".parse().unwrap()
}

#[tokio::test]
async fn test_resolves_first_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .and(query_param("filter", "rfid_uid~'04ABCDEF'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "perPage": 30,
            "totalItems": 2,
            "totalPages": 1,
            "items": [
                {"id": "abc123", "name": "Ana", "surname": "Paz", "curso": "5\u{00BA} A"},
                {"id": "zzz999", "name": "Otro", "surname": "Nombre", "curso": "1 B"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let holder = resolver(&server).resolve(&credential()).await.unwrap();

    assert_eq!(holder.holder_id(), "abc123");
    assert_eq!(holder.given_name(), "Ana");
    assert_eq!(holder.family_name(), "Paz");
    assert_eq!(holder.cohort(), "5\u{00B0} A");
}

#[tokio::test]
async fn test_later_items_are_not_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalItems": 2,
            "items": [
                {"id": "a1", "name": "Ana", "surname": "Paz", "curso": "5 A"},
                {"name": "Sin", "surname": "Id", "curso": null}
            ]
        })))
        .mount(&server)
        .await;

    let holder = resolver(&server).resolve(&credential()).await.unwrap();

    assert_eq!(holder.holder_id(), "a1");
    assert_eq!(holder.given_name(), "Ana");
}

#[tokio::test]
async fn test_null_fields_read_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalItems": 1,
            "items": [{"id": "a1", "name": "Ana", "surname": null, "curso": "5 A"}]
        })))
        .mount(&server)
        .await;

    let holder = resolver(&server).resolve(&credential()).await.unwrap();

    assert_eq!(holder.holder_id(), "a1");
    assert_eq!(holder.family_name(), "");
}

#[tokio::test]
async fn test_zero_matches_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"totalItems": 0, "items": []})),
        )
        .mount(&server)
        .await;

    let err = resolver(&server).resolve(&credential()).await.unwrap_err();

    assert!(matches!(err, NetworkError::NotFound { .. }));
    assert_eq!(err.outcome(), Outcome::NotFound);
}

#[tokio::test]
async fn test_server_error_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = resolver(&server).resolve(&credential()).await.unwrap_err();

    assert_eq!(
        err.outcome(),
        Outcome::RequestFailed(FailureCode::Status(500))
    );
}

#[tokio::test]
async fn test_malformed_body_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = resolver(&server).resolve(&credential()).await.unwrap_err();

    assert!(matches!(err, NetworkError::Malformed(_)));
    assert_eq!(
        err.outcome(),
        Outcome::RequestFailed(FailureCode::MalformedResponse)
    );
}

#[tokio::test]
async fn test_count_without_items_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"totalItems": 3, "items": []})),
        )
        .mount(&server)
        .await;

    let err = resolver(&server).resolve(&credential()).await.unwrap_err();
    assert!(matches!(err, NetworkError::Malformed(_)));
}

#[tokio::test]
async fn test_each_lookup_issues_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"totalItems": 0, "items": []})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver(&server);
    let _ = resolver.resolve(&credential()).await;
    let _ = resolver.resolve(&credential()).await;
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        timeout: Duration::from_secs(2),
    };
    let err = DirectoryResolver::new(&config)
        .unwrap()
        .resolve(&credential())
        .await
        .unwrap_err();

    assert!(matches!(err, NetworkError::Transport(_)));
    assert_eq!(err.outcome(), Outcome::RequestFailed(FailureCode::Transport));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(200),
    };
    let err = DirectoryResolver::new(&config)
        .unwrap()
        .resolve(&credential())
        .await
        .unwrap_err();

    assert_eq!(err.outcome(), Outcome::RequestFailed(FailureCode::Transport));
}
