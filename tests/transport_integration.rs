//! Integration tests for the errata web-service client using wiremock

use esgissue::errors::IssueError;
use esgissue::transport::{Credentials, WsClient};
use serde_json::{Map, Value, json};
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_credentials() -> Credentials {
    Credentials {
        username: "errata-client-user".to_string(),
        token: "test-token".to_string(),
    }
}

fn sample_payload() -> Map<String, Value> {
    let Value::Object(map) = json!({
        "title": "Wrong pressure coordinate",
        "project": "cmip6",
        "severity": "medium",
        "datasets": ["cmip6.historical.model-a#20200101"]
    }) else {
        unreachable!("literal is an object");
    };
    map
}

#[tokio::test]
async fn heartbeat_succeeds_against_a_live_service() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    client.heartbeat().await.unwrap();
}

#[tokio::test]
async fn heartbeat_reports_a_down_service() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    let err = client.heartbeat().await.unwrap_err();
    match err {
        IssueError::ServerDown { detail } => assert!(detail.contains("503")),
        other => panic!("expected ServerDown, got {other:?}"),
    }
}

#[tokio::test]
async fn heartbeat_reports_an_unreachable_service() {
    // Port 1 is never listening.
    let client = WsClient::new("http://127.0.0.1:1/").unwrap();
    let err = client.heartbeat().await.unwrap_err();
    assert!(matches!(err, IssueError::ServerDown { .. }));
    assert_eq!(err.exit_code(), 22);
}

#[tokio::test]
async fn create_posts_the_payload_with_basic_auth() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/issue/create"))
        .and(basic_auth("errata-client-user", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uid": "ab12-cd34"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    let response = client.create(&sample_payload(), &test_credentials()).await.unwrap();
    assert_eq!(response["uid"], json!("ab12-cd34"));
}

#[tokio::test]
async fn rejected_credentials_surface_as_authentication_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/issue/create"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    let err = client.create(&sample_payload(), &test_credentials()).await.unwrap_err();
    match err {
        IssueError::Authentication { status } => {
            assert_eq!(status, 401);
            assert_eq!(err.exit_code(), 20);
        }
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn forbidden_update_surfaces_as_authorization_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/issue/update"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    let err = client.update(&sample_payload(), &test_credentials()).await.unwrap_err();
    assert!(matches!(err, IssueError::Authorization { status: 403 }));
}

#[tokio::test]
async fn other_failures_carry_the_http_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/issue/create"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    let err = client.create(&sample_payload(), &test_credentials()).await.unwrap_err();
    assert!(matches!(err, IssueError::WsRequestFailed { status: 500 }));
}

#[tokio::test]
async fn close_sends_uid_and_status_as_query_parameters() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/issue/close"))
        .and(query_param("uid", "ab12-cd34"))
        .and(query_param("status", "resolved"))
        .and(basic_auth("errata-client-user", "test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    client.close("ab12-cd34", "resolved", &test_credentials()).await.unwrap();
}

#[tokio::test]
async fn retrieve_returns_the_issue_document() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/issue/retrieve"))
        .and(query_param("uid", "ab12-cd34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "ab12-cd34",
            "title": "Wrong pressure coordinate",
            "datasets": ["cmip6.historical.model-a#20200101"]
        })))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    let value = client.retrieve("ab12-cd34").await.unwrap();
    assert_eq!(value["title"], json!("Wrong pressure coordinate"));
}

#[tokio::test]
async fn credtest_distinguishes_accepted_and_refused() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/issue/credtest"))
        .and(query_param("team", "errata"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    assert!(client.credtest(&test_credentials(), "errata").await.unwrap());

    let refused_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/issue/credtest"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&refused_server)
        .await;

    let client = WsClient::new(&refused_server.uri()).unwrap();
    assert!(!client.credtest(&test_credentials(), "errata").await.unwrap());
}

#[tokio::test]
async fn credtest_lowercases_the_team_name() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/issue/credtest"))
        .and(query_param("team", "errata"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WsClient::new(&mock_server.uri()).unwrap();
    assert!(client.credtest(&test_credentials(), "ERRATA").await.unwrap());
}
