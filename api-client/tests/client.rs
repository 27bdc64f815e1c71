//! Integration tests for `ApiClient` against a mock HTTP server.
//!
//! Covers the public request paths end to end:
//! - status code boundaries and the errors they map to
//! - token injection
//! - JSON decoding success and failure
//! - multipart uploads with progress reporting

use std::sync::{Arc, Mutex};

use api_client::{
    ApiClient, ApiClientError, Endpoint, HttpMethod, MultipartFormData, UploadProgress,
    YamlDecoder,
};
use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, PartialEq, Deserialize, Serialize)]
struct User {
    id: u64,
    name: String,
}

fn get(server: &MockServer, route: &str) -> Endpoint {
    Endpoint::builder()
        .base_url(server.uri())
        .path(route)
        .method(HttpMethod::Get)
        .build()
}

async fn respond_with_status(status: u16) -> (MockServer, Endpoint) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    let endpoint = get(&server, "/status");
    (server, endpoint)
}

#[tokio::test]
async fn test_request_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 1,
            name: "John".to_string(),
        }))
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    let endpoint = Endpoint::builder()
        .base_url(server.uri())
        .api_version("/v1")
        .path("/users")
        .query_param("id", 1)
        .method(HttpMethod::Get)
        .build();

    let user: User = client.request(&endpoint).await.unwrap();
    assert_eq!(
        user,
        User {
            id: 1,
            name: "John".to_string()
        }
    );
}

#[tokio::test]
async fn test_status_200_and_299_succeed() {
    let client = ApiClient::new().unwrap();
    for status in [200, 299] {
        let (_server, endpoint) = respond_with_status(status).await;
        client.request_void(&endpoint).await.unwrap();
    }
}

#[tokio::test]
async fn test_status_300_fails() {
    let client = ApiClient::new().unwrap();
    let (_server, endpoint) = respond_with_status(300).await;

    let err = client.request_void(&endpoint).await.unwrap_err();
    assert!(matches!(err, ApiClientError::StatusCode(300)));
}

#[tokio::test]
async fn test_status_404_fails_even_with_valid_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(User {
            id: 9,
            name: "Ghost".to_string(),
        }))
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    let err = client
        .request::<User>(&get(&server, "/users/9"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiClientError::StatusCode(404)));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_token_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::builder().token("abc123").build().unwrap();
    client.request_void(&get(&server, "/me")).await.unwrap();
}

#[tokio::test]
async fn test_no_token_means_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    client.request_void(&get(&server, "/me")).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_decoding_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"one"}"#))
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    let err = client
        .request::<User>(&get(&server, "/users/1"))
        .await
        .unwrap_err();

    match err {
        ApiClientError::DecodingFailed(decode) => assert!(decode.is_type_mismatch()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_yaml_decoder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id: 2\nname: Ada\n"))
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    let user: User = client
        .request_with_decoder(&get(&server, "/users/2"), &YamlDecoder)
        .await
        .unwrap();
    assert_eq!(user.name, "Ada");
}

#[tokio::test]
async fn test_json_body_is_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"id":5,"name":"Linus"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    let endpoint = Endpoint::builder()
        .base_url(server.uri())
        .path("/users")
        .method(HttpMethod::Post)
        .json_body(&User {
            id: 5,
            name: "Linus".to_string(),
        })
        .unwrap()
        .build();

    let body = client.request_data(&endpoint).await.unwrap();
    assert_eq!(&body[..], b"created");
}

#[tokio::test]
async fn test_invalid_url() {
    let client = ApiClient::new().unwrap();
    let endpoint = Endpoint::builder()
        .base_url("invalid-url")
        .method(HttpMethod::Get)
        .build();

    let err = client.request_void(&endpoint).await.unwrap_err();
    assert!(matches!(err, ApiClientError::InvalidUrl));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new().unwrap();
    let endpoint = Endpoint::builder()
        .base_url(format!("http://{addr}"))
        .path("/anything")
        .method(HttpMethod::Get)
        .build();

    let err = client.request_void(&endpoint).await.unwrap_err();
    assert!(err.is_network(), "expected a network error, got {err:?}");
}

#[tokio::test]
async fn test_upload_progress_reaches_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("content-type", "multipart/form-data; boundary=XyZ"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stored":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let form = MultipartFormData::new("XyZ", vec![42u8; 100 * 1024], "photo.jpg", "image/jpeg")
        .parameter("album", "holiday");
    let endpoint = Endpoint::builder()
        .base_url(server.uri())
        .path("/upload")
        .method(HttpMethod::Post)
        .multipart(&form)
        .build();

    let fractions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fractions);
    let progress = Arc::new(UploadProgress::new(move |fraction| {
        sink.lock().unwrap().push(fraction)
    }));

    let client = ApiClient::new().unwrap();
    let body = client
        .request_with_progress(&endpoint, Some(progress))
        .await
        .unwrap();
    assert_eq!(body.as_deref(), Some(&br#"{"stored":true}"#[..]));

    let fractions = fractions.lock().unwrap();
    assert!(fractions.len() > 1);
    assert!(fractions.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(fractions.last().copied(), Some(1.0));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, form.as_http_body().to_vec());
}

#[tokio::test]
async fn test_upload_progress_survives_temporary_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/new"))
        .and(body_string("report"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let endpoint = Endpoint::builder()
        .base_url(server.uri())
        .path("/old")
        .method(HttpMethod::Post)
        .body("report")
        .build();
    let client = ApiClient::new().unwrap();

    let plain = client.request_with_progress(&endpoint, None).await.unwrap();

    let fractions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fractions);
    let progress = Arc::new(UploadProgress::new(move |fraction| {
        sink.lock().unwrap().push(fraction)
    }));
    let observed = client
        .request_with_progress(&endpoint, Some(progress))
        .await
        .unwrap();

    assert_eq!(plain.as_deref(), Some(&b"ok"[..]));
    assert_eq!(observed, plain);
    assert_eq!(fractions.lock().unwrap().last().copied(), Some(1.0));
}

#[tokio::test]
async fn test_progress_with_empty_response_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let endpoint = Endpoint::builder()
        .base_url(server.uri())
        .path("/blob")
        .method(HttpMethod::Put)
        .body("tiny")
        .build();

    let client = ApiClient::new().unwrap();
    let body = client.request_with_progress(&endpoint, None).await.unwrap();
    assert_eq!(body, None);
}
