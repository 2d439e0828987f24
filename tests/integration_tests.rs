//! Integration tests using wiremock to simulate an IPBoard instance.

use ipboard::{ApiErrorKind, Client, Error, Params};
use serde_json::{json, Value};
use std::sync::Once;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

async fn client_for(server: &MockServer) -> Client {
    init_tracing();
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .api_key("secret-key")
        .build()
        .unwrap()
}

#[tokio::test]
async fn get_decodes_canned_body_structurally() {
    let mock_server = MockServer::start().await;

    let canned = json!({
        "communityName": "Example Forum",
        "communityUrl": "https://forum.example.com/",
        "ipsVersion": "4.1.12"
    });

    Mock::given(method("GET"))
        .and(path("/core/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&canned))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let response = client.hello().await.unwrap();

    assert_eq!(response.data, canned);
    assert_eq!(response.status.as_u16(), 200);
    assert!(response.raw_body.contains("Example Forum"));
}

#[tokio::test]
async fn requests_authenticate_with_api_key_and_empty_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/hello"))
        .and(basic_auth("secret-key", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    client.hello().await.unwrap();
}

#[tokio::test]
async fn post_sends_urlencoded_form_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/core/members"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("name=alice"))
        .and(body_string_contains("email=alice%40example.com"))
        .and(body_string_contains("group=admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "alice"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let response = client
        .members()
        .create("alice", "alice@example.com", "hunter2", Some("admins"))
        .await
        .unwrap();

    assert_eq!(response.data["id"], json!(7));
}

#[tokio::test]
async fn get_places_parameters_in_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/members"))
        .and(query_param("sortBy", "name"))
        .and(query_param("sortDir", "desc"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"page": 1, "totalPages": 1, "results": []})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let response = client.members().by_page("name", "desc", 1).await.unwrap();
    assert_eq!(response.data.total_pages, 1);
}

#[tokio::test]
async fn delete_sends_no_body_and_tolerates_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/core/members/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let response = client.members().delete(3).await.unwrap();
    assert_eq!(response.data, Value::Null);
}

#[tokio::test]
async fn status_401_without_body_is_invalid_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/hello"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let err = client.hello().await.unwrap_err();
    assert_eq!(err.api_kind(), Some(ApiErrorKind::InvalidApiKey));
}

#[tokio::test]
async fn status_429_is_throttled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forums/forums"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let err = client.forums().all().await.unwrap_err();
    assert_eq!(err.api_kind(), Some(ApiErrorKind::Throttled));
}

#[tokio::test]
async fn vendor_code_decides_regardless_of_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/core/members"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"errorCode": "1C292/4"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let err = client
        .members()
        .create("alice", "alice@example.com", "hunter2", None)
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(ApiErrorKind::MemberUsernameExists));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[tokio::test]
async fn unrecognized_code_and_status_is_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/members/1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"errorCode": "9Z999/9"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let err = client.members().by_id(1).await.unwrap_err();

    match err {
        Error::MalformedResponse { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_success_body_is_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forums/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let err = client
        .posts()
        .search_page(&Params::new(), 1)
        .await
        .unwrap_err();

    match err {
        Error::MalformedResponse {
            status,
            raw_response,
            ..
        } => {
            assert_eq!(status.as_u16(), 200);
            assert!(raw_response.contains("not json"));
        }
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    // Nothing listens on the mock server's port once it is dropped.
    // `MockServer::start()` hands out a pooled server whose listener
    // survives the drop, so use an unpooled one here.
    let uri = {
        let mock_server = MockServer::builder().start().await;
        mock_server.uri()
    };

    let client = Client::builder()
        .base_url(uri)
        .unwrap()
        .api_key("secret-key")
        .build()
        .unwrap();

    let err = client.hello().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn error_body_cut_short_is_a_transport_failure() {
    init_tracing();

    // A server that reports an error status but drops the connection
    // before delivering the promised body.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 512\r\n\r\n{\"errorCode\"")
            .await;
        let _ = socket.shutdown().await;
    });

    let client = Client::builder()
        .base_url(format!("http://{addr}"))
        .unwrap()
        .api_key("secret-key")
        .build()
        .unwrap();

    // The failed body read surfaces as-is rather than being translated as
    // an empty error body.
    let err = client.hello().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn slow_server_trips_the_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .api_key("secret-key")
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.hello().await.unwrap_err();
    match err {
        Error::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected Transport, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_criteria_never_reach_the_network() {
    let mock_server = MockServer::start().await;

    // Any request at all would violate this expectation.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let criteria = Params::new().set("forums", "1,2,x");
    let err = client.posts().search_page(&criteria, 1).await.unwrap_err();

    match err {
        Error::Validation(message) => {
            assert_eq!(
                message,
                "The forums field must be a comma separated string of IDs."
            );
        }
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn guest_post_requires_author_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/forums/posts"))
        .and(body_string_contains("author_name=Guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;

    // author 0 with no author_name fails locally.
    let err = client
        .posts()
        .create(42, 0, "<p>hi</p>", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // author 0 with author_name goes through.
    let response = client
        .posts()
        .create(42, 0, "<p>hi</p>", Params::new().set("author_name", "Guest"))
        .await
        .unwrap();
    assert_eq!(response.data["id"], json!(99));
}

#[tokio::test]
async fn aggregation_walks_all_pages_in_order() {
    let mock_server = MockServer::start().await;

    for (page, items) in [(1, vec![1, 2]), (2, vec![3]), (3, vec![4, 5])] {
        Mock::given(method("GET"))
            .and(path("/forums/topics"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": page,
                "totalPages": 3,
                "results": items,
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server).await;
    let criteria = Params::new().set("forums", "1");
    let all = client.topics().search_all(&criteria).await.unwrap();

    assert_eq!(all, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
}

#[tokio::test]
async fn single_page_listing_fetches_exactly_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/members"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "totalPages": 1,
            "results": [{"id": 1, "name": "alice"}],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let all = client.members().all("ID", "asc").await.unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["name"], json!("alice"));
}

#[tokio::test]
async fn failure_on_page_two_aborts_the_aggregation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forums/posts"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "totalPages": 3,
            "results": [1, 2],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forums/posts"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page 3 must never be requested.
    Mock::given(method("GET"))
        .and(path("/forums/posts"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let err = client
        .posts()
        .search_all(&Params::new())
        .await
        .unwrap_err();

    // The page's typed error surfaces; no partial list is returned.
    assert_eq!(err.api_kind(), Some(ApiErrorKind::Throttled));
}

#[tokio::test]
async fn custom_format_registered_at_startup_is_enforced() {
    let mock_server = MockServer::start().await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .api_key("secret-key")
        .format("csv_numeric", |value| {
            // Stricter replacement: at most three IDs.
            value.split(',').count() <= 3
                && value
                    .split(',')
                    .all(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        })
        .build()
        .unwrap();

    let criteria = Params::new().set("forums", "1,2,3,4");
    let err = client.topics().search_page(&criteria, 1).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn topic_create_validates_the_full_vocabulary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/forums/topics"))
        .and(body_string_contains("title=Welcome"))
        .and(body_string_contains("tags=intro%2Cnews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;

    // A bad close_time is rejected locally.
    let err = client
        .topics()
        .create(
            1,
            7,
            "Welcome",
            "<p>hello</p>",
            Params::new().set("close_time", "tomorrow"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // A fully valid payload goes through.
    client
        .topics()
        .create(
            1,
            7,
            "Welcome",
            "<p>hello</p>",
            Params::new()
                .set("tags", "intro,news")
                .set("ip_address", "10.0.0.1")
                .set("open_time", "2024-05-01 09:00:00")
                .set("pinned", "1"),
        )
        .await
        .unwrap();
}
