//! Tests for LensesClient authentication, status mapping and alert streaming

mod common;

use std::sync::Arc;

use lenses_cli::application::client::TOKEN_HEADER;
use lenses_cli::application::{ApplicationError, Credentials, LensesClient, StatusClass};
use lenses_cli::infrastructure::traits::{Method, Transport};

use common::StubTransport;

fn client(transport: &Arc<StubTransport>, credentials: Credentials) -> LensesClient {
    LensesClient::new(Arc::clone(transport) as Arc<dyn Transport>, credentials)
}

fn token_of(request: &lenses_cli::infrastructure::traits::HttpRequest) -> Option<&str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k == TOKEN_HEADER)
        .map(|(_, v)| v.as_str())
}

#[test]
fn given_token_when_calling_then_token_header_is_sent() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(Method::Get, "api/v1/kafka/topics/names", 200, r#"["b","a"]"#);
    let client = client(&transport, Credentials::Token("tok".into()));

    // Act
    let names = client.topic_names().unwrap();

    // Assert
    assert_eq!(names, vec!["b", "a"]);
    assert_eq!(token_of(&transport.calls()[0]), Some("tok"));
}

#[test]
fn given_user_and_password_when_calling_twice_then_login_happens_once() {
    // Arrange
    let transport = StubTransport::new();
    transport
        .route(Method::Post, "api/login", 200, "session-1")
        .route(Method::Get, "api/v1/kafka/topics/config-keys", 200, r#"["retention.ms"]"#);
    let client = client(
        &transport,
        Credentials::Basic {
            user: "admin".into(),
            password: "admin".into(),
        },
    );

    // Act
    client.topic_config_keys().unwrap();
    client.topic_config_keys().unwrap();

    // Assert
    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].path(), "api/login");
    assert_eq!(calls[0].body.as_ref().unwrap()["user"], "admin");
    assert_eq!(token_of(&calls[1]), Some("session-1"));
    assert_eq!(token_of(&calls[2]), Some("session-1"));
}

#[test]
fn given_rejected_login_when_calling_then_unauthorized() {
    let transport = StubTransport::new();
    transport.route(Method::Post, "api/login", 401, r#"{"message":"bad credentials"}"#);
    let client = client(
        &transport,
        Credentials::Basic {
            user: "admin".into(),
            password: "wrong".into(),
        },
    );

    let err = client.topics().unwrap_err();

    let remote = err.as_remote().unwrap();
    assert_eq!(remote.class, StatusClass::Unauthorized);
    assert_eq!(remote.message, "bad credentials");
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn given_bad_request_when_creating_topic_then_server_message_is_kept() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(Method::Post, "api/v1/kafka/topics", 400, r#"{"message":"Topic exists"}"#);
    let client = client(&transport, Credentials::Anonymous);
    let payload = lenses_cli::domain::CreateTopicPayload {
        topic_name: "orders".into(),
        ..Default::default()
    };

    // Act
    let err = client.create_topic(&payload).unwrap_err();

    // Assert
    assert_eq!(
        err.to_string(),
        "bad request (400) on POST api/v1/kafka/topics: Topic exists"
    );
}

#[test]
fn given_non_json_success_body_when_decoding_then_decode_error() {
    let transport = StubTransport::new();
    transport.route(Method::Get, "api/v1/kafka/topics", 200, "<html>");
    let client = client(&transport, Credentials::Anonymous);

    let err = client.topics().unwrap_err();

    assert!(matches!(err, ApplicationError::Decode { .. }));
}

#[test]
fn given_record_range_when_deleting_records_then_path_carries_partition_and_offset() {
    let transport = StubTransport::new();
    transport.route(
        Method::Delete,
        "api/v1/kafka/topics/orders/partitions/0/offsets/42",
        200,
        "",
    );
    let client = client(&transport, Credentials::Anonymous);

    client.delete_topic_records("orders", 0, 42).unwrap();

    assert_eq!(transport.call_count(), 1);
}

#[test]
fn given_null_key_type_when_getting_topic_then_field_is_empty() {
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/v1/kafka/topics/orders",
        200,
        r#"{"topicName":"orders","keyType":null,"partitions":3}"#,
    );
    let client = client(&transport, Credentials::Anonymous);

    let topic = client.topic("orders").unwrap();

    assert_eq!(topic.topic_name, "orders");
    assert_eq!(topic.key_type, "");
    assert_eq!(topic.partitions, 3);
}

#[test]
fn given_null_plugin_version_when_listing_plugins_then_placeholder_is_shown() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/proxy-connect/dev/connector-plugins",
        200,
        r#"[{"class":"org.Sink","type":"sink","version":null}]"#,
    );
    let container = common::container(&transport, lenses_cli::config::OutputFormat::Json);

    // Act
    let plugins = container.connectors.plugins("dev").unwrap().flatten();

    // Assert
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].class, "org.Sink");
    assert_eq!(plugins[0].version, "X.X.X");
}

// ============================================================
// alerts
// ============================================================

#[test]
fn given_event_stream_when_following_alerts_then_data_lines_are_decoded() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/sse/alerts",
        200,
        "event: alert\ndata: {\"alertId\":1,\"level\":\"INFO\"}\n\ndata: garbage\n: keep-alive\ndata: {\"alertId\":2}\n",
    );
    let client = client(&transport, Credentials::Anonymous);
    let mut seen = Vec::new();

    // Act
    client
        .alerts_live(&mut |alert| {
            seen.push(alert.alert_id);
            Ok(())
        })
        .unwrap();

    // Assert
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn given_handler_failure_when_following_alerts_then_stream_stops_with_error() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/sse/alerts",
        200,
        "data: {\"alertId\":1}\ndata: {\"alertId\":2}\n",
    );
    let client = client(&transport, Credentials::Anonymous);
    let mut seen = 0;

    // Act
    let result = client.alerts_live(&mut |_| {
        seen += 1;
        Err(ApplicationError::config("stop"))
    });

    // Assert
    assert!(result.is_err());
    assert_eq!(seen, 1);
}

#[test]
fn given_page_size_when_listing_alerts_then_query_is_sent() {
    let transport = StubTransport::new();
    transport.route(Method::Get, "api/alerts", 200, r#"{"values":[{"alertId":7}]}"#);
    let client = client(&transport, Credentials::Anonymous);

    let alerts = client.alerts(10).unwrap();

    assert_eq!(alerts[0].alert_id, 7);
    assert_eq!(
        transport.calls()[0].query,
        vec![("pageSize".to_string(), "10".to_string())]
    );
}
