//! Tests for structured output rendering

mod common;

use std::sync::Arc;

use rstest::rstest;
use serde_json::{json, Value};

use lenses_cli::application::{Credentials, LensesClient};
use lenses_cli::cli::render::{render, Column};
use lenses_cli::cli::Renderer;
use lenses_cli::config::OutputFormat;
use lenses_cli::domain::{Connector, Topic, TopicView};
use lenses_cli::infrastructure::traits::{Method, Transport};

use common::StubTransport;

fn capture(format: OutputFormat, silent: bool, f: impl FnOnce(&mut Renderer)) -> (String, String) {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    {
        let mut renderer = Renderer::new(format, silent, &mut out, &mut err);
        f(&mut renderer);
    }
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[rstest]
#[case(OutputFormat::Json)]
#[case(OutputFormat::Yaml)]
fn given_decoded_connectors_when_rendering_then_parsing_back_gives_same_connectors(
    #[case] format: OutputFormat,
) {
    // Arrange
    let transport = StubTransport::new();
    transport
        .route(Method::Get, "api/proxy-connect/dev/connectors", 200, r#"["sink","source"]"#)
        .route(
            Method::Get,
            "api/proxy-connect/dev/connectors/sink",
            200,
            r#"{"name":"sink","config":{"connector.class":"Sink","tasks.max":"2"},"tasks":[{"connector":"sink","task":0}],"type":"sink"}"#,
        )
        .route(
            Method::Get,
            "api/proxy-connect/dev/connectors/source",
            200,
            r#"{"name":"source","config":{"connector.class":"Source"},"tasks":null}"#,
        );
    let client = LensesClient::new(Arc::clone(&transport) as Arc<dyn Transport>, Credentials::Anonymous);
    let decoded: Vec<Connector> = ["sink", "source"]
        .iter()
        .map(|name| client.connector("dev", name).unwrap())
        .collect();

    // Act
    let (out, _) = capture(format, false, |r| r.list(&decoded).unwrap());

    // Assert
    let parsed: Vec<Connector> = match format {
        OutputFormat::Json => serde_json::from_str(&out).unwrap(),
        _ => serde_yaml::from_str(&out).unwrap(),
    };
    assert_eq!(parsed, decoded);
}

#[test]
fn given_decoded_topic_when_rendering_json_then_parsing_back_gives_same_topic() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/v1/kafka/topics/orders",
        200,
        r#"{"TopicName":"orders","KeyType":"STRING","Partitions":3,"Configs":[{"key":"cleanup.policy","value":"compact","isDefault":false}]}"#,
    );
    let client = LensesClient::new(Arc::clone(&transport) as Arc<dyn Transport>, Credentials::Anonymous);
    let decoded = client.topic("orders").unwrap();

    // Act
    let (out, _) = capture(OutputFormat::Json, false, |r| r.json(&decoded).unwrap());

    // Assert
    let parsed: Topic = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, decoded);
    assert!(out.ends_with("}\n"));
}

#[test]
fn given_remote_response_when_rendering_yaml_then_round_trip_is_identical() {
    let response = json!({"topicName": "orders", "partitions": 3, "configs": []});

    let rendered = render(&response, OutputFormat::Yaml, &[]).unwrap();

    let parsed: Value = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(parsed, response);
}

#[test]
fn given_declared_columns_when_rendering_table_then_headers_in_order_and_nested_keys_resolved() {
    // Arrange
    const COLUMNS: &[Column] = &[
        Column::new("NAME", "name"),
        Column::new("CLASS", "/config/connector.class"),
    ];
    let rows = json!([{"name": "sink", "config": {"connector.class": "org.example.Sink"}}]);

    // Act
    let table = render(&rows, OutputFormat::Table, COLUMNS).unwrap();

    // Assert
    let name_at = table.find("NAME").unwrap();
    let class_at = table.find("CLASS").unwrap();
    assert!(name_at < class_at);
    assert!(table.contains("org.example.Sink"));
}

#[test]
fn given_rows_without_columns_when_rendering_table_then_headers_are_inferred() {
    let rows = json!([{"workerId": "w1", "state": "RUNNING"}]);

    let table = render(&rows, OutputFormat::Table, &[]).unwrap();

    assert!(table.contains("WORKER ID"));
    assert!(table.contains("RUNNING"));
}

#[rstest]
#[case(OutputFormat::Json, "[\n  {\n    \"name\": \"a\"\n  }\n]\n")]
#[case(OutputFormat::Yaml, "- name: a\n")]
fn given_names_when_rendering_then_single_field_objects(
    #[case] format: OutputFormat,
    #[case] expected: &str,
) {
    let (out, _) = capture(format, false, |r| r.names("name", &["a".to_string()]).unwrap());

    assert_eq!(out, expected);
}

#[test]
fn given_silent_when_narrating_then_only_results_are_written() {
    let (out, err) = capture(OutputFormat::Json, true, |r| {
        r.info("Topic [orders] created").unwrap();
        r.names("name", &["orders".to_string()]).unwrap();
        r.warn("1 of 2 clusters failed: b").unwrap();
    });

    assert!(!out.contains("created"));
    assert!(out.contains("orders"));
    assert!(err.contains("1 of 2 clusters failed: b"));
}

#[test]
fn given_plain_lines_when_no_trailing_newline_then_only_last_newline_is_dropped() {
    let values = ["a".to_string(), "b".to_string()];

    let (with, _) = capture(OutputFormat::Table, false, |r| r.lines(&values, false).unwrap());
    let (without, _) = capture(OutputFormat::Table, false, |r| r.lines(&values, true).unwrap());

    assert_eq!(with, "a\nb\n");
    assert_eq!(without, "a\nb");
}

#[test]
fn given_control_topic_when_listing_filtered_then_hidden_in_table_only() {
    // Arrange
    let topics = vec![
        TopicView::new(Topic {
            topic_name: "orders".into(),
            ..Default::default()
        }),
        TopicView::new(Topic {
            topic_name: "__consumer_offsets".into(),
            is_control_topic: true,
            ..Default::default()
        }),
    ];
    let keep = |t: &TopicView| !t.topic.is_control_topic;

    // Act
    let (table, _) = capture(OutputFormat::Table, false, |r| {
        r.list_filtered(&topics, keep).unwrap()
    });
    let (json, _) = capture(OutputFormat::Json, false, |r| {
        r.list_filtered(&topics, keep).unwrap()
    });

    // Assert
    assert!(!table.contains("__consumer_offsets"));
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[1]["isControlTopic"], true);
}
