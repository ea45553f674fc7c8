//! Command dispatch against a scripted control plane

mod common;

use std::sync::Arc;

use clap::Parser;
use serde_json::Value;

use lenses_cli::cli::commands::execute_command;
use lenses_cli::cli::{Cli, CliResult, Renderer};
use lenses_cli::config::OutputFormat;
use lenses_cli::infrastructure::traits::Method;

use common::{container, StubTransport};

struct Run {
    result: CliResult<()>,
    stdout: String,
    stderr: String,
}

fn run(transport: &Arc<StubTransport>, args: &[&str]) -> Run {
    let cli = Cli::try_parse_from(std::iter::once("lenses-cli").chain(args.iter().copied()))
        .unwrap();
    let format = cli.global.output.unwrap_or_default();
    let container = container(transport, format);
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let result = {
        let mut out = Renderer::new(format, cli.global.silent, &mut stdout, &mut stderr);
        execute_command(&cli.command, &container, &mut out)
    };
    Run {
        result,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

// ============================================================
// topics
// ============================================================

#[test]
fn given_capitalized_topic_when_getting_as_json_then_camel_case_fields() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/v1/kafka/topics/orders",
        200,
        r#"{"TopicName":"orders","Partitions":3}"#,
    );

    // Act
    let run = run(&transport, &["topic", "--name", "orders", "-o", "json"]);

    // Assert
    run.result.unwrap();
    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(json["topicName"], "orders");
    assert_eq!(json["partitions"], 3);
}

#[test]
fn given_topic_create_without_name_when_running_then_no_request_is_made() {
    let transport = StubTransport::new();

    let run = run(&transport, &["topic", "create", "--partitions", "3"]);

    let err = run.result.unwrap_err();
    assert!(err.to_string().contains("\"name\""));
    assert_eq!(err.exit_code(), lenses_cli::exitcode::USAGE);
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn given_topic_create_when_running_then_defaults_are_sent_and_narrated() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(Method::Post, "api/v1/kafka/topics", 201, "");

    // Act
    let run = run(&transport, &["topic", "create", "--name", "orders"]);

    // Assert
    run.result.unwrap();
    assert_eq!(run.stdout, "Topic [orders] created\n");
    let body = transport.calls()[0].body.clone().unwrap();
    assert_eq!(body["topicName"], "orders");
    assert_eq!(body["replication"], 1);
    assert_eq!(body["partitions"], 1);
}

#[test]
fn given_silent_when_creating_topic_then_nothing_is_printed() {
    let transport = StubTransport::new();
    transport.route(Method::Post, "api/v1/kafka/topics", 201, "");

    let run = run(&transport, &["--silent", "topic", "create", "--name", "orders"]);

    run.result.unwrap();
    assert_eq!(run.stdout, "");
}

#[test]
fn given_only_offset_when_deleting_topic_then_invalid_flag() {
    let transport = StubTransport::new();

    let run = run(&transport, &["topic", "delete", "--name", "orders", "--offset", "10"]);

    assert!(run.result.unwrap_err().to_string().contains("--partition"));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn given_topic_names_when_unwrapped_then_one_name_per_line() {
    let transport = StubTransport::new();
    transport.route(Method::Get, "api/v1/kafka/topics/names", 200, r#"["b","a"]"#);

    let run = run(&transport, &["topics", "--names", "--unwrap"]);

    run.result.unwrap();
    assert_eq!(run.stdout, "a\nb\n");
}

#[test]
fn given_control_topic_when_listing_as_table_then_it_is_hidden() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/v1/kafka/topics",
        200,
        r#"[{"topicName":"orders"},{"topicName":"__consumer_offsets","isControlTopic":true}]"#,
    );

    // Act
    let table = run(&transport, &["topics"]);
    let json = run(&transport, &["topics", "-o", "json"]);

    // Assert
    assert!(table.stdout.contains("orders"));
    assert!(!table.stdout.contains("__consumer_offsets"));
    assert!(json.stdout.contains("__consumer_offsets"));
}

// ============================================================
// connectors
// ============================================================

#[test]
fn given_connectors_without_cluster_when_running_then_cluster_name_is_required() {
    let transport = StubTransport::new();

    let run = run(&transport, &["connectors"]);

    assert!(run.result.unwrap_err().to_string().contains("clusterName"));
}

#[test]
fn given_clusters_with_two_zero_one_connectors_when_listing_all_names_then_three_names() {
    // Arrange
    let transport = StubTransport::new();
    transport
        .route(
            Method::Get,
            "api/v1/kafka/connect/clusters",
            200,
            r#"[{"name":"a"},{"name":"b"},{"name":"c"}]"#,
        )
        .route(Method::Get, "api/proxy-connect/a/connectors", 200, r#"["a1","a2"]"#)
        .route(Method::Get, "api/proxy-connect/b/connectors", 200, "[]")
        .route(Method::Get, "api/proxy-connect/c/connectors", 200, r#"["c1"]"#);

    // Act
    let run = run(&transport, &["connectors", "--clusterName=*", "--names", "-o", "json"]);

    // Assert
    run.result.unwrap();
    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"name": "a1"}, {"name": "a2"}, {"name": "c1"}])
    );
    assert_eq!(run.stderr, "");
}

#[test]
fn given_partial_fan_out_when_listing_names_then_warning_and_survivors() {
    // Arrange
    let transport = StubTransport::new();
    transport
        .route(
            Method::Get,
            "api/v1/kafka/connect/clusters",
            200,
            r#"[{"name":"a"},{"name":"b"}]"#,
        )
        .route(Method::Get, "api/proxy-connect/a/connectors", 200, r#"["a1"]"#);

    // Act
    let run = run(&transport, &["connectors", "--clusterName", "*", "--names", "-o", "json"]);

    // Assert
    run.result.unwrap();
    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(json, serde_json::json!([{"name": "a1"}]));
    assert!(run.stderr.contains("1 of 2 clusters failed: b"));
}

#[test]
fn given_cluster_names_without_newline_when_listing_then_no_trailing_newline() {
    let transport = StubTransport::new();
    transport.route(
        Method::Get,
        "api/v1/kafka/connect/clusters",
        200,
        r#"[{"name":"a"},{"name":"b"}]"#,
    );

    let run = run(&transport, &["connectors", "clusters", "--names", "--no-newline"]);

    run.result.unwrap();
    assert_eq!(run.stdout, "a\nb");
}

#[test]
fn given_task_zero_when_restarting_then_task_is_accepted() {
    let transport = StubTransport::new();
    transport.route(
        Method::Post,
        "api/proxy-connect/dev/connectors/sink/tasks/0/restart",
        204,
        "",
    );

    let run = run(
        &transport,
        &["connector", "--clusterName", "dev", "--name", "sink", "task", "restart", "--task", "0"],
    );

    run.result.unwrap();
    assert_eq!(run.stdout, "Connector sink task 0 restarted\n");
}

#[test]
fn given_connector_create_without_flags_when_running_then_all_missing_flags_are_listed() {
    let transport = StubTransport::new();

    let run = run(&transport, &["connector", "create"]);

    assert_eq!(
        run.result.unwrap_err().to_string(),
        r#"required flag(s) "clusterName", "name" not set"#
    );
}

// ============================================================
// alerts and datasets
// ============================================================

const ALERT_EVENTS: &str = "data: {\"alertId\":1,\"level\":\"INFO\",\"summary\":\"lag\"}\n\ndata: {\"alertId\":2,\"level\":\"WARN\"}\n";

#[test]
fn given_live_alerts_as_table_when_streaming_then_header_is_printed_once() {
    // Arrange
    let transport = StubTransport::new();
    transport.route(Method::Get, "api/sse/alerts", 200, ALERT_EVENTS);

    // Act
    let run = run(&transport, &["alerts", "--live"]);

    // Assert
    run.result.unwrap();
    let lines: Vec<&str> = run.stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID\tTIME\tLEVEL\tCATEGORY\tINSTANCE\tSUMMARY");
    assert!(lines[1].starts_with("1\t") && lines[1].ends_with("\tlag"));
    assert!(lines[2].starts_with("2\t") && lines[2].contains("\tWARN\t"));
}

#[test]
fn given_live_alerts_as_json_when_streaming_then_one_object_per_line() {
    let transport = StubTransport::new();
    transport.route(Method::Get, "api/sse/alerts", 200, ALERT_EVENTS);

    let run = run(&transport, &["alerts", "--live", "-o", "json"]);

    run.result.unwrap();
    let ids: Vec<i64> = run
        .stdout
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["alertId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn given_setting_enable_flag_when_running_then_setting_is_enabled() {
    let transport = StubTransport::new();
    transport.route(Method::Put, "api/alert-settings/1001", 200, "");

    let run = run(&transport, &["alert", "setting", "--id", "1001", "--enable"]);

    run.result.unwrap();
    assert_eq!(run.stdout, "Alert setting [1001] enabled\n");
    assert_eq!(
        transport.calls()[0].query,
        vec![("enable".to_string(), "true".to_string())]
    );
}

#[test]
fn given_condition_flag_when_setting_condition_then_condition_is_posted() {
    let transport = StubTransport::new();
    transport.route(Method::Post, "api/alert-settings/2000/conditions", 200, "");

    let run = run(
        &transport,
        &["alert", "setting", "condition", "set", "--alert", "2000", "--condition", "lag >= 100"],
    );

    run.result.unwrap();
    assert_eq!(
        transport.calls()[0].body,
        Some(Value::String("lag >= 100".into()))
    );
}

#[test]
fn given_blank_description_when_updating_dataset_then_rejected() {
    let transport = StubTransport::new();

    let run = run(
        &transport,
        &[
            "dataset",
            "update-description",
            "--connection",
            "kafka",
            "--name",
            "orders",
            "--description",
            "  ",
        ],
    );

    assert!(run.result.is_err());
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn given_tags_when_updating_dataset_then_tags_are_put() {
    let transport = StubTransport::new();
    transport.route(Method::Put, "api/v1/datasets/kafka/orders/tags", 200, "");

    let run = run(
        &transport,
        &[
            "dataset", "update-tags", "--connection", "kafka", "--name", "orders", "--tag", "pii",
            "--tag", "gold",
        ],
    );

    run.result.unwrap();
    assert_eq!(run.stdout, "Dataset tags have been updated successfully\n");
    assert_eq!(
        transport.calls()[0].body,
        Some(serde_json::json!({"tags": [{"name": "pii"}, {"name": "gold"}]}))
    );
}
