//! Domain entities: remote resource representations and their display views

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Servers send `null` for unset fields; decode it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Connector configuration as accepted by Kafka Connect.
pub type ConnectorConfig = BTreeMap<String, String>;

/// A Kafka Connect cluster known to the control plane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectCluster {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub statuses: String,
    #[serde(deserialize_with = "null_as_default")]
    pub configs: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offsets: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorTaskId {
    #[serde(deserialize_with = "null_as_default")]
    pub connector: String,
    pub task: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connector {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub config: ConnectorConfig,
    #[serde(deserialize_with = "null_as_default")]
    pub tasks: Vec<ConnectorTaskId>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A connector together with the cluster it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterConnector {
    pub cluster: String,
    #[serde(flatten)]
    pub connector: Connector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorTask {
    pub id: ConnectorTaskId,
    pub config: ConnectorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorState {
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub worker_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatus {
    pub id: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub connector: ConnectorState,
    #[serde(deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorPlugin {
    #[serde(deserialize_with = "null_as_default")]
    pub class: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

impl ConnectorPlugin {
    /// Placeholder shown when a plugin does not report a version.
    pub const UNKNOWN_VERSION: &'static str = "X.X.X";

    pub fn with_version_placeholder(mut self) -> Self {
        if self.version.is_empty() || self.version == "null" {
            self.version = Self::UNKNOWN_VERSION.to_string();
        }
        self
    }
}

/// A single topic config entry as reported by the broker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicConfigEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    pub is_default: bool,
}

/// A Kafka topic. Field aliases accept the capitalized keys some servers emit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    #[serde(alias = "TopicName", deserialize_with = "null_as_default")]
    pub topic_name: String,
    #[serde(alias = "KeyType", deserialize_with = "null_as_default")]
    pub key_type: String,
    #[serde(alias = "ValueType", deserialize_with = "null_as_default")]
    pub value_type: String,
    #[serde(alias = "Partitions", deserialize_with = "null_as_default")]
    pub partitions: u32,
    #[serde(alias = "Replication", deserialize_with = "null_as_default")]
    pub replication: u32,
    #[serde(alias = "IsControlTopic")]
    pub is_control_topic: bool,
    #[serde(alias = "IsMarkedForDeletion")]
    pub is_marked_for_deletion: bool,
    #[serde(alias = "MessagesPerSecond", deserialize_with = "null_as_default")]
    pub messages_per_second: u64,
    #[serde(alias = "TotalMessages", deserialize_with = "null_as_default")]
    pub total_messages: u64,
    #[serde(alias = "KeySchema", skip_serializing_if = "Option::is_none")]
    pub key_schema: Option<String>,
    #[serde(alias = "ValueSchema", skip_serializing_if = "Option::is_none")]
    pub value_schema: Option<String>,
    #[serde(alias = "Configs", deserialize_with = "null_as_default")]
    pub configs: Vec<TopicConfigEntry>,
}

/// Display projection of a topic: the topic plus its schemas decoded as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicView {
    #[serde(flatten)]
    pub topic: Topic,
    pub key_schema: Value,
    pub value_schema: Value,
}

impl TopicView {
    pub fn new(topic: Topic) -> Self {
        let key_schema = decode_schema(topic.key_schema.as_deref());
        let value_schema = decode_schema(topic.value_schema.as_deref());
        Self {
            topic: Topic {
                key_schema: None,
                value_schema: None,
                ..topic
            },
            key_schema,
            value_schema,
        }
    }
}

/// User-managed metadata of a topic; also the payload of `topics metadata set`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub topic_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value_type: String,
    #[serde(
        rename = "keySchema",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub key_schema_raw: String,
    #[serde(
        rename = "valueSchema",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub value_schema_raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMetadataView {
    pub topic_name: String,
    pub key_type: String,
    pub value_type: String,
    pub key_schema: Value,
    pub value_schema: Value,
}

impl From<TopicMetadata> for TopicMetadataView {
    fn from(meta: TopicMetadata) -> Self {
        Self {
            key_schema: decode_schema(Some(&meta.key_schema_raw)),
            value_schema: decode_schema(Some(&meta.value_schema_raw)),
            topic_name: meta.topic_name,
            key_type: meta.key_type,
            value_type: meta.value_type,
        }
    }
}

/// Schemas travel as JSON-encoded strings; anything that is not valid JSON is kept as text.
fn decode_schema(raw: Option<&str>) -> Value {
    match raw.map(str::trim) {
        None | Some("") => Value::Null,
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.into())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alert {
    pub alert_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
}

/// Alert with a human readable time for table output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub time: String,
}

impl From<Alert> for AlertView {
    fn from(alert: Alert) -> Self {
        let time = chrono::DateTime::from_timestamp_millis(alert.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        Self { alert, time }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertSetting {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    pub enabled: bool,
    pub is_available: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub conditions: BTreeMap<String, String>,
}

/// All alert settings grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub categories: BTreeMap<String, Vec<AlertSetting>>,
}

/// Condition expressions keyed by condition UUID.
pub type AlertSettingConditions = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetTag {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptionUpdate {
    /// `None` removes the description server side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetTagsUpdate {
    pub tags: Vec<DatasetTag>,
}

impl DatasetTagsUpdate {
    pub fn new(tags: &[String]) -> Self {
        Self {
            tags: tags
                .iter()
                .map(|name| DatasetTag { name: name.clone() })
                .collect(),
        }
    }
}
