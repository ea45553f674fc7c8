//! Remote client facade for the control plane REST API
//!
//! One method per remote operation. Each method performs a single round trip through the
//! [`Transport`] seam and returns a decoded value or an [`ApplicationError`] that carries
//! the HTTP status class.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, RemoteError};
use crate::domain::{
    Alert, AlertSetting, AlertSettingConditions, AlertSettings, ConnectCluster, Connector,
    ConnectorConfig, ConnectorPlugin, ConnectorStatus, ConnectorTask, CreateTopicPayload,
    DatasetDescriptionUpdate, DatasetTagsUpdate, TaskStatus, Topic, TopicMetadata,
    UpdateTopicPayload,
};
use crate::infrastructure::traits::{HttpRequest, HttpResponse, Method, Transport};

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "X-Kafka-Lenses-Token";

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    /// Exchanged for a token on first use.
    Basic { user: String, password: String },
    Anonymous,
}

impl Credentials {
    /// Prefer an explicit token over user/password.
    pub fn from_parts(
        token: Option<String>,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        match (token, user, password) {
            (Some(token), _, _) if !token.is_empty() => Self::Token(token),
            (_, Some(user), Some(password)) if !user.is_empty() => Self::Basic { user, password },
            _ => Self::Anonymous,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(***)"),
            Self::Basic { user, .. } => write!(f, "Basic({user}, ***)"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Alerts come back either as a bare list or wrapped in a page object.
#[derive(Deserialize)]
#[serde(untagged)]
enum AlertPage {
    List(Vec<Alert>),
    Paged { values: Vec<Alert> },
}

impl From<AlertPage> for Vec<Alert> {
    fn from(page: AlertPage) -> Self {
        match page {
            AlertPage::List(alerts) | AlertPage::Paged { values: alerts } => alerts,
        }
    }
}

pub struct LensesClient {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    token: Mutex<Option<String>>,
}

impl fmt::Debug for LensesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LensesClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl LensesClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            token: Mutex::new(None),
        }
    }

    // ============================================================
    // Connect clusters and connectors
    // ============================================================

    pub fn connect_clusters(&self) -> ApplicationResult<Vec<ConnectCluster>> {
        self.get_json(HttpRequest::new(
            Method::Get,
            ["api", "v1", "kafka", "connect", "clusters"],
        ))
    }

    pub fn connector_names(&self, cluster: &str) -> ApplicationResult<Vec<String>> {
        self.get_json(HttpRequest::new(Method::Get, connectors_path(cluster, &[])))
    }

    pub fn connector(&self, cluster: &str, name: &str) -> ApplicationResult<Connector> {
        self.get_json(HttpRequest::new(Method::Get, connectors_path(cluster, &[name])))
    }

    #[instrument(level = "debug", skip(self, config))]
    pub fn create_connector(
        &self,
        cluster: &str,
        name: &str,
        config: &ConnectorConfig,
    ) -> ApplicationResult<Connector> {
        let body = json!({ "name": name, "config": config });
        self.get_json(HttpRequest::new(Method::Post, connectors_path(cluster, &[])).json(body))
    }

    /// Replace the config of an existing connector.
    #[instrument(level = "debug", skip(self, config))]
    pub fn update_connector(
        &self,
        cluster: &str,
        name: &str,
        config: &ConnectorConfig,
    ) -> ApplicationResult<Connector> {
        let body = to_body("connector config", config)?;
        self.get_json(
            HttpRequest::new(Method::Put, connectors_path(cluster, &[name, "config"])).json(body),
        )
    }

    pub fn connector_config(&self, cluster: &str, name: &str) -> ApplicationResult<ConnectorConfig> {
        self.get_json(HttpRequest::new(
            Method::Get,
            connectors_path(cluster, &[name, "config"]),
        ))
    }

    pub fn connector_status(&self, cluster: &str, name: &str) -> ApplicationResult<ConnectorStatus> {
        self.get_json(HttpRequest::new(
            Method::Get,
            connectors_path(cluster, &[name, "status"]),
        ))
    }

    pub fn pause_connector(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.send_empty(HttpRequest::new(
            Method::Put,
            connectors_path(cluster, &[name, "pause"]),
        ))
    }

    pub fn resume_connector(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.send_empty(HttpRequest::new(
            Method::Put,
            connectors_path(cluster, &[name, "resume"]),
        ))
    }

    pub fn restart_connector(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.send_empty(HttpRequest::new(
            Method::Post,
            connectors_path(cluster, &[name, "restart"]),
        ))
    }

    pub fn connector_tasks(&self, cluster: &str, name: &str) -> ApplicationResult<Vec<ConnectorTask>> {
        self.get_json(HttpRequest::new(
            Method::Get,
            connectors_path(cluster, &[name, "tasks"]),
        ))
    }

    pub fn connector_task_status(
        &self,
        cluster: &str,
        name: &str,
        task: u32,
    ) -> ApplicationResult<TaskStatus> {
        let task = task.to_string();
        self.get_json(HttpRequest::new(
            Method::Get,
            connectors_path(cluster, &[name, "tasks", task.as_str(), "status"]),
        ))
    }

    pub fn restart_connector_task(&self, cluster: &str, name: &str, task: u32) -> ApplicationResult<()> {
        let task = task.to_string();
        self.send_empty(HttpRequest::new(
            Method::Post,
            connectors_path(cluster, &[name, "tasks", task.as_str(), "restart"]),
        ))
    }

    pub fn delete_connector(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.send_empty(HttpRequest::new(Method::Delete, connectors_path(cluster, &[name])))
    }

    pub fn connector_plugins(&self, cluster: &str) -> ApplicationResult<Vec<ConnectorPlugin>> {
        self.get_json(HttpRequest::new(
            Method::Get,
            ["api", "proxy-connect", cluster, "connector-plugins"],
        ))
    }

    // ============================================================
    // Topics
    // ============================================================

    pub fn topics(&self) -> ApplicationResult<Vec<Topic>> {
        self.get_json(HttpRequest::new(Method::Get, topics_path(&[])))
    }

    pub fn topic_names(&self) -> ApplicationResult<Vec<String>> {
        self.get_json(HttpRequest::new(Method::Get, topics_path(&["names"])))
    }

    pub fn topic(&self, name: &str) -> ApplicationResult<Topic> {
        self.get_json(HttpRequest::new(Method::Get, topics_path(&[name])))
    }

    #[instrument(level = "debug", skip_all, fields(topic = %payload.topic_name))]
    pub fn create_topic(&self, payload: &CreateTopicPayload) -> ApplicationResult<()> {
        let body = to_body("topic", payload)?;
        self.send_empty(HttpRequest::new(Method::Post, topics_path(&[])).json(body))
    }

    #[instrument(level = "debug", skip_all, fields(topic = %payload.topic_name))]
    pub fn update_topic(&self, payload: &UpdateTopicPayload) -> ApplicationResult<()> {
        let body = to_body("topic", payload)?;
        self.send_empty(
            HttpRequest::new(Method::Put, topics_path(&[payload.topic_name.as_str()])).json(body),
        )
    }

    pub fn delete_topic(&self, name: &str) -> ApplicationResult<()> {
        self.send_empty(HttpRequest::new(Method::Delete, topics_path(&[name])))
    }

    /// Mark records of one partition for deletion up to `offset`.
    pub fn delete_topic_records(&self, name: &str, partition: u32, offset: u64) -> ApplicationResult<()> {
        let (partition, offset) = (partition.to_string(), offset.to_string());
        self.send_empty(HttpRequest::new(
            Method::Delete,
            topics_path(&[name, "partitions", partition.as_str(), "offsets", offset.as_str()]),
        ))
    }

    pub fn topic_config_keys(&self) -> ApplicationResult<Vec<String>> {
        self.get_json(HttpRequest::new(Method::Get, topics_path(&["config-keys"])))
    }

    pub fn topics_metadata(&self) -> ApplicationResult<Vec<TopicMetadata>> {
        self.get_json(HttpRequest::new(Method::Get, metadata_path(&[])))
    }

    pub fn topic_metadata(&self, name: &str) -> ApplicationResult<TopicMetadata> {
        self.get_json(HttpRequest::new(Method::Get, metadata_path(&[name])))
    }

    pub fn upsert_topic_metadata(&self, metadata: &TopicMetadata) -> ApplicationResult<()> {
        let body = to_body("topic metadata", metadata)?;
        self.send_empty(HttpRequest::new(Method::Post, metadata_path(&[])).json(body))
    }

    pub fn delete_topic_metadata(&self, name: &str) -> ApplicationResult<()> {
        self.send_empty(HttpRequest::new(Method::Delete, metadata_path(&[name])))
    }

    // ============================================================
    // Alerts
    // ============================================================

    pub fn alerts(&self, page_size: u32) -> ApplicationResult<Vec<Alert>> {
        let page: AlertPage = self.get_json(
            HttpRequest::new(Method::Get, ["api", "alerts"]).query("pageSize", page_size),
        )?;
        Ok(page.into())
    }

    /// Follow the server-sent alert stream, calling `handler` for every alert.
    ///
    /// Returns when the server closes the stream or `handler` fails.
    pub fn alerts_live(
        &self,
        handler: &mut dyn FnMut(Alert) -> ApplicationResult<()>,
    ) -> ApplicationResult<()> {
        let request = self.authorize(HttpRequest::new(Method::Get, ["api", "sse", "alerts"]))?;
        let mut failure = None;
        let mut on_line = |line: &str| -> bool {
            let Some(data) = line.strip_prefix("data:").map(str::trim) else {
                return true;
            };
            if data.is_empty() {
                return true;
            }
            match serde_json::from_str::<Alert>(data) {
                Ok(alert) => match handler(alert) {
                    Ok(()) => true,
                    Err(e) => {
                        failure = Some(e);
                        false
                    }
                },
                Err(e) => {
                    warn!("skipping undecodable alert event: {}", e);
                    true
                }
            }
        };

        let response = self
            .transport
            .stream(&request, &mut on_line)
            .map_err(|source| ApplicationError::Transport {
                context: request.to_string(),
                source,
            })?;
        check_status(&request, &response)?;
        failure.map_or(Ok(()), Err)
    }

    pub fn alert_settings(&self) -> ApplicationResult<AlertSettings> {
        self.get_json(HttpRequest::new(Method::Get, ["api", "alert-settings"]))
    }

    pub fn alert_setting(&self, id: i64) -> ApplicationResult<AlertSetting> {
        let id = id.to_string();
        self.get_json(HttpRequest::new(Method::Get, ["api", "alert-settings", id.as_str()]))
    }

    pub fn enable_alert_setting(&self, id: i64, enable: bool) -> ApplicationResult<()> {
        let id = id.to_string();
        self.send_empty(
            HttpRequest::new(Method::Put, ["api", "alert-settings", id.as_str()]).query("enable", enable),
        )
    }

    pub fn alert_setting_conditions(&self, id: i64) -> ApplicationResult<AlertSettingConditions> {
        let id = id.to_string();
        self.get_json(HttpRequest::new(
            Method::Get,
            ["api", "alert-settings", id.as_str(), "conditions"],
        ))
    }

    pub fn upsert_alert_setting_condition(&self, id: i64, condition: &str) -> ApplicationResult<()> {
        let id = id.to_string();
        self.send_empty(
            HttpRequest::new(Method::Post, ["api", "alert-settings", id.as_str(), "conditions"])
                .json(Value::String(condition.to_string())),
        )
    }

    pub fn delete_alert_setting_condition(&self, id: i64, uuid: &str) -> ApplicationResult<()> {
        let id = id.to_string();
        self.send_empty(HttpRequest::new(
            Method::Delete,
            ["api", "alert-settings", id.as_str(), "conditions", uuid],
        ))
    }

    // ============================================================
    // Datasets
    // ============================================================

    /// Set the description of a dataset; `None` removes it.
    pub fn update_dataset_description(
        &self,
        connection: &str,
        name: &str,
        description: Option<&str>,
    ) -> ApplicationResult<()> {
        let body = to_body(
            "dataset description",
            &DatasetDescriptionUpdate {
                description: description.map(str::to_string),
            },
        )?;
        self.send_empty(
            HttpRequest::new(
                Method::Put,
                ["api", "v1", "datasets", connection, name, "description"],
            )
            .json(body),
        )
    }

    /// Replace the tags of a dataset; an empty slice removes all tags.
    pub fn update_dataset_tags(
        &self,
        connection: &str,
        name: &str,
        tags: &[String],
    ) -> ApplicationResult<()> {
        let body = to_body("dataset tags", &DatasetTagsUpdate::new(tags))?;
        self.send_empty(
            HttpRequest::new(Method::Put, ["api", "v1", "datasets", connection, name, "tags"])
                .json(body),
        )
    }

    // ============================================================
    // Plumbing
    // ============================================================

    fn get_json<T: DeserializeOwned>(&self, request: HttpRequest) -> ApplicationResult<T> {
        let context = request.to_string();
        let response = self.execute(request)?;
        decode(&context, &response.body)
    }

    fn send_empty(&self, request: HttpRequest) -> ApplicationResult<()> {
        self.execute(request).map(|_| ())
    }

    fn execute(&self, request: HttpRequest) -> ApplicationResult<HttpResponse> {
        let request = self.authorize(request)?;
        self.round_trip(&request)
    }

    fn round_trip(&self, request: &HttpRequest) -> ApplicationResult<HttpResponse> {
        debug!("request: {}", request);
        let response = self
            .transport
            .send(request)
            .map_err(|source| ApplicationError::Transport {
                context: request.to_string(),
                source,
            })?;
        check_status(request, &response)?;
        Ok(response)
    }

    fn authorize(&self, request: HttpRequest) -> ApplicationResult<HttpRequest> {
        match &self.credentials {
            Credentials::Token(token) => Ok(request.header(TOKEN_HEADER, token.clone())),
            Credentials::Basic { user, password } => {
                let token = self.login(user, password)?;
                Ok(request.header(TOKEN_HEADER, token))
            }
            Credentials::Anonymous => Ok(request),
        }
    }

    /// Exchange user/password for a token once per client.
    fn login(&self, user: &str, password: &str) -> ApplicationResult<String> {
        let mut cached = self
            .token
            .lock()
            .map_err(|_| ApplicationError::config("session token lock poisoned"))?;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        debug!("login: user={}", user);
        let request = HttpRequest::new(Method::Post, ["api", "login"])
            .json(json!({ "user": user, "password": password }));
        let response = self.round_trip(&request)?;
        let token = session_token(&response.body);
        *cached = Some(token.clone());
        Ok(token)
    }
}

fn connectors_path<'a>(cluster: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["api", "proxy-connect", cluster, "connectors"];
    segments.extend_from_slice(rest);
    segments
}

fn topics_path<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["api", "v1", "kafka", "topics"];
    segments.extend_from_slice(rest);
    segments
}

fn metadata_path<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["api", "v1", "metadata", "topics"];
    segments.extend_from_slice(rest);
    segments
}

fn to_body<T: Serialize + ?Sized>(what: &str, value: &T) -> ApplicationResult<Value> {
    serde_json::to_value(value).map_err(|source| ApplicationError::Decode {
        context: format!("encode {what}"),
        source,
    })
}

fn decode<T: DeserializeOwned>(context: &str, body: &[u8]) -> ApplicationResult<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|source| ApplicationError::Decode {
        context: context.to_string(),
        source,
    })
}

fn check_status(request: &HttpRequest, response: &HttpResponse) -> ApplicationResult<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(RemoteError::new(response.status, request.to_string(), server_message(&response.body)).into())
}

/// Error text from a failed response: a JSON `message`/`error` field, or the raw body.
fn server_message(body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}

/// The login endpoint answers with the token as plain text, a JSON string, or `{"token": ..}`.
fn session_token(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::String(token)) => token,
        Ok(Value::Object(map)) => map
            .get("token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::from_utf8_lossy(body).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_json_error_body_when_extracting_message_then_uses_message_field() {
        assert_eq!(server_message(br#"{"message":"Topic exists"}"#), "Topic exists");
        assert_eq!(server_message(b"  plain failure \n"), "plain failure");
    }

    #[test]
    fn given_login_body_shapes_when_parsing_token_then_all_yield_token() {
        assert_eq!(session_token(br#""abc""#), "abc");
        assert_eq!(session_token(br#"{"token":"abc"}"#), "abc");
        assert_eq!(session_token(b"abc\n"), "abc");
    }

    #[test]
    fn given_token_and_user_when_building_credentials_then_token_wins() {
        let creds = Credentials::from_parts(
            Some("t".into()),
            Some("admin".into()),
            Some("secret".into()),
        );
        assert_eq!(creds, Credentials::Token("t".into()));
        assert_eq!(format!("{creds:?}"), "Token(***)");
    }

    #[test]
    fn given_paged_alerts_when_decoding_then_values_are_unwrapped() {
        let page: AlertPage = serde_json::from_str(r#"{"values":[{"alertId":1}]}"#).unwrap();
        let alerts: Vec<Alert> = page.into();
        assert_eq!(alerts[0].alert_id, 1);
    }
}
