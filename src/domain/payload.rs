//! Create/update payload shapes and their flag overrides
//!
//! A payload is decoded as plain data first (from a file, or built from flags), and only then
//! are explicitly given flags applied on top. Flags are kept as `Option`s so that an omitted
//! flag never overwrites a value that came from a file.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ConnectorConfig, TopicMetadata};
use crate::domain::error::{DomainError, DomainResult};

/// A create/update body that can be resolved from a file, an inline flag, or flags.
pub trait Payload: DeserializeOwned {
    /// Explicit command-line values for this payload.
    type Flags;
    /// Shape of the inline flag content (`--config`, `--configs`); `()` when there is none.
    type Inline: DeserializeOwned;

    /// Build the payload when no file was given.
    fn from_flags(flags: &Self::Flags) -> Self;

    /// Raw inline flag value, if this payload has one and it was given.
    fn inline_flag(_flags: &Self::Flags) -> Option<&str> {
        None
    }

    /// Merge the inline flag content over what the file or flags provided.
    fn apply_inline(&mut self, _inline: Self::Inline) {}

    /// Apply explicit flags and fill defaults. Conflicts fail with [`DomainError::NameMismatch`].
    fn normalize(&mut self, flags: &Self::Flags) -> DomainResult<()>;
}

/// Fill `field` from the flag when empty; reject a flag that disagrees with a non-empty value.
pub fn reconcile(name: &str, field: &mut String, flag: Option<&str>) -> DomainResult<()> {
    match flag.filter(|f| !f.is_empty()) {
        None => Ok(()),
        Some(given) if field.is_empty() => {
            *field = given.to_string();
            Ok(())
        }
        Some(given) if field.as_str() == given => Ok(()),
        Some(given) => Err(DomainError::NameMismatch {
            field: name.to_string(),
            from_file: field.clone(),
            from_flag: given.to_string(),
        }),
    }
}

// ============================================================
// Connector
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorFlags {
    pub cluster: Option<String>,
    pub name: Option<String>,
    pub config: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorPayload {
    #[serde(alias = "clusterName")]
    pub cluster_alias: String,
    pub name: String,
    pub config: ConnectorConfig,
}

impl Payload for ConnectorPayload {
    type Flags = ConnectorFlags;
    type Inline = ConnectorConfig;

    fn from_flags(flags: &ConnectorFlags) -> Self {
        Self {
            cluster_alias: flags.cluster.clone().unwrap_or_default(),
            name: flags.name.clone().unwrap_or_default(),
            config: ConnectorConfig::new(),
        }
    }

    fn inline_flag(flags: &ConnectorFlags) -> Option<&str> {
        flags.config.as_deref()
    }

    fn apply_inline(&mut self, inline: ConnectorConfig) {
        self.config.extend(inline);
    }

    fn normalize(&mut self, flags: &ConnectorFlags) -> DomainResult<()> {
        reconcile("clusterName", &mut self.cluster_alias, flags.cluster.as_deref())?;
        reconcile("name", &mut self.name, flags.name.as_deref())?;
        self.apply_config_name()
    }
}

impl ConnectorPayload {
    /// Keep `config["name"]` and the connector name in agreement.
    pub fn apply_config_name(&mut self) -> DomainResult<()> {
        if self.name.is_empty() {
            if let Some(from_config) = self.config.get("name") {
                self.name = from_config.clone();
            }
            return Ok(());
        }
        match self.config.get("name") {
            None => {
                self.config.insert("name".to_string(), self.name.clone());
                Ok(())
            }
            Some(existing) if *existing == self.name => Ok(()),
            Some(existing) => Err(DomainError::NameMismatch {
                field: "name".to_string(),
                from_file: existing.clone(),
                from_flag: self.name.clone(),
            }),
        }
    }
}

// ============================================================
// Topics
// ============================================================

pub const DEFAULT_REPLICATION: u32 = 1;
pub const DEFAULT_PARTITIONS: u32 = 1;

pub type TopicConfigs = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTopicFlags {
    pub name: Option<String>,
    pub replication: Option<u32>,
    pub partitions: Option<u32>,
    pub configs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTopicPayload {
    #[serde(alias = "name")]
    pub topic_name: String,
    pub replication: Option<u32>,
    pub partitions: Option<u32>,
    pub configs: TopicConfigs,
}

impl Payload for CreateTopicPayload {
    type Flags = CreateTopicFlags;
    type Inline = TopicConfigs;

    fn from_flags(flags: &CreateTopicFlags) -> Self {
        Self {
            topic_name: flags.name.clone().unwrap_or_default(),
            replication: flags.replication,
            partitions: flags.partitions,
            configs: TopicConfigs::new(),
        }
    }

    fn inline_flag(flags: &CreateTopicFlags) -> Option<&str> {
        flags.configs.as_deref()
    }

    fn apply_inline(&mut self, inline: TopicConfigs) {
        self.configs.extend(inline);
    }

    fn normalize(&mut self, flags: &CreateTopicFlags) -> DomainResult<()> {
        reconcile("name", &mut self.topic_name, flags.name.as_deref())?;
        self.replication = self
            .replication
            .or(flags.replication)
            .or(Some(DEFAULT_REPLICATION));
        self.partitions = self
            .partitions
            .or(flags.partitions)
            .or(Some(DEFAULT_PARTITIONS));
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTopicFlags {
    pub name: Option<String>,
    pub partitions: Option<u32>,
    pub configs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTopicPayload {
    #[serde(alias = "name")]
    pub topic_name: String,
    /// Partitions can only be increased; `None` leaves them untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions: Option<u32>,
    pub configs: TopicConfigs,
}

impl Payload for UpdateTopicPayload {
    type Flags = UpdateTopicFlags;
    type Inline = TopicConfigs;

    fn from_flags(flags: &UpdateTopicFlags) -> Self {
        Self {
            topic_name: flags.name.clone().unwrap_or_default(),
            partitions: flags.partitions,
            configs: TopicConfigs::new(),
        }
    }

    fn inline_flag(flags: &UpdateTopicFlags) -> Option<&str> {
        flags.configs.as_deref()
    }

    fn apply_inline(&mut self, inline: TopicConfigs) {
        self.configs.extend(inline);
    }

    fn normalize(&mut self, flags: &UpdateTopicFlags) -> DomainResult<()> {
        reconcile("name", &mut self.topic_name, flags.name.as_deref())?;
        if self.partitions.is_none() {
            self.partitions = flags.partitions.filter(|p| *p > 0);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicMetadataFlags {
    pub name: Option<String>,
    pub key_type: Option<String>,
    pub value_type: Option<String>,
    pub key_schema: Option<String>,
    pub value_schema: Option<String>,
}

impl Payload for TopicMetadata {
    type Flags = TopicMetadataFlags;
    type Inline = ();

    fn from_flags(flags: &TopicMetadataFlags) -> Self {
        Self {
            topic_name: flags.name.clone().unwrap_or_default(),
            key_type: flags.key_type.clone().unwrap_or_default(),
            value_type: flags.value_type.clone().unwrap_or_default(),
            key_schema_raw: flags.key_schema.clone().unwrap_or_default(),
            value_schema_raw: flags.value_schema.clone().unwrap_or_default(),
        }
    }

    fn normalize(&mut self, flags: &TopicMetadataFlags) -> DomainResult<()> {
        reconcile("name", &mut self.topic_name, flags.name.as_deref())?;
        fill(&mut self.key_type, &flags.key_type);
        fill(&mut self.value_type, &flags.value_type);
        fill(&mut self.key_schema_raw, &flags.key_schema);
        fill(&mut self.value_schema_raw, &flags.value_schema);
        Ok(())
    }
}

fn fill(field: &mut String, flag: &Option<String>) {
    if field.is_empty() {
        if let Some(value) = flag {
            field.clone_from(value);
        }
    }
}

// ============================================================
// Alert setting conditions
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertConditionFlags {
    pub alert: Option<i64>,
    pub condition: Option<String>,
}

/// One or many conditions for a single alert setting.
///
/// Files may carry a list under `conditions`; the `--condition` flag adds a single one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertConditionPayload {
    #[serde(alias = "alert")]
    pub alert_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub conditions: Vec<String>,
}

impl AlertConditionPayload {
    /// All conditions to submit, single condition first.
    pub fn all_conditions(&self) -> Vec<String> {
        self.condition
            .iter()
            .chain(self.conditions.iter())
            .filter(|c| !c.trim().is_empty())
            .cloned()
            .collect()
    }
}

impl Payload for AlertConditionPayload {
    type Flags = AlertConditionFlags;
    type Inline = ();

    fn from_flags(flags: &AlertConditionFlags) -> Self {
        Self {
            alert_id: flags.alert.unwrap_or_default(),
            condition: flags.condition.clone(),
            conditions: Vec::new(),
        }
    }

    fn normalize(&mut self, flags: &AlertConditionFlags) -> DomainResult<()> {
        match flags.alert.filter(|id| *id != 0) {
            Some(id) if self.alert_id == 0 => self.alert_id = id,
            Some(id) if self.alert_id != id => {
                return Err(DomainError::NameMismatch {
                    field: "alert".to_string(),
                    from_file: self.alert_id.to_string(),
                    from_flag: id.to_string(),
                })
            }
            _ => {}
        }
        if self.condition.is_none() {
            self.condition = flags.condition.clone();
        }
        Ok(())
    }
}
