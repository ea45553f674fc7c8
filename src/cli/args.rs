//! CLI argument definitions using clap
//!
//! Flags that a payload file may also provide are `Option`s: "not given" must stay
//! distinguishable from an explicit value. Required flags are checked after payload
//! resolution, so they are not marked `required` here.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::{OutputFormat, RawSettings};

/// Command-line client for the Lenses Kafka control plane
#[derive(Parser, Debug)]
#[command(name = "lenses-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Control plane URL
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub host: Option<String>,

    /// Session token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// User name, exchanged with --password for a token
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// No informational messages, only results and errors
    #[arg(long, global = true)]
    pub silent: bool,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Flags as the topmost settings layer.
    pub fn overrides(&self) -> RawSettings {
        RawSettings {
            host: self.host.clone(),
            token: self.token.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            timeout_secs: self.timeout,
            insecure: self.insecure.then_some(true),
            output: self.output,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List connectors, or all of them with --clusterName="*"
    #[command(visible_alias = "connect")]
    Connectors(ConnectorsArgs),

    /// Show and manage a connector
    Connector(ConnectorArgs),

    /// List topics
    Topics(TopicsArgs),

    /// Show and manage a topic
    Topic(TopicArgs),

    /// Print the registered alerts
    Alerts(AlertsArgs),

    /// Manage alert settings
    Alert {
        #[command(subcommand)]
        command: AlertCommands,
    },

    /// Manage dataset metadata
    Dataset {
        #[command(subcommand)]
        command: DatasetCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================
// Connectors
// ============================================================

#[derive(Args, Debug)]
pub struct ConnectorsArgs {
    /// Connect cluster, or "*" for every cluster
    #[arg(long = "clusterName", value_name = "CLUSTER")]
    pub cluster_name: Option<String>,

    /// Print connector names only
    #[arg(long)]
    pub names: bool,

    #[command(subcommand)]
    pub command: Option<ConnectorsCommands>,
}

#[derive(Subcommand, Debug)]
pub enum ConnectorsCommands {
    /// List available connector plugins
    Plugins {
        /// Connect cluster, or "*" for every cluster
        #[arg(long = "clusterName", value_name = "CLUSTER")]
        cluster_name: Option<String>,
    },

    /// List Connect clusters
    Clusters {
        /// Print cluster names only, one per line
        #[arg(long)]
        names: bool,

        /// With --names, omit the newline after the last name
        #[arg(long)]
        no_newline: bool,
    },
}

/// Identifies one connector.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorTarget {
    #[arg(long = "clusterName", value_name = "CLUSTER")]
    pub cluster_name: Option<String>,

    /// Connector name
    #[arg(long)]
    pub name: Option<String>,
}

impl ConnectorTarget {
    /// Fill values missing here from the parent command's flags.
    pub fn or(&self, parent: &ConnectorTarget) -> ConnectorTarget {
        ConnectorTarget {
            cluster_name: self
                .cluster_name
                .clone()
                .or_else(|| parent.cluster_name.clone()),
            name: self.name.clone().or_else(|| parent.name.clone()),
        }
    }
}

#[derive(Args, Debug)]
pub struct ConnectorArgs {
    #[command(flatten)]
    pub target: ConnectorTarget,

    #[command(subcommand)]
    pub command: Option<ConnectorCommands>,
}

#[derive(Subcommand, Debug)]
pub enum ConnectorCommands {
    /// Create a connector from flags or a YAML/JSON file
    Create(ConnectorWriteArgs),
    /// Update a connector's configuration from flags or a YAML/JSON file
    Update(ConnectorWriteArgs),
    /// Print the connector's configuration
    Config(ConnectorTarget),
    /// Print the connector's status
    Status(ConnectorTarget),
    /// Pause the connector
    Pause(ConnectorTarget),
    /// Resume a paused connector
    Resume(ConnectorTarget),
    /// Restart the connector
    Restart(ConnectorTarget),
    /// List the connector's tasks
    Tasks(ConnectorTarget),
    /// Delete the connector
    Delete(ConnectorTarget),
    /// Inspect or restart a single task
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Args, Debug)]
pub struct ConnectorWriteArgs {
    /// Payload file (YAML or JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub target: ConnectorTarget,

    /// Connector config as JSON, or a path to a YAML/JSON file
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Print a task's status
    Status(TaskArgs),
    /// Restart a task
    Restart(TaskArgs),
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(flatten)]
    pub target: ConnectorTarget,

    /// Task id
    #[arg(long)]
    pub task: Option<u32>,
}

// ============================================================
// Topics
// ============================================================

#[derive(Args, Debug)]
pub struct TopicsArgs {
    /// Print topic names only
    #[arg(long)]
    pub names: bool,

    /// With --names, print one name per line instead of a table or JSON
    #[arg(long)]
    pub unwrap: bool,

    #[command(subcommand)]
    pub command: Option<TopicsCommands>,
}

#[derive(Subcommand, Debug)]
pub enum TopicsCommands {
    /// List the supported topic config keys
    Keys {
        /// Print one key per line instead of a table or JSON
        #[arg(long)]
        unwrap: bool,
    },
    /// Show and manage topic metadata
    Metadata(MetadataArgs),
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Topic to show metadata for; all topics when omitted
    #[arg(long)]
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: Option<MetadataCommands>,
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommands {
    /// Create or update topic metadata from flags or a YAML/JSON file
    Set(MetadataSetArgs),
    /// Delete topic metadata
    Delete {
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct MetadataSetArgs {
    /// Payload file (YAML or JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub key_type: Option<String>,

    #[arg(long)]
    pub value_type: Option<String>,

    #[arg(long)]
    pub key_schema: Option<String>,

    #[arg(long)]
    pub value_schema: Option<String>,
}

#[derive(Args, Debug)]
pub struct TopicArgs {
    /// Topic name
    #[arg(long)]
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: Option<TopicCommands>,
}

#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// Create a topic from flags or a YAML/JSON file
    Create(TopicCreateArgs),
    /// Update a topic's configs or partitions
    Update(TopicUpdateArgs),
    /// Delete a topic, or its records up to an offset
    Delete(TopicDeleteArgs),
}

#[derive(Args, Debug)]
pub struct TopicCreateArgs {
    /// Payload file (YAML or JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    /// Replication factor [default: 1]
    #[arg(long)]
    pub replication: Option<u32>,

    /// Number of partitions [default: 1]
    #[arg(long)]
    pub partitions: Option<u32>,

    /// Topic configs as JSON, or a path to a YAML/JSON file
    #[arg(long)]
    pub configs: Option<String>,
}

#[derive(Args, Debug)]
pub struct TopicUpdateArgs {
    /// Payload file (YAML or JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    /// New number of partitions (can only be increased)
    #[arg(long)]
    pub partitions: Option<u32>,

    /// Topic configs as JSON, or a path to a YAML/JSON file
    #[arg(long)]
    pub configs: Option<String>,
}

#[derive(Args, Debug)]
pub struct TopicDeleteArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Delete records of this partition instead of the topic (requires --offset)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub partition: i32,

    /// Delete records up to this offset (requires --partition)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub offset: i64,
}

// ============================================================
// Alerts
// ============================================================

#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Follow alerts as they are raised
    #[arg(long)]
    pub live: bool,

    /// Number of alerts to fetch
    #[arg(long, default_value_t = 25)]
    pub page_size: u32,
}

#[derive(Subcommand, Debug)]
pub enum AlertCommands {
    /// Print all alert settings
    Settings,
    /// Print, enable or disable one alert setting
    Setting(SettingArgs),
}

#[derive(Args, Debug)]
pub struct SettingArgs {
    /// Alert setting id
    #[arg(long)]
    pub id: Option<i64>,

    /// Enable (or with --enable=false, disable) the setting
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub enable: Option<bool>,

    #[command(subcommand)]
    pub command: Option<SettingCommands>,
}

#[derive(Subcommand, Debug)]
pub enum SettingCommands {
    /// Print an alert setting's conditions
    Conditions {
        /// Alert setting id
        #[arg(long)]
        alert: Option<i64>,
    },
    /// Manage an alert setting's conditions
    Condition {
        #[command(subcommand)]
        command: ConditionCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConditionCommands {
    /// Create or update conditions from flags or a YAML/JSON file
    #[command(visible_aliases = ["create", "update"])]
    Set(ConditionSetArgs),
    /// Delete a condition by its UUID
    Delete {
        /// Alert setting id
        #[arg(long)]
        alert: Option<i64>,

        /// Condition UUID
        #[arg(long)]
        condition: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ConditionSetArgs {
    /// Payload file (YAML or JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Alert setting id
    #[arg(long)]
    pub alert: Option<i64>,

    /// Condition expression, e.g. "lag >= 100000 on group g and topic t"
    #[arg(long)]
    pub condition: Option<String>,
}

// ============================================================
// Datasets
// ============================================================

/// Identifies one dataset.
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetTarget {
    /// Connection the dataset belongs to
    #[arg(long)]
    pub connection: Option<String>,

    /// Dataset name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// Set a dataset's description
    UpdateDescription {
        #[command(flatten)]
        target: DatasetTarget,

        #[arg(long)]
        description: Option<String>,
    },
    /// Replace a dataset's tags
    UpdateTags {
        #[command(flatten)]
        target: DatasetTarget,

        /// Tag, can be repeated
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Remove a dataset's description
    RemoveDescription(DatasetTarget),
    /// Remove all tags of a dataset
    RemoveTags(DatasetTarget),
}

// ============================================================
// Config
// ============================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
    /// Show config file locations
    Path,
}
