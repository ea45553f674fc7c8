//! Connector service
//!
//! Wraps the connector endpoints with cluster fan-out and not-found hints.
//! `--clusterName="*"` expands to every known Connect cluster; members are queried
//! sequentially, and a failing member is logged and left out of the result.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::client::LensesClient;
use crate::application::error_ext::RemoteResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    ConnectCluster, Connector, ConnectorConfig, ConnectorPayload, ConnectorPlugin,
    ConnectorStatus, ConnectorTask, DomainError, TaskStatus,
};

/// Cluster name selecting every known Connect cluster.
pub const ALL_CLUSTERS: &str = "*";

/// Per-cluster results of a fan-out, in cluster order.
#[derive(Debug)]
pub struct FanOut<T> {
    pub items: Vec<(String, T)>,
    pub failures: Vec<(String, ApplicationError)>,
}

impl<T> FanOut<T> {
    fn single(cluster: &str, item: T) -> Self {
        Self {
            items: vec![(cluster.to_string(), item)],
            failures: Vec::new(),
        }
    }

    /// Summary error when some, but not necessarily all, clusters failed.
    pub fn partial_error(&self) -> Option<ApplicationError> {
        if self.failures.is_empty() {
            return None;
        }
        Some(ApplicationError::PartialFanout {
            failed: self.failures.iter().map(|(c, _)| c.clone()).collect(),
            total: self.items.len() + self.failures.len(),
        })
    }

    /// Fail with the first member error when no cluster succeeded.
    fn into_result(mut self) -> ApplicationResult<Self> {
        if self.items.is_empty() && !self.failures.is_empty() {
            let (_, first) = self.failures.swap_remove(0);
            return Err(first);
        }
        Ok(self)
    }
}

impl<T> FanOut<Vec<T>> {
    pub fn flatten(self) -> Vec<T> {
        self.items.into_iter().flat_map(|(_, items)| items).collect()
    }
}

pub struct ConnectorService {
    client: Arc<LensesClient>,
}

impl ConnectorService {
    pub fn new(client: Arc<LensesClient>) -> Self {
        Self { client }
    }

    pub fn clusters(&self) -> ApplicationResult<Vec<ConnectCluster>> {
        self.client.connect_clusters()
    }

    /// Connector names per cluster.
    pub fn connector_names(&self, cluster: &str) -> ApplicationResult<FanOut<Vec<String>>> {
        self.fan_out(cluster, |c| self.client.connector_names(c))
    }

    /// Full connector descriptions per cluster.
    ///
    /// A connector that cannot be read is logged and skipped.
    #[instrument(level = "debug", skip(self))]
    pub fn connectors(&self, cluster: &str) -> ApplicationResult<FanOut<Vec<Connector>>> {
        self.fan_out(cluster, |c| {
            let names = self.client.connector_names(c)?;
            let mut connectors = Vec::with_capacity(names.len());
            for name in names {
                match self.client.connector(c, &name) {
                    Ok(connector) => connectors.push(connector),
                    Err(e) => warn!("get connector {}:{} failed: {}", c, name, e),
                }
            }
            Ok(connectors)
        })
    }

    /// Installed plugins per cluster, with a placeholder for missing versions.
    pub fn plugins(&self, cluster: &str) -> ApplicationResult<FanOut<Vec<ConnectorPlugin>>> {
        self.fan_out(cluster, |c| {
            Ok(self
                .client
                .connector_plugins(c)?
                .into_iter()
                .map(ConnectorPlugin::with_version_placeholder)
                .collect())
        })
    }

    pub fn connector(&self, cluster: &str, name: &str) -> ApplicationResult<Connector> {
        self.client
            .connector(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn create(&self, payload: &ConnectorPayload) -> ApplicationResult<Connector> {
        debug!("create: {}:{}", payload.cluster_alias, payload.name);
        self.client
            .create_connector(&payload.cluster_alias, &payload.name, &payload.config)
    }

    /// Update the config of an existing connector and return the updated connector.
    ///
    /// The existing connector's `config["name"]`, when present, must equal the payload name.
    pub fn update(&self, payload: &ConnectorPayload) -> ApplicationResult<Connector> {
        let (cluster, name) = (payload.cluster_alias.as_str(), payload.name.as_str());
        debug!("update: {}:{}", cluster, name);

        let existing = self.connector(cluster, name)?;
        if let Some(existing_name) = existing.config.get("name") {
            if existing_name != name {
                return Err(DomainError::ConnectorNameConflict {
                    given: name.to_string(),
                    existing: existing_name.clone(),
                }
                .into());
            }
        }

        self.client
            .update_connector(cluster, name, &payload.config)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn config(&self, cluster: &str, name: &str) -> ApplicationResult<ConnectorConfig> {
        self.client
            .connector_config(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn status(&self, cluster: &str, name: &str) -> ApplicationResult<ConnectorStatus> {
        self.client
            .connector_status(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn pause(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.client
            .pause_connector(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn resume(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.client
            .resume_connector(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn restart(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.client
            .restart_connector(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn tasks(&self, cluster: &str, name: &str) -> ApplicationResult<Vec<ConnectorTask>> {
        self.client
            .connector_tasks(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    pub fn task_status(&self, cluster: &str, name: &str, task: u32) -> ApplicationResult<TaskStatus> {
        self.client
            .connector_task_status(cluster, name, task)
            .not_found_hint(|| missing_task(cluster, name, task))
    }

    pub fn restart_task(&self, cluster: &str, name: &str, task: u32) -> ApplicationResult<()> {
        self.client
            .restart_connector_task(cluster, name, task)
            .not_found_hint(|| missing_task(cluster, name, task))
    }

    pub fn delete(&self, cluster: &str, name: &str) -> ApplicationResult<()> {
        self.client
            .delete_connector(cluster, name)
            .not_found_hint(|| missing(cluster, name))
    }

    /// Run `op` against one cluster, or against every cluster for [`ALL_CLUSTERS`].
    ///
    /// A single cluster fails fast. For `*`, the cluster listing must succeed; member
    /// failures are logged and collected, unless every member failed.
    fn fan_out<T, F>(&self, cluster: &str, op: F) -> ApplicationResult<FanOut<T>>
    where
        F: Fn(&str) -> ApplicationResult<T>,
    {
        if cluster != ALL_CLUSTERS {
            return Ok(FanOut::single(cluster, op(cluster)?));
        }

        let clusters = self.client.connect_clusters()?;
        debug!("fan_out: {} clusters", clusters.len());
        let mut result = FanOut {
            items: Vec::with_capacity(clusters.len()),
            failures: Vec::new(),
        };
        for ConnectCluster { name, .. } in clusters {
            match op(&name) {
                Ok(item) => result.items.push((name, item)),
                Err(e) => {
                    warn!("cluster {}: {}", name, e);
                    result.failures.push((name, e));
                }
            }
        }
        result.into_result()
    }
}

fn missing(cluster: &str, name: &str) -> String {
    format!("connector '{cluster}:{name}' does not exist")
}

fn missing_task(cluster: &str, name: &str, task: u32) -> String {
    format!("task {task} of connector '{cluster}:{name}' does not exist")
}
