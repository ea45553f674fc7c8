//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ConnectorService, TopicService};
use crate::application::{ApplicationError, Credentials, LensesClient, PayloadResolver};
use crate::config::Settings;
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, Transport};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Remote client facade, shared by the services
    pub client: Arc<LensesClient>,

    pub payloads: PayloadResolver,
    pub connectors: ConnectorService,
    pub topics: TopicService,
}

impl ServiceContainer {
    /// Create a new service container talking to `settings.host`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        if settings.host.trim().is_empty() {
            return Err(ApplicationError::config(
                "no host configured; set --host, LENSES_HOST or host in the config file",
            )
            .into());
        }
        let transport =
            ReqwestTransport::new(&settings.host, settings.timeout(), settings.insecure)?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(transport),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let settings = Arc::new(settings);
        let credentials = Credentials::from_parts(
            settings.token.clone(),
            settings.user.clone(),
            settings.password.clone(),
        );
        let client = Arc::new(LensesClient::new(transport, credentials));

        Self {
            payloads: PayloadResolver::new(Arc::clone(&fs)),
            connectors: ConnectorService::new(Arc::clone(&client)),
            topics: TopicService::new(Arc::clone(&client)),
            settings,
            fs,
            client,
        }
    }
}
