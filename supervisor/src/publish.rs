//! Endpoint definition publishing.
//!
//! Exposes the hub's reachable endpoint to consumers and lets them re-query
//! after install/start/stop. Change notification is an explicit, manually
//! fired signal; nothing here watches the supervisor.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::HubSettings;
use crate::error::SupervisorError;
use crate::install::Installer;
use crate::supervise::Supervisor;

/// Version advertised with the hub definition.
const DEFINITION_VERSION: &str = "1.0";

/// A consumer-facing server definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerEndpoint {
    pub name: String,
    pub url: String,
    pub version: String,
}

/// Publishes hub endpoint definitions to consumers.
#[derive(Clone)]
pub struct DefinitionPublisher {
    settings: Arc<HubSettings>,
    installer: Installer,
    supervisor: Supervisor,
    changed: watch::Sender<u64>,
}

impl DefinitionPublisher {
    pub fn new(settings: Arc<HubSettings>, installer: Installer, supervisor: Supervisor) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            settings,
            installer,
            supervisor,
            changed,
        }
    }

    /// Definitions currently worth advertising: the hub endpoint when an
    /// installation is present (even if not running), nothing otherwise.
    pub fn definitions(&self) -> Vec<ServerEndpoint> {
        if !self.installer.is_present() {
            debug!("hub not installed, no definitions");
            return Vec::new();
        }

        vec![ServerEndpoint {
            name: "MCP Hub".to_string(),
            url: self.settings.mcp_url(),
            version: DEFINITION_VERSION.to_string(),
        }]
    }

    /// Make an endpoint usable: ensure the hub is running, then hand the
    /// definition back unchanged.
    pub async fn resolve(
        &self,
        endpoint: ServerEndpoint,
    ) -> Result<ServerEndpoint, SupervisorError> {
        if !self.supervisor.is_running().await {
            info!(url = %endpoint.url, "starting hub to resolve endpoint");
            self.supervisor.start().await?;
        }
        Ok(endpoint)
    }

    /// Signal subscribers that definitions may have changed. Fired manually
    /// after install/start/stop.
    pub fn notify_changed(&self) {
        self.changed.send_modify(|generation| *generation += 1);
    }

    /// Subscribe to change signals; re-query [`definitions`] on each tick.
    ///
    /// [`definitions`]: Self::definitions
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }
}
