//! Session facade tying the components together.
//!
//! One `HubSession` per embedding instance (editor window, CLI invocation).
//! Activation runs the whole flow: prerequisite gating, install when absent,
//! ownership claim, start when owning, definition publishing.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::HubSettings;
use crate::error::ActivationError;
use crate::install::Installer;
use crate::owner::{Coordinator, OwnershipStore};
use crate::prereq::{Prereqs, Prerequisite};
use crate::publish::DefinitionPublisher;
use crate::runner::{CommandRunner, DefaultCommandRunner};
use crate::supervise::{ProcessControl, Supervisor, SystemProcessControl};

/// Outcome of a successful activation.
#[derive(Debug, Clone, Copy)]
pub struct Activation {
    /// Whether this instance claimed ownership (and therefore started the
    /// hub when it was down).
    pub owner: bool,
}

/// A supervisor instance with its own identity and ownership claim.
pub struct HubSession {
    instance_id: String,
    prereqs: Prereqs,
    installer: Installer,
    supervisor: Supervisor,
    coordinator: Coordinator,
    publisher: DefinitionPublisher,
}

impl HubSession {
    /// Session with the real command runner and process control.
    pub fn new(settings: Arc<HubSettings>, store: Arc<dyn OwnershipStore>) -> Self {
        Self::with_parts(
            settings,
            store,
            Arc::new(DefaultCommandRunner),
            Arc::new(SystemProcessControl),
        )
    }

    /// Session with injected seams (tests, embedders with custom execution).
    pub fn with_parts(
        settings: Arc<HubSettings>,
        store: Arc<dyn OwnershipStore>,
        runner: Arc<dyn CommandRunner>,
        control: Arc<dyn ProcessControl>,
    ) -> Self {
        let prereqs = Prereqs::new(runner.clone());
        let installer = Installer::new(settings.clone(), runner.clone());
        let supervisor = Supervisor::new(settings.clone(), installer.clone(), runner, control);
        let coordinator = Coordinator::new(store);
        let publisher =
            DefinitionPublisher::new(settings, installer.clone(), supervisor.clone());
        Self {
            instance_id: Uuid::new_v4().to_string(),
            prereqs,
            installer,
            supervisor,
            coordinator,
            publisher,
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn prereqs(&self) -> &Prereqs {
        &self.prereqs
    }

    pub fn installer(&self) -> &Installer {
        &self.installer
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn publisher(&self) -> &DefinitionPublisher {
        &self.publisher
    }

    /// Bring the hub up for this session.
    ///
    /// Halts on a missing prerequisite; resolving that is up to the user,
    /// never retried automatically. Installs when absent. Claims ownership
    /// and starts the hub only when the claim succeeds; a non-owning
    /// activation still returns Ok, the hub just belongs to someone else.
    pub async fn activate(&self) -> Result<Activation, ActivationError> {
        if !self.prereqs.has_interpreter() {
            return Err(ActivationError::PrerequisiteMissing(
                Prerequisite::Interpreter,
            ));
        }
        if !self.prereqs.has_container_runtime() {
            return Err(ActivationError::PrerequisiteMissing(
                Prerequisite::ContainerRuntime,
            ));
        }

        if !self.installer.is_installed()? {
            info!("hub not installed, installing");
            self.installer.install()?;
            self.publisher.notify_changed();
        }

        let running = self.supervisor.is_running().await;
        let owner = self.coordinator.try_claim(&self.instance_id, running).await;

        if owner && !running {
            match self.supervisor.start().await {
                Ok(()) => self.publisher.notify_changed(),
                Err(e) => {
                    // Failed to start what we claimed; hand the claim back so
                    // another instance can try.
                    self.coordinator.release(&self.instance_id).await;
                    return Err(e.into());
                }
            }
        }

        Ok(Activation { owner })
    }

    /// Tear the session down. Stops the hub only when this instance owns it;
    /// a non-owner leaves the shared hub alone.
    pub async fn deactivate(&self) -> Result<(), ActivationError> {
        let owner = self.coordinator.current_owner().await;
        if owner.as_deref() != Some(self.instance_id.as_str()) {
            return Ok(());
        }

        if let Err(e) = self.supervisor.stop().await {
            warn!(error = %e, "failed to stop hub during deactivation");
            self.coordinator.release(&self.instance_id).await;
            return Err(e.into());
        }
        self.coordinator.release(&self.instance_id).await;
        self.publisher.notify_changed();
        Ok(())
    }
}
