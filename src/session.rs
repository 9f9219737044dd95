use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::api::AgentApi;
use crate::config::AppConfig;
use crate::files::actions::EntryActions;
use crate::files::store::DirectoryStore;
use crate::monitor::TelemetryMonitor;
use crate::types::{Capabilities, Instance, MonitorSnapshot};

/// Everything the dashboard holds for one open instance: the telemetry
/// monitor, the directory listing and the viewer's capability set.
///
/// Sessions are explicit handles, not process-global state; two open
/// instances are two sessions. Dropping a session stops the monitor task
/// and invalidates listing fetches still in flight.
pub struct ServerSession {
    api: Arc<dyn AgentApi>,
    uuid: Uuid,
    monitor: TelemetryMonitor,
    store: Arc<DirectoryStore>,
    capabilities: watch::Sender<Capabilities>,
}

impl ServerSession {
    /// Opens a session: starts the telemetry monitor and prepares an empty
    /// listing rooted at `/`.
    pub fn open(
        instance: Instance,
        api: Arc<dyn AgentApi>,
        capabilities: Capabilities,
        cfg: &AppConfig,
    ) -> Self {
        let uuid = instance.uuid;
        debug!("opening session for {}", uuid);
        let monitor = TelemetryMonitor::spawn(instance, api.clone(), &cfg.monitor);
        let store = Arc::new(DirectoryStore::new(api.clone(), uuid));
        let (capabilities, _) = watch::channel(capabilities);
        Self { api, uuid, monitor, store, capabilities }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn monitor(&self) -> &TelemetryMonitor {
        &self.monitor
    }

    pub fn store(&self) -> &Arc<DirectoryStore> {
        &self.store
    }

    /// Snapshot of the monitor including freshly evaluated alarms.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.monitor.snapshot()
    }

    /// Replaces the instance record behind the monitor, e.g. after the
    /// panel delivered new limits or flags.
    pub fn set_instance(&self, instance: Instance) {
        self.monitor.set_instance(instance);
    }

    /// Replaces the viewer's capability set. Handles minted afterwards see
    /// the new set; already minted handles keep the one they captured.
    pub fn set_capabilities(&self, capabilities: Capabilities) {
        self.capabilities.send_replace(capabilities);
    }

    pub fn capabilities(&self) -> Capabilities {
        *self.capabilities.borrow()
    }

    pub fn subscribe_capabilities(&self) -> watch::Receiver<Capabilities> {
        self.capabilities.subscribe()
    }

    /// Mints the action handle for one entry menu, capturing the current
    /// capability set.
    pub fn entry_actions(&self, entry: Uuid) -> EntryActions {
        EntryActions::new(self.api.clone(), self.store.clone(), self.uuid, entry, self.capabilities())
    }

    /// Stops the monitor and invalidates listing fetches still in flight.
    /// Idempotent; also happens on drop.
    pub fn close(&self) {
        debug!("closing session for {}", self.uuid);
        self.monitor.stop();
        self.store.invalidate();
    }
}

impl Drop for ServerSession {
    fn drop(&mut self) {
        self.close();
    }
}
