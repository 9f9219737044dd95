//! Shared test doubles and fixtures.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::api::AgentApi;
use crate::error::AppResult;
use crate::types::{DirectoryEntry, EntryKind, Instance, InstanceLimits, TelemetrySample};

/// One recorded call against [`MockAgent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentCall {
    FetchTelemetry,
    ListDirectory(String),
    RenameOrMove { from: String, to: String },
    CopyEntry(String),
    DeleteEntry(String),
    DownloadUrl(String),
}

type Gated<T> = (Option<Arc<Notify>>, T);

#[derive(Default)]
struct Queues {
    telemetry: VecDeque<Gated<AppResult<TelemetrySample>>>,
    listings: VecDeque<Gated<AppResult<Vec<DirectoryEntry>>>>,
    renames: VecDeque<Gated<AppResult<()>>>,
    copies: VecDeque<Gated<AppResult<()>>>,
    deletes: VecDeque<Gated<AppResult<()>>>,
    downloads: VecDeque<Gated<AppResult<String>>>,
    calls: Vec<AgentCall>,
}

/// Scriptable in-memory agent.
///
/// Results are queued per operation and consumed in order. A result pushed
/// through one of the `*_gated` methods is held back until the returned
/// [`Notify`] fires, which lets a test control resolution order exactly.
/// An empty queue parks the caller forever, standing in for a request that
/// never completes.
pub struct MockAgent {
    queues: Mutex<Queues>,
}

impl MockAgent {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { queues: Mutex::new(Queues::default()) })
    }

    pub fn calls(&self) -> Vec<AgentCall> {
        self.queues.lock().unwrap().calls.clone()
    }

    /// Paths of all `list_directory` calls, in order.
    pub fn listing_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AgentCall::ListDirectory(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn push_telemetry(&self, result: AppResult<TelemetrySample>) {
        self.queues.lock().unwrap().telemetry.push_back((None, result));
    }

    pub fn push_telemetry_gated(&self, result: AppResult<TelemetrySample>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.queues.lock().unwrap().telemetry.push_back((Some(gate.clone()), result));
        gate
    }

    pub fn push_listing(&self, result: AppResult<Vec<DirectoryEntry>>) {
        self.queues.lock().unwrap().listings.push_back((None, result));
    }

    pub fn push_listing_gated(&self, result: AppResult<Vec<DirectoryEntry>>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.queues.lock().unwrap().listings.push_back((Some(gate.clone()), result));
        gate
    }

    pub fn push_rename(&self, result: AppResult<()>) {
        self.queues.lock().unwrap().renames.push_back((None, result));
    }

    pub fn push_copy(&self, result: AppResult<()>) {
        self.queues.lock().unwrap().copies.push_back((None, result));
    }

    pub fn push_copy_gated(&self, result: AppResult<()>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.queues.lock().unwrap().copies.push_back((Some(gate.clone()), result));
        gate
    }

    pub fn push_delete(&self, result: AppResult<()>) {
        self.queues.lock().unwrap().deletes.push_back((None, result));
    }

    pub fn push_download(&self, result: AppResult<String>) {
        self.queues.lock().unwrap().downloads.push_back((None, result));
    }

    pub fn push_download_gated(&self, result: AppResult<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.queues.lock().unwrap().downloads.push_back((Some(gate.clone()), result));
        gate
    }

    fn record(&self, call: AgentCall) {
        self.queues.lock().unwrap().calls.push(call);
    }
}

async fn resolve<T>(queued: Option<Gated<T>>) -> T {
    match queued {
        Some((Some(gate), value)) => {
            gate.notified().await;
            value
        }
        Some((None, value)) => value,
        None => std::future::pending().await,
    }
}

#[async_trait]
impl AgentApi for MockAgent {
    async fn fetch_telemetry(&self, _instance: Uuid) -> AppResult<TelemetrySample> {
        self.record(AgentCall::FetchTelemetry);
        let queued = self.queues.lock().unwrap().telemetry.pop_front();
        resolve(queued).await
    }

    async fn list_directory(&self, _instance: Uuid, path: &str) -> AppResult<Vec<DirectoryEntry>> {
        self.record(AgentCall::ListDirectory(path.to_string()));
        let queued = self.queues.lock().unwrap().listings.pop_front();
        resolve(queued).await
    }

    async fn rename_or_move(&self, _instance: Uuid, from: &str, to: &str) -> AppResult<()> {
        self.record(AgentCall::RenameOrMove { from: from.to_string(), to: to.to_string() });
        let queued = self.queues.lock().unwrap().renames.pop_front();
        resolve(queued).await
    }

    async fn copy_entry(&self, _instance: Uuid, path: &str) -> AppResult<()> {
        self.record(AgentCall::CopyEntry(path.to_string()));
        let queued = self.queues.lock().unwrap().copies.pop_front();
        resolve(queued).await
    }

    async fn delete_entry(&self, _instance: Uuid, path: &str) -> AppResult<()> {
        self.record(AgentCall::DeleteEntry(path.to_string()));
        let queued = self.queues.lock().unwrap().deletes.pop_front();
        resolve(queued).await
    }

    async fn download_url(&self, _instance: Uuid, path: &str) -> AppResult<String> {
        self.record(AgentCall::DownloadUrl(path.to_string()));
        let queued = self.queues.lock().unwrap().downloads.pop_front();
        resolve(queued).await
    }
}

pub fn entry(uuid: Uuid, name: &str, kind: EntryKind) -> DirectoryEntry {
    DirectoryEntry {
        uuid,
        name: name.to_string(),
        kind,
        size: 1024,
        modified_at: Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap(),
    }
}

pub fn file(name: &str) -> DirectoryEntry {
    entry(Uuid::new_v4(), name, EntryKind::File)
}

pub fn sample(cpu: f64, memory_bytes: u64, disk_bytes: u64) -> TelemetrySample {
    TelemetrySample {
        cpu_usage_percent: cpu,
        memory_usage_in_bytes: memory_bytes,
        disk_usage_in_bytes: disk_bytes,
    }
}

pub fn limits(cpu: u64, memory: u64, disk: u64) -> InstanceLimits {
    InstanceLimits { cpu, memory, disk }
}

pub fn test_instance(limits: InstanceLimits) -> Instance {
    Instance {
        id: "a1b2c3d4".to_string(),
        uuid: Uuid::new_v4(),
        name: "test-instance".to_string(),
        limits,
        allocations: Vec::new(),
        is_installing: false,
        is_suspended: false,
    }
}
