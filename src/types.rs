use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fraction of a limit at which the matching alarm trips.
const ALARM_THRESHOLD: f64 = 0.90;
/// Limits are given in decimal megabytes, not mebibytes.
const BYTES_PER_MEGABYTE: f64 = 1_000_000.0;

/// Resource limits assigned to an instance. A value of `0` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InstanceLimits {
    /// CPU budget in percent, where 100 equals one full core.
    pub cpu: u64,
    /// Memory budget in decimal megabytes.
    pub memory: u64,
    /// Disk budget in decimal megabytes.
    pub disk: u64,
}

/// A network endpoint allocated to an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAllocation {
    pub ip: String,
    pub alias: Option<String>,
    pub port: u16,
    pub is_default: bool,
}

/// The panel-side record of a managed instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Short human-facing identifier.
    pub id: String,
    /// Stable identity used for all agent calls.
    pub uuid: Uuid,
    pub name: String,
    pub limits: InstanceLimits,
    pub allocations: Vec<NetworkAllocation>,
    pub is_installing: bool,
    pub is_suspended: bool,
}

/// One resource-usage reading reported by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TelemetrySample {
    pub cpu_usage_percent: f64,
    pub memory_usage_in_bytes: u64,
    pub disk_usage_in_bytes: u64,
}

/// Alarm flags derived from a telemetry sample and the instance limits.
///
/// Alarms are never stored. They are recomputed from the latest sample and
/// the latest limits on every read, so a changed limit is reflected without
/// waiting for the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AlarmState {
    pub cpu: bool,
    pub memory: bool,
    pub disk: bool,
}

impl AlarmState {
    /// Evaluates the alarm flags for a sample. A limit of `0` is unlimited
    /// and never trips its alarm.
    pub fn evaluate(limits: &InstanceLimits, sample: &TelemetrySample) -> Self {
        let cpu = limits.cpu != 0 && sample.cpu_usage_percent >= limits.cpu as f64 * ALARM_THRESHOLD;
        let memory = limits.memory != 0
            && sample.memory_usage_in_bytes as f64
                >= limits.memory as f64 * BYTES_PER_MEGABYTE * ALARM_THRESHOLD;
        let disk = limits.disk != 0
            && sample.disk_usage_in_bytes as f64
                >= limits.disk as f64 * BYTES_PER_MEGABYTE * ALARM_THRESHOLD;
        Self { cpu, memory, disk }
    }

    pub fn any(&self) -> bool {
        self.cpu || self.memory || self.disk
    }
}

/// Connection state of the telemetry feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorStatus {
    /// No poll has completed yet.
    Loading,
    /// The most recent poll succeeded.
    Ready,
    /// The most recent poll failed. A previously fetched sample, if any,
    /// stays available.
    Error,
}

/// The state cell published by the telemetry monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryState {
    pub status: MonitorStatus,
    pub sample: Option<TelemetrySample>,
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self { status: MonitorStatus::Loading, sample: None }
    }
}

/// How an instance row should present itself when asked right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    Loading,
    Installing,
    Suspended,
    ConnectionError,
    Ready,
}

/// Point-in-time view of one instance: record, feed status, last sample and
/// freshly evaluated alarms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub instance: Instance,
    pub status: MonitorStatus,
    pub sample: Option<TelemetrySample>,
    pub alarms: AlarmState,
}

impl MonitorSnapshot {
    /// Classifies the row for rendering.
    ///
    /// A usable sample always renders as `Ready`, even when the latest poll
    /// failed. Without a sample, install state wins over suspension and
    /// suspension over a plain connection error.
    pub fn display_state(&self) -> DisplayState {
        if self.sample.is_some() {
            return DisplayState::Ready;
        }
        match self.status {
            MonitorStatus::Loading => DisplayState::Loading,
            _ => {
                if self.instance.is_installing {
                    DisplayState::Installing
                } else if self.instance.is_suspended {
                    DisplayState::Suspended
                } else {
                    DisplayState::ConnectionError
                }
            }
        }
    }
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// One row of a directory listing as reported by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Listing-local identity; survives renames within one listing.
    pub uuid: Uuid,
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes as reported by the agent.
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

impl DirectoryEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// The listing published by the directory store.
///
/// `path` and `entries` always stem from the same completed fetch, so a
/// consumer never observes a path paired with another directory's entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryState {
    /// Normalized absolute path of the listed directory.
    pub path: String,
    pub entries: Vec<DirectoryEntry>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self { path: "/".to_string(), entries: Vec::new() }
    }
}

/// Permission atoms relevant to file actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    FileUpdate,
    FileCreate,
    FileDelete,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::FileUpdate => "file.update",
            Capability::FileCreate => "file.create",
            Capability::FileDelete => "file.delete",
        };
        f.write_str(s)
    }
}

/// The capability set granted to the session's viewer.
///
/// The crate treats this as an opaque fact; how permissions are computed is
/// the panel's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Capabilities {
    pub file_update: bool,
    pub file_create: bool,
    pub file_delete: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self { file_update: true, file_create: true, file_delete: true }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::FileUpdate => self.file_update,
            Capability::FileCreate => self.file_create,
            Capability::FileDelete => self.file_delete,
        }
    }
}

/// Actions an entry menu can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    Rename,
    Move,
    Copy,
    Delete,
    Download,
}

/// Seed for the rename/move dialog: the entry being edited and whether the
/// dialog should speak of moving instead of renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEditPrompt {
    pub entry: DirectoryEntry,
    pub use_move_terminology: bool,
}
