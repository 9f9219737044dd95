use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::types::{DirectoryEntry, TelemetrySample};

/// Contract against the node agent hosting the instances.
///
/// The crate only depends on this trait; concrete transports (and the test
/// doubles) supply the implementation. All paths are virtual instance
/// paths that the caller has already normalized.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Fetches the current resource usage of an instance.
    async fn fetch_telemetry(&self, instance: Uuid) -> AppResult<TelemetrySample>;

    /// Lists the entries of a directory.
    async fn list_directory(&self, instance: Uuid, path: &str) -> AppResult<Vec<DirectoryEntry>>;

    /// Renames or moves a single entry. `from` and `to` are full paths, so
    /// the same call covers both an in-place rename and a move.
    async fn rename_or_move(&self, instance: Uuid, from: &str, to: &str) -> AppResult<()>;

    /// Copies an entry next to itself. The agent derives the copy's name.
    async fn copy_entry(&self, instance: Uuid, path: &str) -> AppResult<()>;

    /// Deletes an entry.
    async fn delete_entry(&self, instance: Uuid, path: &str) -> AppResult<()>;

    /// Returns a short-lived signed URL for downloading a file.
    async fn download_url(&self, instance: Uuid, path: &str) -> AppResult<String>;
}
