use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;
use uuid::Uuid;

use crate::api::AgentApi;
use crate::error::AppResult;
use crate::paths;
use crate::types::{DirectoryEntry, DirectoryState};

/// Authoritative holder of the directory listing shown for one instance.
///
/// All mutations funnel through one watch channel, so consumers observe
/// whole [`DirectoryState`] snapshots: the path and the entries always stem
/// from the same completed fetch.
///
/// Fetches may overlap when the user navigates quickly. Every fetch draws a
/// sequence number when issued and only the one holding the latest number
/// may publish its listing; slower responses for older requests are
/// discarded on arrival.
pub struct DirectoryStore {
    api: Arc<dyn AgentApi>,
    instance: Uuid,
    state: watch::Sender<DirectoryState>,
    /// Sequence number of the most recently issued fetch.
    issued: AtomicU64,
}

impl DirectoryStore {
    /// Creates a store rooted at `/` with an empty listing.
    pub fn new(api: Arc<dyn AgentApi>, instance: Uuid) -> Self {
        let (state, _) = watch::channel(DirectoryState::default());
        Self { api, instance, state, issued: AtomicU64::new(0) }
    }

    pub fn instance(&self) -> Uuid {
        self.instance
    }

    /// Normalizes `path`, lists it on the agent and publishes the result.
    ///
    /// Concurrent calls may resolve in any order; only the most recently
    /// issued call publishes. A failed call leaves the published state
    /// untouched and returns the error to its own caller, while a call
    /// overtaken by a newer one returns `Ok` and is dropped silently.
    pub async fn fetch_directory(&self, path: &str) -> AppResult<()> {
        let target = paths::normalize(path);
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let entries = self.api.list_directory(self.instance, &target).await?;

        let committed = self.state.send_if_modified(|state| {
            // Inside the closure the check and the write are one critical
            // section; a newer fetch cannot interleave between them.
            if self.issued.load(Ordering::SeqCst) != ticket {
                return false;
            }
            set_directory(state, target.clone(), entries);
            true
        });
        if !committed {
            debug!("discarding stale listing for {}", target);
        }
        Ok(())
    }

    /// Inserts an entry, or replaces the entry carrying the same uuid in
    /// place so its position in the listing is preserved.
    pub fn upsert_entry(&self, entry: DirectoryEntry) {
        self.state.send_modify(|state| {
            match state.entries.iter_mut().find(|e| e.uuid == entry.uuid) {
                Some(existing) => *existing = entry,
                None => state.entries.push(entry),
            }
        });
    }

    /// Removes the entry with the given uuid. Removing an absent uuid is a
    /// no-op and does not notify watchers.
    pub fn remove_entry(&self, uuid: Uuid) {
        self.state.send_if_modified(|state| {
            let before = state.entries.len();
            state.entries.retain(|e| e.uuid != uuid);
            state.entries.len() != before
        });
    }

    /// Snapshot of the current listing.
    pub fn state(&self) -> DirectoryState {
        self.state.borrow().clone()
    }

    /// The directory currently shown.
    pub fn path(&self) -> String {
        self.state.borrow().path.clone()
    }

    /// Looks up an entry by uuid in the current listing.
    pub fn entry(&self, uuid: Uuid) -> Option<DirectoryEntry> {
        self.state.borrow().entries.iter().find(|e| e.uuid == uuid).cloned()
    }

    /// Subscribes to listing changes. The receiver starts at the current
    /// value.
    pub fn subscribe(&self) -> watch::Receiver<DirectoryState> {
        self.state.subscribe()
    }

    /// Stream of listing changes for reactive consumers.
    pub fn updates(&self) -> WatchStream<DirectoryState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Invalidates every fetch still in flight; their responses are
    /// discarded when they arrive. Used on teardown and navigation resets.
    pub fn invalidate(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
    }
}

/// Replaces path and entries together. Only the fetch sequence calls this;
/// the pair must come from the same agent response.
fn set_directory(state: &mut DirectoryState, path: String, entries: Vec<DirectoryEntry>) {
    state.path = path;
    state.entries = entries;
}
