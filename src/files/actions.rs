use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::api::AgentApi;
use crate::error::{validation, AppError, AppResult, OptionExt};
use crate::files::store::DirectoryStore;
use crate::paths;
use crate::types::{Capabilities, Capability, DirectoryEntry, FileAction, FileEditPrompt};

/// Actions an entry menu may offer under the given capability set.
///
/// Pure over its input. Downloading is always available; the other actions
/// require their capability.
pub fn allowed_actions(capabilities: &Capabilities) -> Vec<FileAction> {
    let mut actions = Vec::new();
    if capabilities.file_update {
        actions.push(FileAction::Rename);
        actions.push(FileAction::Move);
    }
    if capabilities.file_create {
        actions.push(FileAction::Copy);
    }
    if capabilities.file_delete {
        actions.push(FileAction::Delete);
    }
    actions.push(FileAction::Download);
    actions
}

/// Clears the busy flag when the running action leaves scope, on success,
/// error and unwind alike.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> AppResult<Self> {
        if flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return Err(AppError::Busy("another file action is still running".to_string()));
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Action surface for a single directory entry.
///
/// One handle backs one open entry menu. Capabilities are captured when the
/// handle is minted; mint a fresh handle after permission changes. The busy
/// flag serializes actions on the entry: a second call while one is running
/// is rejected with [`AppError::Busy`], and the flag is cleared on every
/// exit path.
///
/// Paths are resolved against the store at invocation time, so an entry
/// renamed since the menu opened is still targeted correctly. The entry and
/// its directory are read from one listing snapshot and never straddle a
/// concurrent fetch.
pub struct EntryActions {
    api: Arc<dyn AgentApi>,
    store: Arc<DirectoryStore>,
    instance: Uuid,
    entry_uuid: Uuid,
    capabilities: Capabilities,
    busy: AtomicBool,
}

impl EntryActions {
    pub fn new(
        api: Arc<dyn AgentApi>,
        store: Arc<DirectoryStore>,
        instance: Uuid,
        entry_uuid: Uuid,
        capabilities: Capabilities,
    ) -> Self {
        Self { api, store, instance, entry_uuid, capabilities, busy: AtomicBool::new(false) }
    }

    pub fn entry_uuid(&self) -> Uuid {
        self.entry_uuid
    }

    /// True while an action on this entry is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// The actions this handle may offer.
    pub fn allowed(&self) -> Vec<FileAction> {
        allowed_actions(&self.capabilities)
    }

    fn require(&self, capability: Capability) -> AppResult<()> {
        if !self.capabilities.allows(capability) {
            return Err(AppError::PermissionDenied(format!("requires {}", capability)));
        }
        Ok(())
    }

    /// Resolves the entry and the directory it currently lives in, both
    /// taken from the same listing snapshot.
    fn locate(&self) -> AppResult<(String, DirectoryEntry)> {
        let state = self.store.state();
        let entry = state
            .entries
            .iter()
            .find(|entry| entry.uuid == self.entry_uuid)
            .cloned()
            .ok_or_not_found("entry")?;
        Ok((state.path, entry))
    }

    /// Seeds the rename dialog for this entry.
    pub fn begin_rename(&self) -> AppResult<FileEditPrompt> {
        self.require(Capability::FileUpdate)?;
        let (_, entry) = self.locate()?;
        Ok(FileEditPrompt { entry, use_move_terminology: false })
    }

    /// Seeds the move dialog for this entry.
    pub fn begin_move(&self) -> AppResult<FileEditPrompt> {
        self.require(Capability::FileUpdate)?;
        let (_, entry) = self.locate()?;
        Ok(FileEditPrompt { entry, use_move_terminology: true })
    }

    /// Renames the entry. On success the listing is updated in place and
    /// the renamed entry is returned.
    ///
    /// A separator in `new_name` re-parents the entry; it then no longer
    /// belongs to the current listing and is removed from it instead.
    pub async fn submit_rename(&self, new_name: &str) -> AppResult<DirectoryEntry> {
        self.require(Capability::FileUpdate)?;
        validation::validate_entry_name(new_name)?;
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (dir, entry) = self.locate()?;
        let from = paths::join(&dir, &entry.name);
        let to = paths::join(&dir, new_name);
        self.api.rename_or_move(self.instance, &from, &to).await?;

        let (parent, name) = paths::split(&to);
        let mut renamed = entry;
        renamed.name = name;
        if parent == dir {
            self.store.upsert_entry(renamed.clone());
        } else {
            self.store.remove_entry(self.entry_uuid);
        }
        Ok(renamed)
    }

    /// Moves the entry into another directory. On success it disappears
    /// from the current listing.
    pub async fn submit_move(&self, to_directory: &str) -> AppResult<()> {
        self.require(Capability::FileUpdate)?;
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (dir, entry) = self.locate()?;
        let from = paths::join(&dir, &entry.name);
        let to = paths::join(to_directory, &entry.name);
        self.api.rename_or_move(self.instance, &from, &to).await?;

        if to != from {
            self.store.remove_entry(self.entry_uuid);
        }
        Ok(())
    }

    /// Copies the entry. The agent derives the copy's name, so on success
    /// the directory current at that moment is fetched once to pick it up.
    /// That directory may differ from the one the copy started in when the
    /// user navigated meanwhile.
    pub async fn copy(&self) -> AppResult<()> {
        self.require(Capability::FileCreate)?;
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (dir, entry) = self.locate()?;
        let source = paths::join(&dir, &entry.name);
        self.api.copy_entry(self.instance, &source).await?;

        let current = self.store.path();
        debug!("copy of {} finished, refreshing {}", source, current);
        self.store.fetch_directory(&current).await
    }

    /// Deletes the entry and removes it from the listing on success. On
    /// failure the listing keeps the entry.
    pub async fn delete(&self) -> AppResult<()> {
        self.require(Capability::FileDelete)?;
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (dir, entry) = self.locate()?;
        let target = paths::join(&dir, &entry.name);
        self.api.delete_entry(self.instance, &target).await?;

        self.store.remove_entry(self.entry_uuid);
        Ok(())
    }

    /// Requests a short-lived download URL for the entry. Available
    /// regardless of the capability set and never touches the listing.
    pub async fn download(&self) -> AppResult<String> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (dir, entry) = self.locate()?;
        let target = paths::join(&dir, &entry.name);
        self.api.download_url(self.instance, &target).await
    }
}
