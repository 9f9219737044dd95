//! File manager state and actions.
//!
//! This module owns everything the file manager shows and does for one
//! instance:
//!
//! - `store`: the directory listing as a single reactive state cell
//! - `actions`: capability-gated actions on individual entries
//!
//! The store is the only writer of listing state; actions go through it for
//! every mutation so consumers observe consistent snapshots.

pub mod actions;
pub mod store;

pub use actions::{allowed_actions, EntryActions};
pub use store::DirectoryStore;
