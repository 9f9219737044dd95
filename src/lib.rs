//! # Leitstand Core Library
//!
//! This is the core library for Leitstand, the client-side state and
//! monitoring layer of a server-management dashboard. Leitstand keeps the
//! live view of a remote instance consistent: resource telemetry with alarm
//! evaluation, the directory listing of the built-in file manager and the
//! capability-gated actions on single entries.
//!
//! ## Architecture
//!
//! The crate is built using:
//! - **Tokio**: async runtime; the telemetry monitor runs as a task and all
//!   shared state lives in `watch` channels with a single writer each
//! - **tokio-util**: cancellation tokens for clean monitor teardown
//! - **Serde**: serialization/deserialization of the data model
//! - **config/dotenvy**: layered configuration from embedded defaults,
//!   local files and the environment
//! - **tracing**: structured logging with daily file rotation
//!
//! ## Core Components
//!
//! - [`api`]: the agent contract every backend implements
//! - [`config`]: application configuration management
//! - [`error`]: centralized error handling
//! - [`files`]: directory store and per-entry file actions
//! - [`logging`]: tracing subscriber setup
//! - [`monitor`]: fixed-interval telemetry polling with alarm evaluation
//! - [`paths`]: virtual path normalization
//! - [`session`]: the per-instance context wiring everything together
//! - [`types`]: data transfer objects and shared type definitions
//!
//! ## Features
//!
//! - Telemetry polling that never overlaps, never backs off and survives
//!   agent outages
//! - Alarm flags recomputed on every read against the latest limits
//! - Directory navigation where the most recently requested listing always
//!   wins, regardless of response order
//! - Rename, move, copy, delete and download on single entries with
//!   capability gating and a per-entry busy latch
//! - Reactive subscriptions (watch receivers and streams) for renderers

pub mod api;
pub mod config;
pub mod error;
pub mod files;
pub mod logging;
pub mod monitor;
pub mod paths;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;
