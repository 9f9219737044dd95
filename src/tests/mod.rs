//! Unit and integration tests for the Leitstand core.
//!
//! This module organizes all test modules for the crate, providing coverage
//! for the monitoring, listing and file action components.
//!
//! ## Test Modules
//!
//! - **paths_tests**: Path normalization, joining and splitting
//! - **types_tests**: Wire format and helpers of the data model
//! - **monitor_tests**: Telemetry polling, alarm evaluation and teardown
//! - **store_tests**: Directory listing state and stale-response handling
//! - **actions_tests**: Capability gating, busy latch and store follow-ups
//! - **session_tests**: Wiring of monitor, store and capability cell
//! - **config_tests**: Configuration loading and validation
//! - **error_tests**: Error display and conversions
//!
//! ## Running Tests
//!
//! Tests can be run using:
//! ```bash
//! cargo test
//! ```
//!
//! Individual test modules can be run with:
//! ```bash
//! cargo test store_tests
//! cargo test monitor_tests
//! # etc.
//! ```

pub mod support;
