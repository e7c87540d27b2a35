//! E2E integration tests for ranmode-runner.
//!
//! These tests drive the full orchestrator (startup, session window,
//! teardown, outcome resolution) against scripted loopback doubles, and
//! spawn the built `ranmode-runner` binary for its exit-code contract.
//!
//! # Test Structure
//!
//! - `helpers/` -- Shared test utilities (config builder, rig, assertions)
//! - `scenarios/` -- Test files organized by scenario
//!
//! # Running
//!
//! ```bash
//! cargo test -p ranmode-runner --test e2e
//! ```

mod helpers;
mod scenarios;
