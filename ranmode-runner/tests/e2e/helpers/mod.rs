//! Shared E2E test helpers.
//!
//! Provides reusable utilities for building session parameters and
//! configuration files, wiring loopback doubles into an orchestrator,
//! and asserting on resolved outcomes.

pub mod assertions;
pub mod config;
pub mod rig;
