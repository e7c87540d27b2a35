//! ranmode runner library.
//!
//! Exposes the orchestration stages for integration testing.
//! In production, `ranmode-runner` is used as a binary (main.rs).

pub mod cli;
pub mod logging;
pub mod loopback;
pub mod metrics_server;
pub mod orchestrator;
pub mod report;
pub mod session;
pub mod shutdown;
pub mod startup;
