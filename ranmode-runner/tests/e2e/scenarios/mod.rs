//! E2E test scenarios.

mod diagnostics;
mod end_to_end;
mod startup_failure;
