//! Application-level orchestration.
//!
//! Owns the request lifecycle between the UI thread and the async runtime. The UI
//! keeps the query state; this module only runs requests and reports their outcome.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
