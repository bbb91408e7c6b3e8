// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can import types via `calcr::calc::*` / `calcr::store::*`.
// The UI modules are only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod calc;
pub mod config;
pub mod store;

// Private: only reachable from the binary, compiled here for their unit tests
mod app;
mod event;
mod logging;
mod ui;
