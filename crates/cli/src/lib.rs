//! `satwatch` library crate.
//!
//! Re-exports configuration, logging setup and the run loop for integration
//! testing. The binary entrypoint lives in `main.rs`.

pub mod app;
pub mod config;
pub mod logging;
