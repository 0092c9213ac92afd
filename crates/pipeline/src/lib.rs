//! Telemetry log ingestion around the violation tracker.
//!
//! [`parser`] turns delimited log lines into readings, [`processor`] drives
//! a reader or file through a [`satwatch_core::tracker::ViolationTracker`],
//! and [`report`] renders the collected alerts as JSON.

pub mod error;
pub mod parser;
pub mod processor;
pub mod report;
