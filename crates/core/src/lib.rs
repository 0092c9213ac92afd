//! Violation tracking domain logic.
//!
//! Everything in this crate is pure: readings go in, alerts come out. Line
//! parsing, file handling and report rendering live in `satwatch-pipeline`.

pub mod alert;
pub mod component_names;
pub mod driver;
pub mod error;
pub mod reading;
pub mod rules;
pub mod tracker;
pub mod types;
