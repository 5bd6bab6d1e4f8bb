//! Workout dashboard over a CSV export of activities.
//!
//! The binary in `main.rs` wires these modules to a CLI and an embedded web
//! server; integration tests use them directly.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod views;
pub mod web;
