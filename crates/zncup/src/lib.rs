//! CLI glue for the `znc-deploy` and `znc-undeploy` binaries.
//!
//! The binaries parse flags, validate local inputs, hand a request to
//! `zncup-cloud` and render the finished report. All cloud logic lives
//! in the library crates.

pub mod cli;
pub mod commands;
pub mod output;
pub mod utils;

/// Project id the flag defaults to until the user supplies a real one.
pub const PLACEHOLDER_PROJECT_ID: &str = "your-gcp-project-id-here";
