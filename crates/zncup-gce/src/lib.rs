//! Google Compute Engine backend for zncup.
//!
//! Implements the [`zncup_cloud::ComputeApi`] trait against the Compute
//! Engine v1 REST API. Authentication is a bearer token, taken from the
//! environment when available and otherwise minted by the local gcloud
//! CLI.

pub mod auth;
pub mod client;
pub mod error;

pub use auth::access_token;
pub use client::GceClient;
pub use error::{GceError, Result};
