//! Access token lookup
//!
//! Tokens come from the environment when present, otherwise from the
//! locally authenticated gcloud CLI. Compute Engine OAuth tokens are
//! short-lived; a token fetched at startup covers a full run.

use crate::error::{GceError, Result};
use std::process::Stdio;
use tokio::process::Command;

const TOKEN_ENV_VARS: [&str; 2] = ["GCE_ACCESS_TOKEN", "GOOGLE_OAUTH_ACCESS_TOKEN"];

/// Resolve an OAuth access token for the Compute API.
pub async fn access_token() -> Result<String> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                tracing::debug!("using access token from {var}");
                return Ok(token);
            }
        }
    }

    gcloud_token().await
}

/// Ask the gcloud CLI for a token.
async fn gcloud_token() -> Result<String> {
    tracing::debug!("running: gcloud auth print-access-token");

    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GceError::MissingToken,
            _ => GceError::Io(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GceError::GcloudFailed(stderr.trim().to_string()));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(GceError::MissingToken);
    }
    Ok(token)
}
