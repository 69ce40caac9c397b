//! Compute Engine backend error types

use thiserror::Error;
use zncup_cloud::CloudError;

#[derive(Error, Debug)]
pub enum GceError {
    #[error("no access token: set GCE_ACCESS_TOKEN or install and authenticate gcloud")]
    MissingToken,

    #[error("gcloud command failed: {0}")]
    GcloudFailed(String),

    #[error("Compute API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Compute API returned {status} for {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GceError> for CloudError {
    fn from(e: GceError) -> Self {
        match e {
            GceError::MissingToken | GceError::GcloudFailed(_) => {
                CloudError::AuthenticationFailed(e.to_string())
            }
            GceError::Request(inner) => CloudError::Transport(inner.to_string()),
            GceError::Api { .. } => CloudError::Api(e.to_string()),
            GceError::Json(inner) => CloudError::Json(inner),
            GceError::Io(inner) => CloudError::Io(inner),
        }
    }
}

pub type Result<T> = std::result::Result<T, GceError>;
