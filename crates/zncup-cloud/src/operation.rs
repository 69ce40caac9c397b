//! Long-running operation types
//!
//! Every mutating Compute Engine call returns an operation handle that
//! must be polled until it reaches a terminal state. Operations are
//! addressed within the scope of the resource they mutate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The namespace level at which an operation is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpScope {
    Zonal(String),
    Regional(String),
    Global,
}

impl fmt::Display for OpScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpScope::Zonal(zone) => write!(f, "zone {zone}"),
            OpScope::Regional(region) => write!(f, "region {region}"),
            OpScope::Global => f.write_str("global"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpStatus {
    Pending,
    Running,
    Done,
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpStatus::Pending => f.write_str("PENDING"),
            OpStatus::Running => f.write_str("RUNNING"),
            OpStatus::Done => f.write_str("DONE"),
        }
    }
}

/// An asynchronous operation handle, discarded once terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub status: OpStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    /// Terminal error details, if the operation finished with an error
    /// payload. One line per entry, joined.
    pub fn error_details(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        if error.errors.is_empty() {
            return None;
        }
        Some(
            error
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Whether any error entry carries the given code.
    pub fn has_error_code(&self, code: &str) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.errors.iter().any(|d| d.code == code))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_wire_casing() {
        let op: Operation =
            serde_json::from_str(r#"{"name":"op-1","status":"RUNNING"}"#).unwrap();
        assert_eq!(op.status, OpStatus::Running);
        assert!(op.error.is_none());
    }

    #[test]
    fn error_details_joins_entries() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"op-2","status":"DONE","error":{"errors":[
                {"code":"QUOTA_EXCEEDED","message":"too many addresses"},
                {"code":"RESOURCE_IN_USE_BY_ANOTHER_RESOURCE","message":"in use"}
            ]}}"#,
        )
        .unwrap();
        let details = op.error_details().unwrap();
        assert!(details.contains("QUOTA_EXCEEDED"));
        assert!(details.contains("in use"));
        assert!(op.has_error_code("RESOURCE_IN_USE_BY_ANOTHER_RESOURCE"));
        assert!(!op.has_error_code("NOT_FOUND"));
    }
}
