//! Engine error type

use thiserror::Error;

use crate::zenlayer::SdkError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host from reconcilers and data sources
#[derive(Debug, Error)]
pub enum Error {
    /// Vendor call failed (terminal, or transient past the deadline)
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Missing or inconsistent input; never retried
    #[error("validation failed: {0}")]
    Validation(String),

    /// The state machine ran out of time
    #[error(
        "timeout while waiting for {resource} to reach [{}] (last status: {last_status})",
        target.join(", ")
    )]
    Timeout {
        resource: String,
        last_status: String,
        target: Vec<String>,
    },

    /// A failure status was observed while waiting
    #[error(
        "{resource} entered unexpected status {status} while waiting for [{}]",
        target.join(", ")
    )]
    UnexpectedState {
        resource: String,
        status: String,
        target: Vec<String>,
    },

    /// The resource disappeared while it was expected to exist
    #[error("{resource} not found after {checks} consecutive checks")]
    NotFound { resource: String, checks: u32 },

    /// The host cancelled the operation
    #[error("operation cancelled by host")]
    Cancelled,

    /// A create call returned no identifier
    #[error("{action} returned an empty resource id")]
    EmptyId { action: String },

    /// Any of the above, tagged with the callback and resource id it came from
    #[error("{op} {kind} {id}: {source}")]
    Operation {
        op: &'static str,
        kind: String,
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Any of the above, tagged with the data source it came from
    #[error("read data source {name}: {source}")]
    Query {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Attach callback name, resource kind and id
    pub fn during(self, op: &'static str, kind: &str, id: &str) -> Self {
        match self {
            // already tagged further down
            Self::Operation { .. } | Self::Query { .. } => self,
            other => Self::Operation {
                op,
                kind: kind.to_string(),
                id: if id.is_empty() { "<new>".to_string() } else { id.to_string() },
                source: Box::new(other),
            },
        }
    }

    /// Attach the data source name
    pub fn querying(self, name: &str) -> Self {
        match self {
            Self::Query { .. } | Self::Operation { .. } => self,
            other => Self::Query {
                name: name.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping operation tags
    pub fn root(&self) -> &Error {
        match self {
            Self::Operation { source, .. } | Self::Query { source, .. } => source.root(),
            other => other,
        }
    }

    /// Vendor error code, if this came from an API error
    pub fn code(&self) -> Option<&str> {
        match self.root() {
            Self::Sdk(sdk) => sdk.code(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_id_status_and_target() {
        let err = Error::Timeout {
            resource: "port p-123".to_string(),
            last_status: "CREATING".to_string(),
            target: vec!["RUNNING".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("p-123"));
        assert!(msg.contains("CREATING"));
        assert!(msg.contains("RUNNING"));
    }

    #[test]
    fn test_querying_names_data_source_without_id() {
        let err = Error::from(SdkError::api(400, "OPERATION_DENIED", "page rejected"))
            .querying("zenlayercloud_sdn_ports");
        let msg = err.to_string();
        assert!(msg.starts_with("read data source zenlayercloud_sdn_ports: "), "{msg}");
        assert!(!msg.contains("<new>"));
        assert_eq!(err.code(), Some("OPERATION_DENIED"));
    }

    #[test]
    fn test_during_wraps_once() {
        let err = Error::validation("bad")
            .during("create", "zenlayercloud_sdn_port", "")
            .during("create", "zenlayercloud_sdn_port", "p-1");
        assert!(err.to_string().contains("<new>"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_code_reaches_through_tags() {
        let err = Error::from(SdkError::api(400, "QUOTA_EXCEEDED", "quota"))
            .during("create", "zenlayercloud_sdn_port", "");
        assert_eq!(err.code(), Some("QUOTA_EXCEEDED"));
    }
}
