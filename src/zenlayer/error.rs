//! Zenlayer Cloud SDK errors and documented vendor error codes

use thiserror::Error;

/// Vendor codes that mark a transient server-side failure.
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
pub const READ_TIMED_OUT: &str = "READ_TIMED_OUT";

/// Generic not-found code returned by every service.
pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";

pub const INVALID_PORT_NOT_FOUND: &str = "INVALID_PORT_NOT_FOUND";
pub const INVALID_PRIVATE_CONNECT_NOT_FOUND: &str = "INVALID_PRIVATE_CONNECT_NOT_FOUND";
pub const INVALID_CLOUD_ROUTER_NOT_FOUND: &str = "INVALID_CLOUD_ROUTER_NOT_FOUND";
pub const INVALID_INSTANCE_NOT_FOUND: &str = "INVALID_INSTANCE_NOT_FOUND";

// Returned when a delete is issued against a resource already in the recycle bin.
pub const OPERATION_DENIED_PORT_RECYCLED: &str = "OPERATION_DENIED_PORT_RECYCLED";
pub const OPERATION_DENIED_PRIVATE_CONNECT_RECYCLED: &str =
    "OPERATION_DENIED_PRIVATE_CONNECT_RECYCLED";
pub const OPERATION_DENIED_CLOUD_ROUTER_RECYCLED: &str = "OPERATION_DENIED_CLOUD_ROUTER_RECYCLED";
pub const OPERATION_DENIED_INSTANCE_RECYCLED: &str = "OPERATION_DENIED_INSTANCE_RECYCLED";

pub const OPERATION_DENIED_PRIVATE_CONNECT_UPDATING: &str =
    "OPERATION_DENIED_PRIVATE_CONNECT_UPDATING";
pub const OPERATION_DENIED_CLOUD_ROUTER_UPDATING: &str = "OPERATION_DENIED_CLOUD_ROUTER_UPDATING";

/// Errors produced by the Zenlayer Cloud client
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    /// The API answered with an error envelope
    #[error("[{code}] {message} (requestId: {request_id}, http status: {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
        request_id: String,
    },

    /// The request never produced a response
    #[error("network error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The response body could not be decoded
    #[error("failed to decode {action} response: {message}")]
    Decode { action: String, message: String },

    /// The client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Build an API error (mostly useful for fakes and tests)
    pub fn api(status: u16, code: &str, message: &str) -> Self {
        Self::Api {
            status,
            code: code.to_string(),
            message: message.to_string(),
            request_id: String::new(),
        }
    }

    /// Vendor error code, if the API returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// HTTP status, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the vendor code is one of `codes`
    pub fn has_code(&self, codes: &[&str]) -> bool {
        self.code().is_some_and(|c| codes.contains(&c))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}
