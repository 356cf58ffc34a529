//! HTTP utilities for Zenlayer Cloud API calls

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::auth::{Credentials, CONTENT_TYPE, SIGNATURE_METHOD};
use super::error::SdkError;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            body.chars().take(MAX_LOG_BODY_LENGTH).collect::<String>(),
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Response envelope shared by every action
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    request_id: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Option<Value>,
}

/// A single signed API call
pub struct ApiRequest<'a> {
    pub url: &'a str,
    pub host: &'a str,
    pub action: &'a str,
    pub version: &'a str,
    pub body: Vec<u8>,
}

/// HTTP client wrapper for Zenlayer Cloud API calls
#[derive(Clone)]
pub struct ZenlayerHttpClient {
    client: Client,
}

impl ZenlayerHttpClient {
    /// Create a new HTTP client with an overall per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, SdkError> {
        let client = Client::builder()
            .user_agent(concat!("zenlayercloud-provider/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// POST a signed action and unwrap the `response` member of the envelope
    pub async fn post(
        &self,
        credentials: &Credentials,
        request: ApiRequest<'_>,
    ) -> Result<Value, SdkError> {
        tracing::debug!("POST {} action={}", request.url, request.action);

        let timestamp = chrono::Utc::now().timestamp();
        let authorization = credentials.authorization(request.host, timestamp, &request.body)?;

        let response = self
            .client
            .post(request.url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header("X-ZC-Action", request.action)
            .header("X-ZC-Version", request.version)
            .header("X-ZC-Timestamp", timestamp.to_string())
            .header("X-ZC-Signature-Method", SIGNATURE_METHOD)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        decode_envelope(request.action, status.as_u16(), &body)
    }
}

/// Turn a raw HTTP answer into either the `response` payload or an [`SdkError`]
pub(crate) fn decode_envelope(action: &str, status: u16, body: &str) -> Result<Value, SdkError> {
    let envelope: Option<Envelope> = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str(body).ok()
    };

    match envelope {
        Some(Envelope {
            code: Some(code),
            message,
            request_id,
            ..
        }) if !code.is_empty() => {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!(
                "API error: {} {} - {}",
                action,
                status,
                sanitize_for_log(body)
            );
            Err(SdkError::Api {
                status,
                code,
                message: message.unwrap_or_default(),
                request_id,
            })
        }
        _ if !(200..300).contains(&status) => {
            tracing::error!("API error: {} {} - {}", action, status, sanitize_for_log(body));
            Err(SdkError::Api {
                status,
                code: format!("HTTP_{status}"),
                message: sanitize_for_log(body),
                request_id: String::new(),
            })
        }
        Some(envelope) => Ok(envelope.response.unwrap_or(Value::Null)),
        // Handle empty response
        None if body.trim().is_empty() => Ok(Value::Null),
        None => Err(SdkError::Decode {
            action: action.to_string(),
            message: format!("response is not a JSON envelope: {}", sanitize_for_log(body)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert!(sanitized.len() < 300);
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = r#"{"requestId":"r-1","response":{"portId":"p-1"}}"#;
        let value = decode_envelope("CreatePort", 200, body).unwrap();
        assert_eq!(value["portId"], "p-1");
    }

    #[test]
    fn test_decode_error_envelope_keeps_code() {
        let body = r#"{"requestId":"r-2","code":"INVALID_PORT_NOT_FOUND","message":"not found"}"#;
        let err = decode_envelope("DescribePorts", 400, body).unwrap_err();
        assert_eq!(err.code(), Some("INVALID_PORT_NOT_FOUND"));
        match err {
            SdkError::Api { request_id, .. } => assert_eq!(request_id, "r-2"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_server_error_without_envelope() {
        let err = decode_envelope("DescribePorts", 502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.code(), Some("HTTP_502"));
    }

    #[test]
    fn test_decode_empty_body_is_null() {
        assert_eq!(decode_envelope("DeletePort", 200, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_envelope("DescribePorts", 200, "not json").unwrap_err();
        assert!(matches!(err, SdkError::Decode { .. }));
    }
}
