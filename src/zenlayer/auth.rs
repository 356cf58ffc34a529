//! Zenlayer Cloud Authentication
//!
//! Signs API requests with the `ZC2-HMAC-SHA256` scheme using an access key
//! id / password pair.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::error::SdkError;

/// Signature method advertised in `X-ZC-Signature-Method`
pub const SIGNATURE_METHOD: &str = "ZC2-HMAC-SHA256";

/// Headers covered by the signature, in canonical order
const SIGNED_HEADERS: &str = "content-type;host";

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

type HmacSha256 = Hmac<Sha256>;

/// Access key pair used to sign requests
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    access_key_password: String,
}

// The password never shows up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key_id: &str, access_key_password: &str) -> Result<Self, SdkError> {
        if access_key_id.trim().is_empty() || access_key_password.trim().is_empty() {
            return Err(SdkError::Config(
                "access_key_id and access_key_password must not be empty".to_string(),
            ));
        }

        Ok(Self {
            access_key_id: access_key_id.to_string(),
            access_key_password: access_key_password.to_string(),
        })
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Compute the `Authorization` header value for a request body
    pub fn authorization(
        &self,
        host: &str,
        timestamp: i64,
        body: &[u8],
    ) -> Result<String, SdkError> {
        let signature = self.signature(host, timestamp, body)?;
        Ok(format!(
            "{} Credential={}, SignedHeaders={}, Signature={}",
            SIGNATURE_METHOD, self.access_key_id, SIGNED_HEADERS, signature
        ))
    }

    fn signature(&self, host: &str, timestamp: i64, body: &[u8]) -> Result<String, SdkError> {
        let string_to_sign = string_to_sign(host, timestamp, body);

        let mut mac = HmacSha256::new_from_slice(self.access_key_password.as_bytes())
            .map_err(|e| SdkError::Config(format!("invalid signing key: {e}")))?;
        mac.update(string_to_sign.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Canonical request: method, path, query, canonical headers, signed headers, payload hash
fn canonical_request(host: &str, body: &[u8]) -> String {
    format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host.to_lowercase(),
        SIGNED_HEADERS,
        sha256_hex(body)
    )
}

fn string_to_sign(host: &str, timestamp: i64, body: &[u8]) -> String {
    format!(
        "{}\n{}\n{}",
        SIGNATURE_METHOD,
        timestamp,
        sha256_hex(canonical_request(host, body).as_bytes())
    )
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
