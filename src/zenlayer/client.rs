//! Zenlayer Cloud Client
//!
//! Main client for interacting with Zenlayer Cloud APIs, combining request
//! signing and HTTP functionality. One client is built per provider
//! configuration and shared by every reconciler.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::auth::Credentials;
use super::error::SdkError;
use super::http::{ApiRequest, ZenlayerHttpClient};
use crate::config::ProviderConfig;

/// API version sent with every action
pub const API_VERSION: &str = "2022-11-20";

/// Service path segments
pub const SERVICE_SDN: &str = "sdn";
pub const SERVICE_BMC: &str = "bmc";

/// Main Zenlayer Cloud client
#[derive(Clone)]
pub struct ZenlayerClient {
    credentials: Credentials,
    http: ZenlayerHttpClient,
    base_url: Url,
    host: String,
}

impl ZenlayerClient {
    /// Create a new client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, SdkError> {
        let credentials = Credentials::new(
            config.access_key_id.as_deref().unwrap_or_default(),
            config.access_key_password.as_deref().unwrap_or_default(),
        )?;

        let raw = format!(
            "{}://{}/api/v2/",
            config.effective_scheme().as_str(),
            config.effective_domain().trim_end_matches('/')
        );
        let base_url =
            Url::parse(&raw).map_err(|e| SdkError::Config(format!("invalid domain {raw:?}: {e}")))?;

        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(SdkError::Config(format!("domain {raw:?} has no host"))),
        };

        let http = ZenlayerHttpClient::new(config.effective_client_timeout())?;

        tracing::info!(
            "Zenlayer client configured for {} (access key {})",
            base_url,
            credentials.access_key_id()
        );

        Ok(Self {
            credentials,
            http,
            base_url,
            host,
        })
    }

    /// Build the endpoint URL of a service
    pub fn service_url(&self, service: &str) -> Result<Url, SdkError> {
        self.base_url
            .join(service)
            .map_err(|e| SdkError::Config(format!("invalid service {service:?}: {e}")))
    }

    /// Invoke an action and decode its response
    pub async fn call<Req, Resp>(
        &self,
        service: &str,
        action: &str,
        request: &Req,
    ) -> Result<Resp, SdkError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.service_url(service)?;
        let body = serde_json::to_vec(request).map_err(|e| SdkError::Decode {
            action: action.to_string(),
            message: format!("failed to encode request: {e}"),
        })?;

        let value = self
            .http
            .post(
                &self.credentials,
                ApiRequest {
                    url: url.as_str(),
                    host: &self.host,
                    action,
                    version: API_VERSION,
                    body,
                },
            )
            .await?;

        serde_json::from_value(value).map_err(|e| SdkError::Decode {
            action: action.to_string(),
            message: e.to_string(),
        })
    }

    /// Invoke an action whose response carries nothing of interest
    pub async fn call_unit<Req>(
        &self,
        service: &str,
        action: &str,
        request: &Req,
    ) -> Result<(), SdkError>
    where
        Req: Serialize + ?Sized,
    {
        self.call::<Req, serde::de::IgnoredAny>(service, action, request)
            .await
            .map(|_| ())
    }
}
