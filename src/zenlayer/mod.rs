//! Zenlayer Cloud API interaction module
//!
//! This module provides the typed client handle the reconciliation engine
//! consumes: request signing, the HTTP envelope, and one trait per service.
//!
//! # Module Structure
//!
//! - [`auth`] - `ZC2-HMAC-SHA256` request signing
//! - [`client`] - Main client for making API requests
//! - [`http`] - HTTP utilities and response envelope decoding
//! - [`error`] - SDK error type and documented vendor error codes
//! - [`sdn`] - SDN models and the [`SdnApi`] trait
//! - [`bmc`] - Bare-metal models and the [`BmcApi`] trait
//!
//! # Example
//!
//! ```ignore
//! use zenlayercloud_provider::zenlayer::{ZenlayerClient, SdnApi, DescribePortsRequest};
//!
//! async fn example(config: &ProviderConfig) -> anyhow::Result<()> {
//!     let client = ZenlayerClient::new(config)?;
//!     let ports = client.describe_ports(&DescribePortsRequest::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod bmc;
pub mod client;
pub mod error;
pub mod http;
pub mod sdn;

pub use bmc::*;
pub use client::ZenlayerClient;
pub use error::SdkError;
pub use sdn::*;
