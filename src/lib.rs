//! Zenlayer Cloud provider
//!
//! Reconciles declarative SDN and bare-metal resources against the Zenlayer
//! Cloud API for an infrastructure-as-code host.
//!
//! - [`zenlayer`] - signed API client and the `SdnApi` / `BmcApi` seams
//! - [`engine`] - retry loop, concurrent pager and status poller
//! - [`resource`] - per-kind reconcilers and the provider registry
//! - [`datasource`] - read-only list queries

pub mod config;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod resource;
pub mod zenlayer;

pub use error::{Error, Result};

/// Version injected at compile time via ZENLAYERCLOUD_PROVIDER_VERSION (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ZENLAYERCLOUD_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
