//! Resource abstraction layer
//!
//! Every managed resource kind implements [`Resource`]; every read-only query
//! implements [`DataSource`]. The [`registry`] maps host type names onto them.
//!
//! # Architecture
//!
//! - [`data`] - the host attribute snapshot passed to each callback
//! - [`registry`] - type-name lookup and callback dispatch
//! - [`sdn`] - ports, private connects and cloud routers
//! - [`bmc`] - bare-metal instances
//!
//! # Example
//!
//! ```ignore
//! use zenlayercloud_provider::engine::HostContext;
//! use zenlayercloud_provider::resource::{Callback, Provider, ResourceData};
//!
//! async fn refresh(
//!     provider: &Provider,
//!     id: &str,
//! ) -> zenlayercloud_provider::Result<ResourceData> {
//!     let ctx = HostContext::new();
//!     let mut data = ResourceData::from_state(id, Default::default());
//!     provider.apply(&ctx, Callback::Read, "zenlayercloud_sdn_port", &mut data).await?;
//!     Ok(data)
//! }
//! ```

pub mod bmc;
mod data;
pub mod lifecycle;
mod registry;
pub mod sdn;

use async_trait::async_trait;

use crate::engine::HostContext;
use crate::error::Result;

pub use data::ResourceData;
pub use registry::{Provider, DATA_SOURCE_TYPES, RESOURCE_TYPES};

/// Destroy the resource after the soft delete instead of leaving it recycled
pub const FORCE_DELETE: &str = "force_delete";

/// Host callbacks a resource kind answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Callback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "read" => Some(Self::Read),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "import" => Some(Self::Import),
            _ => None,
        }
    }
}

/// Lifecycle of one managed resource kind
#[async_trait]
pub trait Resource: Send + Sync {
    /// Host type name, e.g. `zenlayercloud_sdn_port`
    fn type_name(&self) -> &'static str;

    /// Create the resource, commit its id, wait until it is usable and read it back
    async fn create(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()>;

    /// Refresh attributes; clears the id when the resource is gone
    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()>;

    async fn update(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()>;

    /// Soft delete, then destroy when `force_delete` is set
    async fn delete(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()>;

    async fn import(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        self.read(ctx, data).await
    }
}

/// Read-only query
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Fill `data` with the result list and set its digest id
    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()>;
}
