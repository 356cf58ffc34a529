//! Provider registry
//!
//! Maps host type names onto resource and data-source implementations that
//! share one configured client, and dispatches host callbacks to them.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::bmc::InstanceResource;
use super::sdn::{CloudRouterResource, PortResource, PrivateConnectResource};
use super::{Callback, DataSource, Resource, ResourceData};
use crate::config::ProviderConfig;
use crate::datasource;
use crate::engine::HostContext;
use crate::error::{Error, Result};
use crate::zenlayer::{BmcApi, SdnApi, ZenlayerClient};

/// Resource type names, sorted; listable without credentials
pub const RESOURCE_TYPES: &[&str] = &[
    "zenlayercloud_bmc_instance",
    "zenlayercloud_sdn_cloud_router",
    "zenlayercloud_sdn_port",
    "zenlayercloud_sdn_private_connect",
];

/// Data-source type names, sorted
pub const DATA_SOURCE_TYPES: &[&str] = &[
    "zenlayercloud_bmc_instance_types",
    "zenlayercloud_bmc_instances",
    "zenlayercloud_sdn_cloud_regions",
    "zenlayercloud_sdn_cloud_routers",
    "zenlayercloud_sdn_datacenters",
    "zenlayercloud_sdn_ports",
    "zenlayercloud_sdn_private_connects",
];

/// Every type name this provider answers for
pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
}

impl Provider {
    /// Build the registry around injected service handles
    pub fn new(sdn: Arc<dyn SdnApi>, bmc: Arc<dyn BmcApi>) -> Self {
        let resources: Vec<Arc<dyn Resource>> = vec![
            Arc::new(PortResource::new(sdn.clone())),
            Arc::new(PrivateConnectResource::new(sdn.clone())),
            Arc::new(CloudRouterResource::new(sdn.clone())),
            Arc::new(InstanceResource::new(bmc.clone())),
        ];
        let data_sources = datasource::all(sdn, bmc);

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources.into_iter().map(|d| (d.type_name(), d)).collect(),
        }
    }

    /// Validate `config` and build the signed client every type shares
    pub fn configure(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = Arc::new(ZenlayerClient::new(config)?);
        info!(
            domain = %config.effective_domain(),
            scheme = config.effective_scheme().as_str(),
            "Provider configured"
        );
        Ok(Self::new(client.clone(), client))
    }

    pub fn resource(&self, type_name: &str) -> Option<&Arc<dyn Resource>> {
        self.resources.get(type_name)
    }

    pub fn data_source(&self, type_name: &str) -> Option<&Arc<dyn DataSource>> {
        self.data_sources.get(type_name)
    }

    /// Resource type names, sorted
    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// Data-source type names, sorted
    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    /// Run one resource callback. Errors are tagged with the callback,
    /// type name and resource id.
    pub async fn apply(
        &self,
        ctx: &HostContext,
        callback: Callback,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Result<()> {
        let resource = self
            .resource(type_name)
            .ok_or_else(|| Error::validation(format!("unknown resource type {type_name:?}")))?;
        let id_before = data.id().to_string();

        debug!(callback = callback.as_str(), type_name, id = %id_before, "Dispatching callback");
        let result = match callback {
            Callback::Create => resource.create(ctx, data).await,
            Callback::Read => resource.read(ctx, data).await,
            Callback::Update => resource.update(ctx, data).await,
            Callback::Delete => resource.delete(ctx, data).await,
            Callback::Import => resource.import(ctx, data).await,
        };

        result.map_err(|err| {
            // create commits the id before waiting, prefer it when present
            let id = if data.id().is_empty() { id_before.as_str() } else { data.id() };
            error!(callback = callback.as_str(), type_name, id, error = %err, "Callback failed");
            err.during(callback.as_str(), type_name, id)
        })
    }

    /// Run one data-source read
    pub async fn read_data_source(
        &self,
        ctx: &HostContext,
        type_name: &str,
        data: &mut ResourceData,
    ) -> Result<()> {
        let source = self
            .data_source(type_name)
            .ok_or_else(|| Error::validation(format!("unknown data source {type_name:?}")))?;

        source.read(ctx, data).await.map_err(|err| {
            error!(type_name, error = %err, "Data source read failed");
            err.querying(type_name)
        })
    }
}
