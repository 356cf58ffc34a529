//! SDN data sources

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{finish, id_list, matches, name_filter};
use crate::engine::{fetch_all, retry_call, HostContext, Op, Page, PageRequest};
use crate::error::{Error, Result};
use crate::resource::sdn::endpoint::CLOUD_GOOGLE;
use crate::resource::sdn::{CloudRouterState, PortState, PrivateConnectState};
use crate::resource::{DataSource, ResourceData};
use crate::zenlayer::{
    CloudRegion, CloudRouterInfo, DatacenterInfo, DescribeCloudRoutersRequest, DescribePortsRequest,
    DescribePrivateConnectsRequest, PortInfo, PrivateConnectInfo, SdkResult, SdnApi,
};

async fn port_page(
    api: &dyn SdnApi,
    mut request: DescribePortsRequest,
    page: PageRequest,
) -> SdkResult<Page<PortInfo>> {
    request.page_num = Some(page.page_num);
    request.page_size = Some(page.page_size);
    let response = api.describe_ports(&request).await?;
    Ok(Page {
        total_count: response.total_count,
        items: response.data_set,
    })
}

async fn private_connect_page(
    api: &dyn SdnApi,
    mut request: DescribePrivateConnectsRequest,
    page: PageRequest,
) -> SdkResult<Page<PrivateConnectInfo>> {
    request.page_num = Some(page.page_num);
    request.page_size = Some(page.page_size);
    let response = api.describe_private_connects(&request).await?;
    Ok(Page {
        total_count: response.total_count,
        items: response.data_set,
    })
}

async fn cloud_router_page(
    api: &dyn SdnApi,
    mut request: DescribeCloudRoutersRequest,
    page: PageRequest,
) -> SdkResult<Page<CloudRouterInfo>> {
    request.page_num = Some(page.page_num);
    request.page_size = Some(page.page_size);
    let response = api.describe_cloud_routers(&request).await?;
    Ok(Page {
        total_count: response.total_count,
        items: response.data_set,
    })
}

// =============================================================================
// zenlayercloud_sdn_ports
// =============================================================================

#[derive(Debug, Serialize)]
struct PortEntry {
    port_id: String,
    #[serde(flatten)]
    state: PortState,
}

pub struct PortsDataSource {
    api: Arc<dyn SdnApi>,
}

impl PortsDataSource {
    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for PortsDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_sdn_ports"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = DescribePortsRequest {
            port_ids: id_list(data, "port_ids")?,
            dc_id: data.get_str("datacenter").map(str::to_string),
            ..Default::default()
        };
        let filter = name_filter(data)?;

        let ports = fetch_all(ctx, data.budget(Op::Read), |page| {
            port_page(self.api.as_ref(), request.clone(), page)
        })
        .await?;

        let entries: Vec<PortEntry> = ports
            .iter()
            .filter(|port| matches(&filter, &port.port_name))
            .map(|port| PortEntry {
                port_id: port.port_id.clone(),
                state: PortState::from(port),
            })
            .collect();
        debug!(fetched = ports.len(), kept = entries.len(), "Filtered ports");

        let ids = entries.iter().map(|e| e.port_id.clone()).collect();
        finish(data, "ports", ids, &entries).await
    }
}

// =============================================================================
// zenlayercloud_sdn_private_connects
// =============================================================================

#[derive(Debug, Serialize)]
struct PrivateConnectEntry {
    private_connect_id: String,
    #[serde(flatten)]
    state: PrivateConnectState,
}

pub struct PrivateConnectsDataSource {
    api: Arc<dyn SdnApi>,
}

impl PrivateConnectsDataSource {
    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for PrivateConnectsDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_sdn_private_connects"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = DescribePrivateConnectsRequest {
            private_connect_ids: id_list(data, "private_connect_ids")?,
            ..Default::default()
        };
        let filter = name_filter(data)?;

        let connects = fetch_all(ctx, data.budget(Op::Read), |page| {
            private_connect_page(self.api.as_ref(), request.clone(), page)
        })
        .await?;

        let entries: Vec<PrivateConnectEntry> = connects
            .iter()
            .filter(|pc| matches(&filter, &pc.private_connect_name))
            .map(|pc| PrivateConnectEntry {
                private_connect_id: pc.private_connect_id.clone(),
                state: PrivateConnectState::from(pc),
            })
            .collect();

        let ids = entries.iter().map(|e| e.private_connect_id.clone()).collect();
        finish(data, "private_connects", ids, &entries).await
    }
}

// =============================================================================
// zenlayercloud_sdn_cloud_routers
// =============================================================================

#[derive(Debug, Serialize)]
struct CloudRouterEntry {
    cloud_router_id: String,
    #[serde(flatten)]
    state: CloudRouterState,
}

pub struct CloudRoutersDataSource {
    api: Arc<dyn SdnApi>,
}

impl CloudRoutersDataSource {
    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for CloudRoutersDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_sdn_cloud_routers"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = DescribeCloudRoutersRequest {
            cloud_router_ids: id_list(data, "cloud_router_ids")?,
            ..Default::default()
        };
        let filter = name_filter(data)?;

        let routers = fetch_all(ctx, data.budget(Op::Read), |page| {
            cloud_router_page(self.api.as_ref(), request.clone(), page)
        })
        .await?;

        let entries: Vec<CloudRouterEntry> = routers
            .iter()
            .filter(|cr| matches(&filter, &cr.cloud_router_name))
            .map(|cr| CloudRouterEntry {
                cloud_router_id: cr.cloud_router_id.clone(),
                state: CloudRouterState::from(cr),
            })
            .collect();

        let ids = entries.iter().map(|e| e.cloud_router_id.clone()).collect();
        finish(data, "cloud_routers", ids, &entries).await
    }
}

// =============================================================================
// zenlayercloud_sdn_datacenters
// =============================================================================

#[derive(Debug, Serialize)]
struct DatacenterEntry {
    id: String,
    name: String,
    address: Option<String>,
    city_name: String,
    area_name: String,
}

impl From<&DatacenterInfo> for DatacenterEntry {
    fn from(dc: &DatacenterInfo) -> Self {
        Self {
            id: dc.dc_id.clone(),
            name: dc.dc_name.clone(),
            address: dc.dc_address.clone(),
            city_name: dc.city_name.clone(),
            area_name: dc.area_name.clone(),
        }
    }
}

pub struct DatacentersDataSource {
    api: Arc<dyn SdnApi>,
}

impl DatacentersDataSource {
    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for DatacentersDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_sdn_datacenters"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let wanted = id_list(data, "datacenter_ids")?;
        let filter = name_filter(data)?;

        let response =
            retry_call(ctx, data.budget(Op::Read), &[], || self.api.describe_datacenters()).await?;

        let entries: Vec<DatacenterEntry> = response
            .dc_set
            .iter()
            .filter(|dc| wanted.is_empty() || wanted.contains(&dc.dc_id))
            .filter(|dc| matches(&filter, &dc.dc_name))
            .map(DatacenterEntry::from)
            .collect();

        let ids = entries.iter().map(|e| e.id.clone()).collect();
        finish(data, "datacenters", ids, &entries).await
    }
}

// =============================================================================
// zenlayercloud_sdn_cloud_regions
// =============================================================================

pub const CLOUD_AWS: &str = "AWS";
pub const CLOUD_TENCENT: &str = "TENCENT";

#[derive(Debug, Serialize)]
struct CloudRegionEntry {
    cloud_region_id: String,
    area_name: String,
    city_name: String,
    datacenters: Vec<String>,
}

impl From<&CloudRegion> for CloudRegionEntry {
    fn from(region: &CloudRegion) -> Self {
        Self {
            cloud_region_id: region.cloud_region_id.clone(),
            area_name: region.area_name.clone(),
            city_name: region.city_name.clone(),
            datacenters: region.dc_ids.clone(),
        }
    }
}

/// Which vendor lookup a `cloud_type` selects
#[derive(Debug, Clone, PartialEq, Eq)]
enum RegionLookup {
    Aws,
    Tencent,
    Google { pairing_key: String },
}

impl RegionLookup {
    fn from_args(data: &ResourceData) -> Result<Self> {
        match data.require_str("cloud_type")? {
            CLOUD_AWS => Ok(Self::Aws),
            CLOUD_TENCENT => Ok(Self::Tencent),
            CLOUD_GOOGLE => {
                let pairing_key = data.get_str("google_pairing_key").ok_or_else(|| {
                    Error::validation(
                        "\"google_pairing_key\" is required when cloud_type is GOOGLE",
                    )
                })?;
                Ok(Self::Google {
                    pairing_key: pairing_key.to_string(),
                })
            }
            other => Err(Error::validation(format!(
                "cloud_type must be AWS, TENCENT or GOOGLE, got {other:?}"
            ))),
        }
    }
}

pub struct CloudRegionsDataSource {
    api: Arc<dyn SdnApi>,
}

impl CloudRegionsDataSource {
    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for CloudRegionsDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_sdn_cloud_regions"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        // validated before any request goes out
        let lookup = RegionLookup::from_args(data)?;
        let timeout = data.budget(Op::Read);

        let response = match &lookup {
            RegionLookup::Aws => {
                retry_call(ctx, timeout, &[], || self.api.describe_aws_regions()).await?
            }
            RegionLookup::Tencent => {
                retry_call(ctx, timeout, &[], || self.api.describe_tencent_regions()).await?
            }
            RegionLookup::Google { pairing_key } => {
                retry_call(ctx, timeout, &[], || {
                    self.api.describe_google_regions(pairing_key)
                })
                .await?
            }
        };
        debug!(?lookup, regions = response.regions.len(), "Fetched cloud regions");

        let entries: Vec<CloudRegionEntry> =
            response.regions.iter().map(CloudRegionEntry::from).collect();
        let ids = entries.iter().map(|e| e.cloud_region_id.clone()).collect();
        finish(data, "regions", ids, &entries).await
    }
}
