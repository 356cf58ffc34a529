//! Bare-metal data sources

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::{finish, id_list, matches, name_filter};
use crate::engine::{fetch_all, retry_call, HostContext, Op, Page, PageRequest};
use crate::error::Result;
use crate::resource::bmc::InstanceState;
use crate::resource::{DataSource, ResourceData};
use crate::zenlayer::{
    AvailableResource, BmcApi, DescribeAvailableResourcesRequest, DescribeInstancesRequest,
    InstanceInfo, SdkResult,
};

pub const SOLD_OUT: &str = "SOLD_OUT";

async fn instance_page(
    api: &dyn BmcApi,
    mut request: DescribeInstancesRequest,
    page: PageRequest,
) -> SdkResult<Page<InstanceInfo>> {
    request.page_num = Some(page.page_num);
    request.page_size = Some(page.page_size);
    let response = api.describe_instances(&request).await?;
    Ok(Page {
        total_count: response.total_count,
        items: response.data_set,
    })
}

// =============================================================================
// zenlayercloud_bmc_instances
// =============================================================================

#[derive(Debug, Serialize)]
struct InstanceEntry {
    instance_id: String,
    #[serde(flatten)]
    state: InstanceState,
}

pub struct InstancesDataSource {
    api: Arc<dyn BmcApi>,
}

impl InstancesDataSource {
    pub fn new(api: Arc<dyn BmcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for InstancesDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_bmc_instances"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = DescribeInstancesRequest {
            instance_ids: id_list(data, "instance_ids")?,
            zone_id: data.get_str("availability_zone").map(str::to_string),
            instance_status: data.get_str("instance_status").map(str::to_string),
            ..Default::default()
        };
        let filter = name_filter(data)?;

        let instances = fetch_all(ctx, data.budget(Op::Read), |page| {
            instance_page(self.api.as_ref(), request.clone(), page)
        })
        .await?;

        let entries: Vec<InstanceEntry> = instances
            .iter()
            .filter(|instance| matches(&filter, &instance.instance_name))
            .map(|instance| InstanceEntry {
                instance_id: instance.instance_id.clone(),
                state: InstanceState::from(instance),
            })
            .collect();

        let ids = entries.iter().map(|e| e.instance_id.clone()).collect();
        finish(data, "instances", ids, &entries).await
    }
}

// =============================================================================
// zenlayercloud_bmc_instance_types
// =============================================================================

#[derive(Debug, Serialize)]
struct InstanceTypeEntry {
    availability_zone: String,
    instance_type: String,
    sell_status: String,
    maximum_bandwidth_out: Option<u32>,
    default_traffic_package_size: Option<f64>,
}

impl From<&AvailableResource> for InstanceTypeEntry {
    fn from(resource: &AvailableResource) -> Self {
        Self {
            availability_zone: resource.zone_id.clone(),
            instance_type: resource.instance_type_id.clone(),
            sell_status: resource.sell_status.clone(),
            maximum_bandwidth_out: resource.maximum_bandwidth_out,
            default_traffic_package_size: resource.default_traffic_package_size,
        }
    }
}

fn keep_offer(resource: &AvailableResource, exclude_sold_out: bool) -> bool {
    !(exclude_sold_out && resource.sell_status == SOLD_OUT)
}

pub struct InstanceTypesDataSource {
    api: Arc<dyn BmcApi>,
}

impl InstanceTypesDataSource {
    pub fn new(api: Arc<dyn BmcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for InstanceTypesDataSource {
    fn type_name(&self) -> &'static str {
        "zenlayercloud_bmc_instance_types"
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = DescribeAvailableResourcesRequest {
            zone_id: data.get_str("availability_zone").map(str::to_string),
            instance_charge_type: data.get_str("instance_charge_type").map(str::to_string),
            instance_type_id: data.get_str("instance_type").map(str::to_string),
        };
        let exclude_sold_out = data.get_bool("exclude_sold_out");

        let response = retry_call(ctx, data.budget(Op::Read), &[], || {
            self.api.describe_available_resources(&request)
        })
        .await?;

        let entries: Vec<InstanceTypeEntry> = response
            .available_resources
            .iter()
            .filter(|resource| keep_offer(resource, exclude_sold_out))
            .map(InstanceTypeEntry::from)
            .collect();

        // a type is sold per zone, so the pair identifies an offer
        let ids = entries
            .iter()
            .map(|e| format!("{}:{}", e.availability_zone, e.instance_type))
            .collect();
        finish(data, "instance_types", ids, &entries).await
    }
}
