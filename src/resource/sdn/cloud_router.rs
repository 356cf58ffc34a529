//! `zenlayercloud_sdn_cloud_router`: layer-3 router over ports and cloud regions

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::endpoint::EdgePoint;
use super::{CREATING, OPERATIONAL, RECYCLED, RUNNING};
use crate::engine::{retry_call, Deadline, HostContext, Op};
use crate::error::{Error, Result};
use crate::resource::lifecycle::{self, Lifecycle};
use crate::resource::{Resource, ResourceData, FORCE_DELETE};
use crate::zenlayer::error::{
    INVALID_CLOUD_ROUTER_NOT_FOUND, OPERATION_DENIED_CLOUD_ROUTER_RECYCLED,
    OPERATION_DENIED_CLOUD_ROUTER_UPDATING,
};
use crate::zenlayer::{
    CloudRouterInfo, CreateCloudRouterRequest, DescribeCloudRoutersRequest,
    ModifyCloudRouterAttributeRequest, SdkResult, SdnApi,
};

pub const TYPE_NAME: &str = "zenlayercloud_sdn_cloud_router";

/// Host-visible attributes of a cloud router
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudRouterState {
    pub name: String,
    pub description: Option<String>,
    pub edge_points: Vec<EdgePoint>,
    pub status: String,
    pub connectivity_status: Option<String>,
    pub charge_type: Option<String>,
    pub create_time: Option<String>,
    pub expired_time: Option<String>,
}

impl From<&CloudRouterInfo> for CloudRouterState {
    fn from(cr: &CloudRouterInfo) -> Self {
        Self {
            name: cr.cloud_router_name.clone(),
            description: cr.cloud_router_description.clone(),
            edge_points: cr.edge_points.iter().map(EdgePoint::flatten).collect(),
            status: cr.cloud_router_status.clone(),
            connectivity_status: cr.connectivity_status.clone(),
            charge_type: cr.charge_type.clone(),
            create_time: cr.created_time.clone(),
            expired_time: cr.expired_time.clone(),
        }
    }
}

fn require_edge_points(data: &ResourceData) -> Result<Vec<EdgePoint>> {
    let edge_points: Vec<EdgePoint> = data.get_as("edge_points")?.unwrap_or_default();
    if edge_points.is_empty() {
        return Err(Error::validation("\"edge_points\" needs at least one edge point"));
    }
    for (i, edge) in edge_points.iter().enumerate() {
        edge.validate(&format!("edge_points[{i}]"))?;
    }
    Ok(edge_points)
}

pub struct CloudRouterResource {
    api: Arc<dyn SdnApi>,
}

impl CloudRouterResource {
    /// Refresh `data` from the vendor within `deadline`; clears the id when gone
    async fn load(
        &self,
        ctx: &HostContext,
        data: &mut ResourceData,
        deadline: Deadline,
    ) -> Result<()> {
        let id = data.require_id()?;
        match lifecycle::read_settled(self, ctx, &id, deadline).await? {
            Some(cr) => data.merge_from(&CloudRouterState::from(&cr)),
            None => {
                data.clear_id();
                Ok(())
            }
        }
    }

    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }

    async fn find(&self, id: &str) -> SdkResult<Option<CloudRouterInfo>> {
        let request = DescribeCloudRoutersRequest {
            cloud_router_ids: vec![id.to_string()],
            ..Default::default()
        };
        let response = self.api.describe_cloud_routers(&request).await?;
        Ok(response.data_set.into_iter().find(|cr| cr.cloud_router_id == id))
    }
}

#[async_trait]
impl Lifecycle for CloudRouterResource {
    type Info = CloudRouterInfo;

    const LABEL: &'static str = "cloud router";
    const OPERATIONAL: &'static [&'static str] = OPERATIONAL;
    const RUNNING: &'static str = RUNNING;
    const RECYCLED: &'static str = RECYCLED;
    const NOT_FOUND_CODE: &'static str = INVALID_CLOUD_ROUTER_NOT_FOUND;
    const RECYCLED_CODE: &'static str = OPERATION_DENIED_CLOUD_ROUTER_RECYCLED;
    // deletion is refused while an edge point is still being modified
    const DELETE_RETRY_CODES: &'static [&'static str] = &[OPERATION_DENIED_CLOUD_ROUTER_UPDATING];

    async fn lookup(&self, id: &str) -> SdkResult<Option<CloudRouterInfo>> {
        self.find(id).await
    }

    fn status(info: &CloudRouterInfo) -> &str {
        &info.cloud_router_status
    }

    async fn soft_delete(&self, id: &str) -> SdkResult<()> {
        self.api.delete_cloud_router(id).await
    }

    async fn destroy(&self, id: &str) -> SdkResult<()> {
        self.api.destroy_cloud_router(id).await
    }
}

#[async_trait]
impl Resource for CloudRouterResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = CreateCloudRouterRequest {
            cloud_router_name: data.require_str("name")?.to_string(),
            cloud_router_description: data.get_str("description").map(str::to_string),
            edge_points: require_edge_points(data)?.iter().map(EdgePoint::to_wire).collect(),
        };
        let deadline = data.deadline(Op::Create);

        let response = retry_call(ctx, deadline.remaining(), &[], || {
            self.api.create_cloud_router(&request)
        })
        .await?;
        if response.cloud_router_id.is_empty() {
            return Err(Error::EmptyId {
                action: "CreateCloudRouter".to_string(),
            });
        }

        let id = response.cloud_router_id;
        data.set_id(id.as_str());
        info!(
            cloud_router_id = %id,
            edge_points = request.edge_points.len(),
            "Cloud router created"
        );

        let cr = lifecycle::wait_running(self, ctx, &id, &[CREATING], deadline).await?;
        data.merge_from(&CloudRouterState::from(&cr))
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let deadline = data.deadline(Op::Read);
        self.load(ctx, data, deadline).await
    }

    /// Only name and description are mutable in place; edge-point changes
    /// are planned as a replacement by the host
    async fn update(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Update);

        if data.has_changes(&["name", "description"]) {
            let request = ModifyCloudRouterAttributeRequest {
                cloud_router_id: id.clone(),
                cloud_router_name: data.require_str("name")?.to_string(),
                cloud_router_description: data.get_string("description"),
            };
            retry_call(ctx, deadline.remaining(), &[], || {
                self.api.modify_cloud_router_attribute(&request)
            })
            .await?;
            info!(cloud_router_id = %id, "Cloud router attributes modified");
        }

        self.load(ctx, data, deadline).await
    }

    async fn delete(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Delete);
        lifecycle::delete(self, ctx, &id, data.get_bool(FORCE_DELETE), deadline).await
    }
}
