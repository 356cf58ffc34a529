//! `zenlayercloud_sdn_private_connect`: layer-2 point-to-point connection

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::endpoint::Endpoint;
use super::{CREATING, OPERATIONAL, RECYCLED, RUNNING, UPDATING};
use crate::engine::{retry_call, Deadline, HostContext, Op};
use crate::error::{Error, Result};
use crate::resource::lifecycle::{self, Lifecycle};
use crate::resource::{Resource, ResourceData, FORCE_DELETE};
use crate::zenlayer::error::{
    INVALID_PRIVATE_CONNECT_NOT_FOUND, OPERATION_DENIED_PRIVATE_CONNECT_RECYCLED,
    OPERATION_DENIED_PRIVATE_CONNECT_UPDATING,
};
use crate::zenlayer::{
    CreatePrivateConnectRequest, DescribePrivateConnectsRequest,
    ModifyPrivateConnectAttributeRequest, ModifyPrivateConnectBandwidthRequest, PrivateConnectInfo,
    SdkResult, SdnApi,
};

pub const TYPE_NAME: &str = "zenlayercloud_sdn_private_connect";

/// Host-visible attributes of a private connect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivateConnectState {
    pub name: String,
    pub bandwidth: u32,
    pub endpoint_a: Endpoint,
    pub endpoint_z: Endpoint,
    pub status: String,
    pub connectivity_status: Option<String>,
    pub charge_type: Option<String>,
    pub create_time: Option<String>,
    pub expired_time: Option<String>,
}

impl From<&PrivateConnectInfo> for PrivateConnectState {
    fn from(pc: &PrivateConnectInfo) -> Self {
        Self {
            name: pc.private_connect_name.clone(),
            bandwidth: pc.bandwidth_mbps,
            endpoint_a: Endpoint::flatten(&pc.endpoint_a),
            endpoint_z: Endpoint::flatten(&pc.endpoint_z),
            status: pc.private_connect_status.clone(),
            connectivity_status: pc.connectivity_status.clone(),
            charge_type: pc.charge_type.clone(),
            create_time: pc.created_time.clone(),
            expired_time: pc.expired_time.clone(),
        }
    }
}

fn require_endpoint(data: &ResourceData, key: &str) -> Result<Endpoint> {
    let endpoint: Endpoint = data
        .get_as(key)?
        .ok_or_else(|| Error::validation(format!("\"{key}\" is required")))?;
    endpoint.validate(key)?;
    Ok(endpoint)
}

pub struct PrivateConnectResource {
    api: Arc<dyn SdnApi>,
}

impl PrivateConnectResource {
    /// Refresh `data` from the vendor within `deadline`; clears the id when gone
    async fn load(
        &self,
        ctx: &HostContext,
        data: &mut ResourceData,
        deadline: Deadline,
    ) -> Result<()> {
        let id = data.require_id()?;
        match lifecycle::read_settled(self, ctx, &id, deadline).await? {
            Some(pc) => data.merge_from(&PrivateConnectState::from(&pc)),
            None => {
                data.clear_id();
                Ok(())
            }
        }
    }

    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }

    async fn find(&self, id: &str) -> SdkResult<Option<PrivateConnectInfo>> {
        let request = DescribePrivateConnectsRequest {
            private_connect_ids: vec![id.to_string()],
            ..Default::default()
        };
        let response = self.api.describe_private_connects(&request).await?;
        Ok(response
            .data_set
            .into_iter()
            .find(|pc| pc.private_connect_id == id))
    }
}

#[async_trait]
impl Lifecycle for PrivateConnectResource {
    type Info = PrivateConnectInfo;

    const LABEL: &'static str = "private connect";
    const OPERATIONAL: &'static [&'static str] = OPERATIONAL;
    const RUNNING: &'static str = RUNNING;
    const RECYCLED: &'static str = RECYCLED;
    const NOT_FOUND_CODE: &'static str = INVALID_PRIVATE_CONNECT_NOT_FOUND;
    const RECYCLED_CODE: &'static str = OPERATION_DENIED_PRIVATE_CONNECT_RECYCLED;

    async fn lookup(&self, id: &str) -> SdkResult<Option<PrivateConnectInfo>> {
        self.find(id).await
    }

    fn status(info: &PrivateConnectInfo) -> &str {
        &info.private_connect_status
    }

    async fn soft_delete(&self, id: &str) -> SdkResult<()> {
        self.api.delete_private_connect(id).await
    }

    async fn destroy(&self, id: &str) -> SdkResult<()> {
        self.api.destroy_private_connect(id).await
    }
}

#[async_trait]
impl Resource for PrivateConnectResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = CreatePrivateConnectRequest {
            private_connect_name: data.require_str("name")?.to_string(),
            bandwidth_mbps: data.require_u32("bandwidth")?,
            endpoint_a: require_endpoint(data, "endpoint_a")?.to_wire(),
            endpoint_z: require_endpoint(data, "endpoint_z")?.to_wire(),
        };
        let deadline = data.deadline(Op::Create);

        let response = retry_call(ctx, deadline.remaining(), &[], || {
            self.api.create_private_connect(&request)
        })
        .await?;
        if response.private_connect_id.is_empty() {
            return Err(Error::EmptyId {
                action: "CreatePrivateConnect".to_string(),
            });
        }

        let id = response.private_connect_id;
        data.set_id(id.as_str());
        info!(
            private_connect_id = %id,
            bandwidth = request.bandwidth_mbps,
            "Private connect created"
        );

        let pc = lifecycle::wait_running(self, ctx, &id, &[CREATING], deadline).await?;
        data.merge_from(&PrivateConnectState::from(&pc))
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let deadline = data.deadline(Op::Read);
        self.load(ctx, data, deadline).await
    }

    async fn update(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Update);

        if data.has_change("name") {
            let request = ModifyPrivateConnectAttributeRequest {
                private_connect_id: id.clone(),
                private_connect_name: data.require_str("name")?.to_string(),
            };
            retry_call(ctx, deadline.remaining(), &[], || {
                self.api.modify_private_connect_attribute(&request)
            })
            .await?;
            info!(private_connect_id = %id, "Private connect renamed");
        }

        if data.has_change("bandwidth") {
            let request = ModifyPrivateConnectBandwidthRequest {
                private_connect_id: id.clone(),
                bandwidth_mbps: data.require_u32("bandwidth")?,
            };
            retry_call(ctx, deadline.remaining(), &[OPERATION_DENIED_PRIVATE_CONNECT_UPDATING], || {
                self.api.modify_private_connect_bandwidth(&request)
            })
            .await?;
            info!(
                private_connect_id = %id,
                bandwidth = request.bandwidth_mbps,
                "Bandwidth change accepted, waiting for it to apply"
            );
            lifecycle::wait_running(self, ctx, &id, &[UPDATING], deadline).await?;
        }

        self.load(ctx, data, deadline).await
    }

    async fn delete(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Delete);
        lifecycle::delete(self, ctx, &id, data.get_bool(FORCE_DELETE), deadline).await
    }
}
