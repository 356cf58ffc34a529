//! `zenlayercloud_sdn_port`: a physical port in a datacenter

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::{CREATING, OPERATIONAL, RECYCLED, RUNNING};
use crate::engine::{retry_call, Deadline, HostContext, Op};
use crate::error::{Error, Result};
use crate::resource::lifecycle::{self, Lifecycle};
use crate::resource::{Resource, ResourceData, FORCE_DELETE};
use crate::zenlayer::error::{INVALID_PORT_NOT_FOUND, OPERATION_DENIED_PORT_RECYCLED};
use crate::zenlayer::{
    CreatePortRequest, DescribePortsRequest, ModifyPortAttributeRequest, PortInfo, SdkResult,
    SdnApi,
};

pub const TYPE_NAME: &str = "zenlayercloud_sdn_port";

/// Fields changed together through `ModifyPortAttribute`
const ATTRIBUTE_GROUP: &[&str] = &["name", "remarks", "business_entity_name"];

/// Host-visible attributes of a port
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortState {
    pub name: String,
    pub datacenter: String,
    pub datacenter_name: String,
    pub port_type: String,
    pub business_entity_name: String,
    pub remarks: Option<String>,
    pub port_status: String,
    pub connectivity_status: Option<String>,
    pub loa_status: Option<String>,
    pub loa_url: Option<String>,
    pub port_charge_type: Option<String>,
    pub create_time: Option<String>,
    pub expired_time: Option<String>,
}

impl From<&PortInfo> for PortState {
    fn from(port: &PortInfo) -> Self {
        Self {
            name: port.port_name.clone(),
            datacenter: port.dc_id.clone(),
            datacenter_name: port.dc_name.clone(),
            port_type: port.port_type.clone(),
            business_entity_name: port.business_entity_name.clone(),
            remarks: port.port_remarks.clone(),
            port_status: port.port_status.clone(),
            connectivity_status: port.connection_status.clone(),
            loa_status: port.loa_status.clone(),
            loa_url: port.loa_download_url.clone(),
            port_charge_type: port.port_charge_type.clone(),
            create_time: port.created_time.clone(),
            expired_time: port.expired_time.clone(),
        }
    }
}

pub struct PortResource {
    api: Arc<dyn SdnApi>,
}

impl PortResource {
    /// Refresh `data` from the vendor within `deadline`; clears the id when gone
    async fn load(
        &self,
        ctx: &HostContext,
        data: &mut ResourceData,
        deadline: Deadline,
    ) -> Result<()> {
        let id = data.require_id()?;
        match lifecycle::read_settled(self, ctx, &id, deadline).await? {
            Some(port) => data.merge_from(&PortState::from(&port)),
            None => {
                data.clear_id();
                Ok(())
            }
        }
    }

    pub fn new(api: Arc<dyn SdnApi>) -> Self {
        Self { api }
    }

    async fn find(&self, port_id: &str) -> SdkResult<Option<PortInfo>> {
        let request = DescribePortsRequest {
            port_ids: vec![port_id.to_string()],
            ..Default::default()
        };
        let response = self.api.describe_ports(&request).await?;
        Ok(response.data_set.into_iter().find(|port| port.port_id == port_id))
    }
}

#[async_trait]
impl Lifecycle for PortResource {
    type Info = PortInfo;

    const LABEL: &'static str = "port";
    const OPERATIONAL: &'static [&'static str] = OPERATIONAL;
    const RUNNING: &'static str = RUNNING;
    const RECYCLED: &'static str = RECYCLED;
    const NOT_FOUND_CODE: &'static str = INVALID_PORT_NOT_FOUND;
    const RECYCLED_CODE: &'static str = OPERATION_DENIED_PORT_RECYCLED;

    async fn lookup(&self, id: &str) -> SdkResult<Option<PortInfo>> {
        self.find(id).await
    }

    fn status(info: &PortInfo) -> &str {
        &info.port_status
    }

    async fn soft_delete(&self, id: &str) -> SdkResult<()> {
        self.api.delete_port(id).await
    }

    async fn destroy(&self, id: &str) -> SdkResult<()> {
        self.api.destroy_port(id).await
    }
}

#[async_trait]
impl Resource for PortResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = CreatePortRequest {
            dc_id: data.require_str("datacenter")?.to_string(),
            port_name: data.require_str("name")?.to_string(),
            port_type: data.require_str("port_type")?.to_string(),
            business_entity_name: data.require_str("business_entity_name")?.to_string(),
            port_remarks: data.get_str("remarks").map(str::to_string),
        };
        let deadline = data.deadline(Op::Create);

        let response =
            retry_call(ctx, deadline.remaining(), &[], || self.api.create_port(&request)).await?;
        if response.port_id.is_empty() {
            return Err(Error::EmptyId {
                action: "CreatePort".to_string(),
            });
        }

        // committed before waiting so a failed wait still leaves a handle
        data.set_id(response.port_id.as_str());
        info!(port_id = %response.port_id, dc_id = %request.dc_id, "Port created");

        let port =
            lifecycle::wait_running(self, ctx, &response.port_id, &[CREATING], deadline).await?;
        data.merge_from(&PortState::from(&port))
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let deadline = data.deadline(Op::Read);
        self.load(ctx, data, deadline).await
    }

    async fn update(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Update);

        if data.has_changes(ATTRIBUTE_GROUP) {
            let request = ModifyPortAttributeRequest {
                port_id: id.clone(),
                port_name: data.require_str("name")?.to_string(),
                port_remarks: data.get_string("remarks"),
                business_entity_name: data.require_str("business_entity_name")?.to_string(),
            };
            retry_call(ctx, deadline.remaining(), &[], || {
                self.api.modify_port_attribute(&request)
            })
            .await?;
            info!(port_id = %id, "Port attributes modified");
        }

        self.load(ctx, data, deadline).await
    }

    async fn delete(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Delete);
        lifecycle::delete(self, ctx, &id, data.get_bool(FORCE_DELETE), deadline).await
    }
}
