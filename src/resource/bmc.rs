//! `zenlayercloud_bmc_instance`: bare-metal server

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::lifecycle::{self, Lifecycle};
use super::{Resource, ResourceData, FORCE_DELETE};
use crate::engine::{retry_call, Deadline, HostContext, Op};
use crate::error::{Error, Result};
use crate::zenlayer::error::{INVALID_INSTANCE_NOT_FOUND, OPERATION_DENIED_INSTANCE_RECYCLED};
use crate::zenlayer::{
    BmcApi, ChargePrepaid, CreateInstanceRequest, DescribeInstancesRequest, InstanceInfo,
    ModifyInstanceBandwidthRequest, ModifyInstancesAttributeRequest, SdkResult,
};

pub const TYPE_NAME: &str = "zenlayercloud_bmc_instance";

pub const CREATING: &str = "CREATING";
pub const INSTALLING: &str = "INSTALLING";
pub const BOOTING: &str = "BOOTING";
pub const STOPPING: &str = "STOPPING";
pub const REBOOTING: &str = "REBOOTING";
pub const RELEASING: &str = "RELEASING";
pub const RECYCLING: &str = "RECYCLING";
pub const RUNNING: &str = "RUNNING";
pub const STOPPED: &str = "STOPPED";
pub const RECYCLE: &str = "RECYCLE";
pub const CREATE_FAILED: &str = "CREATE_FAILED";
pub const INSTALL_FAILED: &str = "INSTALL_FAILED";

pub const OPERATIONAL: &[&str] =
    &[CREATING, INSTALLING, BOOTING, STOPPING, REBOOTING, RELEASING, RECYCLING];

pub const CHARGE_PREPAID: &str = "PREPAID";
pub const CHARGE_POSTPAID: &str = "POSTPAID";

/// Host-visible attributes of an instance. The password is write-only and
/// never read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceState {
    pub availability_zone: String,
    pub instance_type: String,
    pub image_id: String,
    pub image_name: Option<String>,
    pub instance_name: String,
    pub hostname: Option<String>,
    pub instance_charge_type: String,
    pub internet_charge_type: Option<String>,
    pub internet_max_bandwidth_out: Option<u32>,
    pub subnet_id: Option<String>,
    pub resource_group_id: Option<String>,
    pub instance_status: String,
    pub public_ip_addresses: Vec<String>,
    pub private_ip_addresses: Vec<String>,
    pub create_time: Option<String>,
    pub expired_time: Option<String>,
}

impl From<&InstanceInfo> for InstanceState {
    fn from(instance: &InstanceInfo) -> Self {
        Self {
            availability_zone: instance.zone_id.clone(),
            instance_type: instance.instance_type_id.clone(),
            image_id: instance.image_id.clone(),
            image_name: instance.image_name.clone(),
            instance_name: instance.instance_name.clone(),
            hostname: instance.hostname.clone(),
            instance_charge_type: instance.instance_charge_type.clone(),
            internet_charge_type: instance.internet_charge_type.clone(),
            internet_max_bandwidth_out: instance.bandwidth_out_mbps,
            subnet_id: instance.subnet_id.clone(),
            resource_group_id: instance.resource_group_id.clone(),
            instance_status: instance.instance_status.clone(),
            public_ip_addresses: instance.public_ip_addresses.clone(),
            private_ip_addresses: instance.private_ip_addresses.clone(),
            create_time: instance.create_time.clone(),
            expired_time: instance.expired_time.clone(),
        }
    }
}

fn create_request(data: &ResourceData) -> Result<CreateInstanceRequest> {
    let charge_type = data.get_str("instance_charge_type").unwrap_or(CHARGE_POSTPAID);
    let prepaid = match charge_type {
        CHARGE_PREPAID => {
            let period = data.get_u32("instance_charge_prepaid_period")?.unwrap_or(0);
            if period == 0 {
                return Err(Error::validation(format!(
                    "\"instance_charge_prepaid_period\" is required for {CHARGE_PREPAID} instances"
                )));
            }
            Some(ChargePrepaid { period })
        }
        CHARGE_POSTPAID => None,
        other => {
            return Err(Error::validation(format!(
                "instance_charge_type must be PREPAID or POSTPAID, got {other:?}"
            )))
        }
    };

    Ok(CreateInstanceRequest {
        zone_id: data.require_str("availability_zone")?.to_string(),
        instance_type_id: data.require_str("instance_type")?.to_string(),
        image_id: data.require_str("image_id")?.to_string(),
        instance_name: data.require_str("instance_name")?.to_string(),
        hostname: data.get_str("hostname").map(str::to_string),
        password: data.get_str("password").map(str::to_string),
        instance_charge_type: charge_type.to_string(),
        instance_charge_prepaid: prepaid,
        internet_charge_type: data.get_str("internet_charge_type").map(str::to_string),
        internet_max_bandwidth_out: data.get_u32("internet_max_bandwidth_out")?,
        subnet_id: data.get_str("subnet_id").map(str::to_string),
        resource_group_id: data.get_str("resource_group_id").map(str::to_string),
        amount: 1,
    })
}

pub struct InstanceResource {
    api: Arc<dyn BmcApi>,
}

impl InstanceResource {
    /// Refresh `data` from the vendor within `deadline`; clears the id when gone
    async fn load(
        &self,
        ctx: &HostContext,
        data: &mut ResourceData,
        deadline: Deadline,
    ) -> Result<()> {
        let id = data.require_id()?;
        match lifecycle::read_settled(self, ctx, &id, deadline).await? {
            Some(instance) => data.merge_from(&InstanceState::from(&instance)),
            None => {
                data.clear_id();
                Ok(())
            }
        }
    }

    pub fn new(api: Arc<dyn BmcApi>) -> Self {
        Self { api }
    }

    async fn find(&self, id: &str) -> SdkResult<Option<InstanceInfo>> {
        let request = DescribeInstancesRequest {
            instance_ids: vec![id.to_string()],
            ..Default::default()
        };
        let response = self.api.describe_instances(&request).await?;
        Ok(response.data_set.into_iter().find(|i| i.instance_id == id))
    }
}

#[async_trait]
impl Lifecycle for InstanceResource {
    type Info = InstanceInfo;

    const LABEL: &'static str = "instance";
    const OPERATIONAL: &'static [&'static str] = OPERATIONAL;
    const RUNNING: &'static str = RUNNING;
    const RECYCLED: &'static str = RECYCLE;
    const FAIL: &'static [&'static str] = &[CREATE_FAILED, INSTALL_FAILED];
    const NOT_FOUND_CODE: &'static str = INVALID_INSTANCE_NOT_FOUND;
    const RECYCLED_CODE: &'static str = OPERATION_DENIED_INSTANCE_RECYCLED;

    async fn lookup(&self, id: &str) -> SdkResult<Option<InstanceInfo>> {
        self.find(id).await
    }

    fn status(info: &InstanceInfo) -> &str {
        &info.instance_status
    }

    async fn soft_delete(&self, id: &str) -> SdkResult<()> {
        self.api.terminate_instance(id).await
    }

    async fn destroy(&self, id: &str) -> SdkResult<()> {
        self.api.release_instances(&[id.to_string()]).await
    }
}

#[async_trait]
impl Resource for InstanceResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let request = create_request(data)?;
        let deadline = data.deadline(Op::Create);

        let response = retry_call(ctx, deadline.remaining(), &[], || {
            self.api.create_instance(&request)
        })
        .await?;
        let id = match response.instance_id_set.into_iter().next() {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(Error::EmptyId {
                    action: "CreateInstances".to_string(),
                })
            }
        };

        data.set_id(id.as_str());
        info!(
            instance_id = %id,
            zone_id = %request.zone_id,
            instance_type = %request.instance_type_id,
            "Instance created"
        );

        let pending = &[CREATING, INSTALLING, BOOTING];
        let instance = lifecycle::wait_running(self, ctx, &id, pending, deadline).await?;
        data.merge_from(&InstanceState::from(&instance))
    }

    async fn read(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let deadline = data.deadline(Op::Read);
        self.load(ctx, data, deadline).await
    }

    async fn update(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Update);

        if data.has_change("instance_name") {
            let request = ModifyInstancesAttributeRequest {
                instance_ids: vec![id.clone()],
                instance_name: data.require_str("instance_name")?.to_string(),
            };
            retry_call(ctx, deadline.remaining(), &[], || {
                self.api.modify_instances_attribute(&request)
            })
            .await?;
            info!(instance_id = %id, "Instance renamed");
        }

        if data.has_change("internet_max_bandwidth_out") {
            let request = ModifyInstanceBandwidthRequest {
                instance_id: id.clone(),
                bandwidth_out_mbps: data.require_u32("internet_max_bandwidth_out")?,
            };
            retry_call(ctx, deadline.remaining(), &[], || {
                self.api.modify_instance_bandwidth(&request)
            })
            .await?;
            info!(
                instance_id = %id,
                bandwidth = request.bandwidth_out_mbps,
                "Bandwidth change accepted, waiting for it to apply"
            );
            lifecycle::wait_running(self, ctx, &id, OPERATIONAL, deadline).await?;
        }

        self.load(ctx, data, deadline).await
    }

    async fn delete(&self, ctx: &HostContext, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?;
        let deadline = data.deadline(Op::Delete);
        lifecycle::delete(self, ctx, &id, data.get_bool(FORCE_DELETE), deadline).await
    }
}
