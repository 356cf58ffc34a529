//! Bare Metal Cloud service: instances and sellable instance types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{ZenlayerClient, SERVICE_BMC};
use super::sdn::SdkResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceInfo {
    pub instance_id: String,
    pub instance_name: String,
    pub hostname: Option<String>,
    pub instance_type_id: String,
    pub image_id: String,
    pub image_name: Option<String>,
    pub zone_id: String,
    pub instance_status: String,
    pub instance_charge_type: String,
    pub internet_charge_type: Option<String>,
    pub bandwidth_out_mbps: Option<u32>,
    pub public_ip_addresses: Vec<String>,
    pub private_ip_addresses: Vec<String>,
    pub subnet_id: Option<String>,
    pub resource_group_id: Option<String>,
    pub create_time: Option<String>,
    pub expired_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargePrepaid {
    /// Subscription period in months
    pub period: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest {
    pub zone_id: String,
    pub instance_type_id: String,
    pub image_id: String,
    pub instance_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub instance_charge_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_charge_prepaid: Option<ChargePrepaid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_charge_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_max_bandwidth_out: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
    pub amount: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateInstanceResponse {
    pub instance_id_set: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeInstancesRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub instance_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeInstancesResponse {
    pub total_count: u64,
    pub data_set: Vec<InstanceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyInstancesAttributeRequest {
    pub instance_ids: Vec<String>,
    pub instance_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyInstanceBandwidthRequest {
    pub instance_id: String,
    pub bandwidth_out_mbps: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailableResource {
    pub zone_id: String,
    pub instance_type_id: String,
    /// `SELL` or `SOLD_OUT`
    pub sell_status: String,
    pub maximum_bandwidth_out: Option<u32>,
    pub default_traffic_package_size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeAvailableResourcesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_charge_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeAvailableResourcesResponse {
    pub available_resources: Vec<AvailableResource>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceIdRequest<'a> {
    instance_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceIdsRequest<'a> {
    instance_ids: &'a [String],
}

/// Bare-metal actions used by the reconcilers and data sources
#[async_trait]
pub trait BmcApi: Send + Sync {
    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> SdkResult<CreateInstanceResponse>;
    async fn describe_instances(
        &self,
        request: &DescribeInstancesRequest,
    ) -> SdkResult<DescribeInstancesResponse>;
    async fn modify_instances_attribute(
        &self,
        request: &ModifyInstancesAttributeRequest,
    ) -> SdkResult<()>;
    async fn modify_instance_bandwidth(
        &self,
        request: &ModifyInstanceBandwidthRequest,
    ) -> SdkResult<()>;
    /// Move an instance to the recycle bin
    async fn terminate_instance(&self, instance_id: &str) -> SdkResult<()>;
    /// Permanently release recycled instances
    async fn release_instances(&self, instance_ids: &[String]) -> SdkResult<()>;
    async fn describe_available_resources(
        &self,
        request: &DescribeAvailableResourcesRequest,
    ) -> SdkResult<DescribeAvailableResourcesResponse>;
}

#[async_trait]
impl BmcApi for ZenlayerClient {
    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> SdkResult<CreateInstanceResponse> {
        self.call(SERVICE_BMC, "CreateInstances", request).await
    }

    async fn describe_instances(
        &self,
        request: &DescribeInstancesRequest,
    ) -> SdkResult<DescribeInstancesResponse> {
        self.call(SERVICE_BMC, "DescribeInstances", request).await
    }

    async fn modify_instances_attribute(
        &self,
        request: &ModifyInstancesAttributeRequest,
    ) -> SdkResult<()> {
        self.call_unit(SERVICE_BMC, "ModifyInstancesAttribute", request).await
    }

    async fn modify_instance_bandwidth(
        &self,
        request: &ModifyInstanceBandwidthRequest,
    ) -> SdkResult<()> {
        self.call_unit(SERVICE_BMC, "ModifyInstanceBandwidth", request).await
    }

    async fn terminate_instance(&self, instance_id: &str) -> SdkResult<()> {
        self.call_unit(SERVICE_BMC, "TerminateInstance", &InstanceIdRequest { instance_id })
            .await
    }

    async fn release_instances(&self, instance_ids: &[String]) -> SdkResult<()> {
        self.call_unit(SERVICE_BMC, "ReleaseInstances", &InstanceIdsRequest { instance_ids })
            .await
    }

    async fn describe_available_resources(
        &self,
        request: &DescribeAvailableResourcesRequest,
    ) -> SdkResult<DescribeAvailableResourcesResponse> {
        self.call(SERVICE_BMC, "DescribeAvailableResources", request).await
    }
}
