//! SDN service: datacenter ports, private connects, cloud routers
//!
//! Request/response models mirror the wire format (camelCase JSON). The
//! [`SdnApi`] trait is the seam the reconcilers are written against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{ZenlayerClient, SERVICE_SDN};
use super::error::SdkError;

pub type SdkResult<T> = Result<T, SdkError>;

// =============================================================================
// Ports
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortInfo {
    pub port_id: String,
    pub port_name: String,
    pub port_remarks: Option<String>,
    pub port_type: String,
    pub business_entity_name: String,
    pub dc_id: String,
    pub dc_name: String,
    pub city_name: String,
    pub area_name: String,
    pub loa_status: Option<String>,
    pub loa_download_url: Option<String>,
    pub port_status: String,
    pub connection_status: Option<String>,
    pub port_charge_type: Option<String>,
    pub created_time: Option<String>,
    pub expired_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortRequest {
    pub dc_id: String,
    pub port_name: String,
    pub port_type: String,
    pub business_entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePortResponse {
    pub port_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribePortsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub port_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribePortsResponse {
    pub total_count: u64,
    pub data_set: Vec<PortInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyPortAttributeRequest {
    pub port_id: String,
    pub port_name: String,
    pub port_remarks: String,
    pub business_entity_name: String,
}

// =============================================================================
// Private connects
// =============================================================================

/// One side of a layer-2 private connect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateConnectEndpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_name: Option<String>,
    /// `PORT` or `CLOUD`
    pub endpoint_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_region_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateConnectInfo {
    pub private_connect_id: String,
    pub private_connect_name: String,
    pub private_connect_status: String,
    pub connectivity_status: Option<String>,
    pub bandwidth_mbps: u32,
    pub endpoint_a: PrivateConnectEndpoint,
    pub endpoint_z: PrivateConnectEndpoint,
    pub charge_type: Option<String>,
    pub created_time: Option<String>,
    pub expired_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrivateConnectRequest {
    pub private_connect_name: String,
    pub bandwidth_mbps: u32,
    pub endpoint_a: PrivateConnectEndpoint,
    pub endpoint_z: PrivateConnectEndpoint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePrivateConnectResponse {
    pub private_connect_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribePrivateConnectsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub private_connect_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_connect_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribePrivateConnectsResponse {
    pub total_count: u64,
    pub data_set: Vec<PrivateConnectInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyPrivateConnectAttributeRequest {
    pub private_connect_id: String,
    pub private_connect_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyPrivateConnectBandwidthRequest {
    pub private_connect_id: String,
    pub bandwidth_mbps: u32,
}

// =============================================================================
// Cloud routers
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BgpConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_asn: Option<u32>,
    pub peer_asn: u32,
    pub peer_ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticRoute {
    pub prefix: String,
    pub next_hop: String,
}

/// An attachment of a cloud router to a port or a public cloud region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudRouterEdgePoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_point_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_point_name: Option<String>,
    /// `PORT` or `CLOUD`
    pub endpoint_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_region_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth_mbps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp_connection: Option<BgpConnection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub static_routes: Vec<StaticRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudRouterInfo {
    pub cloud_router_id: String,
    pub cloud_router_name: String,
    pub cloud_router_description: Option<String>,
    pub cloud_router_status: String,
    pub connectivity_status: Option<String>,
    #[serde(rename = "cloudRouterEdgePoints")]
    pub edge_points: Vec<CloudRouterEdgePoint>,
    pub charge_type: Option<String>,
    pub created_time: Option<String>,
    pub expired_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCloudRouterRequest {
    pub cloud_router_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_router_description: Option<String>,
    #[serde(rename = "cloudRouterEdgePoints")]
    pub edge_points: Vec<CloudRouterEdgePoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCloudRouterResponse {
    pub cloud_router_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeCloudRoutersRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cloud_router_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_router_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeCloudRoutersResponse {
    pub total_count: u64,
    pub data_set: Vec<CloudRouterInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCloudRouterAttributeRequest {
    pub cloud_router_id: String,
    pub cloud_router_name: String,
    pub cloud_router_description: String,
}

// =============================================================================
// Datacenters and cloud regions
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatacenterInfo {
    pub dc_id: String,
    pub dc_name: String,
    pub dc_address: Option<String>,
    pub city_name: String,
    pub area_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeDatacentersResponse {
    pub dc_set: Vec<DatacenterInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudRegion {
    pub cloud_region_id: String,
    pub area_name: String,
    pub city_name: String,
    pub dc_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeCloudRegionsRequest {
    /// Google partner interconnect pairing key (Google only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeCloudRegionsResponse {
    pub regions: Vec<CloudRegion>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortIdRequest<'a> {
    port_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrivateConnectIdRequest<'a> {
    private_connect_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CloudRouterIdRequest<'a> {
    cloud_router_id: &'a str,
}

#[derive(Serialize)]
struct EmptyRequest {}

// =============================================================================
// Service trait
// =============================================================================

/// SDN actions used by the reconcilers and data sources
#[async_trait]
pub trait SdnApi: Send + Sync {
    async fn create_port(&self, request: &CreatePortRequest) -> SdkResult<CreatePortResponse>;
    async fn describe_ports(
        &self,
        request: &DescribePortsRequest,
    ) -> SdkResult<DescribePortsResponse>;
    async fn modify_port_attribute(&self, request: &ModifyPortAttributeRequest) -> SdkResult<()>;
    /// Move a port to the recycle bin
    async fn delete_port(&self, port_id: &str) -> SdkResult<()>;
    /// Permanently destroy a recycled port
    async fn destroy_port(&self, port_id: &str) -> SdkResult<()>;

    async fn create_private_connect(
        &self,
        request: &CreatePrivateConnectRequest,
    ) -> SdkResult<CreatePrivateConnectResponse>;
    async fn describe_private_connects(
        &self,
        request: &DescribePrivateConnectsRequest,
    ) -> SdkResult<DescribePrivateConnectsResponse>;
    async fn modify_private_connect_attribute(
        &self,
        request: &ModifyPrivateConnectAttributeRequest,
    ) -> SdkResult<()>;
    /// Asynchronous on the vendor side: the connect goes through `UPDATING`
    async fn modify_private_connect_bandwidth(
        &self,
        request: &ModifyPrivateConnectBandwidthRequest,
    ) -> SdkResult<()>;
    async fn delete_private_connect(&self, private_connect_id: &str) -> SdkResult<()>;
    async fn destroy_private_connect(&self, private_connect_id: &str) -> SdkResult<()>;

    async fn create_cloud_router(
        &self,
        request: &CreateCloudRouterRequest,
    ) -> SdkResult<CreateCloudRouterResponse>;
    async fn describe_cloud_routers(
        &self,
        request: &DescribeCloudRoutersRequest,
    ) -> SdkResult<DescribeCloudRoutersResponse>;
    async fn modify_cloud_router_attribute(
        &self,
        request: &ModifyCloudRouterAttributeRequest,
    ) -> SdkResult<()>;
    async fn delete_cloud_router(&self, cloud_router_id: &str) -> SdkResult<()>;
    async fn destroy_cloud_router(&self, cloud_router_id: &str) -> SdkResult<()>;

    async fn describe_datacenters(&self) -> SdkResult<DescribeDatacentersResponse>;
    async fn describe_aws_regions(&self) -> SdkResult<DescribeCloudRegionsResponse>;
    async fn describe_tencent_regions(&self) -> SdkResult<DescribeCloudRegionsResponse>;
    async fn describe_google_regions(
        &self,
        pairing_key: &str,
    ) -> SdkResult<DescribeCloudRegionsResponse>;
}

#[async_trait]
impl SdnApi for ZenlayerClient {
    async fn create_port(&self, request: &CreatePortRequest) -> SdkResult<CreatePortResponse> {
        self.call(SERVICE_SDN, "CreatePort", request).await
    }

    async fn describe_ports(
        &self,
        request: &DescribePortsRequest,
    ) -> SdkResult<DescribePortsResponse> {
        self.call(SERVICE_SDN, "DescribePorts", request).await
    }

    async fn modify_port_attribute(&self, request: &ModifyPortAttributeRequest) -> SdkResult<()> {
        self.call_unit(SERVICE_SDN, "ModifyPortAttribute", request).await
    }

    async fn delete_port(&self, port_id: &str) -> SdkResult<()> {
        self.call_unit(SERVICE_SDN, "DeletePort", &PortIdRequest { port_id }).await
    }

    async fn destroy_port(&self, port_id: &str) -> SdkResult<()> {
        self.call_unit(SERVICE_SDN, "DestroyPort", &PortIdRequest { port_id }).await
    }

    async fn create_private_connect(
        &self,
        request: &CreatePrivateConnectRequest,
    ) -> SdkResult<CreatePrivateConnectResponse> {
        self.call(SERVICE_SDN, "CreatePrivateConnect", request).await
    }

    async fn describe_private_connects(
        &self,
        request: &DescribePrivateConnectsRequest,
    ) -> SdkResult<DescribePrivateConnectsResponse> {
        self.call(SERVICE_SDN, "DescribePrivateConnects", request).await
    }

    async fn modify_private_connect_attribute(
        &self,
        request: &ModifyPrivateConnectAttributeRequest,
    ) -> SdkResult<()> {
        self.call_unit(SERVICE_SDN, "ModifyPrivateConnectAttribute", request).await
    }

    async fn modify_private_connect_bandwidth(
        &self,
        request: &ModifyPrivateConnectBandwidthRequest,
    ) -> SdkResult<()> {
        self.call_unit(SERVICE_SDN, "ModifyPrivateConnectBandwidth", request).await
    }

    async fn delete_private_connect(&self, private_connect_id: &str) -> SdkResult<()> {
        self.call_unit(
            SERVICE_SDN,
            "DeletePrivateConnect",
            &PrivateConnectIdRequest { private_connect_id },
        )
        .await
    }

    async fn destroy_private_connect(&self, private_connect_id: &str) -> SdkResult<()> {
        self.call_unit(
            SERVICE_SDN,
            "DestroyPrivateConnect",
            &PrivateConnectIdRequest { private_connect_id },
        )
        .await
    }

    async fn create_cloud_router(
        &self,
        request: &CreateCloudRouterRequest,
    ) -> SdkResult<CreateCloudRouterResponse> {
        self.call(SERVICE_SDN, "CreateCloudRouter", request).await
    }

    async fn describe_cloud_routers(
        &self,
        request: &DescribeCloudRoutersRequest,
    ) -> SdkResult<DescribeCloudRoutersResponse> {
        self.call(SERVICE_SDN, "DescribeCloudRouters", request).await
    }

    async fn modify_cloud_router_attribute(
        &self,
        request: &ModifyCloudRouterAttributeRequest,
    ) -> SdkResult<()> {
        self.call_unit(SERVICE_SDN, "ModifyCloudRouterAttribute", request).await
    }

    async fn delete_cloud_router(&self, cloud_router_id: &str) -> SdkResult<()> {
        self.call_unit(
            SERVICE_SDN,
            "DeleteCloudRouter",
            &CloudRouterIdRequest { cloud_router_id },
        )
        .await
    }

    async fn destroy_cloud_router(&self, cloud_router_id: &str) -> SdkResult<()> {
        self.call_unit(
            SERVICE_SDN,
            "DestroyCloudRouter",
            &CloudRouterIdRequest { cloud_router_id },
        )
        .await
    }

    async fn describe_datacenters(&self) -> SdkResult<DescribeDatacentersResponse> {
        self.call(SERVICE_SDN, "DescribeDatacenters", &EmptyRequest {}).await
    }

    async fn describe_aws_regions(&self) -> SdkResult<DescribeCloudRegionsResponse> {
        self.call(SERVICE_SDN, "DescribeAWSRegions", &DescribeCloudRegionsRequest::default())
            .await
    }

    async fn describe_tencent_regions(&self) -> SdkResult<DescribeCloudRegionsResponse> {
        self.call(SERVICE_SDN, "DescribeTencentRegions", &DescribeCloudRegionsRequest::default())
            .await
    }

    async fn describe_google_regions(
        &self,
        pairing_key: &str,
    ) -> SdkResult<DescribeCloudRegionsResponse> {
        self.call(
            SERVICE_SDN,
            "DescribeGoogleRegions",
            &DescribeCloudRegionsRequest {
                pairing_key: Some(pairing_key.to_string()),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_port_info_decodes_camel_case() {
        let port: PortInfo = serde_json::from_value(json!({
            "portId": "p-1",
            "portName": "edge",
            "portType": "10G",
            "dcId": "SIN1",
            "portStatus": "RUNNING",
            "loaDownloadUrl": "https://loa/p-1.pdf"
        }))
        .unwrap();

        assert_eq!(port.port_id, "p-1");
        assert_eq!(port.dc_id, "SIN1");
        assert_eq!(port.loa_download_url.as_deref(), Some("https://loa/p-1.pdf"));
        assert_eq!(port.business_entity_name, "");
    }

    #[test]
    fn test_describe_request_skips_unset_fields() {
        let request = DescribePortsRequest {
            page_num: Some(2),
            page_size: Some(100),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"pageNum": 2, "pageSize": 100})
        );
    }

    #[test]
    fn test_cloud_router_edge_points_wire_name() {
        let request = CreateCloudRouterRequest {
            cloud_router_name: "cr".to_string(),
            cloud_router_description: None,
            edge_points: vec![CloudRouterEdgePoint {
                endpoint_type: "PORT".to_string(),
                port_id: Some("p-1".to_string()),
                ..Default::default()
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["cloudRouterEdgePoints"][0]["portId"], "p-1");
        assert!(value["cloudRouterEdgePoints"][0].get("staticRoutes").is_none());
    }
}
