//! Endpoint and edge-point blocks
//!
//! Conversion between the host's nested attribute blocks and the vendor's
//! endpoint payloads, used by both the reconcilers and the data sources.
//!
//! Flattening rules:
//! - endpoint type `PORT` exposes `port_id` (and the port's datacenter),
//!   anything else exposes `cloud_region`, `cloud_account` and `cloud_type`
//! - for `GOOGLE` the cloud account is the partner interconnect pairing key
//! - an edge point's `route_type` is `BGP` iff it carries a BGP session

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zenlayer::{BgpConnection, CloudRouterEdgePoint, PrivateConnectEndpoint, StaticRoute};

pub const ENDPOINT_PORT: &str = "PORT";
pub const ENDPOINT_CLOUD: &str = "CLOUD";
pub const ROUTE_BGP: &str = "BGP";
pub const ROUTE_STATIC: &str = "STATIC";
pub const CLOUD_GOOGLE: &str = "GOOGLE";

pub const VLAN_MIN: u32 = 1;
pub const VLAN_MAX: u32 = 4096;

pub fn validate_vlan(field: &str, vlan_id: Option<u32>) -> Result<()> {
    match vlan_id {
        Some(vlan) if !(VLAN_MIN..=VLAN_MAX).contains(&vlan) => Err(Error::validation(format!(
            "{field}: vlan_id {vlan} is out of range {VLAN_MIN}-{VLAN_MAX}"
        ))),
        _ => Ok(()),
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// Attachment point shared by endpoint and edge-point validation
fn validate_attachment(
    field: &str,
    endpoint_type: &str,
    port_id: &Option<String>,
    cloud_region: &Option<String>,
    cloud_account: &Option<String>,
    cloud_type: &Option<String>,
) -> Result<()> {
    match endpoint_type {
        ENDPOINT_PORT => {
            if !non_empty(port_id) {
                return Err(Error::validation(format!(
                    "{field}: port_id is required when endpoint_type is PORT"
                )));
            }
        }
        ENDPOINT_CLOUD => {
            let missing: Vec<&str> = [
                ("cloud_region", cloud_region),
                ("cloud_account", cloud_account),
                ("cloud_type", cloud_type),
            ]
            .iter()
            .filter(|(_, value)| !non_empty(value))
            .map(|(name, _)| *name)
            .collect();
            if !missing.is_empty() {
                return Err(Error::validation(format!(
                    "{field}: {} required when endpoint_type is CLOUD",
                    missing.join(", ")
                )));
            }
        }
        other => {
            return Err(Error::validation(format!(
                "{field}: endpoint_type must be PORT or CLOUD, got {other:?}"
            )))
        }
    }
    Ok(())
}

// =============================================================================
// Private connect endpoints
// =============================================================================

/// `endpoint_a` / `endpoint_z` block of a private connect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub endpoint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_type: Option<String>,
    // computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,
}

impl Endpoint {
    pub fn validate(&self, field: &str) -> Result<()> {
        validate_attachment(
            field,
            &self.endpoint_type,
            &self.port_id,
            &self.cloud_region,
            &self.cloud_account,
            &self.cloud_type,
        )?;
        validate_vlan(field, self.vlan_id)
    }

    pub fn to_wire(&self) -> PrivateConnectEndpoint {
        let mut wire = PrivateConnectEndpoint {
            endpoint_type: self.endpoint_type.clone(),
            vlan_id: self.vlan_id,
            ..Default::default()
        };
        if self.endpoint_type == ENDPOINT_PORT {
            wire.port_id = self.port_id.clone();
        } else {
            wire.cloud_region_id = self.cloud_region.clone();
            wire.cloud_account_id = self.cloud_account.clone();
            wire.cloud_type = self.cloud_type.clone();
        }
        wire
    }

    pub fn flatten(wire: &PrivateConnectEndpoint) -> Self {
        let mut endpoint = Self {
            endpoint_type: wire.endpoint_type.clone(),
            vlan_id: wire.vlan_id,
            endpoint_id: wire.endpoint_id.clone(),
            endpoint_name: wire.endpoint_name.clone(),
            datacenter: wire.dc_id.clone(),
            ..Default::default()
        };
        if wire.endpoint_type == ENDPOINT_PORT {
            endpoint.port_id = wire.port_id.clone();
        } else {
            endpoint.cloud_region = wire.cloud_region_id.clone();
            endpoint.cloud_account = wire.cloud_account_id.clone();
            endpoint.cloud_type = wire.cloud_type.clone();
        }
        endpoint
    }
}

// =============================================================================
// Cloud router edge points
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bgp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_asn: Option<u32>,
    pub peer_asn: u32,
    pub peer_ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub prefix: String,
    pub next_hop: String,
}

/// One entry of a cloud router's `edge_points` list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `BGP` or `STATIC`
    pub route_type: String,
    pub endpoint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp: Option<Bgp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_routes: Vec<Route>,
    // computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_point_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,
}

impl EdgePoint {
    pub fn validate(&self, field: &str) -> Result<()> {
        validate_attachment(
            field,
            &self.endpoint_type,
            &self.port_id,
            &self.cloud_region,
            &self.cloud_account,
            &self.cloud_type,
        )?;
        validate_vlan(field, self.vlan_id)?;

        match self.route_type.as_str() {
            ROUTE_BGP if self.bgp.is_none() => Err(Error::validation(format!(
                "{field}: bgp is required when route_type is BGP"
            ))),
            ROUTE_BGP => Ok(()),
            ROUTE_STATIC if self.bgp.is_some() => Err(Error::validation(format!(
                "{field}: bgp is only allowed when route_type is BGP"
            ))),
            ROUTE_STATIC => Ok(()),
            other => Err(Error::validation(format!(
                "{field}: route_type must be BGP or STATIC, got {other:?}"
            ))),
        }
    }

    pub fn to_wire(&self) -> CloudRouterEdgePoint {
        let mut wire = CloudRouterEdgePoint {
            edge_point_name: self.name.clone(),
            endpoint_type: self.endpoint_type.clone(),
            vlan_id: self.vlan_id,
            ip_address: self.ip_address.clone(),
            bandwidth_mbps: self.bandwidth,
            ..Default::default()
        };
        if self.endpoint_type == ENDPOINT_PORT {
            wire.port_id = self.port_id.clone();
        } else {
            wire.cloud_region_id = self.cloud_region.clone();
            wire.cloud_account_id = self.cloud_account.clone();
            wire.cloud_type = self.cloud_type.clone();
        }
        if self.route_type == ROUTE_BGP {
            wire.bgp_connection = self.bgp.as_ref().map(|bgp| BgpConnection {
                local_asn: bgp.local_asn,
                peer_asn: bgp.peer_asn,
                peer_ip_address: bgp.peer_ip_address.clone(),
                password: bgp.password.clone(),
            });
        } else {
            wire.static_routes = self
                .static_routes
                .iter()
                .map(|route| StaticRoute {
                    prefix: route.prefix.clone(),
                    next_hop: route.next_hop.clone(),
                })
                .collect();
        }
        wire
    }

    pub fn flatten(wire: &CloudRouterEdgePoint) -> Self {
        let mut edge = Self {
            name: wire.edge_point_name.clone(),
            endpoint_type: wire.endpoint_type.clone(),
            vlan_id: wire.vlan_id,
            ip_address: wire.ip_address.clone(),
            bandwidth: wire.bandwidth_mbps,
            edge_point_id: wire.edge_point_id.clone(),
            datacenter: wire.dc_id.clone(),
            ..Default::default()
        };

        if wire.endpoint_type == ENDPOINT_PORT {
            edge.port_id = wire.port_id.clone();
        } else {
            edge.cloud_region = wire.cloud_region_id.clone();
            edge.cloud_account = wire.cloud_account_id.clone();
            edge.cloud_type = wire.cloud_type.clone();
        }

        match &wire.bgp_connection {
            Some(bgp) => {
                edge.route_type = ROUTE_BGP.to_string();
                edge.bgp = Some(Bgp {
                    local_asn: bgp.local_asn,
                    peer_asn: bgp.peer_asn,
                    peer_ip_address: bgp.peer_ip_address.clone(),
                    password: bgp.password.clone(),
                });
            }
            None => {
                edge.route_type = ROUTE_STATIC.to_string();
                edge.static_routes = wire
                    .static_routes
                    .iter()
                    .map(|route| Route {
                        prefix: route.prefix.clone(),
                        next_hop: route.next_hop.clone(),
                    })
                    .collect();
            }
        }
        edge
    }
}
