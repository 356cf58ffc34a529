//! In-memory Zenlayer Cloud used by the integration tests
//!
//! Every resource carries a status script: each time it shows up in a
//! describe answer the script advances one step, and the last entry sticks.
//! Errors can be queued per action and every call is logged by action name.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use zenlayercloud_provider::engine::HostContext;
use zenlayercloud_provider::resource::Provider;
use zenlayercloud_provider::zenlayer::error::{
    INVALID_CLOUD_ROUTER_NOT_FOUND, INVALID_INSTANCE_NOT_FOUND, INVALID_PORT_NOT_FOUND,
    INVALID_PRIVATE_CONNECT_NOT_FOUND, OPERATION_DENIED_CLOUD_ROUTER_RECYCLED,
    OPERATION_DENIED_INSTANCE_RECYCLED, OPERATION_DENIED_PORT_RECYCLED,
    OPERATION_DENIED_PRIVATE_CONNECT_RECYCLED,
};
use zenlayercloud_provider::zenlayer::*;

/// A stored entity plus the statuses it will report next
#[derive(Debug, Clone)]
struct Scripted<T> {
    info: T,
    script: VecDeque<String>,
}

impl<T> Scripted<T> {
    fn new(info: T, script: &[&str]) -> Self {
        Self {
            info,
            script: script.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Status to report now; advances unless on the last step
    fn step(&mut self) -> Option<String> {
        if self.script.len() > 1 {
            self.script.pop_front()
        } else {
            self.script.front().cloned()
        }
    }

    fn rescript(&mut self, script: &[&str]) {
        self.script = script.iter().map(|s| s.to_string()).collect();
    }

    fn settled(&self) -> Option<&str> {
        self.script.back().map(String::as_str)
    }
}

#[derive(Default)]
struct Inner {
    ports: BTreeMap<String, Scripted<PortInfo>>,
    private_connects: BTreeMap<String, Scripted<PrivateConnectInfo>>,
    cloud_routers: BTreeMap<String, Scripted<CloudRouterInfo>>,
    instances: BTreeMap<String, Scripted<InstanceInfo>>,
    datacenters: Vec<DatacenterInfo>,
    regions: Vec<CloudRegion>,
    offers: Vec<AvailableResource>,
    create_scripts: HashMap<&'static str, Vec<String>>,
    delete_scripts: HashMap<&'static str, Vec<String>>,
    update_scripts: HashMap<&'static str, Vec<String>>,
    failures: HashMap<String, VecDeque<SdkError>>,
    scheduled: HashMap<(String, usize), SdkError>,
    calls: Vec<String>,
    next_id: u32,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:04}", self.next_id)
    }

    fn script(
        scripts: &HashMap<&'static str, Vec<String>>,
        kind: &'static str,
        default: &[&str],
    ) -> Vec<String> {
        scripts
            .get(kind)
            .cloned()
            .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect())
    }
}

/// Scripted stand-in for both vendor services
#[derive(Clone, Default)]
pub struct FakeCloud {
    inner: Arc<Mutex<Inner>>,
}

pub const PORT: &str = "port";
pub const PRIVATE_CONNECT: &str = "private_connect";
pub const CLOUD_ROUTER: &str = "cloud_router";
pub const INSTANCE: &str = "instance";

fn as_refs(script: &[String]) -> Vec<&str> {
    script.iter().map(String::as_str).collect()
}

fn page<T: Clone>(items: Vec<T>, page_num: Option<u32>, page_size: Option<u32>) -> (u64, Vec<T>) {
    let total = items.len() as u64;
    let size = page_size.unwrap_or(20).max(1) as usize;
    let start = (page_num.unwrap_or(1).max(1) as usize - 1) * size;
    (total, items.into_iter().skip(start).take(size).collect())
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every type talks to this fake
    pub fn provider(&self) -> Provider {
        Provider::new(Arc::new(self.clone()), Arc::new(self.clone()))
    }

    /// Statuses a freshly created `kind` reports
    pub fn on_create(&self, kind: &'static str, script: &[&str]) {
        self.lock()
            .create_scripts
            .insert(kind, script.iter().map(|s| s.to_string()).collect());
    }

    /// Statuses a soft-deleted `kind` reports
    pub fn on_delete(&self, kind: &'static str, script: &[&str]) {
        self.lock()
            .delete_scripts
            .insert(kind, script.iter().map(|s| s.to_string()).collect());
    }

    /// Statuses `kind` reports after a bandwidth change
    pub fn on_update(&self, kind: &'static str, script: &[&str]) {
        self.lock()
            .update_scripts
            .insert(kind, script.iter().map(|s| s.to_string()).collect());
    }

    /// Queue an error for the next call of `action`
    pub fn fail(&self, action: &str, err: SdkError) {
        self.lock()
            .failures
            .entry(action.to_string())
            .or_default()
            .push_back(err);
    }

    /// Fail only the `nth` call (1-based) of `action`
    pub fn fail_on_call(&self, action: &str, nth: usize, err: SdkError) {
        self.lock().scheduled.insert((action.to_string(), nth), err);
    }

    /// Queue `count` server errors for `action`
    pub fn fail_5xx(&self, action: &str, count: usize) {
        for _ in 0..count {
            self.fail(action, SdkError::api(503, "HTTP_503", "service unavailable"));
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, action: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.as_str() == action).count()
    }

    pub fn seed_port(&self, info: PortInfo) {
        let status = info.port_status.clone();
        self.lock()
            .ports
            .insert(info.port_id.clone(), Scripted::new(info, &[status.as_str()]));
    }

    pub fn seed_private_connect(&self, info: PrivateConnectInfo) {
        let status = info.private_connect_status.clone();
        self.lock()
            .private_connects
            .insert(info.private_connect_id.clone(), Scripted::new(info, &[status.as_str()]));
    }

    pub fn seed_instance(&self, info: InstanceInfo) {
        let status = info.instance_status.clone();
        self.lock()
            .instances
            .insert(info.instance_id.clone(), Scripted::new(info, &[status.as_str()]));
    }

    pub fn seed_datacenters(&self, datacenters: Vec<DatacenterInfo>) {
        self.lock().datacenters = datacenters;
    }

    pub fn seed_regions(&self, regions: Vec<CloudRegion>) {
        self.lock().regions = regions;
    }

    pub fn seed_offers(&self, offers: Vec<AvailableResource>) {
        self.lock().offers = offers;
    }

    pub fn port(&self, id: &str) -> Option<PortInfo> {
        self.lock().ports.get(id).map(|p| p.info.clone())
    }

    pub fn has_private_connect(&self, id: &str) -> bool {
        self.lock().private_connects.contains_key(id)
    }

    pub fn has_cloud_router(&self, id: &str) -> bool {
        self.lock().cloud_routers.contains_key(id)
    }

    pub fn has_instance(&self, id: &str) -> bool {
        self.lock().instances.contains_key(id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Log the call and pop a queued failure, if any
    fn enter(&self, action: &str) -> Result<std::sync::MutexGuard<'_, Inner>, SdkError> {
        let mut inner = self.lock();
        inner.calls.push(action.to_string());
        let nth = inner.calls.iter().filter(|c| c.as_str() == action).count();
        if let Some(err) = inner.scheduled.remove(&(action.to_string(), nth)) {
            return Err(err);
        }
        if let Some(err) = inner.failures.get_mut(action).and_then(VecDeque::pop_front) {
            return Err(err);
        }
        Ok(inner)
    }
}

fn not_found(code: &str) -> SdkError {
    SdkError::api(400, code, "resource not found")
}

fn recycled(code: &str) -> SdkError {
    SdkError::api(400, code, "resource is already in the recycle bin")
}

/// Shared soft-delete rule: unknown ids are not found, recycled ones are
/// denied, anything else follows the delete script
fn soft_delete<T>(
    store: &mut BTreeMap<String, Scripted<T>>,
    id: &str,
    script: &[String],
    not_found_code: &str,
    recycled_code: &str,
    recycled_status: &str,
) -> Result<(), SdkError> {
    let entry = store.get_mut(id).ok_or_else(|| not_found(not_found_code))?;
    if entry.settled() == Some(recycled_status) {
        return Err(recycled(recycled_code));
    }
    entry.rescript(&as_refs(script));
    Ok(())
}

fn destroy<T>(
    store: &mut BTreeMap<String, Scripted<T>>,
    id: &str,
    not_found_code: &str,
) -> Result<(), SdkError> {
    store.remove(id).map(|_| ()).ok_or_else(|| not_found(not_found_code))
}

#[async_trait]
impl SdnApi for FakeCloud {
    async fn create_port(&self, request: &CreatePortRequest) -> SdkResult<CreatePortResponse> {
        let mut inner = self.enter("CreatePort")?;
        let port_id = inner.next_id("port");
        let script = Inner::script(&inner.create_scripts, PORT, &["CREATING", "RUNNING"]);
        let info = PortInfo {
            port_id: port_id.clone(),
            port_name: request.port_name.clone(),
            port_remarks: request.port_remarks.clone(),
            port_type: request.port_type.clone(),
            business_entity_name: request.business_entity_name.clone(),
            dc_id: request.dc_id.clone(),
            dc_name: format!("{} datacenter", request.dc_id),
            loa_status: Some("APPROVED".to_string()),
            loa_download_url: Some(format!("https://loa.example.com/{port_id}.pdf")),
            port_charge_type: Some("POSTPAID".to_string()),
            ..Default::default()
        };
        inner.ports.insert(port_id.clone(), Scripted::new(info, &as_refs(&script)));
        Ok(CreatePortResponse { port_id })
    }

    async fn describe_ports(
        &self,
        request: &DescribePortsRequest,
    ) -> SdkResult<DescribePortsResponse> {
        let mut inner = self.enter("DescribePorts")?;
        if request.port_ids.len() == 1 && !inner.ports.contains_key(&request.port_ids[0]) {
            return Err(not_found(INVALID_PORT_NOT_FOUND));
        }
        let mut matched = Vec::new();
        for (id, entry) in inner.ports.iter_mut() {
            if !request.port_ids.is_empty() && !request.port_ids.contains(id) {
                continue;
            }
            if request.dc_id.as_ref().is_some_and(|dc| *dc != entry.info.dc_id) {
                continue;
            }
            if let Some(status) = entry.step() {
                entry.info.port_status = status;
            }
            matched.push(entry.info.clone());
        }
        let (total_count, data_set) = page(matched, request.page_num, request.page_size);
        Ok(DescribePortsResponse { total_count, data_set })
    }

    async fn modify_port_attribute(&self, request: &ModifyPortAttributeRequest) -> SdkResult<()> {
        let mut inner = self.enter("ModifyPortAttribute")?;
        let entry = inner
            .ports
            .get_mut(&request.port_id)
            .ok_or_else(|| not_found(INVALID_PORT_NOT_FOUND))?;
        entry.info.port_name = request.port_name.clone();
        entry.info.port_remarks = Some(request.port_remarks.clone());
        entry.info.business_entity_name = request.business_entity_name.clone();
        Ok(())
    }

    async fn delete_port(&self, port_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("DeletePort")?;
        let script = Inner::script(&inner.delete_scripts, PORT, &["DELETING", "RECYCLED"]);
        soft_delete(
            &mut inner.ports,
            port_id,
            &script,
            INVALID_PORT_NOT_FOUND,
            OPERATION_DENIED_PORT_RECYCLED,
            "RECYCLED",
        )
    }

    async fn destroy_port(&self, port_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("DestroyPort")?;
        destroy(&mut inner.ports, port_id, INVALID_PORT_NOT_FOUND)
    }

    async fn create_private_connect(
        &self,
        request: &CreatePrivateConnectRequest,
    ) -> SdkResult<CreatePrivateConnectResponse> {
        let mut inner = self.enter("CreatePrivateConnect")?;
        let private_connect_id = inner.next_id("pc");
        let script =
            Inner::script(&inner.create_scripts, PRIVATE_CONNECT, &["CREATING", "RUNNING"]);
        let mut endpoint_a = request.endpoint_a.clone();
        endpoint_a.endpoint_id = Some(format!("{private_connect_id}-a"));
        let mut endpoint_z = request.endpoint_z.clone();
        endpoint_z.endpoint_id = Some(format!("{private_connect_id}-z"));
        let info = PrivateConnectInfo {
            private_connect_id: private_connect_id.clone(),
            private_connect_name: request.private_connect_name.clone(),
            bandwidth_mbps: request.bandwidth_mbps,
            endpoint_a,
            endpoint_z,
            connectivity_status: Some("CONNECTED".to_string()),
            ..Default::default()
        };
        inner
            .private_connects
            .insert(private_connect_id.clone(), Scripted::new(info, &as_refs(&script)));
        Ok(CreatePrivateConnectResponse { private_connect_id })
    }

    async fn describe_private_connects(
        &self,
        request: &DescribePrivateConnectsRequest,
    ) -> SdkResult<DescribePrivateConnectsResponse> {
        let mut inner = self.enter("DescribePrivateConnects")?;
        let mut matched = Vec::new();
        for (id, entry) in inner.private_connects.iter_mut() {
            if !request.private_connect_ids.is_empty()
                && !request.private_connect_ids.contains(id)
            {
                continue;
            }
            if let Some(status) = entry.step() {
                entry.info.private_connect_status = status;
            }
            matched.push(entry.info.clone());
        }
        let (total_count, data_set) = page(matched, request.page_num, request.page_size);
        Ok(DescribePrivateConnectsResponse { total_count, data_set })
    }

    async fn modify_private_connect_attribute(
        &self,
        request: &ModifyPrivateConnectAttributeRequest,
    ) -> SdkResult<()> {
        let mut inner = self.enter("ModifyPrivateConnectAttribute")?;
        let entry = inner
            .private_connects
            .get_mut(&request.private_connect_id)
            .ok_or_else(|| not_found(INVALID_PRIVATE_CONNECT_NOT_FOUND))?;
        entry.info.private_connect_name = request.private_connect_name.clone();
        Ok(())
    }

    async fn modify_private_connect_bandwidth(
        &self,
        request: &ModifyPrivateConnectBandwidthRequest,
    ) -> SdkResult<()> {
        let mut inner = self.enter("ModifyPrivateConnectBandwidth")?;
        let script =
            Inner::script(&inner.update_scripts, PRIVATE_CONNECT, &["UPDATING", "RUNNING"]);
        let entry = inner
            .private_connects
            .get_mut(&request.private_connect_id)
            .ok_or_else(|| not_found(INVALID_PRIVATE_CONNECT_NOT_FOUND))?;
        entry.info.bandwidth_mbps = request.bandwidth_mbps;
        entry.rescript(&as_refs(&script));
        Ok(())
    }

    async fn delete_private_connect(&self, private_connect_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("DeletePrivateConnect")?;
        let script =
            Inner::script(&inner.delete_scripts, PRIVATE_CONNECT, &["DELETING", "RECYCLED"]);
        soft_delete(
            &mut inner.private_connects,
            private_connect_id,
            &script,
            INVALID_PRIVATE_CONNECT_NOT_FOUND,
            OPERATION_DENIED_PRIVATE_CONNECT_RECYCLED,
            "RECYCLED",
        )
    }

    async fn destroy_private_connect(&self, private_connect_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("DestroyPrivateConnect")?;
        destroy(&mut inner.private_connects, private_connect_id, INVALID_PRIVATE_CONNECT_NOT_FOUND)
    }

    async fn create_cloud_router(
        &self,
        request: &CreateCloudRouterRequest,
    ) -> SdkResult<CreateCloudRouterResponse> {
        let mut inner = self.enter("CreateCloudRouter")?;
        let cloud_router_id = inner.next_id("cr");
        let script = Inner::script(&inner.create_scripts, CLOUD_ROUTER, &["CREATING", "RUNNING"]);
        let edge_points = request
            .edge_points
            .iter()
            .enumerate()
            .map(|(i, ep)| CloudRouterEdgePoint {
                edge_point_id: Some(format!("{cloud_router_id}-ep{i}")),
                dc_id: ep.dc_id.clone().or_else(|| Some("SIN1".to_string())),
                ..ep.clone()
            })
            .collect();
        let info = CloudRouterInfo {
            cloud_router_id: cloud_router_id.clone(),
            cloud_router_name: request.cloud_router_name.clone(),
            cloud_router_description: request.cloud_router_description.clone(),
            edge_points,
            ..Default::default()
        };
        inner
            .cloud_routers
            .insert(cloud_router_id.clone(), Scripted::new(info, &as_refs(&script)));
        Ok(CreateCloudRouterResponse { cloud_router_id })
    }

    async fn describe_cloud_routers(
        &self,
        request: &DescribeCloudRoutersRequest,
    ) -> SdkResult<DescribeCloudRoutersResponse> {
        let mut inner = self.enter("DescribeCloudRouters")?;
        let mut matched = Vec::new();
        for (id, entry) in inner.cloud_routers.iter_mut() {
            if !request.cloud_router_ids.is_empty() && !request.cloud_router_ids.contains(id) {
                continue;
            }
            if let Some(status) = entry.step() {
                entry.info.cloud_router_status = status;
            }
            matched.push(entry.info.clone());
        }
        let (total_count, data_set) = page(matched, request.page_num, request.page_size);
        Ok(DescribeCloudRoutersResponse { total_count, data_set })
    }

    async fn modify_cloud_router_attribute(
        &self,
        request: &ModifyCloudRouterAttributeRequest,
    ) -> SdkResult<()> {
        let mut inner = self.enter("ModifyCloudRouterAttribute")?;
        let entry = inner
            .cloud_routers
            .get_mut(&request.cloud_router_id)
            .ok_or_else(|| not_found(INVALID_CLOUD_ROUTER_NOT_FOUND))?;
        entry.info.cloud_router_name = request.cloud_router_name.clone();
        entry.info.cloud_router_description = Some(request.cloud_router_description.clone());
        Ok(())
    }

    async fn delete_cloud_router(&self, cloud_router_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("DeleteCloudRouter")?;
        let script = Inner::script(&inner.delete_scripts, CLOUD_ROUTER, &["DELETING", "RECYCLED"]);
        soft_delete(
            &mut inner.cloud_routers,
            cloud_router_id,
            &script,
            INVALID_CLOUD_ROUTER_NOT_FOUND,
            OPERATION_DENIED_CLOUD_ROUTER_RECYCLED,
            "RECYCLED",
        )
    }

    async fn destroy_cloud_router(&self, cloud_router_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("DestroyCloudRouter")?;
        destroy(&mut inner.cloud_routers, cloud_router_id, INVALID_CLOUD_ROUTER_NOT_FOUND)
    }

    async fn describe_datacenters(&self) -> SdkResult<DescribeDatacentersResponse> {
        let inner = self.enter("DescribeDatacenters")?;
        Ok(DescribeDatacentersResponse {
            dc_set: inner.datacenters.clone(),
        })
    }

    async fn describe_aws_regions(&self) -> SdkResult<DescribeCloudRegionsResponse> {
        let inner = self.enter("DescribeAWSRegions")?;
        Ok(DescribeCloudRegionsResponse {
            regions: inner.regions.clone(),
        })
    }

    async fn describe_tencent_regions(&self) -> SdkResult<DescribeCloudRegionsResponse> {
        let inner = self.enter("DescribeTencentRegions")?;
        Ok(DescribeCloudRegionsResponse {
            regions: inner.regions.clone(),
        })
    }

    async fn describe_google_regions(
        &self,
        _pairing_key: &str,
    ) -> SdkResult<DescribeCloudRegionsResponse> {
        let inner = self.enter("DescribeGoogleRegions")?;
        Ok(DescribeCloudRegionsResponse {
            regions: inner.regions.clone(),
        })
    }
}

#[async_trait]
impl BmcApi for FakeCloud {
    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> SdkResult<CreateInstanceResponse> {
        let mut inner = self.enter("CreateInstances")?;
        let instance_id = inner.next_id("bm");
        let script = Inner::script(
            &inner.create_scripts,
            INSTANCE,
            &["CREATING", "INSTALLING", "BOOTING", "RUNNING"],
        );
        let info = InstanceInfo {
            instance_id: instance_id.clone(),
            instance_name: request.instance_name.clone(),
            hostname: request.hostname.clone(),
            instance_type_id: request.instance_type_id.clone(),
            image_id: request.image_id.clone(),
            zone_id: request.zone_id.clone(),
            instance_charge_type: request.instance_charge_type.clone(),
            internet_charge_type: request.internet_charge_type.clone(),
            bandwidth_out_mbps: request.internet_max_bandwidth_out,
            public_ip_addresses: vec!["203.0.113.10".to_string()],
            ..Default::default()
        };
        inner
            .instances
            .insert(instance_id.clone(), Scripted::new(info, &as_refs(&script)));
        Ok(CreateInstanceResponse {
            instance_id_set: vec![instance_id],
        })
    }

    async fn describe_instances(
        &self,
        request: &DescribeInstancesRequest,
    ) -> SdkResult<DescribeInstancesResponse> {
        let mut inner = self.enter("DescribeInstances")?;
        let mut matched = Vec::new();
        for (id, entry) in inner.instances.iter_mut() {
            if !request.instance_ids.is_empty() && !request.instance_ids.contains(id) {
                continue;
            }
            if request.zone_id.as_ref().is_some_and(|zone| *zone != entry.info.zone_id) {
                continue;
            }
            if let Some(status) = entry.step() {
                entry.info.instance_status = status;
            }
            if request
                .instance_status
                .as_ref()
                .is_some_and(|status| *status != entry.info.instance_status)
            {
                continue;
            }
            matched.push(entry.info.clone());
        }
        let (total_count, data_set) = page(matched, request.page_num, request.page_size);
        Ok(DescribeInstancesResponse { total_count, data_set })
    }

    async fn modify_instances_attribute(
        &self,
        request: &ModifyInstancesAttributeRequest,
    ) -> SdkResult<()> {
        let mut inner = self.enter("ModifyInstancesAttribute")?;
        for id in &request.instance_ids {
            let entry = inner
                .instances
                .get_mut(id)
                .ok_or_else(|| not_found(INVALID_INSTANCE_NOT_FOUND))?;
            entry.info.instance_name = request.instance_name.clone();
        }
        Ok(())
    }

    async fn modify_instance_bandwidth(
        &self,
        request: &ModifyInstanceBandwidthRequest,
    ) -> SdkResult<()> {
        let mut inner = self.enter("ModifyInstanceBandwidth")?;
        let script = Inner::script(&inner.update_scripts, INSTANCE, &["RUNNING"]);
        let entry = inner
            .instances
            .get_mut(&request.instance_id)
            .ok_or_else(|| not_found(INVALID_INSTANCE_NOT_FOUND))?;
        entry.info.bandwidth_out_mbps = Some(request.bandwidth_out_mbps);
        entry.rescript(&as_refs(&script));
        Ok(())
    }

    async fn terminate_instance(&self, instance_id: &str) -> SdkResult<()> {
        let mut inner = self.enter("TerminateInstance")?;
        let script = Inner::script(&inner.delete_scripts, INSTANCE, &["RECYCLING", "RECYCLE"]);
        soft_delete(
            &mut inner.instances,
            instance_id,
            &script,
            INVALID_INSTANCE_NOT_FOUND,
            OPERATION_DENIED_INSTANCE_RECYCLED,
            "RECYCLE",
        )
    }

    async fn release_instances(&self, instance_ids: &[String]) -> SdkResult<()> {
        let mut inner = self.enter("ReleaseInstances")?;
        for id in instance_ids {
            destroy(&mut inner.instances, id, INVALID_INSTANCE_NOT_FOUND)?;
        }
        Ok(())
    }

    async fn describe_available_resources(
        &self,
        request: &DescribeAvailableResourcesRequest,
    ) -> SdkResult<DescribeAvailableResourcesResponse> {
        let inner = self.enter("DescribeAvailableResources")?;
        let available_resources = inner
            .offers
            .iter()
            .filter(|offer| request.zone_id.as_ref().map_or(true, |zone| *zone == offer.zone_id))
            .cloned()
            .collect();
        Ok(DescribeAvailableResourcesResponse { available_resources })
    }
}

/// Host context with default tuning; pair with paused tokio time
pub fn ctx() -> HostContext {
    HostContext::new()
}

/// `n` running ports in `SIN1`, ids `port-0000`..
pub fn running_ports(n: usize) -> Vec<PortInfo> {
    (0..n)
        .map(|i| PortInfo {
            port_id: format!("port-{i:04}"),
            port_name: format!("edge-{i}"),
            port_type: "10G".to_string(),
            dc_id: "SIN1".to_string(),
            port_status: "RUNNING".to_string(),
            ..Default::default()
        })
        .collect()
}
