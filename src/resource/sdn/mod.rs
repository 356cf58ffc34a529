//! SDN resources: datacenter ports, private connects, cloud routers

mod cloud_router;
pub mod endpoint;
mod port;
mod private_connect;

pub use cloud_router::{CloudRouterResource, CloudRouterState};
pub use port::{PortResource, PortState};
pub use private_connect::{PrivateConnectResource, PrivateConnectState};

pub const CREATING: &str = "CREATING";
pub const UPDATING: &str = "UPDATING";
pub const DELETING: &str = "DELETING";
pub const RECOVERING: &str = "RECOVERING";
pub const DESTROYING: &str = "DESTROYING";
pub const RUNNING: &str = "RUNNING";
pub const RECYCLED: &str = "RECYCLED";

/// Statuses the vendor reports while it is still working on a resource
pub const OPERATIONAL: &[&str] = &[CREATING, UPDATING, DELETING, RECOVERING, DESTROYING];
