//! dnscoord domain layer: value types, status lattice, immutable results.
pub mod config;
pub mod errors;
pub mod model;
pub mod name;
pub mod results;
pub mod schedule;
pub mod status;

pub use config::{ClusterConfig, NodeConfig, ResourceConfig, ResourceNodeConfig};
pub use errors::ClusterError;
pub use model::{CronSettings, Nameserver, Node, Resource, ResourceNode, ResourceScheduling};
pub use name::DnsName;
pub use results::{
    DnsLookupResult, LookupMap, ResourceDnsResult, ResourceNodeDnsResult,
    ResourceSynchronizationResult, SynchronizationMode, SynchronizationStep, DNS_ATTEMPTS,
    DNS_CHECK_INTERVAL, DNS_CHECK_TIMEOUT, ERROR_SECONDS, WARNING_SECONDS,
};
pub use schedule::CronSchedule;
pub use status::{
    DnsLookupStatus, MasterDnsStatus, NodeDnsStatus, ResourceStatus, ResourceSynchronizerState,
};
