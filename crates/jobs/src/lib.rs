//! dnscoord background machinery: per-resource DNS monitors, per-pair cron
//! synchronizers, ordered listener dispatch, and the cluster orchestrator
//! that owns them all.
pub mod builder;
pub mod cluster;
pub mod monitor;
pub mod notify;
pub mod scheduler;

pub use builder::build_model;
pub use cluster::{Cluster, ClusterBuilder};
pub use monitor::{DnsResultCell, ResourceDnsMonitor};
pub use notify::{
    DnsNotifier, DnsResultEvent, SynchronizationNotifier, SynchronizationResultEvent,
};
pub use scheduler::{candidate_modes, CronSynchronizer};
