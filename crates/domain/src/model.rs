use crate::name::DnsName;
use crate::schedule::CronSchedule;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// A nameserver queried for the cluster's records. Identity is the hostname
/// alone; `strict_ttl` only changes how master-record TTLs are judged.
#[derive(Debug, Clone)]
pub struct Nameserver {
    pub hostname: DnsName,
    pub strict_ttl: bool,
}

impl Nameserver {
    pub fn new(hostname: DnsName, strict_ttl: bool) -> Self {
        Self {
            hostname,
            strict_ttl,
        }
    }
}

impl PartialEq for Nameserver {
    fn eq(&self, other: &Self) -> bool {
        self.hostname == other.hostname
    }
}

impl Eq for Nameserver {}

impl PartialOrd for Nameserver {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nameserver {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hostname.cmp(&other.hostname)
    }
}

impl Hash for Nameserver {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hostname.hash(state);
    }
}

/// One machine participating in the cluster. Identity is the id alone.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub enabled: bool,
    pub display: String,
    pub hostname: DnsName,
    pub username: String,
    pub nameservers: BTreeSet<Nameserver>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Per-resource participation of one node: the A records that point at it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub node: Arc<Node>,
    pub node_records: Vec<DnsName>,
}

impl ResourceNode {
    pub fn node_id(&self) -> &str {
        &self.node.id
    }
}

/// Timing for a cron-scheduled resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CronSettings {
    pub synchronize_schedule: CronSchedule,
    pub test_schedule: CronSchedule,
    pub synchronize_timeout: Duration,
    pub test_timeout: Duration,
}

/// Resources form a closed family: monitor-only, or cron-scheduled with
/// per-pair synchronizers.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceScheduling {
    Monitor,
    Cron(CronSettings),
}

/// A clustered service whose active master is advertised through DNS.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub enabled: bool,
    pub display: String,
    pub kind: String,
    pub master_records: Vec<DnsName>,
    pub master_records_ttl: u32,
    pub allow_multi_master: bool,
    pub resource_nodes: Vec<ResourceNode>,
    pub scheduling: ResourceScheduling,
}

impl Resource {
    /// The union of nameservers across all enabled participating nodes.
    pub fn enabled_nameservers(&self) -> BTreeSet<Nameserver> {
        self.resource_nodes
            .iter()
            .filter(|rn| rn.node.enabled)
            .flat_map(|rn| rn.node.nameservers.iter().cloned())
            .collect()
    }

    pub fn resource_node(&self, node_id: &str) -> Option<&ResourceNode> {
        self.resource_nodes.iter().find(|rn| rn.node.id == node_id)
    }

    pub fn cron_settings(&self) -> Option<&CronSettings> {
        match &self.scheduling {
            ResourceScheduling::Cron(settings) => Some(settings),
            ResourceScheduling::Monitor => None,
        }
    }
}
