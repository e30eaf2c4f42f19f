use crate::errors::ClusterError;
use crate::model::{Nameserver, Resource};
use crate::name::DnsName;
use crate::status::{
    DnsLookupStatus, MasterDnsStatus, NodeDnsStatus, ResourceStatus,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Seconds between monitor passes.
pub const DNS_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Attempts per lookup; only try-again outcomes are retried.
pub const DNS_ATTEMPTS: u32 = 2;

/// Per-attempt resolver timeout.
pub const DNS_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Age beyond which a published DNS result degrades the resource to warning.
pub const WARNING_SECONDS: i64 = 10
    + (DNS_CHECK_INTERVAL.as_secs() + DNS_ATTEMPTS as u64 * DNS_CHECK_TIMEOUT.as_secs()) as i64;

/// Age beyond which a published DNS result degrades the resource to error.
pub const ERROR_SECONDS: i64 = WARNING_SECONDS + DNS_CHECK_INTERVAL.as_secs() as i64;

/// Lookup results per record name, per nameserver. When attached to a
/// published result this carries exactly one entry per declared record, each
/// holding exactly one entry per enabled nameserver.
pub type LookupMap = BTreeMap<DnsName, BTreeMap<Nameserver, DnsLookupResult>>;

/// Classified outcome of querying one name against one nameserver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsLookupResult {
    name: DnsName,
    status: DnsLookupStatus,
    status_messages: BTreeSet<String>,
    addresses: BTreeSet<Ipv4Addr>,
}

impl DnsLookupResult {
    /// A lookup that returned addresses. The status is `Successful` unless
    /// warnings (for instance TTL violations) were raised.
    pub fn success(
        name: DnsName,
        addresses: BTreeSet<Ipv4Addr>,
        warnings: BTreeSet<String>,
    ) -> Self {
        debug_assert!(!addresses.is_empty());
        let status = if warnings.is_empty() {
            DnsLookupStatus::Successful
        } else {
            DnsLookupStatus::Warning
        };
        Self {
            name,
            status,
            status_messages: warnings,
            addresses,
        }
    }

    /// A lookup that produced no usable addresses. `status` must be one of
    /// the failure states; the address set is always empty.
    pub fn failure(name: DnsName, status: DnsLookupStatus, message: impl Into<String>) -> Self {
        debug_assert!(!status.is_success());
        let mut status_messages = BTreeSet::new();
        let message = message.into();
        if !message.is_empty() {
            status_messages.insert(message);
        }
        Self {
            name,
            status,
            status_messages,
            addresses: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &DnsName {
        &self.name
    }

    pub fn status(&self) -> DnsLookupStatus {
        self.status
    }

    pub fn status_messages(&self) -> &BTreeSet<String> {
        &self.status_messages
    }

    pub fn addresses(&self) -> &BTreeSet<Ipv4Addr> {
        &self.addresses
    }
}

/// Aggregated DNS view of one node's records for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNodeDnsResult {
    node_id: String,
    node_status: NodeDnsStatus,
    node_status_messages: BTreeSet<String>,
    node_record_lookups: Option<LookupMap>,
}

impl ResourceNodeDnsResult {
    pub fn new(
        node_id: impl Into<String>,
        node_status: NodeDnsStatus,
        node_status_messages: BTreeSet<String>,
        node_record_lookups: Option<LookupMap>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            node_status,
            node_status_messages,
            node_record_lookups,
        }
    }

    /// A synthetic result for lifecycle states (stopped, starting, disabled)
    /// where no lookups ran.
    pub fn synthetic(node_id: impl Into<String>, node_status: NodeDnsStatus) -> Self {
        Self::new(node_id, node_status, BTreeSet::new(), None)
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn node_status(&self) -> NodeDnsStatus {
        self.node_status
    }

    pub fn node_status_messages(&self) -> &BTreeSet<String> {
        &self.node_status_messages
    }

    pub fn node_record_lookups(&self) -> Option<&LookupMap> {
        self.node_record_lookups.as_ref()
    }

    /// All addresses seen in successful lookups of this node's records.
    pub fn addresses(&self) -> BTreeSet<Ipv4Addr> {
        self.node_record_lookups
            .iter()
            .flat_map(|m| m.values())
            .flat_map(|per_ns| per_ns.values())
            .filter(|l| l.status().is_success())
            .flat_map(|l| l.addresses().iter().copied())
            .collect()
    }
}

/// One full DNS pass over a resource: master view plus per-node views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDnsResult {
    resource_id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    master_status: MasterDnsStatus,
    master_status_messages: BTreeSet<String>,
    master_record_lookups: Option<LookupMap>,
    node_results: BTreeMap<String, ResourceNodeDnsResult>,
}

impl ResourceDnsResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resource_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        master_status: MasterDnsStatus,
        master_status_messages: BTreeSet<String>,
        master_record_lookups: Option<LookupMap>,
        node_results: BTreeMap<String, ResourceNodeDnsResult>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            start_time,
            end_time,
            master_status,
            master_status_messages,
            master_record_lookups,
            node_results,
        }
    }

    /// A result for a lifecycle state where no pass ran. Disabled nodes
    /// report `Disabled` regardless of the requested status.
    pub fn synthetic(resource: &Resource, master_status: MasterDnsStatus) -> Self {
        let node_status = match master_status {
            MasterDnsStatus::Disabled => NodeDnsStatus::Disabled,
            MasterDnsStatus::Stopped => NodeDnsStatus::Stopped,
            MasterDnsStatus::Starting => NodeDnsStatus::Starting,
            _ => NodeDnsStatus::Unknown,
        };
        let now = Utc::now();
        let node_results = resource
            .resource_nodes
            .iter()
            .map(|rn| {
                let status = if rn.node.enabled {
                    node_status
                } else {
                    NodeDnsStatus::Disabled
                };
                (
                    rn.node.id.clone(),
                    ResourceNodeDnsResult::synthetic(rn.node.id.clone(), status),
                )
            })
            .collect();
        Self::new(
            resource.id.clone(),
            now,
            now,
            master_status,
            BTreeSet::new(),
            None,
            node_results,
        )
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn master_status(&self) -> MasterDnsStatus {
        self.master_status
    }

    pub fn master_status_messages(&self) -> &BTreeSet<String> {
        &self.master_status_messages
    }

    pub fn master_record_lookups(&self) -> Option<&LookupMap> {
        self.master_record_lookups.as_ref()
    }

    pub fn node_results(&self) -> &BTreeMap<String, ResourceNodeDnsResult> {
        &self.node_results
    }

    pub fn node_result(&self, node_id: &str) -> Option<&ResourceNodeDnsResult> {
        self.node_results.get(node_id)
    }

    /// Severity of the whole view: master status escalated by every node.
    pub fn resource_status(&self) -> ResourceStatus {
        self.node_results
            .values()
            .map(|n| n.node_status().as_resource_status())
            .fold(self.master_status.as_resource_status(), ResourceStatus::max)
    }

    /// How stale this result is. A clock stepping backwards degrades the
    /// same way a stalled monitor does, hence the absolute difference.
    pub fn freshness_status(&self, now: DateTime<Utc>) -> ResourceStatus {
        let age = (now - self.start_time).num_seconds().abs();
        if age > ERROR_SECONDS {
            ResourceStatus::Error
        } else if age > WARNING_SECONDS {
            ResourceStatus::Warning
        } else {
            ResourceStatus::Healthy
        }
    }
}

/// What a synchronizer run is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynchronizationMode {
    Synchronize,
    TestOnly,
}

impl fmt::Display for SynchronizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynchronizationMode::Synchronize => f.write_str("synchronize"),
            SynchronizationMode::TestOnly => f.write_str("test-only"),
        }
    }
}

/// One step of a synchronization or test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchronizationStep {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ResourceStatus,
    pub description: String,
    pub outputs: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Outcome of one synchronizer run between the local node and one remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSynchronizationResult {
    resource_id: String,
    local_node_id: String,
    remote_node_id: String,
    mode: SynchronizationMode,
    steps: Vec<SynchronizationStep>,
}

impl ResourceSynchronizationResult {
    /// Builds a result from recorded steps; at least one step is required.
    pub fn new(
        resource_id: impl Into<String>,
        local_node_id: impl Into<String>,
        remote_node_id: impl Into<String>,
        mode: SynchronizationMode,
        steps: Vec<SynchronizationStep>,
    ) -> Result<Self, ClusterError> {
        if steps.is_empty() {
            return Err(ClusterError::Synchronize(
                "synchronization result must contain at least one step".into(),
            ));
        }
        Ok(Self {
            resource_id: resource_id.into(),
            local_node_id: local_node_id.into(),
            remote_node_id: remote_node_id.into(),
            mode,
            steps,
        })
    }

    /// A one-step result, used for failures captured by the scheduler.
    pub fn single_step(
        resource_id: impl Into<String>,
        local_node_id: impl Into<String>,
        remote_node_id: impl Into<String>,
        mode: SynchronizationMode,
        step: SynchronizationStep,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            local_node_id: local_node_id.into(),
            remote_node_id: remote_node_id.into(),
            mode,
            steps: vec![step],
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn local_node_id(&self) -> &str {
        &self.local_node_id
    }

    pub fn remote_node_id(&self) -> &str {
        &self.remote_node_id
    }

    pub fn mode(&self) -> SynchronizationMode {
        self.mode
    }

    pub fn steps(&self) -> &[SynchronizationStep] {
        &self.steps
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.steps
            .iter()
            .map(|s| s.start_time)
            .min()
            .unwrap_or_else(Utc::now)
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.steps
            .iter()
            .map(|s| s.end_time)
            .max()
            .unwrap_or_else(Utc::now)
    }

    pub fn status(&self) -> ResourceStatus {
        self.steps
            .iter()
            .map(|s| s.status)
            .max()
            .unwrap_or(ResourceStatus::Unknown)
    }
}
