use std::fmt;

/// Overall health of a resource, ordered by severity. `Ord::max` is the
/// escalation operator used throughout aggregation: combining two statuses
/// keeps the more severe one, so severity within one pass only ever rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceStatus {
    Unknown,
    Disabled,
    Stopped,
    Healthy,
    Starting,
    Warning,
    Error,
    Inconsistent,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceStatus::Unknown => "unknown",
            ResourceStatus::Disabled => "disabled",
            ResourceStatus::Stopped => "stopped",
            ResourceStatus::Healthy => "healthy",
            ResourceStatus::Starting => "starting",
            ResourceStatus::Warning => "warning",
            ResourceStatus::Error => "error",
            ResourceStatus::Inconsistent => "inconsistent",
        };
        f.write_str(s)
    }
}

/// Consistency of a resource's master records across all enabled nameservers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MasterDnsStatus {
    Unknown,
    Disabled,
    Stopped,
    Starting,
    Consistent,
    Warning,
    Inconsistent,
}

impl MasterDnsStatus {
    pub fn as_resource_status(self) -> ResourceStatus {
        match self {
            MasterDnsStatus::Unknown => ResourceStatus::Unknown,
            MasterDnsStatus::Disabled => ResourceStatus::Disabled,
            MasterDnsStatus::Stopped => ResourceStatus::Stopped,
            MasterDnsStatus::Starting => ResourceStatus::Starting,
            MasterDnsStatus::Consistent => ResourceStatus::Healthy,
            MasterDnsStatus::Warning => ResourceStatus::Warning,
            MasterDnsStatus::Inconsistent => ResourceStatus::Inconsistent,
        }
    }
}

impl fmt::Display for MasterDnsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MasterDnsStatus::Unknown => "unknown",
            MasterDnsStatus::Disabled => "disabled",
            MasterDnsStatus::Stopped => "stopped",
            MasterDnsStatus::Starting => "starting",
            MasterDnsStatus::Consistent => "consistent",
            MasterDnsStatus::Warning => "warning",
            MasterDnsStatus::Inconsistent => "inconsistent",
        };
        f.write_str(s)
    }
}

/// Role of one node for one resource as seen through DNS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeDnsStatus {
    Unknown,
    Disabled,
    Stopped,
    Starting,
    Slave,
    Master,
    Inconsistent,
}

impl NodeDnsStatus {
    pub fn as_resource_status(self) -> ResourceStatus {
        match self {
            NodeDnsStatus::Unknown => ResourceStatus::Unknown,
            NodeDnsStatus::Disabled => ResourceStatus::Disabled,
            NodeDnsStatus::Stopped => ResourceStatus::Stopped,
            NodeDnsStatus::Starting => ResourceStatus::Starting,
            NodeDnsStatus::Slave | NodeDnsStatus::Master => ResourceStatus::Healthy,
            NodeDnsStatus::Inconsistent => ResourceStatus::Inconsistent,
        }
    }
}

impl fmt::Display for NodeDnsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeDnsStatus::Unknown => "unknown",
            NodeDnsStatus::Disabled => "disabled",
            NodeDnsStatus::Stopped => "stopped",
            NodeDnsStatus::Starting => "starting",
            NodeDnsStatus::Slave => "slave",
            NodeDnsStatus::Master => "master",
            NodeDnsStatus::Inconsistent => "inconsistent",
        };
        f.write_str(s)
    }
}

/// Outcome of a single A-record lookup attempt chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DnsLookupStatus {
    Successful,
    Warning,
    TryAgain,
    HostNotFound,
    TypeNotFound,
    Unrecoverable,
    Error,
}

impl DnsLookupStatus {
    /// Lookups in these states carry addresses; all others carry none.
    pub fn is_success(self) -> bool {
        matches!(self, DnsLookupStatus::Successful | DnsLookupStatus::Warning)
    }
}

impl fmt::Display for DnsLookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DnsLookupStatus::Successful => "successful",
            DnsLookupStatus::Warning => "warning",
            DnsLookupStatus::TryAgain => "try-again",
            DnsLookupStatus::HostNotFound => "host-not-found",
            DnsLookupStatus::TypeNotFound => "type-not-found",
            DnsLookupStatus::Unrecoverable => "unrecoverable",
            DnsLookupStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// State of one per-pair synchronization scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceSynchronizerState {
    Disabled,
    Stopped,
    Sleeping,
    Testing,
    Synchronizing,
}

impl ResourceSynchronizerState {
    pub fn as_resource_status(self) -> ResourceStatus {
        match self {
            ResourceSynchronizerState::Disabled => ResourceStatus::Disabled,
            ResourceSynchronizerState::Stopped => ResourceStatus::Stopped,
            ResourceSynchronizerState::Sleeping => ResourceStatus::Healthy,
            ResourceSynchronizerState::Testing | ResourceSynchronizerState::Synchronizing => {
                ResourceStatus::Starting
            }
        }
    }
}

impl fmt::Display for ResourceSynchronizerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceSynchronizerState::Disabled => "disabled",
            ResourceSynchronizerState::Stopped => "stopped",
            ResourceSynchronizerState::Sleeping => "sleeping",
            ResourceSynchronizerState::Testing => "testing",
            ResourceSynchronizerState::Synchronizing => "synchronizing",
        };
        f.write_str(s)
    }
}
