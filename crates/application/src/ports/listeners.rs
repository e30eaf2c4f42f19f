use dnscoord_domain::{ResourceDnsResult, ResourceSynchronizationResult};
use std::sync::Arc;

/// Observer of published DNS passes. `old` always exists: monitors publish
/// an initial stopped result at construction.
pub trait ResourceDnsListener: Send + Sync {
    fn on_resource_dns_result(&self, old: &Arc<ResourceDnsResult>, new: &Arc<ResourceDnsResult>);
}

/// Observer of recorded synchronization runs. `old` is `None` for the first
/// run after a scheduler starts.
pub trait ResourceSynchronizationListener: Send + Sync {
    fn on_resource_synchronization_result(
        &self,
        old: Option<&Arc<ResourceSynchronizationResult>>,
        new: &Arc<ResourceSynchronizationResult>,
    );
}
