use async_trait::async_trait;
use dnscoord_domain::{
    ClusterError, Resource, ResourceNode, ResourceNodeDnsResult, ResourceSynchronizationResult,
    SynchronizationMode,
};
use std::sync::Arc;

/// A concrete synchronization implementation for one (local, remote) pair.
///
/// `can_synchronize` is the gate the scheduler consults on every tick after
/// its own checks; `synchronize` performs the actual run. Implementations
/// decide for themselves what the DNS roles mean for them (most only sync
/// slave-to-master or master-to-slave in a particular direction).
#[async_trait]
pub trait ResourceSynchronizer: Send + Sync {
    fn can_synchronize(
        &self,
        mode: SynchronizationMode,
        local: &ResourceNodeDnsResult,
        remote: &ResourceNodeDnsResult,
    ) -> bool;

    async fn synchronize(
        &self,
        mode: SynchronizationMode,
        local: &ResourceNodeDnsResult,
        remote: &ResourceNodeDnsResult,
    ) -> Result<ResourceSynchronizationResult, ClusterError>;
}

/// Builds synchronizers for a resource type. Registered on the cluster by
/// kind; returning `Ok(None)` means the pair has no synchronizer and no
/// scheduler is created for it.
pub trait SynchronizerFactory: Send + Sync {
    fn new_synchronizer(
        &self,
        resource: &Resource,
        local: &ResourceNode,
        remote: &ResourceNode,
    ) -> Result<Option<Arc<dyn ResourceSynchronizer>>, ClusterError>;
}
