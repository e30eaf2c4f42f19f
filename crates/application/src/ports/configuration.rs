use async_trait::async_trait;
use dnscoord_domain::{ClusterConfig, ClusterError};
use tokio::sync::watch;

/// Provider of the cluster configuration.
///
/// `changes` hands out a watch receiver whose value is bumped whenever the
/// underlying source detects a change; the cluster reloads on each bump.
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    async fn start(&self) -> Result<(), ClusterError>;

    async fn stop(&self);

    fn snapshot(&self) -> Result<ClusterConfig, ClusterError>;

    fn changes(&self) -> watch::Receiver<u64>;
}
