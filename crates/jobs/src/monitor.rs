use crate::notify::DnsResultEvent;
use arc_swap::ArcSwap;
use chrono::Utc;
use dnscoord_application::services::role_resolver::resolve_roles;
use dnscoord_application::{DnsLookup, TtlExpectation};
use dnscoord_domain::{
    DnsLookupResult, DnsName, LookupMap, MasterDnsStatus, Nameserver, Resource, ResourceDnsResult,
    DNS_CHECK_INTERVAL,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Atomically published latest DNS result of one monitor. Shared with the
/// resource's schedulers, which read the newest view at every tick.
pub struct DnsResultCell {
    inner: ArcSwap<ResourceDnsResult>,
}

impl DnsResultCell {
    pub fn new(initial: ResourceDnsResult) -> Self {
        Self {
            inner: ArcSwap::from_pointee(initial),
        }
    }

    pub fn latest(&self) -> Arc<ResourceDnsResult> {
        self.inner.load_full()
    }

    /// Publishes a new result, returning the one it replaced.
    pub fn publish(&self, next: Arc<ResourceDnsResult>) -> Arc<ResourceDnsResult> {
        self.inner.swap(next)
    }
}

/// Periodic DNS observer for one resource.
///
/// Every pass queries each relevant record against every enabled nameserver
/// concurrently, resolves roles, and publishes the frozen result. The
/// monitor publishes a synthetic result for each lifecycle edge (starting,
/// stopped, disabled), so listeners always receive a non-null predecessor.
pub struct ResourceDnsMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    resource: Arc<Resource>,
    lookup: DnsLookup,
    cell: Arc<DnsResultCell>,
    events: mpsc::UnboundedSender<DnsResultEvent>,
    token: Mutex<CancellationToken>,
}

impl ResourceDnsMonitor {
    pub fn new(
        resource: Arc<Resource>,
        lookup: DnsLookup,
        events: mpsc::UnboundedSender<DnsResultEvent>,
    ) -> Self {
        let initial = ResourceDnsResult::synthetic(&resource, MasterDnsStatus::Stopped);
        let token = CancellationToken::new();
        token.cancel();
        Self {
            inner: Arc::new(MonitorInner {
                resource,
                lookup,
                cell: Arc::new(DnsResultCell::new(initial)),
                events,
                token: Mutex::new(token),
            }),
        }
    }

    pub fn resource(&self) -> &Arc<Resource> {
        &self.inner.resource
    }

    pub fn result_cell(&self) -> Arc<DnsResultCell> {
        self.inner.cell.clone()
    }

    pub fn latest(&self) -> Arc<ResourceDnsResult> {
        self.inner.cell.latest()
    }

    /// Begins monitoring. With the cluster or the resource disabled, only a
    /// disabled result is published and no worker runs.
    pub fn start(&self, cluster_enabled: bool) {
        let token = CancellationToken::new();
        {
            let mut guard = self
                .inner
                .token
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            guard.cancel();
            *guard = token.clone();
        }

        if !cluster_enabled || !self.inner.resource.enabled {
            self.inner.publish(Arc::new(ResourceDnsResult::synthetic(
                &self.inner.resource,
                MasterDnsStatus::Disabled,
            )));
            return;
        }

        self.inner.publish(Arc::new(ResourceDnsResult::synthetic(
            &self.inner.resource,
            MasterDnsStatus::Starting,
        )));
        info!(resource = %self.inner.resource.id, "dns monitor started");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            loop {
                let pass = tokio::select! {
                    _ = token.cancelled() => break,
                    result = inner.run_pass() => result,
                };
                if token.is_cancelled() {
                    break;
                }
                inner.publish(Arc::new(pass));

                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(DNS_CHECK_INTERVAL) => {}
                }
            }
            debug!(resource = %inner.resource.id, "dns monitor worker exited");
        });
    }

    /// Stops the worker and publishes a stopped result.
    pub fn stop(&self) {
        self.inner
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
        self.inner.publish(Arc::new(ResourceDnsResult::synthetic(
            &self.inner.resource,
            MasterDnsStatus::Stopped,
        )));
        info!(resource = %self.inner.resource.id, "dns monitor stopped");
    }
}

impl MonitorInner {
    fn publish(&self, new: Arc<ResourceDnsResult>) {
        let old = self.cell.publish(new.clone());
        if self.events.send(DnsResultEvent { old, new }).is_err() {
            // Dispatcher already gone; only happens during shutdown.
            debug!(resource = %self.resource.id, "dns event dropped after shutdown");
        }
    }

    async fn run_pass(&self) -> ResourceDnsResult {
        let start = Utc::now();
        let nameservers = self.resource.enabled_nameservers();

        let mut tasks = Vec::new();
        for record in &self.resource.master_records {
            let ttl = TtlExpectation::new(self.resource.master_records_ttl);
            for nameserver in &nameservers {
                tasks.push(run_lookup(
                    self.lookup.clone(),
                    record.clone(),
                    nameserver.clone(),
                    Some(ttl),
                ));
            }
        }
        for resource_node in self.resource.resource_nodes.iter().filter(|rn| rn.node.enabled) {
            for record in &resource_node.node_records {
                for nameserver in &nameservers {
                    tasks.push(run_lookup(
                        self.lookup.clone(),
                        record.clone(),
                        nameserver.clone(),
                        None,
                    ));
                }
            }
        }

        let outcomes = futures::future::join_all(tasks).await;
        let mut lookups: LookupMap = LookupMap::new();
        for (name, nameserver, result) in outcomes {
            lookups.entry(name).or_default().insert(nameserver, result);
        }

        let roles = resolve_roles(&self.resource, &nameservers, &lookups);
        if roles.master_status >= MasterDnsStatus::Warning {
            warn!(
                resource = %self.resource.id,
                master_status = %roles.master_status,
                "dns pass found degraded master state"
            );
        } else {
            debug!(resource = %self.resource.id, master_status = %roles.master_status, "dns pass complete");
        }

        ResourceDnsResult::new(
            self.resource.id.clone(),
            start,
            Utc::now(),
            roles.master_status,
            roles.master_status_messages,
            Some(roles.master_record_lookups),
            roles.node_results,
        )
    }
}

async fn run_lookup(
    lookup: DnsLookup,
    name: DnsName,
    nameserver: Nameserver,
    ttl: Option<TtlExpectation>,
) -> (DnsName, Nameserver, DnsLookupResult) {
    let result = lookup.lookup(&name, &nameserver, ttl).await;
    (name, nameserver, result)
}
