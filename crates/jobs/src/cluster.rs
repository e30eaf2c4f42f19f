use crate::builder::build_model;
use crate::monitor::ResourceDnsMonitor;
use crate::notify::{DnsNotifier, SynchronizationNotifier};
use crate::scheduler::CronSynchronizer;
use chrono::{DateTime, Utc};
use dnscoord_application::ports::{
    ConfigurationSource, LocalIdentity, RecordSource, ResourceDnsListener,
    ResourceSynchronizationListener, SynchronizerFactory,
};
use dnscoord_application::DnsLookup;
use dnscoord_domain::{ClusterError, Node, Resource, ResourceStatus, SynchronizationMode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Wires up a `Cluster` from its collaborators and the synchronizer
/// factories registered per resource type.
pub struct ClusterBuilder {
    configuration: Arc<dyn ConfigurationSource>,
    identity: Arc<dyn LocalIdentity>,
    records: Arc<dyn RecordSource>,
    factories: HashMap<String, Arc<dyn SynchronizerFactory>>,
}

impl ClusterBuilder {
    pub fn new(
        configuration: Arc<dyn ConfigurationSource>,
        identity: Arc<dyn LocalIdentity>,
        records: Arc<dyn RecordSource>,
    ) -> Self {
        Self {
            configuration,
            identity,
            records,
            factories: HashMap::new(),
        }
    }

    pub fn with_synchronizer_factory(
        mut self,
        kind: impl Into<String>,
        factory: Arc<dyn SynchronizerFactory>,
    ) -> Self {
        self.factories.insert(kind.into(), factory);
        self
    }

    /// Builds the cluster. Requires a running tokio runtime: the listener
    /// dispatch tasks are spawned here.
    pub fn build(self) -> Cluster {
        Cluster {
            inner: Arc::new(ClusterInner {
                configuration: self.configuration,
                identity: self.identity,
                records: self.records,
                factories: self.factories,
                dns_events: DnsNotifier::new(),
                sync_events: SynchronizationNotifier::new(),
                started: tokio::sync::Mutex::new(None),
                watch_token: Mutex::new(None),
            }),
        }
    }
}

/// Lifecycle orchestrator: builds the model from configuration, owns every
/// monitor and scheduler, restarts the whole set when the configuration
/// changes, and aggregates the overall status.
#[derive(Clone)]
pub struct Cluster {
    inner: Arc<ClusterInner>,
}

struct ClusterInner {
    configuration: Arc<dyn ConfigurationSource>,
    identity: Arc<dyn LocalIdentity>,
    records: Arc<dyn RecordSource>,
    factories: HashMap<String, Arc<dyn SynchronizerFactory>>,
    dns_events: DnsNotifier,
    sync_events: SynchronizationNotifier,
    started: tokio::sync::Mutex<Option<RunningCluster>>,
    watch_token: Mutex<Option<CancellationToken>>,
}

struct RunningCluster {
    enabled: bool,
    display: String,
    local_node: Option<Arc<Node>>,
    resources: Vec<RuntimeResource>,
}

struct RuntimeResource {
    resource: Arc<Resource>,
    monitor: ResourceDnsMonitor,
    synchronizers: Vec<CronSynchronizer>,
}

impl RuntimeResource {
    fn status(&self, now: DateTime<Utc>) -> ResourceStatus {
        let mut status = if self.resource.enabled {
            ResourceStatus::Unknown
        } else {
            ResourceStatus::Disabled
        };
        let latest = self.monitor.latest();
        status = status.max(latest.resource_status());
        // Freshness only applies to real passes; synthetic lifecycle results
        // (stopped, disabled, starting) have no lookups and do not go stale.
        if latest.master_record_lookups().is_some() {
            status = status.max(latest.freshness_status(now));
        }
        for synchronizer in &self.synchronizers {
            status = status.max(synchronizer.scheduler_status());
        }
        status
    }
}

impl Cluster {
    pub fn builder(
        configuration: Arc<dyn ConfigurationSource>,
        identity: Arc<dyn LocalIdentity>,
        records: Arc<dyn RecordSource>,
    ) -> ClusterBuilder {
        ClusterBuilder::new(configuration, identity, records)
    }

    /// Starts the configuration source, builds the model and brings every
    /// monitor and scheduler up. A configuration error leaves the cluster
    /// stopped and is returned to the caller.
    pub async fn start(&self) -> Result<(), ClusterError> {
        let mut guard = self.inner.started.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        self.inner.configuration.start().await?;
        match self.inner.start_up().await {
            Ok(running) => {
                *guard = Some(running);
            }
            Err(e) => {
                self.inner.configuration.stop().await;
                return Err(e);
            }
        }
        drop(guard);

        let token = CancellationToken::new();
        {
            let mut watch = self
                .inner
                .watch_token
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = watch.take() {
                previous.cancel();
            }
            *watch = Some(token.clone());
        }

        let inner = self.inner.clone();
        let mut changes = inner.configuration.changes();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        inner.reload().await;
                    }
                }
            }
        });

        Ok(())
    }

    /// Stops schedulers, monitors, and finally the configuration source.
    pub async fn stop(&self) {
        {
            let mut watch = self
                .inner
                .watch_token
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(token) = watch.take() {
                token.cancel();
            }
        }

        let mut guard = self.inner.started.lock().await;
        if let Some(running) = guard.take() {
            ClusterInner::shut_down(running);
        }
        drop(guard);

        self.inner.configuration.stop().await;
    }

    pub async fn is_started(&self) -> bool {
        self.inner.started.lock().await.is_some()
    }

    pub async fn display(&self) -> Option<String> {
        self.inner
            .started
            .lock()
            .await
            .as_ref()
            .map(|r| r.display.clone())
    }

    pub async fn local_node(&self) -> Option<Arc<Node>> {
        self.inner
            .started
            .lock()
            .await
            .as_ref()
            .and_then(|r| r.local_node.clone())
    }

    /// Aggregate status: stopped when not started, disabled escalation when
    /// the cluster is disabled, then every resource's own contribution.
    pub async fn status(&self) -> ResourceStatus {
        let guard = self.inner.started.lock().await;
        match guard.as_ref() {
            None => ResourceStatus::Stopped,
            Some(running) => {
                let now = Utc::now();
                let mut status = ResourceStatus::Unknown;
                if !running.enabled {
                    status = status.max(ResourceStatus::Disabled);
                }
                for runtime in &running.resources {
                    status = status.max(runtime.status(now));
                }
                status
            }
        }
    }

    pub async fn resource_status(&self, resource_id: &str) -> Option<ResourceStatus> {
        let guard = self.inner.started.lock().await;
        let running = guard.as_ref()?;
        let now = Utc::now();
        running
            .resources
            .iter()
            .find(|r| r.resource.id == resource_id)
            .map(|r| r.status(now))
    }

    /// Requests an immediate synchronization or test run on the scheduler
    /// for the given pair. Returns false when no such scheduler exists.
    pub async fn synchronize_now(
        &self,
        resource_id: &str,
        remote_node_id: &str,
        mode: SynchronizationMode,
    ) -> bool {
        let guard = self.inner.started.lock().await;
        let Some(running) = guard.as_ref() else {
            return false;
        };
        for runtime in &running.resources {
            if runtime.resource.id != resource_id {
                continue;
            }
            for synchronizer in &runtime.synchronizers {
                if synchronizer.remote_node_id() == remote_node_id {
                    synchronizer.synchronize_now(mode);
                    return true;
                }
            }
        }
        false
    }

    pub fn add_dns_listener(&self, listener: Arc<dyn ResourceDnsListener>) {
        self.inner.dns_events.add_listener(listener);
    }

    pub fn remove_dns_listener(&self, listener: &Arc<dyn ResourceDnsListener>) {
        self.inner.dns_events.remove_listener(listener);
    }

    pub fn add_synchronization_listener(&self, listener: Arc<dyn ResourceSynchronizationListener>) {
        self.inner.sync_events.add_listener(listener);
    }

    pub fn remove_synchronization_listener(
        &self,
        listener: &Arc<dyn ResourceSynchronizationListener>,
    ) {
        self.inner.sync_events.remove_listener(listener);
    }
}

impl ClusterInner {
    async fn start_up(&self) -> Result<RunningCluster, ClusterError> {
        let config = self.configuration.snapshot()?;
        let (nodes, resources) = build_model(&config)?;

        let hostname = self.identity.hostname();
        let username = self.identity.username();
        let local_node = nodes
            .iter()
            .find(|n| n.hostname == hostname && n.username == username)
            .cloned();
        match &local_node {
            Some(node) => info!(node = %node.id, hostname = %hostname, "local node identified"),
            None => info!(hostname = %hostname, username = %username, "no local node matches; observing only"),
        }

        // Construct everything before starting anything, so configuration
        // errors surface with no monitor left half-running.
        let mut runtimes = Vec::with_capacity(resources.len());
        for resource in &resources {
            let monitor = ResourceDnsMonitor::new(
                resource.clone(),
                DnsLookup::new(self.records.clone()),
                self.dns_events.sender(),
            );

            let mut synchronizers = Vec::new();
            if let (Some(local), Some(settings)) = (&local_node, resource.cron_settings()) {
                if let Some(local_rn) = resource.resource_node(&local.id) {
                    let factory = self.factories.get(&resource.kind).ok_or_else(|| {
                        ClusterError::UnknownResourceKind(resource.kind.clone())
                    })?;
                    for remote_rn in resource
                        .resource_nodes
                        .iter()
                        .filter(|rn| rn.node.id != local.id)
                    {
                        if let Some(synchronizer) =
                            factory.new_synchronizer(resource, local_rn, remote_rn)?
                        {
                            synchronizers.push(CronSynchronizer::new(
                                resource.clone(),
                                local_rn.clone(),
                                remote_rn.clone(),
                                settings.clone(),
                                synchronizer,
                                monitor.result_cell(),
                                self.sync_events.sender(),
                            ));
                        }
                    }
                }
            }

            runtimes.push(RuntimeResource {
                resource: resource.clone(),
                monitor,
                synchronizers,
            });
        }

        for runtime in &runtimes {
            runtime.monitor.start(config.enabled);
            for synchronizer in &runtime.synchronizers {
                synchronizer.start(config.enabled);
            }
        }

        info!(
            display = %config.display,
            nodes = nodes.len(),
            resources = runtimes.len(),
            enabled = config.enabled,
            "cluster started"
        );

        Ok(RunningCluster {
            enabled: config.enabled,
            display: config.display.clone(),
            local_node,
            resources: runtimes,
        })
    }

    fn shut_down(running: RunningCluster) {
        for runtime in running.resources.iter().rev() {
            for synchronizer in runtime.synchronizers.iter().rev() {
                synchronizer.stop();
            }
            runtime.monitor.stop();
        }
        info!("cluster stopped");
    }

    async fn reload(&self) {
        info!("configuration change detected; reloading");
        let mut guard = self.started.lock().await;
        if let Some(running) = guard.take() {
            Self::shut_down(running);
        }
        // A failed earlier reload leaves the cluster stopped; a later good
        // configuration brings it back.
        match self.start_up().await {
            Ok(running) => *guard = Some(running),
            Err(e) => {
                error!(error = %e, "reload failed; cluster left stopped");
            }
        }
    }
}
