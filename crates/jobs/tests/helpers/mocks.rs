#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use dnscoord_application::ports::{
    ARecord, ConfigurationSource, LocalIdentity, QueryError, RecordSource, ResourceSynchronizer,
    SynchronizerFactory,
};
use dnscoord_domain::{
    ClusterConfig, ClusterError, DnsName, Nameserver, Resource, ResourceNode,
    ResourceNodeDnsResult, ResourceStatus, ResourceSynchronizationResult, SynchronizationMode,
    SynchronizationStep,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Record source answering from a static table; unknown pairs are NXDOMAIN.
pub struct MockRecordSource {
    answers: Mutex<HashMap<(String, String), Vec<ARecord>>>,
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
        }
    }

    pub fn answer(&self, record: &str, nameserver: &str, addrs: &[(&str, u32)]) {
        self.answers.lock().unwrap().insert(
            (record.to_string(), nameserver.to_string()),
            addrs
                .iter()
                .map(|(a, ttl)| ARecord::new(a.parse().unwrap(), *ttl))
                .collect(),
        );
    }

    /// Answers `record -> addr` (TTL 300) on every given nameserver.
    pub fn answer_all(&self, record: &str, nameservers: &[&str], addr: &str) {
        for ns in nameservers {
            self.answer(record, ns, &[(addr, 300)]);
        }
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn query_a(
        &self,
        name: &DnsName,
        nameserver: &Nameserver,
    ) -> Result<Vec<ARecord>, QueryError> {
        let key = (name.to_string(), nameserver.hostname.to_string());
        match self.answers.lock().unwrap().get(&key) {
            Some(records) => Ok(records.clone()),
            None => Err(QueryError::HostNotFound),
        }
    }
}

/// Synchronizer with scriptable gate, delay, and outcome.
pub struct MockSynchronizer {
    resource_id: String,
    local_node_id: String,
    remote_node_id: String,
    can: AtomicBool,
    delay: Mutex<Duration>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<SynchronizationMode>>,
}

impl MockSynchronizer {
    pub fn new(resource_id: &str, local_node_id: &str, remote_node_id: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            local_node_id: local_node_id.to_string(),
            remote_node_id: remote_node_id.to_string(),
            can: AtomicBool::new(true),
            delay: Mutex::new(Duration::ZERO),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_can_synchronize(&self, can: bool) {
        self.can.store(can, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_failure(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<SynchronizationMode> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ResourceSynchronizer for MockSynchronizer {
    fn can_synchronize(
        &self,
        _mode: SynchronizationMode,
        _local: &ResourceNodeDnsResult,
        _remote: &ResourceNodeDnsResult,
    ) -> bool {
        self.can.load(Ordering::SeqCst)
    }

    async fn synchronize(
        &self,
        mode: SynchronizationMode,
        _local: &ResourceNodeDnsResult,
        _remote: &ResourceNodeDnsResult,
    ) -> Result<ResourceSynchronizationResult, ClusterError> {
        self.calls.lock().unwrap().push(mode);
        let delay = *self.delay.lock().unwrap();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ClusterError::Synchronize(message));
        }
        let started = Utc::now();
        let step = SynchronizationStep {
            start_time: started,
            end_time: Utc::now(),
            status: ResourceStatus::Healthy,
            description: "mock run".to_string(),
            outputs: vec!["ok".to_string()],
            warnings: Vec::new(),
            errors: Vec::new(),
        };
        ResourceSynchronizationResult::new(
            self.resource_id.clone(),
            self.local_node_id.clone(),
            self.remote_node_id.clone(),
            mode,
            vec![step],
        )
    }
}

/// Factory producing one `MockSynchronizer` per pair, remembering each.
pub struct MockSynchronizerFactory {
    created: Mutex<Vec<Arc<MockSynchronizer>>>,
    produce: AtomicBool,
}

impl MockSynchronizerFactory {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            produce: AtomicBool::new(true),
        }
    }

    /// Makes `new_synchronizer` answer `None` for every pair.
    pub fn produce_nothing(self) -> Self {
        self.produce.store(false, Ordering::SeqCst);
        self
    }

    pub fn created(&self) -> Vec<Arc<MockSynchronizer>> {
        self.created.lock().unwrap().clone()
    }
}

impl Default for MockSynchronizerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SynchronizerFactory for MockSynchronizerFactory {
    fn new_synchronizer(
        &self,
        resource: &Resource,
        local: &ResourceNode,
        remote: &ResourceNode,
    ) -> Result<Option<Arc<dyn ResourceSynchronizer>>, ClusterError> {
        if !self.produce.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let synchronizer = Arc::new(MockSynchronizer::new(
            &resource.id,
            local.node_id(),
            remote.node_id(),
        ));
        self.created.lock().unwrap().push(synchronizer.clone());
        Ok(Some(synchronizer))
    }
}

/// In-memory configuration source with manual change notification.
pub struct MockConfigurationSource {
    config: Mutex<ClusterConfig>,
    generation: watch::Sender<u64>,
}

impl MockConfigurationSource {
    pub fn new(config: ClusterConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            config: Mutex::new(config),
            generation,
        }
    }

    pub fn set_config(&self, config: ClusterConfig) {
        *self.config.lock().unwrap() = config;
    }

    pub fn bump(&self) {
        self.generation.send_modify(|g| *g += 1);
    }
}

#[async_trait]
impl ConfigurationSource for MockConfigurationSource {
    async fn start(&self) -> Result<(), ClusterError> {
        Ok(())
    }

    async fn stop(&self) {}

    fn snapshot(&self) -> Result<ClusterConfig, ClusterError> {
        Ok(self.config.lock().unwrap().clone())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

/// Fixed identity, standing in for hostname/user detection.
pub struct StaticIdentity {
    hostname: DnsName,
    username: String,
}

impl StaticIdentity {
    pub fn new(hostname: &str, username: &str) -> Self {
        Self {
            hostname: hostname.parse().unwrap(),
            username: username.to_string(),
        }
    }

    /// An identity matching none of the configured nodes.
    pub fn observer() -> Self {
        Self::new("observer.example.net", "nobody")
    }
}

impl LocalIdentity for StaticIdentity {
    fn hostname(&self) -> DnsName {
        self.hostname.clone()
    }

    fn username(&self) -> String {
        self.username.clone()
    }
}
