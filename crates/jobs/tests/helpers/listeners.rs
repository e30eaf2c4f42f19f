#![allow(dead_code)]

use dnscoord_application::ports::{ResourceDnsListener, ResourceSynchronizationListener};
use dnscoord_domain::{ResourceDnsResult, ResourceSynchronizationResult};
use std::sync::{Arc, Mutex};

type DnsEvent = (Arc<ResourceDnsResult>, Arc<ResourceDnsResult>);
type SyncEvent = (
    Option<Arc<ResourceSynchronizationResult>>,
    Arc<ResourceSynchronizationResult>,
);

#[derive(Default)]
pub struct CollectingDnsListener {
    events: Mutex<Vec<DnsEvent>>,
}

impl CollectingDnsListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DnsEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl ResourceDnsListener for CollectingDnsListener {
    fn on_resource_dns_result(&self, old: &Arc<ResourceDnsResult>, new: &Arc<ResourceDnsResult>) {
        self.events.lock().unwrap().push((old.clone(), new.clone()));
    }
}

#[derive(Default)]
pub struct CollectingSyncListener {
    events: Mutex<Vec<SyncEvent>>,
}

impl CollectingSyncListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl ResourceSynchronizationListener for CollectingSyncListener {
    fn on_resource_synchronization_result(
        &self,
        old: Option<&Arc<ResourceSynchronizationResult>>,
        new: &Arc<ResourceSynchronizationResult>,
    ) {
        self.events.lock().unwrap().push((old.cloned(), new.clone()));
    }
}
