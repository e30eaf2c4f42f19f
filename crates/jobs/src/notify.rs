use dnscoord_application::ports::{ResourceDnsListener, ResourceSynchronizationListener};
use dnscoord_domain::{ResourceDnsResult, ResourceSynchronizationResult};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;

/// A published DNS pass, paired with the result it replaced.
#[derive(Clone)]
pub struct DnsResultEvent {
    pub old: Arc<ResourceDnsResult>,
    pub new: Arc<ResourceDnsResult>,
}

/// A recorded synchronization run; `old` is absent on a scheduler's first.
#[derive(Clone)]
pub struct SynchronizationResultEvent {
    pub old: Option<Arc<ResourceSynchronizationResult>>,
    pub new: Arc<ResourceSynchronizationResult>,
}

/// Serialized delivery of DNS results to listeners.
///
/// All monitors feed one unbounded channel consumed by a single task, so
/// listeners observe results in publication order regardless of which
/// monitor produced them. Listener callbacks therefore must stay short.
pub struct DnsNotifier {
    listeners: Arc<Mutex<Vec<Arc<dyn ResourceDnsListener>>>>,
    tx: mpsc::UnboundedSender<DnsResultEvent>,
}

impl DnsNotifier {
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<DnsResultEvent>();
        let listeners: Arc<Mutex<Vec<Arc<dyn ResourceDnsListener>>>> =
            Arc::new(Mutex::new(Vec::new()));

        let task_listeners = listeners.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let snapshot: Vec<_> = task_listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                for listener in snapshot {
                    listener.on_resource_dns_result(&event.old, &event.new);
                }
            }
            debug!("dns notifier drained");
        });

        Self { listeners, tx }
    }

    pub fn add_listener(&self, listener: Arc<dyn ResourceDnsListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn ResourceDnsListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<DnsResultEvent> {
        self.tx.clone()
    }
}

impl Default for DnsNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized delivery of synchronization results, mirroring `DnsNotifier`
/// on its own channel so slow DNS listeners cannot delay sync listeners or
/// reorder either category.
pub struct SynchronizationNotifier {
    listeners: Arc<Mutex<Vec<Arc<dyn ResourceSynchronizationListener>>>>,
    tx: mpsc::UnboundedSender<SynchronizationResultEvent>,
}

impl SynchronizationNotifier {
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SynchronizationResultEvent>();
        let listeners: Arc<Mutex<Vec<Arc<dyn ResourceSynchronizationListener>>>> =
            Arc::new(Mutex::new(Vec::new()));

        let task_listeners = listeners.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let snapshot: Vec<_> = task_listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                for listener in snapshot {
                    listener.on_resource_synchronization_result(event.old.as_ref(), &event.new);
                }
            }
            debug!("synchronization notifier drained");
        });

        Self { listeners, tx }
    }

    pub fn add_listener(&self, listener: Arc<dyn ResourceSynchronizationListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn ResourceSynchronizationListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<SynchronizationResultEvent> {
        self.tx.clone()
    }
}

impl Default for SynchronizationNotifier {
    fn default() -> Self {
        Self::new()
    }
}
