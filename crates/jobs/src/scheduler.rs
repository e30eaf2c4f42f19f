use crate::monitor::DnsResultCell;
use crate::notify::SynchronizationResultEvent;
use chrono::{DateTime, Local, Timelike, Utc};
use dnscoord_application::ports::ResourceSynchronizer;
use dnscoord_domain::{
    CronSettings, Resource, ResourceNode, ResourceNodeDnsResult, ResourceStatus,
    ResourceSynchronizationResult, ResourceSynchronizerState, SynchronizationMode,
    SynchronizationStep,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Modes a tick may fire, in preference order. A forced mode short-circuits
/// the schedules; otherwise synchronize wins over test when both match.
pub fn candidate_modes(
    forced: Option<SynchronizationMode>,
    settings: &CronSettings,
    now: &DateTime<Local>,
) -> Vec<SynchronizationMode> {
    if let Some(mode) = forced {
        return vec![mode];
    }
    let mut modes = Vec::new();
    if settings.synchronize_schedule.matches(now) {
        modes.push(SynchronizationMode::Synchronize);
    }
    if settings.test_schedule.matches(now) {
        modes.push(SynchronizationMode::TestOnly);
    }
    modes
}

struct SchedulerState {
    state: ResourceSynchronizerState,
    state_message: Option<String>,
    forced_mode: Option<SynchronizationMode>,
    last_result: Option<Arc<ResourceSynchronizationResult>>,
}

/// Cron-driven synchronization between the local node and one remote node.
///
/// Ticks at wall-clock minute boundaries while sleeping; each tick consults
/// the monitor's latest DNS view and the synchronizer's own gate before
/// submitting work. Work runs on its own task bounded by the per-resource
/// timeout, so a stuck synchronizer cannot wedge the tick loop.
pub struct CronSynchronizer {
    inner: Arc<SynchronizerInner>,
}

struct SynchronizerInner {
    resource: Arc<Resource>,
    local: ResourceNode,
    remote: ResourceNode,
    settings: CronSettings,
    synchronizer: Arc<dyn ResourceSynchronizer>,
    dns: Arc<DnsResultCell>,
    events: mpsc::UnboundedSender<SynchronizationResultEvent>,
    state: Mutex<SchedulerState>,
    kick: Notify,
    token: Mutex<CancellationToken>,
}

impl CronSynchronizer {
    pub fn new(
        resource: Arc<Resource>,
        local: ResourceNode,
        remote: ResourceNode,
        settings: CronSettings,
        synchronizer: Arc<dyn ResourceSynchronizer>,
        dns: Arc<DnsResultCell>,
        events: mpsc::UnboundedSender<SynchronizationResultEvent>,
    ) -> Self {
        let token = CancellationToken::new();
        token.cancel();
        Self {
            inner: Arc::new(SynchronizerInner {
                resource,
                local,
                remote,
                settings,
                synchronizer,
                dns,
                events,
                state: Mutex::new(SchedulerState {
                    state: ResourceSynchronizerState::Stopped,
                    state_message: None,
                    forced_mode: None,
                    last_result: None,
                }),
                kick: Notify::new(),
                token: Mutex::new(token),
            }),
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.inner.resource.id
    }

    pub fn local_node_id(&self) -> &str {
        self.inner.local.node_id()
    }

    pub fn remote_node_id(&self) -> &str {
        self.inner.remote.node_id()
    }

    pub fn state(&self) -> ResourceSynchronizerState {
        self.inner.state().state
    }

    pub fn state_message(&self) -> Option<String> {
        self.inner.state().state_message.clone()
    }

    pub fn last_result(&self) -> Option<Arc<ResourceSynchronizationResult>> {
        self.inner.state().last_result.clone()
    }

    /// Contribution of this scheduler to the resource status: the state
    /// itself, escalated by the last result. With no result yet, a healthy
    /// sleeping scheduler reads as starting.
    pub fn scheduler_status(&self) -> ResourceStatus {
        let state = self.inner.state();
        let state_status = state.state.as_resource_status();
        let result_status = match &state.last_result {
            Some(result) => result.status(),
            None if state_status == ResourceStatus::Healthy => ResourceStatus::Starting,
            None => state_status,
        };
        state_status.max(result_status)
    }

    /// Starts ticking, unless this pair is disabled at any level, in which
    /// case the state records which level was.
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

        {
            let mut state = self.inner.state();
            let disabled = if !cluster_enabled {
                Some("cluster".to_string())
            } else if !self.inner.resource.enabled {
                Some(format!("resource {}", self.inner.resource.id))
            } else if !self.inner.local.node.enabled {
                Some(format!("local node {}", self.inner.local.node_id()))
            } else if !self.inner.remote.node.enabled {
                Some(format!("remote node {}", self.inner.remote.node_id()))
            } else {
                None
            };

            match disabled {
                Some(what) => {
                    state.state = ResourceSynchronizerState::Disabled;
                    state.state_message = Some(format!("{what} is disabled"));
                    return;
                }
                None => {
                    state.state = ResourceSynchronizerState::Sleeping;
                    state.state_message = None;
                }
            }
        }

        info!(
            resource = %self.inner.resource.id,
            local = %self.inner.local.node_id(),
            remote = %self.inner.remote.node_id(),
            synchronize_schedule = %self.inner.settings.synchronize_schedule,
            test_schedule = %self.inner.settings.test_schedule,
            "synchronizer scheduled"
        );

        let inner = self.inner.clone();
        tokio::spawn(async move {
            loop {
                let delay = delay_to_next_minute(Local::now());
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => inner.tick(Local::now(), &token),
                    _ = inner.kick.notified() => inner.tick(Local::now(), &token),
                }
            }
            debug!(
                resource = %inner.resource.id,
                remote = %inner.remote.node_id(),
                "synchronizer tick loop exited"
            );
        });
    }

    /// Requests an immediate run in the given mode. Only honored while
    /// sleeping; otherwise the request is dropped.
    pub fn synchronize_now(&self, mode: SynchronizationMode) {
        {
            let mut state = self.inner.state();
            if state.state != ResourceSynchronizerState::Sleeping {
                debug!(
                    resource = %self.inner.resource.id,
                    remote = %self.inner.remote.node_id(),
                    state = %state.state,
                    "synchronize_now dropped"
                );
                return;
            }
            state.forced_mode = Some(mode);
        }
        self.inner.kick.notify_one();
    }

    /// Stops ticking. Running work is left to finish or time out; its
    /// result is discarded because the registration it belongs to is gone.
    pub fn stop(&self) {
        self.inner
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
        let mut state = self.inner.state();
        state.state = ResourceSynchronizerState::Stopped;
        state.state_message = None;
        state.forced_mode = None;
        state.last_result = None;
    }
}

impl SynchronizerInner {
    fn state(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(self: &Arc<Self>, now: DateTime<Local>, token: &CancellationToken) {
        let work = {
            let mut state = self.state();
            if token.is_cancelled() || state.state != ResourceSynchronizerState::Sleeping {
                return;
            }
            let forced = state.forced_mode.take();

            let dns = self.dns.latest();
            if dns.resource_status() == ResourceStatus::Inconsistent {
                debug!(
                    resource = %self.resource.id,
                    remote = %self.remote.node_id(),
                    "tick skipped: dns view inconsistent"
                );
                None
            } else {
                let local = dns.node_result(self.local.node_id()).cloned();
                let remote = dns.node_result(self.remote.node_id()).cloned();
                match (local, remote) {
                    (Some(local), Some(remote)) => candidate_modes(forced, &self.settings, &now)
                        .into_iter()
                        .find(|mode| self.synchronizer.can_synchronize(*mode, &local, &remote))
                        .map(|mode| {
                            state.state = match mode {
                                SynchronizationMode::Synchronize => {
                                    ResourceSynchronizerState::Synchronizing
                                }
                                SynchronizationMode::TestOnly => ResourceSynchronizerState::Testing,
                            };
                            (mode, local, remote)
                        }),
                    _ => {
                        warn!(
                            resource = %self.resource.id,
                            "tick skipped: dns result lacks node entries"
                        );
                        None
                    }
                }
            }
        };

        if let Some((mode, local, remote)) = work {
            let inner = self.clone();
            let token = token.clone();
            tokio::spawn(async move {
                inner.run_work(mode, local, remote, token).await;
            });
        }
    }

    async fn run_work(
        self: Arc<Self>,
        mode: SynchronizationMode,
        local: ResourceNodeDnsResult,
        remote: ResourceNodeDnsResult,
        token: CancellationToken,
    ) {
        let timeout = match mode {
            SynchronizationMode::Synchronize => self.settings.synchronize_timeout,
            SynchronizationMode::TestOnly => self.settings.test_timeout,
        };
        let started = Utc::now();
        info!(
            resource = %self.resource.id,
            remote = %self.remote.node_id(),
            mode = %mode,
            "synchronization run started"
        );

        let outcome = tokio::time::timeout(
            timeout,
            self.synchronizer.synchronize(mode, &local, &remote),
        )
        .await;

        let result = match outcome {
            Ok(Ok(result)) => Arc::new(result),
            Ok(Err(e)) => {
                error!(
                    resource = %self.resource.id,
                    remote = %self.remote.node_id(),
                    error = %e,
                    "synchronization run failed"
                );
                Arc::new(self.error_result(mode, started, e.to_string()))
            }
            Err(_) => {
                error!(
                    resource = %self.resource.id,
                    remote = %self.remote.node_id(),
                    timeout_secs = timeout.as_secs(),
                    "synchronization run timed out"
                );
                Arc::new(self.error_result(
                    mode,
                    started,
                    format!("timed out after {}s", timeout.as_secs()),
                ))
            }
        };

        let old = {
            let mut state = self.state();
            if token.is_cancelled() {
                // Stopped while running; the result belongs to a dead
                // registration.
                return;
            }
            state.state = ResourceSynchronizerState::Sleeping;
            state.last_result.replace(result.clone())
        };

        if self
            .events
            .send(SynchronizationResultEvent { old, new: result })
            .is_err()
        {
            debug!(resource = %self.resource.id, "sync event dropped after shutdown");
        }
    }

    fn error_result(
        &self,
        mode: SynchronizationMode,
        started: chrono::DateTime<Utc>,
        message: String,
    ) -> ResourceSynchronizationResult {
        let step = SynchronizationStep {
            start_time: started,
            end_time: Utc::now(),
            status: ResourceStatus::Error,
            description: "future.get".to_string(),
            outputs: Vec::new(),
            warnings: Vec::new(),
            errors: vec![message],
        };
        ResourceSynchronizationResult::single_step(
            self.resource.id.clone(),
            self.local.node_id(),
            self.remote.node_id(),
            mode,
            step,
        )
    }
}

fn delay_to_next_minute(now: DateTime<Local>) -> Duration {
    let into_minute =
        u64::from(now.second()) * 1_000_000_000 + u64::from(now.nanosecond() % 1_000_000_000);
    Duration::from_nanos(60 * 1_000_000_000 - into_minute)
}
