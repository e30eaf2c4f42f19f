use dnscoord_application::ports::{ResourceDnsListener, ResourceSynchronizationListener};
use dnscoord_domain::{ResourceDnsResult, ResourceStatus, ResourceSynchronizationResult};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Logs DNS role transitions as the monitors publish them.
pub struct LoggingDnsListener;

impl ResourceDnsListener for LoggingDnsListener {
    fn on_resource_dns_result(&self, old: &Arc<ResourceDnsResult>, new: &Arc<ResourceDnsResult>) {
        if old.master_status() != new.master_status() {
            let line = format!(
                "resource {} master status: {} -> {}",
                new.resource_id(),
                old.master_status(),
                new.master_status()
            );
            match new.master_status().as_resource_status() {
                ResourceStatus::Inconsistent | ResourceStatus::Error => error!("{line}"),
                ResourceStatus::Warning => warn!("{line}"),
                _ => info!("{line}"),
            }
        }

        for (node_id, result) in new.node_results() {
            let previous = old.node_result(node_id).map(|r| r.node_status());
            if previous != Some(result.node_status()) {
                info!(
                    resource = %new.resource_id(),
                    node = %node_id,
                    status = %result.node_status(),
                    "node role changed"
                );
            }
        }

        for message in new.master_status_messages() {
            warn!(resource = %new.resource_id(), "{message}");
        }
        for result in new.node_results().values() {
            for message in result.node_status_messages() {
                warn!(resource = %new.resource_id(), node = %result.node_id(), "{message}");
            }
        }

        debug!(
            resource = %new.resource_id(),
            status = %new.resource_status(),
            "dns result published"
        );
    }
}

/// Logs every recorded synchronization run.
pub struct LoggingSynchronizationListener;

impl ResourceSynchronizationListener for LoggingSynchronizationListener {
    fn on_resource_synchronization_result(
        &self,
        _old: Option<&Arc<ResourceSynchronizationResult>>,
        new: &Arc<ResourceSynchronizationResult>,
    ) {
        let line = format!(
            "resource {} {} {} -> {}: {}",
            new.resource_id(),
            new.mode(),
            new.local_node_id(),
            new.remote_node_id(),
            new.status()
        );
        match new.status() {
            ResourceStatus::Error | ResourceStatus::Inconsistent => error!("{line}"),
            ResourceStatus::Warning => warn!("{line}"),
            _ => info!("{line}"),
        }

        for step in new.steps() {
            for message in &step.errors {
                error!(
                    resource = %new.resource_id(),
                    step = %step.description,
                    "{message}"
                );
            }
            for message in &step.warnings {
                warn!(
                    resource = %new.resource_id(),
                    step = %step.description,
                    "{message}"
                );
            }
        }
    }
}
