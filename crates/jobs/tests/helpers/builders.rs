#![allow(dead_code)]

use chrono::Utc;
use dnscoord_domain::{
    ClusterConfig, CronSettings, DnsName, MasterDnsStatus, Nameserver, Node, NodeConfig,
    NodeDnsStatus, Resource, ResourceConfig, ResourceDnsResult, ResourceNode, ResourceNodeConfig,
    ResourceNodeDnsResult, ResourceScheduling,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

pub fn name(s: &str) -> DnsName {
    s.parse().unwrap()
}

pub fn nameserver(host: &str) -> Nameserver {
    Nameserver::new(name(host), false)
}

pub fn node(id: &str, nameservers: &[&str]) -> Arc<Node> {
    node_with_enabled(id, true, nameservers)
}

pub fn node_with_enabled(id: &str, enabled: bool, nameservers: &[&str]) -> Arc<Node> {
    Arc::new(Node {
        id: id.to_string(),
        enabled,
        display: format!("Node {id}"),
        hostname: name(&format!("{id}.example.com")),
        username: "appsync".to_string(),
        nameservers: nameservers
            .iter()
            .map(|h| nameserver(h))
            .collect::<BTreeSet<_>>(),
    })
}

pub fn resource_node(node: Arc<Node>, records: &[&str]) -> ResourceNode {
    ResourceNode {
        node,
        node_records: records.iter().map(|r| name(r)).collect(),
    }
}

pub fn monitor_resource(
    id: &str,
    master_records: &[&str],
    resource_nodes: Vec<ResourceNode>,
) -> Arc<Resource> {
    Arc::new(Resource {
        id: id.to_string(),
        enabled: true,
        display: format!("Resource {id}"),
        kind: "monitor".to_string(),
        master_records: master_records.iter().map(|r| name(r)).collect(),
        master_records_ttl: 300,
        allow_multi_master: false,
        resource_nodes,
        scheduling: ResourceScheduling::Monitor,
    })
}

/// Cron resource whose timeouts are short enough for tests to hit.
pub fn cron_resource(
    id: &str,
    master_records: &[&str],
    resource_nodes: Vec<ResourceNode>,
    timeout: Duration,
) -> Arc<Resource> {
    let mut resource =
        Arc::try_unwrap(monitor_resource(id, master_records, resource_nodes)).unwrap();
    resource.kind = "rsync".to_string();
    resource.scheduling = ResourceScheduling::Cron(cron_settings(timeout));
    Arc::new(resource)
}

pub fn cron_settings(timeout: Duration) -> CronSettings {
    CronSettings {
        synchronize_schedule: "*/15 * * * *".parse().unwrap(),
        test_schedule: "45 3 * * *".parse().unwrap(),
        synchronize_timeout: timeout,
        test_timeout: timeout,
    }
}

pub fn node_config(id: &str, nameservers: &[&str]) -> NodeConfig {
    NodeConfig {
        id: id.to_string(),
        enabled: true,
        display: format!("Node {id}"),
        hostname: format!("{id}.example.com"),
        username: "appsync".to_string(),
        nameservers: nameservers
            .iter()
            .map(|h| (h.to_string(), false))
            .collect(),
    }
}

pub fn monitor_resource_config(
    id: &str,
    master_records: &[&str],
    nodes: &[(&str, &[&str])],
) -> ResourceConfig {
    ResourceConfig {
        id: id.to_string(),
        enabled: true,
        display: format!("Resource {id}"),
        kind: "monitor".to_string(),
        master_records: master_records.iter().map(|r| r.to_string()).collect(),
        master_records_ttl: 300,
        allow_multi_master: false,
        synchronize_schedule: None,
        test_schedule: None,
        synchronize_timeout: 3600,
        test_timeout: 1200,
        nodes: nodes
            .iter()
            .map(|(node_id, records)| ResourceNodeConfig {
                node_id: node_id.to_string(),
                node_records: records.iter().map(|r| r.to_string()).collect(),
            })
            .collect(),
    }
}

pub fn cron_resource_config(
    id: &str,
    master_records: &[&str],
    nodes: &[(&str, &[&str])],
) -> ResourceConfig {
    let mut config = monitor_resource_config(id, master_records, nodes);
    config.kind = "rsync".to_string();
    config.synchronize_schedule = Some("*/15 * * * *".to_string());
    config.test_schedule = Some("45 3 * * *".to_string());
    config
}

/// A bare DNS view with the given statuses and no lookups, for driving
/// schedulers without running a monitor.
pub fn dns_view(
    resource: &Resource,
    master: MasterDnsStatus,
    nodes: &[(&str, NodeDnsStatus)],
) -> ResourceDnsResult {
    let now = Utc::now();
    ResourceDnsResult::new(
        resource.id.clone(),
        now,
        now,
        master,
        BTreeSet::new(),
        None,
        nodes
            .iter()
            .map(|(id, status)| {
                (
                    id.to_string(),
                    ResourceNodeDnsResult::synthetic(*id, *status),
                )
            })
            .collect(),
    )
}

pub fn cluster_config(nodes: Vec<NodeConfig>, resources: Vec<ResourceConfig>) -> ClusterConfig {
    ClusterConfig {
        enabled: true,
        display: "test cluster".to_string(),
        logging: Default::default(),
        nodes,
        resources,
    }
}
