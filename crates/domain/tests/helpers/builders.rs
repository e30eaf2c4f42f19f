#![allow(dead_code)]

use dnscoord_domain::{
    CronSettings, DnsName, Nameserver, Node, Resource, ResourceNode, ResourceScheduling,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

pub fn name(s: &str) -> DnsName {
    s.parse().unwrap()
}

pub fn nameserver(host: &str, strict_ttl: bool) -> Nameserver {
    Nameserver::new(name(host), strict_ttl)
}

pub fn node(id: &str, hostname: &str, nameservers: &[(&str, bool)]) -> Arc<Node> {
    node_with_enabled(id, hostname, true, nameservers)
}

pub fn node_with_enabled(
    id: &str,
    hostname: &str,
    enabled: bool,
    nameservers: &[(&str, bool)],
) -> Arc<Node> {
    Arc::new(Node {
        id: id.to_string(),
        enabled,
        display: format!("Node {id}"),
        hostname: name(hostname),
        username: "appsync".to_string(),
        nameservers: nameservers
            .iter()
            .map(|(h, strict)| nameserver(h, *strict))
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
) -> Resource {
    Resource {
        id: id.to_string(),
        enabled: true,
        display: format!("Resource {id}"),
        kind: "monitor".to_string(),
        master_records: master_records.iter().map(|r| name(r)).collect(),
        master_records_ttl: 300,
        allow_multi_master: false,
        resource_nodes,
        scheduling: ResourceScheduling::Monitor,
    }
}

pub fn cron_resource(
    id: &str,
    master_records: &[&str],
    resource_nodes: Vec<ResourceNode>,
) -> Resource {
    let mut resource = monitor_resource(id, master_records, resource_nodes);
    resource.kind = "rsync".to_string();
    resource.scheduling = ResourceScheduling::Cron(CronSettings {
        synchronize_schedule: "*/15 * * * *".parse().unwrap(),
        test_schedule: "45 3 * * *".parse().unwrap(),
        synchronize_timeout: Duration::from_secs(3600),
        test_timeout: Duration::from_secs(1200),
    });
    resource
}
