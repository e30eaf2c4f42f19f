use dnscoord_domain::{
    ClusterConfig, ClusterError, CronSettings, DnsName, Nameserver, Node, Resource, ResourceNode,
    ResourceScheduling,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

/// Builds the immutable node/resource model from a configuration snapshot,
/// failing fast on anything inconsistent: duplicate displays or hostnames,
/// master records overlapping node records, node records shared between
/// nodes, or malformed names and schedules.
pub fn build_model(
    config: &ClusterConfig,
) -> Result<(Vec<Arc<Node>>, Vec<Arc<Resource>>), ClusterError> {
    config.validate()?;

    let mut displays = BTreeSet::new();
    let mut hostnames = BTreeSet::new();
    let mut nodes: BTreeMap<String, Arc<Node>> = BTreeMap::new();

    for node_config in &config.nodes {
        if !displays.insert(node_config.display.clone()) {
            return Err(ClusterError::Configuration(format!(
                "duplicate node display: {}",
                node_config.display
            )));
        }
        let hostname: DnsName = node_config.hostname.parse()?;
        if !hostnames.insert(hostname.clone()) {
            return Err(ClusterError::Configuration(format!(
                "duplicate node hostname: {hostname}"
            )));
        }

        let mut nameservers = BTreeSet::new();
        for (ns_hostname, strict_ttl) in &node_config.nameservers {
            nameservers.insert(Nameserver::new(ns_hostname.parse()?, *strict_ttl));
        }

        nodes.insert(
            node_config.id.clone(),
            Arc::new(Node {
                id: node_config.id.clone(),
                enabled: node_config.enabled,
                display: node_config.display.clone(),
                hostname,
                username: node_config.username.clone(),
                nameservers,
            }),
        );
    }

    let mut resource_displays = BTreeSet::new();
    let mut resources = Vec::with_capacity(config.resources.len());

    for resource_config in &config.resources {
        if !resource_displays.insert(resource_config.display.clone()) {
            return Err(ClusterError::Configuration(format!(
                "duplicate resource display: {}",
                resource_config.display
            )));
        }

        let mut master_records = Vec::with_capacity(resource_config.master_records.len());
        for record in &resource_config.master_records {
            let record: DnsName = record.parse()?;
            if master_records.contains(&record) {
                return Err(ClusterError::Configuration(format!(
                    "resource {}: duplicate master record {record}",
                    resource_config.id
                )));
            }
            master_records.push(record);
        }

        let mut claimed_records: BTreeSet<DnsName> = BTreeSet::new();
        let mut resource_nodes = Vec::with_capacity(resource_config.nodes.len());
        for rn_config in &resource_config.nodes {
            let node = nodes
                .get(&rn_config.node_id)
                .cloned()
                .ok_or_else(|| {
                    ClusterError::Configuration(format!(
                        "resource {} references unknown node {}",
                        resource_config.id, rn_config.node_id
                    ))
                })?;

            let mut node_records = Vec::with_capacity(rn_config.node_records.len());
            for record in &rn_config.node_records {
                let record: DnsName = record.parse()?;
                if master_records.contains(&record) {
                    return Err(ClusterError::Configuration(format!(
                        "resource {}: record {record} is both a master record and a node record",
                        resource_config.id
                    )));
                }
                if !claimed_records.insert(record.clone()) {
                    return Err(ClusterError::Configuration(format!(
                        "resource {}: node record {record} is claimed by more than one node",
                        resource_config.id
                    )));
                }
                node_records.push(record);
            }

            resource_nodes.push(ResourceNode { node, node_records });
        }

        let scheduling = match (
            &resource_config.synchronize_schedule,
            &resource_config.test_schedule,
        ) {
            (Some(synchronize), Some(test)) => ResourceScheduling::Cron(CronSettings {
                synchronize_schedule: synchronize.parse()?,
                test_schedule: test.parse()?,
                synchronize_timeout: Duration::from_secs(resource_config.synchronize_timeout),
                test_timeout: Duration::from_secs(resource_config.test_timeout),
            }),
            _ => ResourceScheduling::Monitor,
        };

        resources.push(Arc::new(Resource {
            id: resource_config.id.clone(),
            enabled: resource_config.enabled,
            display: resource_config.display.clone(),
            kind: resource_config.kind.clone(),
            master_records,
            master_records_ttl: resource_config.master_records_ttl,
            allow_multi_master: resource_config.allow_multi_master,
            resource_nodes,
            scheduling,
        }));
    }

    Ok((nodes.into_values().collect(), resources))
}
