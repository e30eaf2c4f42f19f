use dnscoord_domain::{
    DnsLookupResult, DnsLookupStatus, DnsName, LookupMap, MasterDnsStatus, Nameserver,
    NodeDnsStatus, Resource, ResourceNodeDnsResult,
};
use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

/// Output of one role-resolution pass: the master view and one result per
/// resource node, ready to be frozen into a `ResourceDnsResult`.
#[derive(Debug)]
pub struct ResolvedRoles {
    pub master_status: MasterDnsStatus,
    pub master_status_messages: BTreeSet<String>,
    pub master_record_lookups: LookupMap,
    pub node_results: BTreeMap<String, ResourceNodeDnsResult>,
}

/// Working state for one node while the pass is still mutable. Results are
/// only frozen at the end so the duplicate-address rule can rewrite an
/// earlier node after it was first aggregated.
struct NodeAggregation {
    node_id: String,
    display: String,
    enabled: bool,
    status: NodeDnsStatus,
    messages: BTreeSet<String>,
    lookups: LookupMap,
    first_addresses: Option<BTreeSet<Ipv4Addr>>,
}

impl NodeAggregation {
    fn contains_address(&self, address: Ipv4Addr) -> bool {
        self.lookups
            .values()
            .flat_map(|per_ns| per_ns.values())
            .filter(|l| l.status().is_success())
            .any(|l| l.addresses().contains(&address))
    }

    fn freeze(self) -> ResourceNodeDnsResult {
        let lookups = if self.enabled {
            Some(self.lookups)
        } else {
            None
        };
        ResourceNodeDnsResult::new(self.node_id, self.status, self.messages, lookups)
    }
}

fn lookup_for(lookups: &LookupMap, name: &DnsName, nameserver: &Nameserver) -> DnsLookupResult {
    lookups
        .get(name)
        .and_then(|per_ns| per_ns.get(nameserver))
        .cloned()
        .unwrap_or_else(|| {
            DnsLookupResult::failure(
                name.clone(),
                DnsLookupStatus::Unrecoverable,
                "lookup did not complete",
            )
        })
}

fn format_addresses(addresses: &BTreeSet<Ipv4Addr>) -> String {
    let joined = addresses
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

/// Decides each node's role and the master consistency from one complete
/// lookup table.
///
/// Iteration is deterministic: master records and node records in declared
/// order, nameservers in hostname order. That fixes which lookup becomes
/// "first" and is therefore the one cited in mismatch messages. Severity
/// only ever escalates within a pass.
pub fn resolve_roles(
    resource: &Resource,
    nameservers: &BTreeSet<Nameserver>,
    lookups: &LookupMap,
) -> ResolvedRoles {
    let mut master_status = MasterDnsStatus::Consistent;
    let mut master_messages: BTreeSet<String> = BTreeSet::new();
    let mut master_lookups: LookupMap = BTreeMap::new();
    let mut first_master: Option<(Nameserver, DnsName, BTreeSet<Ipv4Addr>)> = None;

    for record in &resource.master_records {
        let mut per_ns: BTreeMap<Nameserver, DnsLookupResult> = BTreeMap::new();
        let mut seen_success = false;

        for nameserver in nameservers {
            let result = lookup_for(lookups, record, nameserver);
            if result.status().is_success() {
                seen_success = true;
                if result.status() == DnsLookupStatus::Warning {
                    master_status = master_status.max(MasterDnsStatus::Warning);
                }
                if result.addresses().len() > 1 && !resource.allow_multi_master {
                    master_status = master_status.max(MasterDnsStatus::Inconsistent);
                    master_messages.insert(format!(
                        "multi-master not allowed on nameserver {ns}: {record} -> {addrs}",
                        ns = nameserver.hostname,
                        addrs = format_addresses(result.addresses()),
                    ));
                }
                match &first_master {
                    None => {
                        first_master = Some((
                            nameserver.clone(),
                            record.clone(),
                            result.addresses().clone(),
                        ));
                    }
                    Some((first_ns, first_record, first_addresses)) => {
                        if result.addresses() != first_addresses {
                            master_status = master_status.max(MasterDnsStatus::Inconsistent);
                            master_messages.insert(format!(
                                "master record addresses mismatch: {first_record} on {fns} -> {fa} but {record} on {ns} -> {a}",
                                fns = first_ns.hostname,
                                fa = format_addresses(first_addresses),
                                ns = nameserver.hostname,
                                a = format_addresses(result.addresses()),
                            ));
                        }
                    }
                }
            }
            per_ns.insert(nameserver.clone(), result);
        }

        if !seen_success {
            master_status = master_status.max(MasterDnsStatus::Inconsistent);
            master_messages.insert(format!("master record missing: {record}"));
        }
        master_lookups.insert(record.clone(), per_ns);
    }

    let first_master_addresses = first_master.map(|(_, _, addresses)| addresses);

    let mut aggregations: Vec<NodeAggregation> = Vec::with_capacity(resource.resource_nodes.len());
    let mut all_node_addresses: BTreeSet<Ipv4Addr> = BTreeSet::new();

    for resource_node in &resource.resource_nodes {
        let node = &resource_node.node;
        if !node.enabled {
            aggregations.push(NodeAggregation {
                node_id: node.id.clone(),
                display: node.display.clone(),
                enabled: false,
                status: NodeDnsStatus::Disabled,
                messages: BTreeSet::new(),
                lookups: BTreeMap::new(),
                first_addresses: None,
            });
            continue;
        }

        let mut status = NodeDnsStatus::Slave;
        let mut messages: BTreeSet<String> = BTreeSet::new();
        let mut node_lookups: LookupMap = BTreeMap::new();
        let mut first_addresses: Option<BTreeSet<Ipv4Addr>> = None;

        for record in &resource_node.node_records {
            let mut per_ns: BTreeMap<Nameserver, DnsLookupResult> = BTreeMap::new();
            let mut seen_success = false;

            for nameserver in nameservers {
                let result = lookup_for(lookups, record, nameserver);
                if result.status().is_success() {
                    seen_success = true;
                    all_node_addresses.extend(result.addresses().iter().copied());

                    if result.addresses().len() > 1 {
                        status = status.max(NodeDnsStatus::Inconsistent);
                        messages.insert(format!(
                            "node record {record} on {ns} returned {addrs}: only one A record allowed",
                            ns = nameserver.hostname,
                            addrs = format_addresses(result.addresses()),
                        ));
                    } else if let Some(address) = result.addresses().iter().next().copied() {
                        for previous in aggregations.iter_mut().filter(|a| a.enabled) {
                            if previous.contains_address(address) {
                                status = status.max(NodeDnsStatus::Inconsistent);
                                messages.insert(format!(
                                    "duplicate A record {address} for {record}: also served for node {other}",
                                    other = previous.display,
                                ));
                                previous.status = previous.status.max(NodeDnsStatus::Inconsistent);
                                previous.messages.insert(format!(
                                    "duplicate A record {address}: also served for node {other}",
                                    other = node.display,
                                ));
                            }
                        }
                    }

                    match &first_addresses {
                        None => first_addresses = Some(result.addresses().clone()),
                        Some(first) => {
                            if result.addresses() != first {
                                status = status.max(NodeDnsStatus::Inconsistent);
                                messages.insert(format!(
                                    "node record addresses mismatch for {record} on {ns}: {a} vs first {f}",
                                    ns = nameserver.hostname,
                                    a = format_addresses(result.addresses()),
                                    f = format_addresses(first),
                                ));
                            }
                        }
                    }
                }
                per_ns.insert(nameserver.clone(), result);
            }

            if !seen_success {
                status = status.max(NodeDnsStatus::Inconsistent);
                messages.insert(format!("node record missing: {record}"));
            }
            node_lookups.insert(record.clone(), per_ns);
        }

        aggregations.push(NodeAggregation {
            node_id: node.id.clone(),
            display: node.display.clone(),
            enabled: true,
            status,
            messages,
            lookups: node_lookups,
            first_addresses,
        });
    }

    // Every master address must belong to some node. Checked before
    // promotion so a node is never promoted under a master that just
    // became inconsistent.
    for (record, per_ns) in &master_lookups {
        for result in per_ns.values() {
            if !result.status().is_success() {
                continue;
            }
            for address in result.addresses() {
                if !all_node_addresses.contains(address) {
                    master_status = master_status.max(MasterDnsStatus::Inconsistent);
                    master_messages.insert(format!(
                        "master record {record} address {address} does not match any node"
                    ));
                }
            }
        }
    }

    let master_consistent = matches!(
        master_status,
        MasterDnsStatus::Consistent | MasterDnsStatus::Warning
    );
    if master_consistent {
        if let Some(master_addresses) = &first_master_addresses {
            for aggregation in aggregations
                .iter_mut()
                .filter(|a| a.enabled && a.status == NodeDnsStatus::Slave)
            {
                if let Some(node_addresses) = &aggregation.first_addresses {
                    if node_addresses.is_subset(master_addresses) {
                        aggregation.status = NodeDnsStatus::Master;
                    }
                }
            }
        }
    }

    let node_results = aggregations
        .into_iter()
        .map(|aggregation| (aggregation.node_id.clone(), aggregation.freeze()))
        .collect();

    ResolvedRoles {
        master_status,
        master_status_messages: master_messages,
        master_record_lookups: master_lookups,
        node_results,
    }
}
