#![allow(dead_code)]

use dnscoord_domain::{
    DnsLookupResult, DnsName, LookupMap, Nameserver, Node, Resource, ResourceNode,
    ResourceScheduling,
};
use std::collections::{BTreeSet, HashMap};
use std::net::Ipv4Addr;
use std::sync::Arc;

pub fn name(s: &str) -> DnsName {
    s.parse().unwrap()
}

pub fn nameserver(host: &str, strict_ttl: bool) -> Nameserver {
    Nameserver::new(name(host), strict_ttl)
}

pub fn addr(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

pub fn addr_set(addrs: &[&str]) -> BTreeSet<Ipv4Addr> {
    addrs.iter().map(|a| addr(a)).collect()
}

pub fn node(id: &str, nameservers: &[(&str, bool)]) -> Arc<Node> {
    node_with_enabled(id, true, nameservers)
}

pub fn node_with_enabled(id: &str, enabled: bool, nameservers: &[(&str, bool)]) -> Arc<Node> {
    Arc::new(Node {
        id: id.to_string(),
        enabled,
        display: format!("Node {id}"),
        hostname: name(&format!("{id}.example.com")),
        username: "appsync".to_string(),
        nameservers: nameservers
            .iter()
            .map(|(h, strict)| nameserver(h, *strict))
            .collect(),
    })
}

pub fn resource_node(node: Arc<Node>, records: &[&str]) -> ResourceNode {
    ResourceNode {
        node,
        node_records: records.iter().map(|r| name(r)).collect(),
    }
}

pub fn resource(id: &str, master_records: &[&str], resource_nodes: Vec<ResourceNode>) -> Resource {
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

/// Builds a lookup table from (record, nameserver, result) triples.
pub fn lookup_table(entries: Vec<(&str, &str, DnsLookupResult)>) -> LookupMap {
    let mut map: LookupMap = Default::default();
    for (record, ns, result) in entries {
        map.entry(name(record))
            .or_default()
            .insert(nameserver(ns, false), result);
    }
    map
}

/// Successful single-address lookup with no warnings.
pub fn ok_lookup(record: &str, addrs: &[&str]) -> DnsLookupResult {
    DnsLookupResult::success(name(record), addr_set(addrs), BTreeSet::new())
}

/// Successful lookup that carries warning messages.
pub fn warn_lookup(record: &str, addrs: &[&str], warning: &str) -> DnsLookupResult {
    let mut warnings = BTreeSet::new();
    warnings.insert(warning.to_string());
    DnsLookupResult::success(name(record), addr_set(addrs), warnings)
}

/// A table where every (record, nameserver) pair gets the same addresses.
pub fn uniform_table(records: &[(&str, &[&str])], nameservers: &[&str]) -> LookupMap {
    let mut entries = Vec::new();
    let mut by_record: HashMap<&str, &[&str]> = HashMap::new();
    for (record, addrs) in records {
        by_record.insert(record, addrs);
    }
    for (record, addrs) in &by_record {
        for ns in nameservers {
            entries.push((*record, *ns, ok_lookup(record, addrs)));
        }
    }
    lookup_table(entries)
}
