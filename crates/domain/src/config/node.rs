use serde::Deserialize;
use std::collections::BTreeMap;

/// One `[[node]]` table of the configuration file.
///
/// ```toml
/// [[node]]
/// id = "alpha"
/// display = "Alpha (fra1)"
/// hostname = "alpha.example.com"
/// username = "appsync"
///
/// [node.nameservers]
/// "ns1.example.com" = true    # strict TTL
/// "ns2.example.com" = false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    pub display: String,

    pub hostname: String,

    pub username: String,

    /// Nameserver hostname mapped to its strict-TTL flag.
    #[serde(default)]
    pub nameservers: BTreeMap<String, bool>,
}

fn default_enabled() -> bool {
    true
}
