use super::logging::LoggingConfig;
use super::node::NodeConfig;
use super::resource::ResourceConfig;
use crate::errors::ClusterError;
use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClusterConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub display: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeConfig>,

    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
}

impl ClusterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClusterError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ClusterError::ConfigFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: ClusterConfig =
            toml::from_str(&contents).map_err(|e| ClusterError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks that do not need the built model: unique ids,
    /// resolvable node references, paired schedules, sane timeouts. The
    /// deeper record-disjointness checks run when the cluster builds.
    pub fn validate(&self) -> Result<(), ClusterError> {
        let mut node_ids = BTreeSet::new();
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(ClusterError::Configuration("node with empty id".into()));
            }
            if !node_ids.insert(node.id.as_str()) {
                return Err(ClusterError::Configuration(format!(
                    "duplicate node id: {}",
                    node.id
                )));
            }
        }

        let mut resource_ids = BTreeSet::new();
        for resource in &self.resources {
            if resource.id.is_empty() {
                return Err(ClusterError::Configuration("resource with empty id".into()));
            }
            if !resource_ids.insert(resource.id.as_str()) {
                return Err(ClusterError::Configuration(format!(
                    "duplicate resource id: {}",
                    resource.id
                )));
            }
            if resource.kind.is_empty() {
                return Err(ClusterError::Configuration(format!(
                    "resource {} has an empty type",
                    resource.id
                )));
            }
            if resource.master_records.is_empty() {
                return Err(ClusterError::Configuration(format!(
                    "resource {} declares no master records",
                    resource.id
                )));
            }
            if resource.master_records_ttl == 0 {
                return Err(ClusterError::Configuration(format!(
                    "resource {} has master_records_ttl = 0",
                    resource.id
                )));
            }
            if resource.synchronize_schedule.is_some() != resource.test_schedule.is_some() {
                return Err(ClusterError::Configuration(format!(
                    "resource {} must declare both synchronize_schedule and test_schedule or neither",
                    resource.id
                )));
            }
            if resource.synchronize_timeout == 0 || resource.test_timeout == 0 {
                return Err(ClusterError::Configuration(format!(
                    "resource {} has a zero timeout",
                    resource.id
                )));
            }
            if resource.nodes.is_empty() {
                return Err(ClusterError::Configuration(format!(
                    "resource {} has no participating nodes",
                    resource.id
                )));
            }
            let mut seen_nodes = BTreeSet::new();
            for rn in &resource.nodes {
                if !node_ids.contains(rn.node_id.as_str()) {
                    return Err(ClusterError::Configuration(format!(
                        "resource {} references unknown node {}",
                        resource.id, rn.node_id
                    )));
                }
                if !seen_nodes.insert(rn.node_id.as_str()) {
                    return Err(ClusterError::Configuration(format!(
                        "resource {} lists node {} twice",
                        resource.id, rn.node_id
                    )));
                }
                if rn.node_records.is_empty() {
                    return Err(ClusterError::Configuration(format!(
                        "resource {} node {} declares no node records",
                        resource.id, rn.node_id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
