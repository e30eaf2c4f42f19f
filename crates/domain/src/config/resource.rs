use serde::Deserialize;

/// One `[[resource]]` table of the configuration file.
///
/// A resource with both schedules is cron-synchronized; a resource with
/// neither is monitored only. Declaring just one of the two is rejected.
///
/// ```toml
/// [[resource]]
/// id = "imap"
/// display = "IMAP spools"
/// type = "rsync"
/// master_records = ["mail.example.com"]
/// master_records_ttl = 300
/// synchronize_schedule = "*/15 * * * *"
/// test_schedule = "45 3 * * *"
///
/// [[resource.node]]
/// node_id = "alpha"
/// node_records = ["mail-alpha.example.com"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    pub id: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    pub display: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub master_records: Vec<String>,

    #[serde(default = "default_master_records_ttl")]
    pub master_records_ttl: u32,

    #[serde(default)]
    pub allow_multi_master: bool,

    #[serde(default)]
    pub synchronize_schedule: Option<String>,

    #[serde(default)]
    pub test_schedule: Option<String>,

    /// Seconds a synchronize run may take before it is recorded as an error.
    #[serde(default = "default_synchronize_timeout")]
    pub synchronize_timeout: u64,

    /// Seconds a test run may take before it is recorded as an error.
    #[serde(default = "default_test_timeout")]
    pub test_timeout: u64,

    #[serde(default, rename = "node")]
    pub nodes: Vec<ResourceNodeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceNodeConfig {
    pub node_id: String,

    pub node_records: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_master_records_ttl() -> u32 {
    300
}

fn default_synchronize_timeout() -> u64 {
    3600
}

fn default_test_timeout() -> u64 {
    1200
}
