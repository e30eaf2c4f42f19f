use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to read {path}: {reason}")]
    ConfigFile { path: String, reason: String },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("Invalid DNS name: {0}")]
    InvalidDnsName(String),

    #[error("Invalid cron expression {expression:?}: {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("No synchronizer factory registered for resource type: {0}")]
    UnknownResourceKind(String),

    #[error("Synchronization failed: {0}")]
    Synchronize(String),
}
