//! dnscoord infrastructure layer: hickory-backed DNS queries, system
//! identity, and the polling TOML configuration source.
pub mod config;
pub mod dns;
pub mod system;

pub use config::TomlConfigurationSource;
pub use dns::HickoryRecordSource;
pub use system::SystemIdentity;
