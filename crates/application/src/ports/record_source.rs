use async_trait::async_trait;
use dnscoord_domain::{DnsName, Nameserver};
use std::net::Ipv4Addr;
use thiserror::Error;

/// One A record as returned by a nameserver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ARecord {
    pub address: Ipv4Addr,
    pub ttl: u32,
}

impl ARecord {
    pub fn new(address: Ipv4Addr, ttl: u32) -> Self {
        Self { address, ttl }
    }
}

/// Failure of a single query attempt. Retry policy lives in `DnsLookup`;
/// only `TryAgain` is worth repeating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("host not found")]
    HostNotFound,

    #[error("host has no A records")]
    TypeNotFound,

    #[error("temporary failure: {0}")]
    TryAgain(String),

    #[error("unrecoverable failure: {0}")]
    Unrecoverable(String),

    #[error("lookup failed: {0}")]
    Other(String),
}

/// A single-shot A-record query against one specific nameserver, with no
/// caching and no search path.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn query_a(
        &self,
        name: &DnsName,
        nameserver: &Nameserver,
    ) -> Result<Vec<ARecord>, QueryError>;
}
