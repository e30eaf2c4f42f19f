use crate::ports::{ARecord, QueryError, RecordSource};
use dnscoord_domain::{DnsLookupResult, DnsLookupStatus, DnsName, Nameserver, DNS_ATTEMPTS};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// TTL bounds checked on master-record lookups. Node records carry no TTL
/// expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlExpectation {
    pub ttl: u32,
}

impl TtlExpectation {
    pub fn new(ttl: u32) -> Self {
        Self { ttl }
    }

    fn check(&self, strict: bool, record: &ARecord, name: &DnsName, warnings: &mut BTreeSet<String>) {
        let ok = if strict {
            record.ttl == self.ttl
        } else {
            record.ttl > 0 && record.ttl <= self.ttl
        };
        if !ok {
            warnings.insert(format!(
                "unexpected TTL for {name} -> {addr}: expected {expected}, got {actual}",
                addr = record.address,
                expected = self.ttl,
                actual = record.ttl,
            ));
        }
    }
}

/// Classifying wrapper over the raw record source: retries try-again
/// outcomes up to `DNS_ATTEMPTS`, applies the master-record TTL rule, and
/// folds every outcome into an immutable `DnsLookupResult`.
#[derive(Clone)]
pub struct DnsLookup {
    source: Arc<dyn RecordSource>,
}

impl DnsLookup {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub async fn lookup(
        &self,
        name: &DnsName,
        nameserver: &Nameserver,
        ttl: Option<TtlExpectation>,
    ) -> DnsLookupResult {
        let mut outcome = self.source.query_a(name, nameserver).await;
        let mut attempt = 1;
        while attempt < DNS_ATTEMPTS && matches!(outcome, Err(QueryError::TryAgain(_))) {
            debug!(
                name = %name,
                nameserver = %nameserver.hostname,
                attempt,
                "retrying transient lookup failure"
            );
            outcome = self.source.query_a(name, nameserver).await;
            attempt += 1;
        }

        match outcome {
            Ok(records) if records.is_empty() => DnsLookupResult::failure(
                name.clone(),
                DnsLookupStatus::HostNotFound,
                "empty answer",
            ),
            Ok(records) => {
                let mut warnings = BTreeSet::new();
                if let Some(expectation) = ttl {
                    for record in &records {
                        expectation.check(nameserver.strict_ttl, record, name, &mut warnings);
                    }
                }
                let addresses = records.iter().map(|r| r.address).collect();
                DnsLookupResult::success(name.clone(), addresses, warnings)
            }
            Err(QueryError::HostNotFound) => DnsLookupResult::failure(
                name.clone(),
                DnsLookupStatus::HostNotFound,
                QueryError::HostNotFound.to_string(),
            ),
            Err(QueryError::TypeNotFound) => DnsLookupResult::failure(
                name.clone(),
                DnsLookupStatus::TypeNotFound,
                QueryError::TypeNotFound.to_string(),
            ),
            Err(e @ QueryError::TryAgain(_)) => {
                DnsLookupResult::failure(name.clone(), DnsLookupStatus::TryAgain, e.to_string())
            }
            Err(e @ QueryError::Unrecoverable(_)) => DnsLookupResult::failure(
                name.clone(),
                DnsLookupStatus::Unrecoverable,
                e.to_string(),
            ),
            Err(e @ QueryError::Other(_)) => {
                DnsLookupResult::failure(name.clone(), DnsLookupStatus::Error, e.to_string())
            }
        }
    }
}
