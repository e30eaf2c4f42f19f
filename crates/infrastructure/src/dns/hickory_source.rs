use async_trait::async_trait;
use dashmap::DashMap;
use dnscoord_application::ports::{ARecord, QueryError, RecordSource};
use dnscoord_domain::{DnsName, Nameserver, DNS_CHECK_TIMEOUT};
use hickory_resolver::config::{
    LookupIpStrategy, NameServerConfig, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RData;
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::debug;

const DNS_PORT: u16 = 53;

/// A-record source backed by hickory-resolver, one resolver per nameserver.
///
/// Resolvers are created lazily and memoized by nameserver hostname. Each is
/// pinned to its nameserver over UDP with caching disabled and no search
/// path, so every pass observes the authoritative answer rather than a
/// cached one.
pub struct HickoryRecordSource {
    resolvers: DashMap<DnsName, Arc<TokioAsyncResolver>>,
}

impl HickoryRecordSource {
    pub fn new() -> Self {
        Self {
            resolvers: DashMap::new(),
        }
    }

    async fn resolver_for(
        &self,
        nameserver: &Nameserver,
    ) -> Result<Arc<TokioAsyncResolver>, QueryError> {
        if let Some(resolver) = self.resolvers.get(&nameserver.hostname) {
            return Ok(resolver.clone());
        }

        let address = resolve_nameserver_address(&nameserver.hostname).await?;
        debug!(
            nameserver = %nameserver.hostname,
            address = %address,
            "creating resolver"
        );

        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig {
            socket_addr: SocketAddr::new(address, DNS_PORT),
            protocol: Protocol::Udp,
            tls_dns_name: None,
            trust_negative_responses: false,
            bind_addr: None,
        });

        let mut opts = ResolverOpts::default();
        opts.timeout = DNS_CHECK_TIMEOUT;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = false;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;

        let resolver = Arc::new(TokioAsyncResolver::tokio(config, opts));
        Ok(self
            .resolvers
            .entry(nameserver.hostname.clone())
            .or_insert(resolver)
            .clone())
    }
}

impl Default for HickoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for HickoryRecordSource {
    async fn query_a(
        &self,
        name: &DnsName,
        nameserver: &Nameserver,
    ) -> Result<Vec<ARecord>, QueryError> {
        let resolver = self.resolver_for(nameserver).await?;
        match resolver.ipv4_lookup(name.as_fqdn()).await {
            Ok(lookup) => Ok(lookup
                .as_lookup()
                .record_iter()
                .filter_map(|record| match record.data() {
                    Some(RData::A(a)) => Some(ARecord::new(a.0, record.ttl())),
                    _ => None,
                })
                .collect()),
            Err(e) => Err(classify(e)),
        }
    }
}

/// A nameserver configured by IP is used directly; hostnames go through the
/// system resolver once, when the memoized resolver is first built.
async fn resolve_nameserver_address(hostname: &DnsName) -> Result<IpAddr, QueryError> {
    if let Ok(ip) = hostname.as_str().parse::<IpAddr>() {
        return Ok(ip);
    }
    let addrs = tokio::net::lookup_host((hostname.as_str(), DNS_PORT))
        .await
        .map_err(|e| QueryError::TryAgain(format!("resolving nameserver {hostname}: {e}")))?;
    addrs
        .map(|sa| sa.ip())
        .next()
        .ok_or_else(|| QueryError::Unrecoverable(format!("nameserver {hostname} has no address")))
}

fn classify(error: ResolveError) -> QueryError {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match response_code {
            ResponseCode::NXDomain => QueryError::HostNotFound,
            ResponseCode::NoError => QueryError::TypeNotFound,
            ResponseCode::ServFail => QueryError::TryAgain(error.to_string()),
            _ => QueryError::Unrecoverable(error.to_string()),
        },
        ResolveErrorKind::Timeout => QueryError::TryAgain(error.to_string()),
        ResolveErrorKind::Io(_) => QueryError::TryAgain(error.to_string()),
        ResolveErrorKind::Proto(_) => QueryError::Unrecoverable(error.to_string()),
        ResolveErrorKind::NoConnections => QueryError::Unrecoverable(error.to_string()),
        _ => QueryError::Other(error.to_string()),
    }
}
