use dnscoord_domain::DnsName;

/// Identity of the machine and user this process runs as, used to pick the
/// local node out of the configuration.
pub trait LocalIdentity: Send + Sync {
    fn hostname(&self) -> DnsName;

    fn username(&self) -> String;
}
