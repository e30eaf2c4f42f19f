use dnscoord_application::ports::LocalIdentity;
use dnscoord_domain::{ClusterError, DnsName};
use tracing::info;

/// Machine hostname and process user, detected once at startup. The pair
/// selects which configured node this process runs as.
pub struct SystemIdentity {
    hostname: DnsName,
    username: String,
}

impl SystemIdentity {
    pub fn detect() -> Result<Self, ClusterError> {
        let raw = hostname::get()
            .map_err(|e| ClusterError::Configuration(format!("cannot read hostname: {e}")))?;
        let hostname: DnsName = raw.to_string_lossy().parse()?;
        let username = current_username();
        info!(hostname = %hostname, username = %username, "detected local identity");
        Ok(Self { hostname, username })
    }

    /// Fixed identity, for wiring a process as a specific node.
    pub fn fixed(hostname: DnsName, username: impl Into<String>) -> Self {
        Self {
            hostname,
            username: username.into(),
        }
    }
}

impl LocalIdentity for SystemIdentity {
    fn hostname(&self) -> DnsName {
        self.hostname.clone()
    }

    fn username(&self) -> String {
        self.username.clone()
    }
}

fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| {
            // No login environment; fall back to the numeric uid.
            let uid = unsafe { libc::getuid() };
            format!("uid{uid}")
        })
}
