use crate::errors::ClusterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated, lowercased DNS name without the trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DnsName(String);

impl DnsName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The absolute form handed to resolvers, so no search path applies.
    pub fn as_fqdn(&self) -> String {
        format!("{}.", self.0)
    }
}

impl FromStr for DnsName {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix('.').unwrap_or(s).to_ascii_lowercase();
        if name.is_empty() {
            return Err(ClusterError::InvalidDnsName("empty name".into()));
        }
        if name.len() > 253 {
            return Err(ClusterError::InvalidDnsName(format!(
                "{name}: exceeds 253 characters"
            )));
        }
        for label in name.split('.') {
            if label.is_empty() || label.len() > 63 {
                return Err(ClusterError::InvalidDnsName(format!(
                    "{name}: bad label {label:?}"
                )));
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(ClusterError::InvalidDnsName(format!(
                    "{name}: bad label {label:?}"
                )));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(ClusterError::InvalidDnsName(format!(
                    "{name}: bad label {label:?}"
                )));
            }
        }
        Ok(DnsName(name))
    }
}

impl TryFrom<String> for DnsName {
    type Error = ClusterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DnsName> for String {
    fn from(name: DnsName) -> Self {
        name.0
    }
}

impl fmt::Display for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
