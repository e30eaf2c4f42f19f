//! dnscoord application layer: collaborator ports and the role-resolution
//! services that sit between raw DNS answers and the cluster machinery.
pub mod ports;
pub mod services;

pub use services::dns_lookup::{DnsLookup, TtlExpectation};
pub use services::role_resolver::{resolve_roles, ResolvedRoles};
