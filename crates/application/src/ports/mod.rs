mod configuration;
mod identity;
mod listeners;
mod record_source;
mod synchronizer;

pub use configuration::ConfigurationSource;
pub use identity::LocalIdentity;
pub use listeners::{ResourceDnsListener, ResourceSynchronizationListener};
pub use record_source::{ARecord, QueryError, RecordSource};
pub use synchronizer::{ResourceSynchronizer, SynchronizerFactory};
