mod builders;
mod listeners;
mod mocks;

pub use builders::*;
pub use listeners::{CollectingDnsListener, CollectingSyncListener};
pub use mocks::{
    MockConfigurationSource, MockRecordSource, MockSynchronizer, MockSynchronizerFactory,
    StaticIdentity,
};
