mod identity;

pub use identity::SystemIdentity;
