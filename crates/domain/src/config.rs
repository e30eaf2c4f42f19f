mod logging;
mod node;
mod resource;
mod root;

pub use logging::LoggingConfig;
pub use node::NodeConfig;
pub use resource::{ResourceConfig, ResourceNodeConfig};
pub use root::ClusterConfig;
