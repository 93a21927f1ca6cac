mod access;
mod acl;
mod alias;
mod filter;
mod loader;
mod logging;
mod rate;
mod root;

pub use access::{AccessConfig, AccessMode};
pub use acl::AclConfig;
pub use alias::AliasConfig;
pub use filter::FilterConfig;
pub use loader::load_from_path;
pub use logging::LoggingConfig;
pub use rate::RateConfig;
pub use root::RouterConfig;
