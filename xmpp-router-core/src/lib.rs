#![forbid(unsafe_code)]

pub mod acceptor;
pub mod acl;
pub mod component;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod filter;
pub mod handshake;
pub mod protocol;
pub mod rate;
pub mod route_table;
pub mod router;
pub mod security;
pub mod stanza;
pub mod write_path;

pub use acceptor::{AdmissionControl, Rejection};
pub use component::{Component, ComponentId, Outbound};
pub use config::{load_from_path, RouterConfig};
pub use error::{Result, RouterError};
pub use router::{ConnRateLimiter, RouterActor, RouterCommand, RouterHandle, RouterState};
