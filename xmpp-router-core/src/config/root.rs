use serde::Deserialize;
use std::net::SocketAddr;

use super::access::AccessConfig;
use super::acl::AclConfig;
use super::alias::AliasConfig;
use super::filter::FilterConfig;
use super::logging::LoggingConfig;
use super::rate::RateConfig;

/// Top-level router configuration, loaded from a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct RouterConfig {
    /// Address to accept component connections on.
    pub listen: SocketAddr,
    /// Shared secret enabling the legacy `jabber:component:accept` handshake.
    /// Absence disables legacy acceptance entirely.
    #[serde(default)]
    pub local_secret: Option<String>,
    /// Per-component read byte-rate limit. Absent disables byte metering.
    #[serde(default)]
    pub byte_rate: Option<RateConfig>,
    /// Per-IP connection acceptance rate limit. `total = 0` disables it.
    #[serde(default)]
    pub conn_rate: RateConfig,
    /// IP allow/deny list applied at accept time.
    #[serde(default)]
    pub access: AccessConfig,
    /// Domain aliases: binding `target` also binds each `name` that maps to it.
    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
    /// ACL rules gating bind, default-route claims, and log-sink registration.
    #[serde(default)]
    pub acl: AclConfig,
    /// Optional named stanza filter applied to unicast routing.
    #[serde(default)]
    pub filter: Option<FilterConfig>,
    /// Structured logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}
