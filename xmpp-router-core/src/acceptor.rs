//! Accept-time admission control: IP allow/deny list, then per-IP
//! connection-rate throttling. The actual listener and stream object are
//! external collaborators (see `xmpp-router::net`); this only answers
//! "should this peer be accepted".

use std::net::IpAddr;

use crate::config::{AccessConfig, RouterConfig};
use crate::router::ConnRateLimiter;
use crate::security::is_ip_allowed;

pub struct AdmissionControl {
    access: AccessConfig,
    conn_rate: ConnRateLimiter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AccessDenied,
    RateLimited,
}

impl AdmissionControl {
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            access: config.access.clone(),
            conn_rate: ConnRateLimiter::new(config.conn_rate.total, config.conn_rate.seconds),
        }
    }

    pub fn check(&self, ip: IpAddr) -> Result<(), Rejection> {
        if !is_ip_allowed(ip, &self.access) {
            return Err(Rejection::AccessDenied);
        }
        if !self.conn_rate.accept(ip) {
            return Err(Rejection::RateLimited);
        }
        Ok(())
    }
}
