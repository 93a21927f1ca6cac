//! The router actor: the single task that owns the route table and every
//! component record. Everything else talks to it through `RouterHandle`
//! over an mpsc channel, so state mutation is always serialized onto one
//! task even though the surrounding runtime is multi-threaded.

use std::net::IpAddr;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::component::{Component, ComponentId, Outbound};
use crate::config::{AclConfig, RouterConfig};
use crate::dispatcher;
use crate::filter::{Filter, PassThrough};
use crate::protocol::{self, HandshakeOutcome, LegacyBindOutcome};
use crate::rate::TokenBucket;
use crate::route_table::RouteTable;
use crate::stanza::Stanza;

pub struct RouterState {
    pub route_table: RouteTable,
    pub components: std::collections::HashMap<ComponentId, Component>,
    pub acl: AclConfig,
    pub local_secret: Option<String>,
    pub filter: Box<dyn Filter>,
}

impl RouterState {
    pub fn new(config: &RouterConfig) -> Self {
        if let Some(named) = &config.filter {
            warn!(filter = %named.name, "named filter module not linked in, passing all stanzas");
        }
        let filter: Box<dyn Filter> = Box::new(PassThrough);
        Self {
            route_table: RouteTable::new(config.aliases.clone()),
            components: std::collections::HashMap::new(),
            acl: config.acl.clone(),
            local_secret: config.local_secret.clone(),
            filter,
        }
    }
}

/// Messages accepted by the router actor. Everything that mutates routing
/// state, or needs a consistent view of it, goes through here.
pub enum RouterCommand {
    Register {
        id: ComponentId,
        legacy: bool,
        stream_id: String,
        legacy_requested_domain: Option<String>,
        outbound: mpsc::UnboundedSender<Outbound>,
    },
    Handshake {
        id: ComponentId,
        stanza: Stanza,
    },
    Bind {
        id: ComponentId,
        stanza: Stanza,
    },
    Unbind {
        id: ComponentId,
        stanza: Stanza,
    },
    Route {
        id: ComponentId,
        stanza: Stanza,
    },
    Throttle {
        id: ComponentId,
        stanza: Stanza,
    },
    Closed {
        id: ComponentId,
    },
}

#[derive(Clone)]
pub struct RouterHandle {
    tx: mpsc::UnboundedSender<RouterCommand>,
}

impl RouterHandle {
    pub fn send(&self, cmd: RouterCommand) {
        let _ = self.tx.send(cmd);
    }
}

pub struct RouterActor {
    state: RouterState,
    rx: mpsc::UnboundedReceiver<RouterCommand>,
}

impl RouterActor {
    pub fn new(config: &RouterConfig) -> (Self, RouterHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { state: RouterState::new(config), rx }, RouterHandle { tx })
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            self.handle(cmd);
        }
    }

    fn handle(&mut self, cmd: RouterCommand) {
        match cmd {
            RouterCommand::Register { id, legacy, stream_id, legacy_requested_domain, outbound } => {
                let mut component = Component::new(id, legacy, stream_id, outbound);
                component.legacy_requested_domain = legacy_requested_domain;
                if !legacy {
                    // Modern streams authenticate via an external SASL layer
                    // that runs before the router ever sees the connection;
                    // by the time `Register` arrives the component is
                    // already vetted, so there is no pre-auth state to model
                    // here. Legacy streams only authenticate on a
                    // successful `handshake`.
                    component.authenticated_as = Some(String::new());
                }
                self.state.components.insert(id, component);
                info!(%id, legacy, "component connected");
            }
            RouterCommand::Handshake { id, stanza } => self.handle_handshake(id, stanza),
            RouterCommand::Bind { id, stanza } => protocol::handle_bind(&mut self.state, id, stanza),
            RouterCommand::Unbind { id, stanza } => {
                protocol::handle_unbind(&mut self.state, id, stanza)
            }
            RouterCommand::Route { id, stanza } => dispatcher::handle_route(&mut self.state, id, stanza),
            RouterCommand::Throttle { id, stanza } => {
                dispatcher::handle_throttle(&mut self.state, id, stanza)
            }
            RouterCommand::Closed { id } => {
                info!(%id, "component disconnected");
                dispatcher::teardown(&mut self.state, id);
            }
        }
    }

    fn handle_handshake(&mut self, id: ComponentId, stanza: Stanza) {
        match protocol::handle_handshake(&mut self.state, id, stanza) {
            HandshakeOutcome::Mismatch => {
                warn!(%id, "handshake failed");
                if let Some(component) = self.state.components.get(&id) {
                    component.send(Outbound::StreamError("not-authorized".into()));
                    component.send(Outbound::Close);
                }
            }
            HandshakeOutcome::Authenticated => {
                let requested = self
                    .state
                    .components
                    .get(&id)
                    .and_then(|c| c.legacy_requested_domain.clone());
                if let Some(domain) = requested {
                    match protocol::auto_bind_legacy(&mut self.state, id, &domain) {
                        LegacyBindOutcome::Bound => info!(%id, %domain, "legacy auto-bind"),
                        LegacyBindOutcome::HostUnknown => {
                            warn!(%id, %domain, "legacy auto-bind conflict");
                            if let Some(component) = self.state.components.get(&id) {
                                component.send(Outbound::StreamError("host-unknown".into()));
                                component.send(Outbound::Close);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Per-IP connection-acceptance throttle. `total = 0` disables it.
pub struct ConnRateLimiter {
    bucket: Option<TokenBucket>,
}

impl ConnRateLimiter {
    pub fn new(total: u32, seconds: u64) -> Self {
        let bucket = (total != 0).then(|| TokenBucket::new(total, Duration::from_secs(seconds)));
        Self { bucket }
    }

    pub fn accept(&self, ip: IpAddr) -> bool {
        match &self.bucket {
            None => true,
            Some(bucket) => {
                if bucket.check(&ip, 1) {
                    bucket.add(&ip, 1);
                    true
                } else {
                    false
                }
            }
        }
    }
}
