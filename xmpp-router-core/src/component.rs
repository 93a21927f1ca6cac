//! Per-connection component state.

use std::collections::{HashSet, VecDeque};
use std::net::SocketAddr;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::stanza::Stanza;

/// Components are keyed by their peer address, same as `router.components`
/// keyed by `ip:port` in the original implementation.
pub type ComponentId = SocketAddr;

/// A message handed to a component's writer task.
#[derive(Debug)]
pub enum Outbound {
    Stanza(Stanza),
    StreamError(String),
    Close,
}

pub struct Component {
    pub id: ComponentId,
    pub legacy: bool,
    pub stream_id: String,
    /// Local part of the authenticated identity, once auth succeeds.
    /// Legacy auth sets this to the literal string `"handshake"`.
    pub authenticated_as: Option<String>,
    /// The `to` a legacy stream opened with, auto-bound once it authenticates.
    pub legacy_requested_domain: Option<String>,
    pub routes: HashSet<String>,
    pub throttle_queue: Option<VecDeque<Stanza>>,
    pub last_activity: Instant,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Component {
    pub fn new(
        id: ComponentId,
        legacy: bool,
        stream_id: String,
        outbound: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        Self {
            id,
            legacy,
            stream_id,
            authenticated_as: None,
            legacy_requested_domain: None,
            routes: HashSet::new(),
            throttle_queue: None,
            last_activity: Instant::now(),
            outbound,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated_as.is_some()
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// If throttled, enqueue `stanza` and return `None`; otherwise hand it back
    /// to the caller for immediate delivery.
    pub fn enqueue_or_pass(&mut self, stanza: Stanza) -> Option<Stanza> {
        match &mut self.throttle_queue {
            Some(queue) => {
                queue.push_back(stanza);
                None
            }
            None => Some(stanza),
        }
    }

    /// Toggle throttling: start a queue if absent, otherwise drain and
    /// return its contents in order (and discard the queue).
    pub fn toggle_throttle(&mut self) -> Option<VecDeque<Stanza>> {
        match self.throttle_queue.take() {
            Some(queue) => Some(queue),
            None => {
                self.throttle_queue = Some(VecDeque::new());
                None
            }
        }
    }

    pub fn send(&self, msg: Outbound) {
        let _ = self.outbound.send(msg);
    }
}
