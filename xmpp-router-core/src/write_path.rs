//! The write path: enqueue-if-throttled, then legacy translation.
//!
//! Non-legacy components receive stanzas unchanged. Legacy components speak
//! `jabber:component:accept`: an outbound `route` envelope is unwrapped and
//! gets the client namespace, with error codes turned into stanza-level
//! `<error/>` elements; any other outbound stanza (handshake/bind/unbind
//! acks) goes out unchanged, still in the component namespace. Inbound is
//! the mirror for payload traffic: strip the client namespace and wrap into
//! a `route` envelope with `to`/`from` copied from the inner stanza.

use crate::component::{Component, Outbound};
use crate::stanza::{names, Stanza};

const STANZA_ERROR_NS: &str = "urn:ietf:params:xml:ns:xmpp-stanzas";

/// Deliver `stanza` to `component`, respecting its throttle queue and legacy
/// translation.
pub fn write(component: &mut Component, stanza: Stanza) {
    if let Some(stanza) = component.enqueue_or_pass(stanza) {
        send_now(component, stanza);
    }
}

/// Deliver `stanza` immediately, bypassing the throttle queue. Used for the
/// `throttle` acknowledgement itself, which is never queued behind its own toggle.
pub fn write_bypass_queue(component: &Component, stanza: Stanza) {
    send_now(component, stanza);
}

fn send_now(component: &Component, stanza: Stanza) {
    let out = if component.legacy { translate_outbound_legacy(stanza) } else { stanza };
    component.send(Outbound::Stanza(out));
}

fn translate_outbound_legacy(stanza: Stanza) -> Stanza {
    // Only `route` envelopes get unwrapped onto the client namespace. Control
    // acks (handshake/bind/unbind) go out unchanged, still in the component
    // namespace, same as the original write path that bypasses translation
    // for them entirely.
    if stanza.name != names::ROUTE {
        return stanza;
    }

    let error_code = stanza.attr("error").map(|s| s.to_string());
    match stanza.first_element() {
        Some(payload) => {
            let mut payload = payload.clone();
            payload.namespace = Some(names::CLIENT_NS.to_string());
            if let Some(code) = error_code {
                payload.push_element(stanza_error_element(&code));
            }
            payload
        }
        None => stanza,
    }
}

fn stanza_error_element(code: &str) -> Stanza {
    let condition = if code == "400" { "bad-request" } else { "service-unavailable" };
    let mut err = Stanza::new("error");
    err.set_attr("type", "cancel");
    err.push_element(Stanza::with_ns(condition, STANZA_ERROR_NS));
    err
}

/// Wrap a stanza received from a legacy component into a `route` envelope.
pub fn translate_inbound_legacy(mut payload: Stanza) -> Stanza {
    let to = payload.attr("to").map(|s| s.to_string());
    let from = payload.attr("from").map(|s| s.to_string());
    payload.namespace = None;

    let mut route = Stanza::with_ns(names::ROUTE, names::COMPONENT_NS);
    if let Some(to) = to {
        route.set_attr("to", to);
    }
    if let Some(from) = from {
        route.set_attr("from", from);
    }
    route.push_element(payload);
    route
}
