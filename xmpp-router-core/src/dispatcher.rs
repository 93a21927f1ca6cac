//! The routing decision: unicast, broadcast, log-sink mirroring, filter,
//! bounce; plus advertisements and throttle toggling, which share the same
//! write path.

use crate::component::{ComponentId, Outbound};
use crate::domain::Jid;
use crate::router::RouterState;
use crate::stanza::{names, Stanza};
use crate::write_path;

enum RouteKind {
    Unicast,
    Broadcast,
    Unknown,
}

fn classify(route: &Stanza) -> RouteKind {
    match route.attr("type") {
        None => RouteKind::Unicast,
        Some("broadcast") => RouteKind::Broadcast,
        Some(_) => RouteKind::Unknown,
    }
}

/// Handle a `route` element received from `sender`.
pub fn handle_route(state: &mut RouterState, sender: ComponentId, route: Stanza) {
    if !is_authenticated(state, sender) {
        return; // pre-auth: dropped silently
    }
    if route.attr("error").is_some() {
        // loop prevention: never re-dispatch an already-bounced packet
        return;
    }
    match classify(&route) {
        RouteKind::Unicast => handle_unicast(state, sender, route),
        RouteKind::Broadcast => handle_broadcast(state, sender, route),
        RouteKind::Unknown => {}
    }
}

fn bounce(state: &mut RouterState, sender: ComponentId, mut route: Stanza, code: &str) {
    route.set_attr("error", code);
    if let Some(component) = state.components.get_mut(&sender) {
        write_path::write(component, route);
    }
}

fn owns_domain(state: &RouterState, id: ComponentId, domain: &str) -> bool {
    state.components.get(&id).map(|c| c.routes.contains(domain)).unwrap_or(false)
}

fn is_authenticated(state: &RouterState, id: ComponentId) -> bool {
    state.components.get(&id).map(|c| c.is_authenticated()).unwrap_or(false)
}

fn handle_unicast(state: &mut RouterState, sender: ComponentId, route: Stanza) {
    let to = route.attr("to").map(str::to_string);
    let from = route.attr("from").map(str::to_string);
    let (to_jid, from_jid) = match (to.as_deref().map(Jid::parse), from.as_deref().map(Jid::parse))
    {
        (Some(Ok(to)), Some(Ok(from))) => (to, from),
        _ => return bounce(state, sender, route, "400"),
    };

    if !owns_domain(state, sender, &from_jid.domain) {
        return bounce(state, sender, route, "401");
    }

    let target = match state.route_table.resolve(&to_jid.domain, &from_jid.domain) {
        Some(id) => id,
        None => return bounce(state, sender, route, "404"),
    };

    if state.route_table.has_log_sinks() {
        let sinks: Vec<ComponentId> = state.route_table.log_sink_ids().collect();
        for sink in sinks {
            let mut copy = route.clone();
            copy.set_attr("type", "log");
            if let Some(component) = state.components.get_mut(&sink) {
                write_path::write(component, copy);
            }
        }
    }

    if let Some(payload) = route.first_element() {
        if let Err(err) = state.filter.check(&to_jid.domain, &from_jid.domain, payload) {
            return bounce(state, sender, route, err.code());
        }
    }

    if let Some(component) = state.components.get_mut(&target) {
        write_path::write(component, route);
    }
}

fn handle_broadcast(state: &mut RouterState, sender: ComponentId, route: Stanza) {
    let from = match route.attr("from") {
        Some(from) => from.to_string(),
        None => return bounce(state, sender, route, "400"),
    };
    let from_jid = match Jid::parse(&from) {
        Ok(jid) => jid,
        Err(_) => return bounce(state, sender, route, "400"),
    };
    if !owns_domain(state, sender, &from_jid.domain) {
        return bounce(state, sender, route, "401");
    }

    // all live connections, not just bound routes: an unbound component
    // still observes broadcast traffic.
    let targets: Vec<ComponentId> =
        state.components.keys().copied().filter(|id| *id != sender).collect();
    for id in targets {
        let copy = route.clone();
        if let Some(component) = state.components.get_mut(&id) {
            write_path::write(component, copy);
        }
    }
}

/// Advertise (or deadvertise, if `unavailable`) `domain` to every non-legacy
/// component other than `src`.
pub fn advertise(state: &mut RouterState, domain: &str, src: ComponentId, unavailable: bool) {
    let targets: Vec<ComponentId> = state
        .components
        .iter()
        .filter(|(id, c)| **id != src && !c.legacy)
        .map(|(id, _)| *id)
        .collect();
    for id in targets {
        send_presence(state, id, domain, unavailable);
    }
}

/// Tell a newly bound non-legacy component about every domain already bound.
pub fn reverse_advertise(state: &mut RouterState, new_component: ComponentId) {
    if state.components.get(&new_component).map(|c| c.legacy).unwrap_or(true) {
        return;
    }
    let bound: Vec<(String, ComponentId)> =
        state.route_table.all_bound().map(|(d, id)| (d.to_string(), id)).collect();
    for (domain, owner) in bound {
        if owner == new_component {
            continue;
        }
        send_presence(state, new_component, &domain, false);
    }
}

fn send_presence(state: &mut RouterState, target: ComponentId, domain: &str, unavailable: bool) {
    let mut presence = Stanza::with_ns(names::PRESENCE, names::COMPONENT_NS);
    presence.set_attr("from", domain);
    if unavailable {
        presence.set_attr("type", "unavailable");
    }
    if let Some(component) = state.components.get_mut(&target) {
        write_path::write(component, presence);
    }
}

/// Toggle a component's throttle queue. The acknowledgement always bypasses
/// the queue; a just-detached queue is then drained in order.
pub fn handle_throttle(state: &mut RouterState, id: ComponentId, throttle_stanza: Stanza) {
    if !is_authenticated(state, id) {
        return; // pre-auth: dropped silently
    }
    let component = match state.components.get_mut(&id) {
        Some(c) => c,
        None => return,
    };
    let drained = component.toggle_throttle();
    write_path::write_bypass_queue(component, throttle_stanza);

    if let Some(queue) = drained {
        for stanza in queue {
            if let Some(component) = state.components.get_mut(&id) {
                write_path::write(component, stanza);
            }
        }
    }
}

/// Tear down a departing component: unbind everything it owned, notifying
/// peers, then drop its record. The throttle queue's remaining contents are
/// discarded, not bounced (see DESIGN.md).
pub fn teardown(state: &mut RouterState, id: ComponentId) {
    let owned: Vec<String> =
        match state.components.get(&id) { Some(c) => c.routes.iter().cloned().collect(), None => return };

    for domain in &owned {
        state.route_table.unbind(domain);
        advertise(state, domain, id, true);
    }

    if let Some(mut component) = state.components.remove(&id) {
        component.throttle_queue = None;
        let _ = component.send(Outbound::Close);
    }
}
