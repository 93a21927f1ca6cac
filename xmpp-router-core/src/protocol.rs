//! Control-stanza handling: handshake, bind, unbind, and the legacy
//! auto-bind performed once a legacy stream's handshake succeeds.

use crate::acl::{Acl, Action};
use crate::component::{Component, ComponentId};
use crate::dispatcher;
use crate::domain::validate_domain;
use crate::handshake;
use crate::router::RouterState;
use crate::stanza::{Node, Stanza};
use crate::write_path;

pub enum HandshakeOutcome {
    Authenticated,
    Mismatch,
}

/// Process a `handshake` element on a legacy stream.
pub fn handle_handshake(
    state: &mut RouterState,
    id: ComponentId,
    mut handshake_el: Stanza,
) -> HandshakeOutcome {
    let secret = match state.local_secret.clone() {
        Some(secret) => secret,
        None => return HandshakeOutcome::Mismatch,
    };
    let component = match state.components.get_mut(&id) {
        Some(c) => c,
        None => return HandshakeOutcome::Mismatch,
    };

    let presented = handshake_el.cdata();
    if !handshake::verify(&component.stream_id, &secret, &presented) {
        return HandshakeOutcome::Mismatch;
    }

    handshake_el.clear_cdata();
    component.authenticated_as = Some("handshake".to_string());
    write_path::write(component, handshake_el);
    HandshakeOutcome::Authenticated
}

pub enum LegacyBindOutcome {
    Bound,
    /// Stream-level `host-unknown`: conflicts with an already-bound name or
    /// alias. Kept distinct from the `409` a modern `bind` conflict gets.
    HostUnknown,
}

/// Auto-bind a legacy component's requested `to` domain once it authenticates.
/// Legacy components receive no reverse advertisement.
pub fn auto_bind_legacy(state: &mut RouterState, id: ComponentId, name: &str) -> LegacyBindOutcome {
    if validate_domain(name).is_err()
        || state.route_table.is_bound(name)
        || state.route_table.is_alias_name(name)
    {
        return LegacyBindOutcome::HostUnknown;
    }

    bind_and_advertise(state, id, name, false, false);
    let aliases: Vec<String> = state.route_table.aliases_of(name).map(String::from).collect();
    for alias in aliases {
        bind_and_advertise(state, id, &alias, false, false);
    }
    LegacyBindOutcome::Bound
}

fn has_child(stanza: &Stanza, name: &str) -> bool {
    stanza.children().iter().any(|c| matches!(c, Node::Element(e) if e.name == name))
}

/// Process an explicit `bind` stanza per the six ordered validation rules.
pub fn handle_bind(state: &mut RouterState, id: ComponentId, mut bind_el: Stanza) {
    if !state.components.get(&id).map(Component::is_authenticated).unwrap_or(false) {
        return; // pre-auth: dropped silently
    }
    let name = bind_el.attr("name").unwrap_or_default().to_string();
    let wants_default = has_child(&bind_el, "default");
    let wants_log = has_child(&bind_el, "log");
    let user = state.components.get(&id).and_then(|c| c.authenticated_as.clone()).unwrap_or_default();
    let acl = Acl::new(&state.acl);

    let error: Option<&'static str> = if validate_domain(&name).is_err() {
        Some("400")
    } else if user != name && !acl.permits(Action::Bind, &user) {
        Some("403")
    } else if state.route_table.is_bound(&name) {
        Some("409")
    } else if state.route_table.is_alias_name(&name) {
        Some("409")
    } else if wants_default && !acl.permits(Action::DefaultRoute, &user) {
        Some("403")
    } else if wants_default && state.route_table.default_route().is_some() {
        Some("409")
    } else if wants_log && !acl.permits(Action::Log, &user) {
        Some("403")
    } else {
        None
    };

    if let Some(code) = error {
        bind_el.set_attr("error", code);
        if let Some(component) = state.components.get_mut(&id) {
            write_path::write(component, bind_el);
        }
        return;
    }

    bind_el.set_attr("name", "");
    if let Some(component) = state.components.get_mut(&id) {
        write_path::write(component, bind_el);
    }

    bind_and_advertise(state, id, &name, wants_default, wants_log);
    dispatcher::reverse_advertise(state, id);

    let aliases: Vec<String> = state.route_table.aliases_of(&name).map(String::from).collect();
    for alias in aliases {
        bind_and_advertise(state, id, &alias, false, false);
    }
}

fn bind_and_advertise(
    state: &mut RouterState,
    id: ComponentId,
    name: &str,
    as_default: bool,
    as_log: bool,
) {
    state.route_table.bind(name, id, as_default, as_log);
    if let Some(component) = state.components.get_mut(&id) {
        component.routes.insert(name.to_string());
    }
    dispatcher::advertise(state, name, id, false);
}

/// Process an `unbind` stanza.
pub fn handle_unbind(state: &mut RouterState, id: ComponentId, mut unbind_el: Stanza) {
    if !state.components.get(&id).map(Component::is_authenticated).unwrap_or(false) {
        return; // pre-auth: dropped silently
    }
    let name = unbind_el.attr("name").unwrap_or_default().to_string();

    let error: Option<&'static str> = if validate_domain(&name).is_err() {
        Some("400")
    } else if !state.components.get(&id).map(|c| c.routes.contains(&name)).unwrap_or(false) {
        Some("404")
    } else {
        None
    };

    if let Some(code) = error {
        unbind_el.set_attr("error", code);
        if let Some(component) = state.components.get_mut(&id) {
            write_path::write(component, unbind_el);
        }
        return;
    }

    state.route_table.unbind(&name);
    if let Some(component) = state.components.get_mut(&id) {
        component.routes.remove(&name);
    }

    unbind_el.set_attr("name", "");
    if let Some(component) = state.components.get_mut(&id) {
        write_path::write(component, unbind_el);
    }
    dispatcher::advertise(state, &name, id, true);
}
