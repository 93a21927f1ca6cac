//! The domain -> component routing table, plus its side indexes.
//!
//! Invariants (enforced by callers via `protocol`/`dispatcher`, not by this
//! type alone): a domain appears here iff it appears in exactly one
//! component's owned-routes set; `log_sinks` is always a subset of `routes`
//! by key; `default_route`, when set, need not resolve.

use std::collections::{HashMap, HashSet};

use crate::component::ComponentId;
use crate::config::AliasConfig;

pub struct RouteTable {
    routes: HashMap<String, ComponentId>,
    log_sinks: HashSet<String>,
    aliases: Vec<AliasConfig>,
    default_route: Option<String>,
}

impl RouteTable {
    pub fn new(aliases: Vec<AliasConfig>) -> Self {
        Self { routes: HashMap::new(), log_sinks: HashSet::new(), aliases, default_route: None }
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn is_alias_name(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| a.name == name)
    }

    pub fn owner(&self, domain: &str) -> Option<ComponentId> {
        self.routes.get(domain).copied()
    }

    pub fn default_route(&self) -> Option<&str> {
        self.default_route.as_deref()
    }

    pub fn is_log_sink(&self, domain: &str) -> bool {
        self.log_sinks.contains(domain)
    }

    pub fn log_sink_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.log_sinks.iter().filter_map(move |name| self.routes.get(name).copied())
    }

    pub fn has_log_sinks(&self) -> bool {
        !self.log_sinks.is_empty()
    }

    /// Alias names that currently target `target`.
    pub fn aliases_of<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a str> {
        self.aliases.iter().filter(move |a| a.target == target).map(|a| a.name.as_str())
    }

    /// Resolve `domain` to an owning component, falling back to the default
    /// route if `domain` is unbound. Never falls back a message to the
    /// default route component if it was the sender itself (`from_domain`) —
    /// that would loop the message straight back where it came from.
    pub fn resolve(&self, domain: &str, from_domain: &str) -> Option<ComponentId> {
        if let Some(owner) = self.routes.get(domain) {
            return Some(*owner);
        }
        let default = self.default_route.as_deref()?;
        if default == from_domain {
            return None;
        }
        self.routes.get(default).copied()
    }

    pub fn bind(&mut self, name: &str, owner: ComponentId, as_default: bool, as_log: bool) {
        self.routes.insert(name.to_string(), owner);
        if as_default {
            self.default_route = Some(name.to_string());
        }
        if as_log {
            self.log_sinks.insert(name.to_string());
        }
    }

    /// Remove `name` from the route table and its side indexes.
    pub fn unbind(&mut self, name: &str) {
        self.routes.remove(name);
        self.log_sinks.remove(name);
        if self.default_route.as_deref() == Some(name) {
            self.default_route = None;
        }
    }

    pub fn all_bound(&self) -> impl Iterator<Item = (&str, ComponentId)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
