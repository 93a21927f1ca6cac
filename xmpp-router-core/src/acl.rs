//! ACL evaluation: `permits(action, user)` over the configured allow-lists.
//!
//! A full rule grammar (groups, wildcards, negation) is an external
//! collaborator; this covers the boolean contract the dispatcher and
//! protocol handler actually need.

use crate::config::AclConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Bind,
    DefaultRoute,
    Log,
}

pub struct Acl<'a> {
    config: &'a AclConfig,
}

impl<'a> Acl<'a> {
    pub fn new(config: &'a AclConfig) -> Self {
        Self { config }
    }

    /// Is `user` (the authenticated identity's local part) permitted to perform `action`?
    pub fn permits(&self, action: Action, user: &str) -> bool {
        let list = match action {
            Action::Bind => &self.config.bind,
            Action::DefaultRoute => &self.config.default_route,
            Action::Log => &self.config.log,
        };
        list.iter().any(|allowed| allowed == user)
    }
}
