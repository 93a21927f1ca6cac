use serde::Deserialize;

/// Access-control rules, one allow-list of authenticated local-parts per action.
///
/// An empty list denies the action to everyone (bind has its own bypass when
/// the authenticated user's local part equals the domain being bound; see
/// `crate::acl`).
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AclConfig {
    #[serde(default)]
    pub bind: Vec<String>,
    #[serde(default)]
    pub default_route: Vec<String>,
    #[serde(default)]
    pub log: Vec<String>,
}
