use serde::Deserialize;

/// Reference to a named stanza filter applied during unicast routing.
///
/// The filter's own rule language is an external collaborator; the router
/// only needs the pass/reject contract described by `crate::filter::Filter`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub name: String,
}
