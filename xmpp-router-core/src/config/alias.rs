use serde::Deserialize;

/// A single alias entry: binding `target` also binds `name` to the same component.
///
/// Alias names are reserved; a component may never bind one directly.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AliasConfig {
    pub name: String,
    pub target: String,
}
