use ipnet::IpNet;
use serde::Deserialize;

/// IP filtering mode applied at accept time.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// No filtering: every IP is accepted.
    #[default]
    Disabled,
    /// Only IPs matching `allowlist` are accepted.
    Allowlist,
    /// IPs matching `denylist` are rejected, everything else accepted.
    Denylist,
}

/// Access-control configuration for the connection acceptor.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccessConfig {
    #[serde(default)]
    pub mode: AccessMode,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_ip_networks")]
    pub allowlist: Vec<IpNet>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_ip_networks")]
    pub denylist: Vec<IpNet>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self { mode: AccessMode::Disabled, allowlist: vec![], denylist: vec![] }
    }
}

fn deserialize_ip_networks<'de, D>(deserializer: D) -> Result<Vec<IpNet>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let strings: Vec<String> = Vec::deserialize(deserializer)?;
    let mut networks = Vec::new();
    for s in strings {
        match s.parse::<IpNet>() {
            Ok(net) => networks.push(net),
            Err(e) => {
                return Err(serde::de::Error::custom(format!("invalid IP network '{}': {}", s, e)));
            }
        }
    }
    Ok(networks)
}
