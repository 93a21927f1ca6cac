use serde::Deserialize;

/// Token-bucket parameters shared by the byte-rate and connection-rate limiters.
///
/// `total = 0` means the limit is disabled (the connection-rate default).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    /// Capacity of the bucket (maximum burst).
    #[serde(default = "default_total")]
    pub total: u32,
    /// Window, in seconds, over which `total` refills.
    #[serde(default = "default_seconds")]
    pub seconds: u64,
    /// Milliseconds to wait before re-checking once exhausted.
    #[serde(default = "default_wait")]
    pub wait: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self { total: default_total(), seconds: default_seconds(), wait: default_wait() }
    }
}

fn default_total() -> u32 {
    0
}

fn default_seconds() -> u64 {
    1
}

fn default_wait() -> u64 {
    100
}
