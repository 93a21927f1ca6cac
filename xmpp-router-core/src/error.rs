use thiserror::Error;

/// Construction-time and I/O failures. Per-stanza routing failures are not
/// represented here: the dispatcher never propagates those as `Err`, it
/// bounces the offending stanza back to its sender instead.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("domain name error: {0}")]
    Domain(#[from] crate::domain::DomainError),
}

pub type Result<T> = std::result::Result<T, RouterError>;
