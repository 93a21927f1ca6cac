//! Stanza filter seam.
//!
//! The filter's own rule language (what it matches on, where its rules come
//! from) is an external collaborator; the dispatcher only needs the
//! pass/reject contract below.

use crate::stanza::Stanza;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    BadRequest,
    ServiceUnavailable,
}

impl FilterError {
    pub fn code(self) -> &'static str {
        match self {
            FilterError::BadRequest => "400",
            FilterError::ServiceUnavailable => "503",
        }
    }
}

pub trait Filter: Send + Sync {
    /// Inspect a unicast `route` payload. `Ok(())` lets it through.
    fn check(&self, to: &str, from: &str, payload: &Stanza) -> Result<(), FilterError>;
}

/// A filter that lets everything through, used when no `[filter]` is configured.
pub struct PassThrough;

impl Filter for PassThrough {
    fn check(&self, _to: &str, _from: &str, _payload: &Stanza) -> Result<(), FilterError> {
        Ok(())
    }
}
