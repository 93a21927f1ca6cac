//! Minimal JID/domain-name parsing.
//!
//! A full Unicode/stringprep-correct implementation is an external
//! collaborator; this gives the router just enough structure to extract the
//! domain part of a `to`/`from` attribute and validate a bound name.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("empty domain name")]
    Empty,
    #[error("domain name contains no label")]
    NoLabel,
    #[error("domain name contains an invalid character")]
    InvalidChar,
}

/// A parsed `local@domain/resource` address. Only `domain` is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jid {
    pub local: Option<String>,
    pub domain: String,
    pub resource: Option<String>,
}

impl Jid {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.is_empty() {
            return Err(DomainError::Empty);
        }

        let (rest, resource) = match s.split_once('/') {
            Some((rest, resource)) => (rest, Some(resource.to_string())),
            None => (s, None),
        };

        let (local, domain) = match rest.split_once('@') {
            Some((local, domain)) => (Some(local.to_string()), domain),
            None => (None, rest),
        };

        validate_domain(domain)?;
        Ok(Self { local, domain: domain.to_string(), resource })
    }
}

/// Validate a bare domain name: non-empty, dot-separated labels, no label
/// empty, no whitespace or `@`/`/` characters.
pub fn validate_domain(domain: &str) -> Result<(), DomainError> {
    if domain.is_empty() {
        return Err(DomainError::Empty);
    }
    let mut any_label = false;
    for label in domain.split('.') {
        if label.is_empty() {
            return Err(DomainError::NoLabel);
        }
        any_label = true;
        if label.chars().any(|c| c.is_whitespace() || c == '@' || c == '/') {
            return Err(DomainError::InvalidChar);
        }
    }
    if !any_label {
        return Err(DomainError::NoLabel);
    }
    Ok(())
}
