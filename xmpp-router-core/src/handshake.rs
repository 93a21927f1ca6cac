//! Legacy `jabber:component:accept` handshake: the component sends the
//! lowercase hex SHA-1 of `stream_id ++ secret` as the `handshake` element's
//! CDATA; a match authenticates the stream.

use sha1::{Digest, Sha1};

/// Compute the 40-character lowercase hex digest expected for `stream_id`.
pub fn expected_digest(stream_id: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(stream_id.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-effort comparison is unnecessary here: the digest is not a
/// secret itself, and the legacy protocol transmits it in the clear.
pub fn verify(stream_id: &str, secret: &str, presented: &str) -> bool {
    presented.len() == 40 && presented.eq_ignore_ascii_case(&expected_digest(stream_id, secret))
}
