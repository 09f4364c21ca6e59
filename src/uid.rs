//! Per-request tokens and client identifiers
//!
//! Every standard control request carries the client's opaque `uniqueid` plus
//! a freshly generated `uuid` token, so the host can tell successive requests
//! apart.

use rand::Rng;
use uuid::Uuid;

/// Generate a fresh RFC-4122 v4 request token (hyphenated lowercase hex).
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a client unique id: 16 lowercase hex characters.
///
/// Clients are expected to pick one id and keep it for the lifetime of their
/// pairing with a host; [`crate::ClientBuilder`] calls this when no id is
/// supplied.
pub fn generate_unique_id() -> String {
    let value: u64 = rand::rng().random();
    format!("{value:016x}")
}
