//! Cache Key Derivation Module
//!
//! Builds namespaced cache keys from arbitrary inputs. Plain strings are used
//! verbatim; everything else is reduced to canonical JSON and content-hashed,
//! so structurally equal inputs always land on the same key regardless of
//! field declaration order.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest. Enough to make accidental
/// collisions implausible while keeping keys readable in listings.
pub const KEY_HASH_LEN: usize = 16;

// == Cache Key ==
/// Derives a cache key of the form `prefix:suffix`.
///
/// A JSON string becomes the suffix directly. Any other shape (object,
/// array, number, bool, null) is serialized canonically and hashed with
/// SHA-256, keeping the first 16 hex characters.
///
/// Canonical here means serde_json's default object representation: map keys
/// are stored sorted, so two objects with the same fields in different order
/// serialize to the same text and therefore the same hash.
///
/// # Arguments
/// * `prefix` - Namespace for the key (e.g. "user", "txn")
/// * `data` - Identifying input
pub fn cache_key(prefix: &str, data: &Value) -> String {
    match data {
        Value::String(s) => format!("{}:{}", prefix, s),
        other => format!("{}:{}", prefix, hash_value(other)),
    }
}

// == Try Cache Key ==
/// Derives a cache key from any serializable input.
///
/// Returns `None` when the input cannot be represented as JSON (for example
/// a non-finite float); callers treat such inputs as uncacheable rather than
/// failing.
pub fn try_cache_key<T: Serialize>(prefix: &str, data: &T) -> Option<String> {
    let value = serde_json::to_value(data).ok()?;
    Some(cache_key(prefix, &value))
}

// == Hash Value ==
fn hash_value(value: &Value) -> String {
    let canonical = value.to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..KEY_HASH_LEN].to_string()
}
