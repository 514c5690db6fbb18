//! Cache Module
//!
//! In-process application caching: TTL key/value storage, usage statistics,
//! content-hashed key derivation, threshold payload encoding and the
//! high-level facade tying them together.

mod codec;
mod entry;
mod facade;
mod keys;
mod stats;
mod store;


// Re-export public types
pub use codec::{decode, encode, EncodedValue, ENCODE_THRESHOLD_BYTES};
pub use entry::{current_timestamp_ms, TimedEntry};
pub use facade::{AdvancedCache, CacheReport, DEFAULT_TTL, SESSION_TTL};
pub use keys::{cache_key, try_cache_key, KEY_HASH_LEN};
pub use stats::{StatsRecorder, StatsSnapshot};
pub use store::TimedKeyStore;
