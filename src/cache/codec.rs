//! Payload Codec Module
//!
//! Serializes cache payloads to JSON text and applies a reversible base64
//! encoding to payloads past a size threshold, mirroring how oversized values
//! were packaged upstream. The `encoded` flag travels with the payload so
//! reads know whether to unwrap it; round-trip fidelity is the contract.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Serialized payloads strictly larger than this are stored base64-encoded.
pub const ENCODE_THRESHOLD_BYTES: usize = 1024;

// == Encoded Value ==
/// A cache payload as actually stored.
#[derive(Debug, Clone)]
pub struct EncodedValue {
    /// JSON text, or base64 of the JSON text when `encoded`
    pub body: String,
    /// Whether `body` went through the size-threshold encoding
    pub encoded: bool,
    /// Serialized payload size before encoding, for reporting
    pub size_bytes: usize,
}

// == Encode ==
/// Packages a value for storage.
///
/// Returns `None` when the value cannot be serialized; the failure is logged
/// and the caller treats the write as a no-op.
pub fn encode<T: Serialize>(value: &T) -> Option<EncodedValue> {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            warn!(error = %err, "Failed to serialize cache payload");
            return None;
        }
    };

    let size_bytes = json.len();
    if size_bytes > ENCODE_THRESHOLD_BYTES {
        Some(EncodedValue {
            body: STANDARD.encode(json.as_bytes()),
            encoded: true,
            size_bytes,
        })
    } else {
        Some(EncodedValue {
            body: json,
            encoded: false,
            size_bytes,
        })
    }
}

// == Decode ==
/// Unpacks a stored payload back into a typed value.
///
/// Any failure (corrupt base64, invalid UTF-8, shape mismatch) is logged and
/// reported as `None`; the caller counts it as a miss.
pub fn decode<T: DeserializeOwned>(stored: &EncodedValue) -> Option<T> {
    let json = if stored.encoded {
        let bytes = match STANDARD.decode(&stored.body) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "Failed to unwrap encoded cache payload");
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "Encoded cache payload is not valid UTF-8");
                return None;
            }
        }
    } else {
        stored.body.clone()
    };

    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, "Failed to deserialize cache payload");
            None
        }
    }
}
