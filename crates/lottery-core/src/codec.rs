//! Obfuscated JSON encoding for persisted assignments and claim tokens
//!
//! Values are serialized to JSON, XOR-ed with a fixed key and base64 encoded.
//! This keeps the draw from being read at a glance in a file listing or a
//! cookie inspector. It is not encryption: anyone with this source can
//! reverse it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::assignment::Assignment;
use crate::error::PersistenceError;

const OBFUSCATION_KEY: &[u8] = b"jullotteriet";

/// Decoding failure, at either layer
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("base64 layer: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON layer: {0}")]
    Json(#[from] serde_json::Error),
}

fn scramble(bytes: &mut [u8]) {
    for (b, k) in bytes.iter_mut().zip(OBFUSCATION_KEY.iter().cycle()) {
        *b ^= k;
    }
}

/// Obfuscate raw bytes
pub fn obfuscate(bytes: &[u8]) -> String {
    let mut buf = bytes.to_vec();
    scramble(&mut buf);
    STANDARD.encode(buf)
}

/// Reverse [`obfuscate`]. Surrounding whitespace is ignored.
pub fn deobfuscate(text: &str) -> Result<Vec<u8>, CodecError> {
    let mut buf = STANDARD.decode(text.trim())?;
    scramble(&mut buf);
    Ok(buf)
}

/// Serialize and obfuscate any value
pub fn seal<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(value)?;
    Ok(obfuscate(&json))
}

/// Reverse [`seal`]
pub fn open<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    let json = deobfuscate(text)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Encode an assignment for persistence. The output is byte-stable for a given
/// mapping.
pub fn encode_assignment(assignment: &Assignment) -> Result<String, PersistenceError> {
    seal(assignment).map_err(PersistenceError::MalformedBlob)
}

/// Decode a persisted assignment
pub fn decode_assignment(blob: &str) -> Result<Assignment, PersistenceError> {
    open(blob).map_err(PersistenceError::MalformedBlob)
}
