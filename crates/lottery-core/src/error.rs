//! Core error types
//!
//! Everything except [`ProtocolError`] is fatal at startup: the service must
//! not come up with an invalid roster, without an assignment, or on top of a
//! persisted blob it cannot read.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Roster and constraint validation failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown forbidden name: {participant} forbids {forbidden}, who is not a participant")]
    UnknownForbiddenName {
        participant: String,
        forbidden: String,
    },

    #[error("Too few participants: got {count}, need at least {required}")]
    TooFewParticipants { count: usize, required: usize },

    #[error("Malformed roster: {0}")]
    MalformedRoster(String),

    #[error("Roster unreadable at {path}: {source}")]
    RosterUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Assignment generation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("No valid assignment found in {attempts} attempts starting from seed {seed}")]
    Exhausted { attempts: u32, seed: u64 },

    #[error("Cannot draw an assignment for zero participants")]
    NoParticipants,
}

/// Persisted assignment failures
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Persisted assignment unreadable at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed assignment blob: {0}")]
    MalformedBlob(#[source] CodecError),

    #[error("Failed to write assignment to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-request claim rejections
///
/// The messages are deliberately generic: none of them names the identity
/// bound to the caller's token or any recipient.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("This browser has claimed a different participant")]
    WrongIdentity,

    #[error("No active claim")]
    NoActiveClaim,

    #[error("Unknown participant")]
    UnknownName,
}

/// Startup failure of any kind
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
