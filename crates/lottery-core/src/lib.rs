//! lottery-core: Constrained gift-exchange draw and claim protocol
//!
//! This crate holds everything with real logic in it:
//! - Roster parsing and the forbidden-pair [`ConstraintGraph`]
//! - The randomized cyclic [`generator`], deterministic for a given seed
//! - Generate-once persistence of the drawn [`Assignment`] ([`store`])
//! - The stateless [`claim`] protocol that gates who may see what
//!
//! # Threat Model
//!
//! The exchange has no adversarial stakes. The goal is that participants do
//! not learn each other's draw *by accident*.
//!
//! | Concern | Handling |
//! |---------|----------|
//! | Reading the persisted draw | Obfuscated, not encrypted |
//! | Reading another participant's recipient | Refused unless the browser claimed that name first |
//! | Two browsers claiming the same name | Possible; no server-side lock |
//! | Forging a claim token | Possible for anyone who reads this source |
//!
//! Nothing here is a confidentiality guarantee.

pub mod assignment;
pub mod claim;
pub mod codec;
mod config;
mod constraint;
mod error;
pub mod generator;
mod roster;
pub mod store;

pub use assignment::Assignment;
pub use claim::{
    Action, ClaimProtocol, ClaimState, ClaimToken, Outcome, Standing, TokenChange, Transition,
};
pub use codec::{decode_assignment, encode_assignment, CodecError};
pub use config::{
    default_claim_deadline, LotteryConfig, SingleParticipantPolicy, DEFAULT_MAX_ATTEMPTS,
};
pub use constraint::ConstraintGraph;
pub use error::{ConfigError, Error, GenerationError, PersistenceError, ProtocolError};
pub use generator::{attempt_seed, generate, AssignmentGenerator, Generated};
pub use roster::{Roster, RosterFile, RosterSource};
pub use store::{
    load_or_create, BlobStore, FileBlobStore, MemoryBlobStore, Origin, StoredAssignment,
};

pub type Result<T> = std::result::Result<T, Error>;
