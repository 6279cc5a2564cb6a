//! jullotteri: a gift-exchange lottery
//!
//! Draws a single-cycle gift assignment that honors "X must not give to Y"
//! constraints, persists it as an obfuscated blob, and serves it so each
//! participant can claim their own name and see only their own recipient.
//!
//! - [`core`]: roster, constraint graph, generator, blob store, claim protocol
//! - [`server`]: axum transport for the claim protocol
//! - [`cli`]: offline draws

pub use lottery_cli as cli;
pub use lottery_core as core;
pub use lottery_server as server;

pub use lottery_core::{Assignment, AssignmentGenerator, ConstraintGraph, Roster};
pub use lottery_server::{LotteryServer, ServerBuilder};
