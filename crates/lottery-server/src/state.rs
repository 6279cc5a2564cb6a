//! Shared, read-only server state

use std::sync::Arc;

use lottery_core::{Assignment, ClaimProtocol};

/// Everything a handler needs. Built once before the listener starts and
/// never mutated afterwards, so handlers share it without locking.
#[derive(Debug)]
pub struct ServerState {
    assignment: Assignment,
    /// Unix seconds stamped on every claim token issued this round
    claim_expires_at: i64,
}

impl ServerState {
    pub fn new(assignment: Assignment, claim_expires_at: i64) -> Self {
        Self {
            assignment,
            claim_expires_at,
        }
    }

    /// Claim protocol over this round's assignment
    pub fn protocol(&self) -> ClaimProtocol<'_> {
        ClaimProtocol::new(&self.assignment, self.claim_expires_at)
    }

    /// Participant names, sorted
    pub fn participants(&self) -> Vec<&str> {
        self.assignment.participants().collect()
    }

    pub fn participant_count(&self) -> usize {
        self.assignment.len()
    }

    pub fn claim_expires_at(&self) -> i64 {
        self.claim_expires_at
    }
}

pub type SharedState = Arc<ServerState>;

pub fn create_shared_state(assignment: Assignment, claim_expires_at: i64) -> SharedState {
    Arc::new(ServerState::new(assignment, claim_expires_at))
}
