//! Randomized cyclic assignment with bounded retry
//!
//! Each attempt shuffles the sorted participant list with a PRNG seeded from
//! [`attempt_seed`] and closes the shuffled order into a single cycle. A cycle
//! over n >= 2 names can never map anyone to themselves, so the only thing
//! left to check is the forbidden pairs. The first attempt that violates no
//! constraint wins.
//!
//! For a fixed seed and roster the sequence of attempts, and therefore the
//! result, is fully reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::assignment::Assignment;
use crate::config::{LotteryConfig, SingleParticipantPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::constraint::ConstraintGraph;
use crate::error::GenerationError;

/// Seed used for attempt `attempt` of a draw started from `seed`
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    seed.wrapping_add(u64::from(attempt))
}

/// Shuffled candidate order for one attempt.
///
/// `sorted` must already be in canonical (sorted) order.
pub fn candidate_order(sorted: &[String], seed: u64, attempt: u32) -> Vec<String> {
    let mut order = sorted.to_vec();
    let mut rng = StdRng::seed_from_u64(attempt_seed(seed, attempt));
    order.shuffle(&mut rng);
    order
}

/// Successful draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub assignment: Assignment,
    /// Zero-based index of the attempt that succeeded
    pub attempt: u32,
    /// Seed the draw started from
    pub seed: u64,
}

/// Draw an assignment for `names` that `graph` accepts.
pub fn generate(
    graph: &ConstraintGraph,
    names: &[String],
    seed: u64,
    max_attempts: u32,
) -> Result<Generated, GenerationError> {
    let mut sorted = names.to_vec();
    sorted.sort();
    sorted.dedup();

    if sorted.is_empty() {
        return Err(GenerationError::NoParticipants);
    }

    for attempt in 0..max_attempts {
        let order = candidate_order(&sorted, seed, attempt);
        if violates(graph, &order) {
            tracing::trace!(attempt, "Candidate rejected");
            continue;
        }

        tracing::debug!(attempt, participants = order.len(), "Found valid assignment");
        return Ok(Generated {
            assignment: Assignment::from_cycle(&order),
            attempt,
            seed,
        });
    }

    Err(GenerationError::Exhausted {
        attempts: max_attempts,
        seed,
    })
}

fn violates(graph: &ConstraintGraph, order: &[String]) -> bool {
    let n = order.len();
    (0..n).any(|k| graph.forbidden(&order[k], &order[(k + 1) % n]))
}

/// Generator settings for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentGenerator {
    seed: u64,
    max_attempts: u32,
    policy: SingleParticipantPolicy,
}

impl AssignmentGenerator {
    pub fn new(seed: u64, max_attempts: u32) -> Self {
        Self {
            seed,
            max_attempts,
            policy: SingleParticipantPolicy::default(),
        }
    }

    /// Generator for `config`, drawing a random seed if none is fixed
    pub fn from_config(config: &LotteryConfig) -> Self {
        Self {
            seed: config.seed_or_random(),
            max_attempts: config.max_attempts,
            policy: config.single_participant,
        }
    }

    pub fn with_policy(mut self, policy: SingleParticipantPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn policy(&self) -> SingleParticipantPolicy {
        self.policy
    }

    /// Draw over every participant in `graph`
    pub fn generate(&self, graph: &ConstraintGraph) -> Result<Generated, GenerationError> {
        generate(graph, graph.names(), self.seed, self.max_attempts)
    }
}

impl Default for AssignmentGenerator {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_ATTEMPTS)
    }
}
