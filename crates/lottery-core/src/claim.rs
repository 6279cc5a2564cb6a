//! Claim/reveal protocol
//!
//! A browser proves nothing about who it is. Instead, the first participant
//! page it opens binds it to that name through a client-held [`ClaimToken`],
//! and from then on it may only see that participant's recipient. The server
//! keeps no session table: every decision is a pure function of the token,
//! the requested name and the read-only assignment.
//!
//! ## States, per requested name
//!
//! | Token | Requested name | Standing |
//! |-------|----------------|----------|
//! | none, expired, or from another round | any | Unclaimed |
//! | bound to `n` | `n` | SelfClaimed |
//! | bound to `m` | `n != m` | Mismatched |
//!
//! Two browsers can each mint a token for the same name. There is no lock
//! against that; the exchange has no adversarial stakes.

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::error::ProtocolError;

/// Client-held binding to one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimToken {
    pub name: String,
    /// Unix seconds after which the token is void
    pub expires_at: i64,
}

impl ClaimToken {
    pub fn new(name: impl Into<String>, expires_at: i64) -> Self {
        Self {
            name: name.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Claim state carried by one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimState {
    Unclaimed,
    Claimed(ClaimToken),
}

impl ClaimState {
    pub fn claimed_name(&self) -> Option<&str> {
        match self {
            ClaimState::Unclaimed => None,
            ClaimState::Claimed(token) => Some(&token.name),
        }
    }

    /// How this client stands with respect to `requested`
    pub fn standing(&self, requested: &str) -> Standing {
        match self.claimed_name() {
            None => Standing::Unclaimed,
            Some(name) if name == requested => Standing::SelfClaimed,
            Some(_) => Standing::Mismatched,
        }
    }
}

/// Observable relation between a client and one participant name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Unclaimed,
    SelfClaimed,
    Mismatched,
}

/// Request kinds the transport forwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a participant page, claiming it if the client holds no claim.
    /// `None` is the landing page.
    ClaimOrView(Option<String>),
    /// Show the requested participant's recipient
    Reveal(String),
    /// Drop the client's claim
    Reset,
}

/// Result of one protocol step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Participant page for `name`, which this client owns
    Show(String),
    /// The client should go to its own participant page
    Redirect(String),
    /// The recipient of the client's own participant
    Recipient(String),
    /// The client's claim was dropped
    Cleared,
    /// Refused; the reason names nobody
    Reject(ProtocolError),
}

/// What the transport must do with the client's token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenChange {
    Keep,
    Issue(ClaimToken),
    Clear,
}

/// Next state, outcome, and token instruction for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ClaimState,
    pub outcome: Outcome,
    pub token: TokenChange,
}

impl Transition {
    fn unchanged(state: &ClaimState, outcome: Outcome) -> Self {
        Self {
            state: state.clone(),
            outcome,
            token: TokenChange::Keep,
        }
    }

    fn reject(state: &ClaimState, error: ProtocolError) -> Self {
        Self::unchanged(state, Outcome::Reject(error))
    }
}

/// Protocol bound to one round's assignment and token deadline
#[derive(Debug, Clone, Copy)]
pub struct ClaimProtocol<'a> {
    assignment: &'a Assignment,
    expires_at: i64,
}

impl<'a> ClaimProtocol<'a> {
    /// `expires_at` is stamped on every token this protocol issues
    pub fn new(assignment: &'a Assignment, expires_at: i64) -> Self {
        Self {
            assignment,
            expires_at,
        }
    }

    /// Interpret a decoded token at time `now`.
    ///
    /// Expired tokens and tokens naming someone outside this round's
    /// assignment count as no token at all.
    pub fn state_for(&self, token: Option<ClaimToken>, now: i64) -> ClaimState {
        match token {
            Some(token) if !token.is_expired(now) && self.assignment.contains(&token.name) => {
                ClaimState::Claimed(token)
            }
            _ => ClaimState::Unclaimed,
        }
    }

    /// Apply `action` to `state`
    pub fn step(&self, state: &ClaimState, action: &Action) -> Transition {
        match action {
            Action::ClaimOrView(requested) => self.claim_or_view(state, requested.as_deref()),
            Action::Reveal(requested) => self.reveal(state, requested),
            Action::Reset => self.reset(state),
        }
    }

    pub fn claim_or_view(&self, state: &ClaimState, requested: Option<&str>) -> Transition {
        let Some(requested) = requested else {
            return match state.claimed_name() {
                Some(own) => Transition::unchanged(state, Outcome::Redirect(own.to_string())),
                None => Transition::reject(state, ProtocolError::NoActiveClaim),
            };
        };

        if !self.assignment.contains(requested) {
            return Transition::reject(state, ProtocolError::UnknownName);
        }

        match state.standing(requested) {
            Standing::Unclaimed => {
                let token = ClaimToken::new(requested, self.expires_at);
                Transition {
                    state: ClaimState::Claimed(token.clone()),
                    outcome: Outcome::Show(requested.to_string()),
                    token: TokenChange::Issue(token),
                }
            }
            Standing::SelfClaimed => {
                Transition::unchanged(state, Outcome::Show(requested.to_string()))
            }
            Standing::Mismatched => Transition::reject(state, ProtocolError::WrongIdentity),
        }
    }

    pub fn reveal(&self, state: &ClaimState, requested: &str) -> Transition {
        let Some(recipient) = self.assignment.recipient_of(requested) else {
            return Transition::reject(state, ProtocolError::UnknownName);
        };

        match state.standing(requested) {
            Standing::SelfClaimed => {
                Transition::unchanged(state, Outcome::Recipient(recipient.to_string()))
            }
            Standing::Unclaimed => Transition::reject(state, ProtocolError::NoActiveClaim),
            Standing::Mismatched => Transition::reject(state, ProtocolError::WrongIdentity),
        }
    }

    pub fn reset(&self, state: &ClaimState) -> Transition {
        match state {
            ClaimState::Unclaimed => Transition::reject(state, ProtocolError::NoActiveClaim),
            ClaimState::Claimed(_) => Transition {
                state: ClaimState::Unclaimed,
                outcome: Outcome::Cleared,
                token: TokenChange::Clear,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEADLINE: i64 = 1_000;

    fn assignment() -> Assignment {
        let order: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        // A -> B -> C -> A
        Assignment::from_cycle(&order)
    }

    fn claimed(name: &str) -> ClaimState {
        ClaimState::Claimed(ClaimToken::new(name, DEADLINE))
    }

    #[test]
    fn test_claim_then_reveal() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let claim = protocol.step(&ClaimState::Unclaimed, &Action::ClaimOrView(Some("A".into())));
        assert_eq!(claim.outcome, Outcome::Show("A".into()));
        assert_eq!(claim.token, TokenChange::Issue(ClaimToken::new("A", DEADLINE)));
        assert_eq!(claim.state.standing("A"), Standing::SelfClaimed);

        let reveal = protocol.step(&claim.state, &Action::Reveal("A".into()));
        assert_eq!(reveal.outcome, Outcome::Recipient("B".into()));
        assert_eq!(reveal.token, TokenChange::Keep);

        let other = protocol.step(&claim.state, &Action::Reveal("B".into()));
        assert_eq!(other.outcome, Outcome::Reject(ProtocolError::WrongIdentity));
        assert_eq!(other.state, claim.state);
    }

    #[test]
    fn test_mismatched_claim_rejected() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let t = protocol.claim_or_view(&claimed("A"), Some("C"));
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::WrongIdentity));
        assert_eq!(t.token, TokenChange::Keep);
        assert_eq!(t.state, claimed("A"));
    }

    #[test]
    fn test_view_own_page_again() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let t = protocol.claim_or_view(&claimed("C"), Some("C"));
        assert_eq!(t.outcome, Outcome::Show("C".into()));
        assert_eq!(t.token, TokenChange::Keep);
    }

    #[test]
    fn test_reveal_without_claim() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let t = protocol.reveal(&ClaimState::Unclaimed, "A");
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::NoActiveClaim));
        assert_eq!(t.state, ClaimState::Unclaimed);
    }

    #[test]
    fn test_unknown_names() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let t = protocol.claim_or_view(&ClaimState::Unclaimed, Some("Z"));
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::UnknownName));
        assert_eq!(t.token, TokenChange::Keep);

        let t = protocol.reveal(&claimed("A"), "Z");
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::UnknownName));

        // Case-sensitive
        let t = protocol.claim_or_view(&ClaimState::Unclaimed, Some("a"));
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::UnknownName));
    }

    #[test]
    fn test_landing_page() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let t = protocol.step(&claimed("B"), &Action::ClaimOrView(None));
        assert_eq!(t.outcome, Outcome::Redirect("B".into()));

        let t = protocol.step(&ClaimState::Unclaimed, &Action::ClaimOrView(None));
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::NoActiveClaim));
    }

    #[test]
    fn test_reset() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let t = protocol.step(&claimed("A"), &Action::Reset);
        assert_eq!(t.outcome, Outcome::Cleared);
        assert_eq!(t.token, TokenChange::Clear);
        assert_eq!(t.state, ClaimState::Unclaimed);

        // After a reset the client may claim someone else
        let t = protocol.claim_or_view(&t.state, Some("C"));
        assert_eq!(t.outcome, Outcome::Show("C".into()));

        let t = protocol.step(&ClaimState::Unclaimed, &Action::Reset);
        assert_eq!(t.outcome, Outcome::Reject(ProtocolError::NoActiveClaim));
        assert_eq!(t.token, TokenChange::Keep);
    }

    #[test]
    fn test_expired_token_is_unclaimed() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);
        let token = ClaimToken::new("A", 500);

        assert_eq!(protocol.state_for(Some(token.clone()), 499), claimed_at("A", 500));
        assert_eq!(protocol.state_for(Some(token), 500), ClaimState::Unclaimed);
        assert_eq!(protocol.state_for(None, 0), ClaimState::Unclaimed);
    }

    fn claimed_at(name: &str, expires_at: i64) -> ClaimState {
        ClaimState::Claimed(ClaimToken::new(name, expires_at))
    }

    #[test]
    fn test_token_from_other_round_is_unclaimed() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let state = protocol.state_for(Some(ClaimToken::new("Zelda", DEADLINE)), 0);
        assert_eq!(state, ClaimState::Unclaimed);
    }

    #[test]
    fn test_two_clients_may_claim_same_name() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        let first = protocol.claim_or_view(&ClaimState::Unclaimed, Some("A"));
        let second = protocol.claim_or_view(&ClaimState::Unclaimed, Some("A"));
        assert!(matches!(first.token, TokenChange::Issue(_)));
        assert!(matches!(second.token, TokenChange::Issue(_)));
    }

    #[test]
    fn test_rejections_do_not_leak() {
        let assignment = assignment();
        let protocol = ClaimProtocol::new(&assignment, DEADLINE);

        for t in [
            protocol.reveal(&claimed("A"), "C"),
            protocol.claim_or_view(&claimed("A"), Some("C")),
        ] {
            let rendered = format!("{:?}", t.outcome);
            assert!(!rendered.contains("\"A\""));
            assert!(!rendered.contains("\"B\""));
        }
    }
}
