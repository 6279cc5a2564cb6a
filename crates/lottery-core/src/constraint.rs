//! Forbidden-pair index built from a validated roster

use std::collections::{HashMap, HashSet};

use crate::config::SingleParticipantPolicy;
use crate::error::ConfigError;
use crate::roster::Roster;

/// Immutable index of who must not draw whom.
///
/// Construction guarantees that every forbidden name is itself a
/// participant, so [`forbidden`](Self::forbidden) never has to deal with
/// dangling names.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    names: Vec<String>,
    forbidden: HashMap<String, HashSet<String>>,
}

impl ConstraintGraph {
    /// Build with the default policy (at least two participants)
    pub fn build(roster: &Roster) -> Result<Self, ConfigError> {
        Self::build_with_policy(roster, SingleParticipantPolicy::default())
    }

    /// Build, applying `policy` to single-participant rosters.
    ///
    /// An empty roster is rejected under every policy.
    pub fn build_with_policy(
        roster: &Roster,
        policy: SingleParticipantPolicy,
    ) -> Result<Self, ConfigError> {
        let required = policy.min_participants();
        if roster.len() < required {
            return Err(ConfigError::TooFewParticipants {
                count: roster.len(),
                required,
            });
        }

        let mut forbidden = HashMap::with_capacity(roster.len());
        for (participant, excluded) in roster.iter() {
            if let Some(unknown) = excluded.iter().find(|f| !roster.contains(f)) {
                return Err(ConfigError::UnknownForbiddenName {
                    participant: participant.to_string(),
                    forbidden: unknown.clone(),
                });
            }
            if !excluded.is_empty() {
                forbidden.insert(
                    participant.to_string(),
                    excluded.iter().cloned().collect::<HashSet<_>>(),
                );
            }
        }

        Ok(Self {
            names: roster.names().map(str::to_string).collect(),
            forbidden,
        })
    }

    /// Whether `giver` must not be assigned `recipient`
    pub fn forbidden(&self, giver: &str, recipient: &str) -> bool {
        self.forbidden
            .get(giver)
            .is_some_and(|set| set.contains(recipient))
    }

    /// Participant names, sorted
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Number of forbidden (giver, recipient) pairs
    pub fn forbidden_pair_count(&self) -> usize {
        self.forbidden.values().map(HashSet::len).sum()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(json: &str) -> Roster {
        Roster::from_json(json).unwrap()
    }

    #[test]
    fn test_forbidden_lookup() {
        let graph = ConstraintGraph::build(&roster(r#"{"A": [], "B": [], "C": ["B"]}"#)).unwrap();

        assert!(graph.forbidden("C", "B"));
        assert!(!graph.forbidden("B", "C"));
        assert!(!graph.forbidden("A", "B"));
        assert_eq!(graph.forbidden_pair_count(), 1);
        assert_eq!(graph.names(), ["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_forbidden_name() {
        let err = ConstraintGraph::build(&roster(r#"{"A": ["Z"], "B": []}"#)).unwrap_err();
        match err {
            ConfigError::UnknownForbiddenName {
                participant,
                forbidden,
            } => {
                assert_eq!(participant, "A");
                assert_eq!(forbidden, "Z");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_forbidden_name_single_participant() {
        let err = ConstraintGraph::build_with_policy(
            &roster(r#"{"A": ["Z"]}"#),
            SingleParticipantPolicy::SelfAssign,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownForbiddenName { .. }));
    }

    #[test]
    fn test_too_few_participants() {
        let err = ConstraintGraph::build(&roster(r#"{"A": []}"#)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooFewParticipants {
                count: 1,
                required: 2
            }
        ));

        let err = ConstraintGraph::build(&Roster::new()).unwrap_err();
        assert!(matches!(err, ConfigError::TooFewParticipants { count: 0, .. }));
    }

    #[test]
    fn test_self_assign_policy_allows_one() {
        let graph = ConstraintGraph::build_with_policy(
            &roster(r#"{"A": []}"#),
            SingleParticipantPolicy::SelfAssign,
        )
        .unwrap();
        assert_eq!(graph.len(), 1);

        let err =
            ConstraintGraph::build_with_policy(&Roster::new(), SingleParticipantPolicy::SelfAssign)
                .unwrap_err();
        assert!(matches!(err, ConfigError::TooFewParticipants { .. }));
    }

    #[test]
    fn test_contains() {
        let graph = ConstraintGraph::build(&roster(r#"{"Anna": [], "Bertil": []}"#)).unwrap();
        assert!(graph.contains("Anna"));
        assert!(!graph.contains("anna"));
    }
}
