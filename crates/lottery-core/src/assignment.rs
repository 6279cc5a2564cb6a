//! The drawn assignment: giver -> recipient

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintGraph;

/// Total mapping from every participant to the one participant they give to.
///
/// Backed by a sorted map so that serialization is byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    pairs: BTreeMap<String, String>,
}

impl Assignment {
    /// Close `order` into a single cycle: each name gives to the next, the
    /// last gives to the first.
    pub fn from_cycle(order: &[String]) -> Self {
        let n = order.len();
        let pairs = order
            .iter()
            .enumerate()
            .map(|(k, giver)| (giver.clone(), order[(k + 1) % n].clone()))
            .collect();
        Self { pairs }
    }

    /// Recipient drawn by `giver`
    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.pairs.get(giver).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.contains_key(name)
    }

    /// Participants, sorted
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    /// (giver, recipient) pairs, sorted by giver
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(g, r)| (g.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether the mapping is one cycle visiting every participant exactly once
    pub fn is_single_cycle(&self) -> bool {
        let Some(start) = self.pairs.keys().next() else {
            return false;
        };

        let mut visited = BTreeSet::new();
        let mut current = start.as_str();
        loop {
            if !visited.insert(current) {
                return false;
            }
            match self.recipient_of(current) {
                Some(next) if next == start.as_str() => break,
                Some(next) => current = next,
                None => return false,
            }
        }
        visited.len() == self.pairs.len()
    }

    /// Whether anyone draws themselves
    pub fn has_self_assignment(&self) -> bool {
        self.pairs.iter().any(|(g, r)| g == r)
    }

    /// Pairs that `graph` forbids
    pub fn violations<'a>(&'a self, graph: &ConstraintGraph) -> Vec<(&'a str, &'a str)> {
        self.iter()
            .filter(|(giver, recipient)| graph.forbidden(giver, recipient))
            .collect()
    }
}

impl FromIterator<(String, String)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
