//! Round configuration

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Default number of shuffles tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// What to do with a roster of exactly one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingleParticipantPolicy {
    /// Fewer than two participants is a configuration error
    #[default]
    Reject,
    /// A lone participant draws themselves
    SelfAssign,
}

impl SingleParticipantPolicy {
    /// Smallest roster accepted under this policy
    pub fn min_participants(self) -> usize {
        match self {
            SingleParticipantPolicy::Reject => 2,
            SingleParticipantPolicy::SelfAssign => 1,
        }
    }
}

/// Settings for one lottery round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    /// Upper bound on generation attempts
    pub max_attempts: u32,
    /// Fixed seed; a random one is drawn (and logged) when absent
    pub seed: Option<u64>,
    /// Single-participant handling
    pub single_participant: SingleParticipantPolicy,
    /// Wall-clock deadline after which claim tokens expire
    pub claim_deadline: Option<DateTime<Utc>>,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
            single_participant: SingleParticipantPolicy::Reject,
            claim_deadline: None,
        }
    }
}

impl LotteryConfig {
    /// The configured seed, or a fresh random one
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// The configured deadline, or the end of the next Christmas Day after `now`
    pub fn claim_deadline_or_default(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.claim_deadline
            .unwrap_or_else(|| default_claim_deadline(now))
    }
}

/// Midnight UTC after Christmas Day (Dec 26 00:00) of the current year, or of
/// the following year once that moment has passed.
pub fn default_claim_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    let this_year = boxing_day(now.year());
    match this_year {
        Some(deadline) if deadline > now => deadline,
        _ => boxing_day(now.year() + 1).unwrap_or(now),
    }
}

fn boxing_day(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 12, 26, 0, 0, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LotteryConfig::default();
        assert_eq!(config.max_attempts, 100);
        assert_eq!(config.seed, None);
        assert_eq!(config.single_participant, SingleParticipantPolicy::Reject);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LotteryConfig =
            serde_json::from_str(r#"{"seed": 7, "single_participant": "self-assign"}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.single_participant, SingleParticipantPolicy::SelfAssign);
        assert_eq!(config.seed_or_random(), 7);
    }

    #[test]
    fn test_default_deadline_before_christmas() {
        let now = Utc.with_ymd_and_hms(2026, 12, 1, 12, 0, 0).unwrap();
        let deadline = default_claim_deadline(now);
        assert_eq!(deadline, Utc.with_ymd_and_hms(2026, 12, 26, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_default_deadline_rolls_over() {
        let now = Utc.with_ymd_and_hms(2026, 12, 27, 0, 0, 0).unwrap();
        let deadline = default_claim_deadline(now);
        assert_eq!(deadline, Utc.with_ymd_and_hms(2027, 12, 26, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_explicit_deadline_wins() {
        let fixed = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let config = LotteryConfig {
            claim_deadline: Some(fixed),
            ..Default::default()
        };
        assert_eq!(config.claim_deadline_or_default(Utc::now()), fixed);
    }

    #[test]
    fn test_min_participants() {
        assert_eq!(SingleParticipantPolicy::Reject.min_participants(), 2);
        assert_eq!(SingleParticipantPolicy::SelfAssign.min_participants(), 1);
    }
}
