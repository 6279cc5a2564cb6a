//! Prometheus metrics
//!
//! Counters are labelled by outcome only. Participant names never become
//! label values.

use lottery_core::{Action, Outcome, ProtocolError};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const CLAIMS_TOTAL: &str = "jullotteri_claims_total";
pub const REVEALS_TOTAL: &str = "jullotteri_reveals_total";
pub const RESETS_TOTAL: &str = "jullotteri_resets_total";
pub const PARTICIPANTS: &str = "jullotteri_participants";

/// Install the global Prometheus recorder and return a handle for `/metrics`
pub fn init_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record the size of the served round
pub fn record_participants(count: usize) {
    metrics::gauge!(PARTICIPANTS).set(count as f64);
}

/// Count one protocol step
pub fn record_step(action: &Action, outcome: &Outcome) {
    let name = match action {
        Action::ClaimOrView(_) => CLAIMS_TOTAL,
        Action::Reveal(_) => REVEALS_TOTAL,
        Action::Reset => RESETS_TOTAL,
    };
    metrics::counter!(name, "outcome" => outcome_label(outcome)).increment(1);
}

/// Stable label for an outcome
pub fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Show(_) => "show",
        Outcome::Redirect(_) => "redirect",
        Outcome::Recipient(_) => "revealed",
        Outcome::Cleared => "cleared",
        Outcome::Reject(ProtocolError::WrongIdentity) => "wrong_identity",
        Outcome::Reject(ProtocolError::NoActiveClaim) => "no_active_claim",
        Outcome::Reject(ProtocolError::UnknownName) => "unknown_name",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_core::{Assignment, ClaimProtocol, ClaimState};

    #[test]
    fn test_labels_carry_no_names() {
        assert_eq!(outcome_label(&Outcome::Show("Anna".into())), "show");
        assert_eq!(outcome_label(&Outcome::Recipient("Bertil".into())), "revealed");
        assert_eq!(
            outcome_label(&Outcome::Reject(ProtocolError::UnknownName)),
            "unknown_name"
        );
    }

    #[test]
    fn test_steps_counted_by_outcome() {
        let order: Vec<String> = ["Anna", "Bertil"].iter().map(|s| s.to_string()).collect();
        let assignment = Assignment::from_cycle(&order);
        let protocol = ClaimProtocol::new(&assignment, i64::MAX);

        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let claim = Action::ClaimOrView(Some("Anna".into()));
            let claimed = protocol.step(&ClaimState::Unclaimed, &claim);
            record_step(&claim, &claimed.outcome);

            let reveal = Action::Reveal("Bertil".into());
            let rejected = protocol.step(&claimed.state, &reveal);
            record_step(&reveal, &rejected.outcome);

            record_participants(assignment.len());
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"jullotteri_claims_total{outcome="show"} 1"#));
        assert!(rendered.contains(r#"jullotteri_reveals_total{outcome="wrong_identity"} 1"#));
        assert!(rendered.contains(PARTICIPANTS));
        assert!(!rendered.contains("Anna"));
        assert!(!rendered.contains("Bertil"));
    }
}
