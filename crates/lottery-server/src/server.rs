//! Server assembly: load or draw the round, then serve it

use std::path::PathBuf;

use chrono::Utc;
use lottery_core::{
    load_or_create, Assignment, AssignmentGenerator, FileBlobStore, LotteryConfig, Origin,
    RosterFile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

use crate::metrics::record_participants;
use crate::routes::{create_router, create_router_with_metrics};
use crate::state::{create_shared_state, SharedState};

/// Builds a [`LotteryServer`] from a roster file and a state file
pub struct ServerBuilder {
    roster: PathBuf,
    state_path: PathBuf,
    config: LotteryConfig,
    metrics: Option<PrometheusHandle>,
}

impl ServerBuilder {
    pub fn new(roster: impl Into<PathBuf>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            roster: roster.into(),
            state_path: state_path.into(),
            config: LotteryConfig::default(),
            metrics: None,
        }
    }

    pub fn config(mut self, config: LotteryConfig) -> Self {
        self.config = config;
        self
    }

    /// Expose `GET /metrics` from this handle
    pub fn metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Load the persisted round, drawing and persisting one if there is none.
    ///
    /// Every failure here is fatal: the server must not start without a
    /// valid assignment.
    pub fn build(self) -> lottery_core::Result<LotteryServer> {
        let deadline = self.config.claim_deadline_or_default(Utc::now());
        let generator = AssignmentGenerator::from_config(&self.config);

        let stored = load_or_create(
            &RosterFile::new(&self.roster),
            &mut FileBlobStore::new(&self.state_path),
            &generator,
        )?;

        match stored.origin {
            Origin::Loaded => tracing::info!(
                state = %self.state_path.display(),
                "Serving persisted round"
            ),
            Origin::Generated { seed, attempt } => tracing::info!(
                roster = %self.roster.display(),
                state = %self.state_path.display(),
                seed,
                retries = attempt,
                "Serving newly drawn round"
            ),
        }
        tracing::info!(
            participants = stored.assignment.len(),
            claim_deadline = %deadline,
            "Round ready"
        );

        let mut server = LotteryServer::from_assignment(stored.assignment, deadline.timestamp());
        server.origin = stored.origin;
        server.metrics = self.metrics;
        Ok(server)
    }
}

/// A ready-to-serve round
pub struct LotteryServer {
    state: SharedState,
    origin: Origin,
    metrics: Option<PrometheusHandle>,
}

impl LotteryServer {
    /// Serve an assignment that is already at hand
    pub fn from_assignment(assignment: Assignment, claim_expires_at: i64) -> Self {
        record_participants(assignment.len());
        Self {
            state: create_shared_state(assignment, claim_expires_at),
            origin: Origin::Loaded,
            metrics: None,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Whether the round was loaded or drawn at startup
    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn router(&self) -> axum::Router {
        match &self.metrics {
            Some(handle) => create_router_with_metrics(self.state.clone(), handle.clone()),
            None => create_router(self.state.clone()),
        }
    }

    /// Serve until the listener fails
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "Lottery server listening");
        }
        axum::serve(listener, self.router()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_core::{ConfigError, Error};

    #[test]
    fn test_build_draws_then_loads() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("roster.json");
        let state = dir.path().join("assignment.blob");
        std::fs::write(&roster, r#"{"A": ["B"], "B": [], "C": []}"#).unwrap();

        let config = LotteryConfig {
            seed: Some(3),
            ..Default::default()
        };
        let first = ServerBuilder::new(&roster, &state)
            .config(config.clone())
            .build()
            .unwrap();
        assert!(matches!(first.origin(), Origin::Generated { seed: 3, .. }));
        assert_eq!(first.state().participant_count(), 3);

        let second = ServerBuilder::new(&roster, &state).config(config).build().unwrap();
        assert_eq!(second.origin(), Origin::Loaded);
    }

    #[test]
    fn test_build_fails_on_bad_roster() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("roster.json");
        let state = dir.path().join("assignment.blob");
        std::fs::write(&roster, r#"{"A": []}"#).unwrap();

        let result = ServerBuilder::new(&roster, &state).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::TooFewParticipants { .. }))
        ));
        assert!(!state.exists());
    }
}
