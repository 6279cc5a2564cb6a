//! lottery-server: HTTP transport for the gift-exchange lottery
//!
//! Draws (or reloads) the round at startup, then serves the claim/reveal
//! protocol over HTTP. The claim lives in a cookie; the server keeps no
//! per-client state.

pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;
pub mod token;

pub use error::ServerError;
pub use metrics::init_prometheus_recorder;
pub use routes::{create_router, create_router_with_metrics};
pub use server::{LotteryServer, ServerBuilder};
pub use state::{create_shared_state, ServerState, SharedState};
