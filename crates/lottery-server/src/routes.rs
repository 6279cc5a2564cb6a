//! HTTP routes
//!
//! | Route | Protocol action |
//! |-------|-----------------|
//! | `GET /` | landing page: redirect to the claimed name, if any |
//! | `GET /claim/:name` | claim `name` or view it again |
//! | `GET /reveal/:name` | show `name`'s recipient to its claimant |
//! | `POST /reset` | drop this browser's claim |
//! | `GET /participants` | sorted participant names |
//! | `GET /health` | liveness |
//!
//! Handlers only translate between HTTP and [`lottery_core::claim`]; every
//! decision is made there.

use axum::extract::{Path, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lottery_core::{Action, Outcome, TokenChange};
use metrics_exporter_prometheus::PrometheusHandle;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::{Result, ServerError};
use crate::metrics::record_step;
use crate::state::SharedState;
use crate::token;

/// Bytes escaped in a participant name used as one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `prefix` followed by `name` as a single escaped path segment
fn name_path(prefix: &str, name: &str) -> String {
    format!("{prefix}/{}", utf8_percent_encode(name, SEGMENT))
}

/// Participant page
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub name: String,
    pub reveal: String,
}

/// Landing page for a browser that has already claimed someone
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub name: String,
    pub location: String,
}

/// The claimant's own recipient
#[derive(Debug, Serialize)]
pub struct RevealResponse {
    pub recipient: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<String>,
}

/// Public router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/health", get(|| async { "OK" }))
        .route("/participants", get(participants_handler))
        .route("/claim/:name", get(claim_handler))
        .route("/reveal/:name", get(reveal_handler))
        .route("/reset", post(reset_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Public router plus `GET /metrics`
pub fn create_router_with_metrics(state: SharedState, handle: PrometheusHandle) -> Router {
    create_router(state).route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

async fn landing_handler(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    respond(&state, &headers, Action::ClaimOrView(None))
}

async fn claim_handler(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    respond(&state, &headers, Action::ClaimOrView(Some(name)))
}

async fn reveal_handler(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    respond(&state, &headers, Action::Reveal(name))
}

async fn reset_handler(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    respond(&state, &headers, Action::Reset)
}

async fn participants_handler(State(state): State<SharedState>) -> Json<ParticipantsResponse> {
    Json(ParticipantsResponse {
        participants: state.participants().into_iter().map(String::from).collect(),
    })
}

/// Run one protocol step for a request and render the outcome
fn respond(state: &SharedState, headers: &HeaderMap, action: Action) -> Result<Response> {
    let now = chrono::Utc::now().timestamp();
    let protocol = state.protocol();
    let current = protocol.state_for(token::read_token(headers), now);
    let transition = protocol.step(&current, &action);

    record_step(&action, &transition.outcome);

    let set_cookie = match &transition.token {
        TokenChange::Keep => None,
        TokenChange::Issue(token) => Some(token::issue_cookie(token, now)?),
        TokenChange::Clear => Some(token::clear_cookie()),
    };

    let mut response = match transition.outcome {
        Outcome::Show(name) => Json(ParticipantResponse {
            reveal: name_path("/reveal", &name),
            name,
        })
        .into_response(),
        Outcome::Redirect(name) => redirect_response(name),
        Outcome::Recipient(recipient) => Json(RevealResponse { recipient }).into_response(),
        Outcome::Cleared => Json(StatusResponse { status: "cleared" }).into_response(),
        Outcome::Reject(e) => return Err(ServerError::Protocol(e)),
    };

    if let Some(cookie) = set_cookie {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    Ok(response)
}

fn redirect_response(name: String) -> Response {
    let location = name_path("/claim", &name);
    let mut response = (
        StatusCode::SEE_OTHER,
        Json(RedirectResponse {
            name,
            location: location.clone(),
        }),
    )
        .into_response();

    // Escaped locations are always visible ASCII
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}
