//! lottery-cli: draw a round offline
//!
//! Builds a roster from a JSON file and/or names given on the command line,
//! draws with the same generator the server uses, and renders the result.
//! With an output path it also writes the blob the server would load, so a
//! round can be drawn ahead of time and deployed as is.

use std::path::Path;

use lottery_core::{
    encode_assignment, Assignment, AssignmentGenerator, BlobStore, ConfigError, ConstraintGraph,
    FileBlobStore, Generated, Roster,
};
use serde::Serialize;

/// Roster from an optional file plus extra names.
///
/// Names not present in the file join with no constraints.
pub fn build_roster(file: Option<&Path>, names: &[String]) -> Result<Roster, ConfigError> {
    let mut roster = match file {
        Some(path) => Roster::load(path)?,
        None => Roster::new(),
    };
    for name in names {
        roster.add_participant(name.as_str())?;
    }
    Ok(roster)
}

/// Validate `roster` and draw
pub fn draw(roster: &Roster, generator: &AssignmentGenerator) -> lottery_core::Result<Generated> {
    let graph = ConstraintGraph::build_with_policy(roster, generator.policy())?;
    tracing::debug!(
        participants = graph.len(),
        forbidden_pairs = graph.forbidden_pair_count(),
        "Roster validated"
    );
    Ok(generator.generate(&graph)?)
}

/// Write the obfuscated blob for `assignment` to `path`
pub fn write_blob(path: &Path, assignment: &Assignment) -> lottery_core::Result<()> {
    let blob = encode_assignment(assignment)?;
    FileBlobStore::new(path).write(&blob)?;
    Ok(())
}

/// One `giver -> recipient` line per participant, sorted by giver
pub fn render_text(assignment: &Assignment) -> String {
    assignment
        .iter()
        .map(|(giver, recipient)| format!("{giver} -> {recipient}\n"))
        .collect()
}

#[derive(Serialize)]
struct DrawReport<'a> {
    seed: u64,
    retries: u32,
    assignment: &'a Assignment,
}

/// JSON report with the seed, so the draw can be reproduced
pub fn render_json(generated: &Generated) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DrawReport {
        seed: generated.seed,
        retries: generated.attempt,
        assignment: &generated.assignment,
    })
}
