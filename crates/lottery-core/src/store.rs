//! Generate-once persistence of the round's assignment
//!
//! [`load_or_create`] returns the persisted assignment if one exists and only
//! consults the roster when it does not. An existing blob is returned as is:
//! editing the roster after the draw does not reshuffle a round that people
//! may already have looked at. A blob that cannot be decoded is an error and
//! is never replaced.

use std::path::{Path, PathBuf};

use crate::assignment::Assignment;
use crate::codec::{decode_assignment, encode_assignment};
use crate::constraint::ConstraintGraph;
use crate::error::{Error, PersistenceError};
use crate::generator::AssignmentGenerator;
use crate::roster::RosterSource;

/// Durable slot for one opaque blob
pub trait BlobStore {
    /// Read the blob, `None` if nothing has been written yet
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob
    fn write(&mut self, blob: &str) -> Result<(), PersistenceError>;
}

/// Blob kept in a single file
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<file name>.tmp` beside the target
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_failed(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Unreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&mut self, blob: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        // Write beside the target and rename so a crash never leaves half a blob
        let tmp = self.tmp_path();
        std::fs::write(&tmp, blob).map_err(|e| self.write_failed(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.write_failed(e))?;
        Ok(())
    }
}

/// In-process blob, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blob: Option<String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), PersistenceError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

/// How the returned assignment came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read back from an earlier run
    Loaded,
    /// Drawn now and persisted
    Generated { seed: u64, attempt: u32 },
}

/// Assignment for the round plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAssignment {
    pub assignment: Assignment,
    pub origin: Origin,
}

/// Return the persisted assignment, or draw, persist and return a new one.
pub fn load_or_create<R, S>(
    roster: &R,
    store: &mut S,
    generator: &AssignmentGenerator,
) -> Result<StoredAssignment, Error>
where
    R: RosterSource + ?Sized,
    S: BlobStore + ?Sized,
{
    if let Some(blob) = store.read()? {
        let assignment = decode_assignment(&blob)?;
        tracing::info!(
            participants = assignment.len(),
            "Loaded persisted assignment"
        );
        return Ok(StoredAssignment {
            assignment,
            origin: Origin::Loaded,
        });
    }

    let roster = roster.load_roster()?;
    let graph = ConstraintGraph::build_with_policy(&roster, generator.policy())?;
    tracing::info!(
        participants = graph.len(),
        forbidden_pairs = graph.forbidden_pair_count(),
        seed = generator.seed(),
        max_attempts = generator.max_attempts(),
        "No persisted assignment, drawing a new one"
    );

    let generated = generator.generate(&graph)?;
    store.write(&encode_assignment(&generated.assignment)?)?;

    tracing::info!(
        participants = generated.assignment.len(),
        retries = generated.attempt,
        "Assignment drawn and persisted"
    );

    Ok(StoredAssignment {
        assignment: generated.assignment,
        origin: Origin::Generated {
            seed: generated.seed,
            attempt: generated.attempt,
        },
    })
}
