//! Participant roster: name -> names that participant must not draw
//!
//! On disk the roster is a JSON object:
//!
//! ```json
//! { "Anna": ["Bertil"], "Bertil": ["Anna"], "Cecilia": [] }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Participants and their forbidden recipients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a roster from its JSON form
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| ConfigError::MalformedRoster(e.to_string()))?;

        let mut roster = Self::new();
        for (name, forbidden) in raw {
            roster.insert(name, forbidden)?;
        }
        Ok(roster)
    }

    /// Read and parse a roster file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::RosterUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Add a participant with the given forbidden recipients.
    ///
    /// Forbidden names are merged if the participant already exists. Names are
    /// case-sensitive and must not be blank.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, forbidden: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::MalformedRoster(
                "participant name must not be blank".into(),
            ));
        }

        let mut set = BTreeSet::new();
        for f in forbidden {
            let f = f.into();
            if f.trim().is_empty() {
                return Err(ConfigError::MalformedRoster(format!(
                    "{name} lists a blank forbidden name"
                )));
            }
            set.insert(f);
        }

        self.entries.entry(name).or_default().extend(set);
        Ok(())
    }

    /// Add a participant without constraints, keeping any existing entry
    pub fn add_participant(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        self.insert(name, std::iter::empty::<String>())
    }

    /// Participant names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Forbidden recipients for a participant
    pub fn forbidden_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(name)
    }

    /// Iterate over (participant, forbidden recipients)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the roster comes from when an assignment has to be generated
pub trait RosterSource {
    fn load_roster(&self) -> Result<Roster, ConfigError>;
}

impl RosterSource for Roster {
    fn load_roster(&self) -> Result<Roster, ConfigError> {
        Ok(self.clone())
    }
}

/// Roster read lazily from a JSON file
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterSource for RosterFile {
    fn load_roster(&self) -> Result<Roster, ConfigError> {
        Roster::load(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster() {
        let roster =
            Roster::from_json(r#"{"Anna": ["Bertil"], "Bertil": [], "Cecilia": ["Anna", "Anna"]}"#)
                .unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.names().collect::<Vec<_>>(), ["Anna", "Bertil", "Cecilia"]);
        assert_eq!(roster.forbidden_of("Cecilia").unwrap().len(), 1);
        assert!(roster.forbidden_of("Bertil").unwrap().is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let roster = Roster::from_json(r#"{"anna": [], "Anna": []}"#).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_malformed_json() {
        let err = Roster::from_json(r#"["Anna", "Bertil"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedRoster(_)));

        let err = Roster::from_json(r#"{"Anna": "Bertil"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedRoster(_)));
    }

    #[test]
    fn test_blank_names_rejected() {
        let err = Roster::from_json(r#"{"  ": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedRoster(_)));

        let err = Roster::from_json(r#"{"Anna": [""]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedRoster(_)));
    }

    #[test]
    fn test_add_participant_keeps_constraints() {
        let mut roster = Roster::from_json(r#"{"Anna": ["Bertil"], "Bertil": []}"#).unwrap();
        roster.add_participant("Anna").unwrap();
        roster.add_participant("David").unwrap();

        assert_eq!(roster.len(), 3);
        assert!(roster.forbidden_of("Anna").unwrap().contains("Bertil"));
        assert!(roster.contains("David"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = RosterFile::new(dir.path().join("missing.json"));
        let err = source.load_roster().unwrap_err();
        assert!(matches!(err, ConfigError::RosterUnreadable { .. }));
    }
}
