//! Named dice maps: translation tables from rolled ordinals to text, used by
//! the mapping operator (`m`). Registries are explicit objects; there is no
//! global map state.

use crate::common::Int;
use std::collections::BTreeMap;
use std::path::Path;

/// Ordinal-to-text entries of a single named map.
pub type DiceMap = BTreeMap<Int, String>;

/// A map literal as it appears in a roll: `{"name" = 1:"a", 2:"b"}`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiceMapDef {
    pub name: String,
    pub entries: DiceMap,
}

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum MapError {
    #[error("line {line}: ordinal {ordinal} appears twice in map {name:?}")]
    DuplicateOrdinal { line: usize, name: String, ordinal: Int },
    #[error("line {line}: ordinal {ordinal} is not a positive integer")]
    NonPositiveOrdinal { line: usize, ordinal: Int },
    #[error("line {line}: entry appears before any map name")]
    MissingName { line: usize },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Holds every dice map available to an evaluation.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DiceMapRegistry {
    maps: BTreeMap<String, DiceMap>,
}

impl DiceMapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a map, replacing any previous map with the same name.
    pub fn register(&mut self, name: impl Into<String>, map: DiceMap) {
        self.maps.insert(name.into(), map);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    pub fn lookup(&self, name: &str, ordinal: Int) -> Option<&str> {
        self.maps.get(name)?.get(&ordinal).map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&DiceMap> {
        self.maps.get(name)
    }

    /// Names of every registered map, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Loads maps from the sectioned text format and returns the names added.
    ///
    /// A line whose first field is an integer is an `ordinal value` entry for
    /// the current section; any other non-empty line opens a new section
    /// named by its trimmed content. Entries may also use `:` between the
    /// ordinal and the value.
    pub fn load_str(&mut self, text: &str) -> Result<Vec<String>, MapError> {
        let mut added = Vec::new();
        let mut current: Option<(String, DiceMap)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            match split_entry(trimmed) {
                Some((ordinal, value)) => {
                    let (name, map) = current
                        .as_mut()
                        .ok_or(MapError::MissingName { line })?;
                    if ordinal < 1 {
                        return Err(MapError::NonPositiveOrdinal { line, ordinal });
                    }
                    if map.insert(ordinal, value.to_owned()).is_some() {
                        return Err(MapError::DuplicateOrdinal {
                            line,
                            name: name.clone(),
                            ordinal,
                        });
                    }
                }
                None => {
                    if let Some((name, map)) = current.take() {
                        added.push(name.clone());
                        self.register(name, map);
                    }
                    current = Some((trimmed.to_owned(), DiceMap::new()));
                }
            }
        }
        if let Some((name, map)) = current {
            added.push(name.clone());
            self.register(name, map);
        }
        Ok(added)
    }

    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MapError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.load_str(&text)
    }
}

/// Splits an entry line into `(ordinal, value)`. Returns `None` for section
/// headers (lines that do not start with an integer field).
fn split_entry(line: &str) -> Option<(Int, &str)> {
    let (head, rest) = match line.split_once(|c: char| c == ':' || c.is_whitespace()) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let ordinal = head.trim().parse().ok()?;
    Some((ordinal, rest))
}
