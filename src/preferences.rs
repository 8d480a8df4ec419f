//! Remembered column choices, keyed by a fingerprint of the CSV headers.
//!
//! Persistence is delegated to a [`KeyValueStore`] passed in by the caller,
//! so the pipeline itself holds no global state. Storage is best effort:
//! a failing store is logged and treated as a miss.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use tracing::{debug, warn};

use crate::ingest::guess_feedback_column;

/// Key prefix for per-fingerprint column choices.
const FINGERPRINT_KEY_PREFIX: &str = "column_pref:";

/// Key holding the most recently selected column name.
const LAST_COLUMN_KEY: &str = "column_pref_last";

/// Minimal string key-value store.
///
/// Implemented by [`MemoryStore`] for tests and by
/// [`SqlitePreferenceStore`](crate::db::SqlitePreferenceStore) for the CLI.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns true if `key` has a value.
    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Order-independent fingerprint of a header set.
///
/// Header names are trimmed, lowercased, sorted and joined with `|`.
///
/// # Examples
///
/// ```
/// use sift::preferences::fingerprint;
///
/// let a = fingerprint(&["Comment ".to_string(), "ID".to_string()]);
/// let b = fingerprint(&["id".to_string(), "comment".to_string()]);
/// assert_eq!(a, "comment|id");
/// assert_eq!(a, b);
/// ```
pub fn fingerprint(headers: &[String]) -> String {
    let mut names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    names.sort();
    names.join("|")
}

/// Where a column choice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Named by the caller.
    Explicit,
    /// Remembered for this exact header set.
    Fingerprint,
    /// The last column name the user picked, present in these headers.
    LastSelected,
    /// Scored by the column heuristic (or column 0 without headers).
    Heuristic,
}

impl fmt::Display for ColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fingerprint => write!(f, "remembered for these headers"),
            Self::LastSelected => write!(f, "last selected column"),
            Self::Explicit => write!(f, "selected"),
            Self::Heuristic => write!(f, "auto-detected"),
        }
    }
}

/// The column picked for extraction and the reason it was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnChoice {
    pub index: usize,
    pub source: ColumnSource,
}

/// Column preferences over an injected key-value store.
pub struct ColumnPreferences<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ColumnPreferences<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Returns the remembered column name for this header set, if any.
    pub fn remembered_for(&self, headers: &[String]) -> Option<String> {
        self.read(&fingerprint_key(headers))
    }

    /// Returns the last column name the user selected, if any.
    pub fn last_selected(&self) -> Option<String> {
        self.read(LAST_COLUMN_KEY)
    }

    /// Records `column_name` as the choice for this header set and as the
    /// last selected column.
    pub fn remember(&self, headers: &[String], column_name: &str) {
        for key in [fingerprint_key(headers), LAST_COLUMN_KEY.to_string()] {
            if let Err(e) = self.store.set(&key, column_name) {
                warn!(key = %key, error = %e, "failed to save column preference");
            }
        }
    }

    /// Picks the feedback column for a table.
    ///
    /// Order: the choice remembered for this header set, then the last
    /// selected column name if these headers contain it, then the heuristic.
    pub fn resolve(&self, headers: Option<&[String]>, rows: &[Vec<String>]) -> ColumnChoice {
        if let Some(headers) = headers {
            let remembered = self
                .remembered_for(headers)
                .and_then(|name| find_column(headers, &name));
            if let Some(index) = remembered {
                debug!(index, "using column remembered for header set");
                return ColumnChoice {
                    index,
                    source: ColumnSource::Fingerprint,
                };
            }

            let last = self
                .last_selected()
                .and_then(|name| find_column(headers, &name));
            if let Some(index) = last {
                debug!(index, "using last selected column");
                return ColumnChoice {
                    index,
                    source: ColumnSource::LastSelected,
                };
            }
        }

        ColumnChoice {
            index: guess_feedback_column(headers, rows),
            source: ColumnSource::Heuristic,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read column preference");
                None
            }
        }
    }
}

/// Finds a header by name, ignoring case and surrounding whitespace.
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    headers
        .iter()
        .position(|h| h.trim().to_lowercase() == wanted)
}

fn fingerprint_key(headers: &[String]) -> String {
    format!("{FINGERPRINT_KEY_PREFIX}{}", fingerprint(headers))
}
