//! Moving a [`RankingStore`] to and from durable storage.
//!
//! A store is persisted as a whole: the image holds every entry in ranked
//! order and is always written in one atomic step. The on-disk form is JSON,
//! for example:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": [
//!     { "id": "/home/me/notes.md", "rank": 3.0, "visits": 3 },
//!     { "id": "/home/me/todo.txt", "rank": 1.0, "visits": 1 }
//!   ]
//! }
//! ```
//!
//! Encoding the same store always yields the same bytes.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atomic;
use crate::error::{Error, Result};
use crate::score::{AccessHistory, Scorer};
use crate::store::{AgingPolicy, Entry, RankingStore};

/// The image format written by this version of the crate.
pub const FORMAT_VERSION: u32 = 1;

/// The serialized form of a whole [`RankingStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedImage {
    /// Format version of the image.
    pub version: u32,
    /// Every entry, highest score first.
    pub entries: Vec<PersistedEntry>,
}

/// One persisted `(identifier, history)` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntry {
    /// The resource identifier.
    pub id: String,
    /// The decaying accumulator.
    pub rank: f64,
    /// Number of recorded accesses.
    #[serde(default)]
    pub visits: u64,
}

impl PersistedImage {
    /// An image of an empty store.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: Vec::new(),
        }
    }

    /// Takes a snapshot of `store`, preserving its order.
    #[must_use]
    pub fn capture<S: Scorer>(store: &RankingStore<S>) -> Self {
        let entries = store
            .entries()
            .iter()
            .map(|entry| PersistedEntry {
                id: entry.id.clone(),
                rank: entry.history.rank,
                visits: entry.history.visits,
            })
            .collect();
        Self {
            version: FORMAT_VERSION,
            entries,
        }
    }

    /// Rebuilds a store from this image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptPersistedState`] if the version is unknown, or
    /// if any entry has an empty or duplicate identifier or a rank that is
    /// negative or not finite.
    pub fn restore<S: Scorer>(self, scorer: S, policy: AgingPolicy) -> Result<RankingStore<S>> {
        if self.version != FORMAT_VERSION {
            return Err(Error::corrupt(format!(
                "unsupported format version {}",
                self.version
            )));
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut entries = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.into_iter().enumerate() {
            if entry.id.is_empty() {
                return Err(Error::corrupt(format!("entry {index} has an empty id")));
            }
            if !entry.rank.is_finite() || entry.rank < 0.0 {
                return Err(Error::corrupt(format!(
                    "entry {:?} has invalid rank {}",
                    entry.id, entry.rank
                )));
            }
            if !seen.insert(entry.id.clone()) {
                return Err(Error::corrupt(format!("duplicate entry {:?}", entry.id)));
            }

            entries.push(Entry {
                id: entry.id,
                history: AccessHistory {
                    rank: entry.rank,
                    visits: entry.visits,
                },
            });
        }

        Ok(RankingStore::from_entries(entries, scorer, policy))
    }
}

impl Default for PersistedImage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Serializes `store` into its persisted byte form.
///
/// # Errors
///
/// Returns [`Error::CorruptPersistedState`] if the image cannot be encoded,
/// which only happens if a custom scorer produced a non-finite rank.
pub fn encode<S: Scorer>(store: &RankingStore<S>) -> Result<Vec<u8>> {
    encode_image(&PersistedImage::capture(store))
}

/// Deserializes a fresh store from `bytes`.
///
/// # Errors
///
/// Returns [`Error::CorruptPersistedState`] if `bytes` is malformed,
/// truncated, or holds invalid entries. No partial recovery is attempted.
pub fn decode<S: Scorer>(bytes: &[u8], scorer: S, policy: AgingPolicy) -> Result<RankingStore<S>> {
    let image: PersistedImage =
        serde_json::from_slice(bytes).map_err(|e| Error::corrupt(e.to_string()))?;
    image.restore(scorer, policy)
}

/// Atomically writes `store` to `path`, replacing any previous image.
///
/// # Errors
///
/// Returns [`Error::PersistenceIo`] if the image could not be written. The
/// previous image, if any, is left intact in that case.
pub fn save<S: Scorer>(store: &RankingStore<S>, path: &Path) -> Result<()> {
    let bytes = encode(store)?;
    atomic::write(path, &bytes).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), entries = store.len(), "saved ranking store");
    Ok(())
}

/// Reads a store from `path`.
///
/// A missing file is treated as a store that has never been saved and yields
/// an empty store.
///
/// # Errors
///
/// Returns [`Error::PersistenceIo`] if the file exists but cannot be read and
/// [`Error::CorruptPersistedState`] if its contents cannot be decoded.
pub fn load<S: Scorer>(path: &Path, scorer: S, policy: AgingPolicy) -> Result<RankingStore<S>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved ranking store, starting empty");
            return Ok(RankingStore::with_policy(scorer, policy));
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    let store = decode(&bytes, scorer, policy)?;
    debug!(path = %path.display(), entries = store.len(), "loaded ranking store");
    Ok(store)
}

/// Writes an empty image to `path` unless something already exists there.
/// Returns whether an image was written.
///
/// # Errors
///
/// Returns [`Error::PersistenceIo`] if the location cannot be inspected or
/// written.
pub fn bootstrap(path: &Path) -> Result<bool> {
    if path.try_exists().map_err(|e| Error::io(path, e))? {
        return Ok(false);
    }

    let bytes = encode_image(&PersistedImage::empty())?;
    atomic::write(path, &bytes).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "created empty ranking store");
    Ok(true)
}

fn encode_image(image: &PersistedImage) -> Result<Vec<u8>> {
    if let Some(entry) = image.entries.iter().find(|entry| !entry.rank.is_finite()) {
        return Err(Error::corrupt(format!(
            "entry {:?} has non-finite rank {}",
            entry.id, entry.rank
        )));
    }

    let mut bytes = serde_json::to_vec_pretty(image).map_err(|e| Error::corrupt(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}
