use std::path::{Path, PathBuf};

use tracing::trace;

use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::exclude::ExclusionFilter;
use crate::iter::{Ranked, RankedWithScore};
use crate::score::VisitWeighted;
use crate::store::RankingStore;

/// A ranking store bound to its exclusion filter and backing location.
///
/// This is what a host wires to its own events: call [`Self::visit`] when a
/// resource is opened and [`Self::save`] on shutdown.
///
/// ```no_run
/// # use frecent::{Config, Tracker};
/// let mut tracker = Tracker::open(Config::default())?;
/// tracker.visit("/home/me/notes.md")?;
/// for (id, score) in tracker.list_ranked_with_score() {
///     println!("{score:>8.2} {id}");
/// }
/// tracker.save()?;
/// # Ok::<(), frecent::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Tracker {
    store: RankingStore<VisitWeighted>,
    filter: ExclusionFilter,
    location: PathBuf,
}

impl Tracker {
    /// Validates `config`, creates an empty image at its history location if
    /// none exists yet, and loads the store from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the image cannot
    /// be created, read, or decoded.
    pub fn open(config: Config) -> Result<Self> {
        let scorer = config.scorer()?;
        let policy = config.aging_policy()?;
        let filter = config.exclusion_filter()?;

        codec::bootstrap(&config.history_location)?;
        let store = codec::load(&config.history_location, scorer, policy)?;

        Ok(Self {
            store,
            filter,
            location: config.history_location,
        })
    }

    /// Records an access to `id` unless the exclusion filter rejects it.
    /// Returns whether the access was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`](crate::Error::InvalidIdentifier)
    /// if `id` is empty.
    pub fn visit(&mut self, id: &str) -> Result<bool> {
        if self.filter.is_excluded(id) {
            trace!(id, "ignoring excluded resource");
            return Ok(false);
        }

        self.store.record_access(id)?;
        Ok(true)
    }

    /// Stops tracking `id`. Returns whether it was tracked.
    pub fn forget(&mut self, id: &str) -> bool {
        self.store.remove(id).is_some()
    }

    /// Forgets every resource. The backing image is untouched until the
    /// next [`Self::save`].
    #[inline]
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Returns tracked identifiers, highest score first.
    #[inline]
    #[must_use]
    pub fn list_ranked(&self) -> Ranked<'_> {
        self.store.list_ranked()
    }

    /// Returns tracked identifiers with their scores, highest score first.
    #[inline]
    #[must_use]
    pub fn list_ranked_with_score(&self) -> RankedWithScore<'_, VisitWeighted> {
        self.store.list_ranked_with_score()
    }

    /// Atomically writes the store to the backing location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceIo`](crate::Error::PersistenceIo) if the
    /// image cannot be written.
    pub fn save(&self) -> Result<()> {
        codec::save(&self.store, &self.location)
    }

    /// Replaces the in-memory store with the image at the backing location,
    /// discarding unsaved accesses.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or decoded. The current
    /// store is kept in that case.
    pub fn reload(&mut self) -> Result<()> {
        let scorer = *self.store.scorer();
        let policy = *self.store.policy();
        self.store = codec::load(&self.location, scorer, policy)?;
        Ok(())
    }

    /// The underlying store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &RankingStore<VisitWeighted> {
        &self.store
    }

    /// The exclusion filter applied by [`Self::visit`].
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    /// The backing location of the store.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }
}
