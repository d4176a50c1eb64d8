use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::iter::{IntoIter, Iter, Ranked, RankedWithScore};
use crate::score::{AccessHistory, Scorer, VisitWeighted};

/// Controls when and how hard a [`RankingStore`] decays its entries.
///
/// Aging is driven by access volume rather than wall-clock time. Once the sum
/// of every entry's rank exceeds the threshold, each rank is multiplied by the
/// multiplier and entries whose rank falls below
/// [`Self::EVICTION_FLOOR`] are dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgingPolicy {
    threshold: f64,
    multiplier: f64,
}

impl AgingPolicy {
    /// Total rank mass above which the store ages.
    pub const DEFAULT_THRESHOLD: f64 = 9000.0;
    /// Factor applied to every rank when aging.
    pub const DEFAULT_MULTIPLIER: f64 = 0.99;
    /// Entries whose rank decays below this value are evicted.
    pub const EVICTION_FLOOR: f64 = 1.0;

    /// Creates a policy. Returns `None` if the threshold is not a positive
    /// finite number or the multiplier does not lie strictly between zero
    /// and one.
    #[must_use]
    pub fn new(threshold: f64, multiplier: f64) -> Option<Self> {
        let threshold_ok = threshold.is_finite() && threshold > 0.0;
        let multiplier_ok = multiplier > 0.0 && multiplier < 1.0;
        (threshold_ok && multiplier_ok).then_some(Self {
            threshold,
            multiplier,
        })
    }

    /// The total rank mass that triggers aging.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The factor applied to every rank when aging.
    #[inline]
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for AgingPolicy {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entry {
    pub(crate) id: String,
    pub(crate) history: AccessHistory,
}

/// An ordered collection of resources ranked by frecency.
///
/// Entries are kept sorted by descending score after every mutation, so
/// reading the ranking never has to sort. Among entries with equal scores,
/// the one touched most recently comes first.
///
/// The store is intended for a single owner. If it needs to be shared across
/// threads, wrap it in a single lock covering every mutating call.
///
/// ```
/// # use frecent::RankingStore;
/// let mut store = RankingStore::new();
/// store.record_access("/a.txt")?;
/// store.record_access("/b.txt")?;
/// store.record_access("/a.txt")?;
///
/// assert_eq!(store.list_ranked().collect::<Vec<_>>(), ["/a.txt", "/b.txt"]);
/// # Ok::<(), frecent::Error>(())
/// ```
// This is re-exported at the crate root, so this lint can be safely ignored.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq)]
pub struct RankingStore<S: Scorer = VisitWeighted> {
    entries: Vec<Entry>,
    scorer: S,
    policy: AgingPolicy,
}

impl RankingStore {
    /// Creates an empty store using the default scorer and aging policy.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(VisitWeighted::default(), AgingPolicy::default())
    }

    /// Creates an empty store using the scorer and aging policy described by
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any of those settings is out of
    /// range.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_policy(config.scorer()?, config.aging_policy()?))
    }
}

impl Default for RankingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scorer> RankingStore<S> {
    /// Creates an empty store with the provided scorer and aging policy.
    #[inline]
    #[must_use]
    pub const fn with_policy(scorer: S, policy: AgingPolicy) -> Self {
        Self {
            entries: Vec::new(),
            scorer,
            policy,
        }
    }

    /// Builds a store from already-validated entries, restoring the ranked
    /// order. A stable sort is used so a previously saved order is kept.
    pub(crate) fn from_entries(entries: Vec<Entry>, scorer: S, policy: AgingPolicy) -> Self {
        let mut store = Self {
            entries,
            scorer,
            policy,
        };
        store.sort();
        store
    }

    /// Records one access to the resource identified by `id`.
    ///
    /// If the resource is already known its history is advanced, otherwise a
    /// new entry is created from an empty history. The collection is then
    /// re-sorted, placing the touched entry ahead of any entries it ties
    /// with, and aged if the total rank mass exceeds the policy threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `id` is empty. The store is
    /// not modified in that case.
    pub fn record_access(&mut self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidIdentifier);
        }

        let entry = match self.position(id) {
            Some(index) => {
                let mut entry = self.entries.remove(index);
                entry.history = self.scorer.update(&entry.history);
                entry
            }
            None => Entry {
                id: id.to_owned(),
                history: self.scorer.update(&AccessHistory::empty()),
            },
        };

        debug!(
            id,
            rank = entry.history.rank,
            visits = entry.history.visits,
            "recorded access"
        );

        // Moving the entry to the front before the stable sort is what makes
        // it win ties against untouched entries.
        self.entries.insert(0, entry);
        self.sort();
        self.age_if_needed();
        Ok(())
    }

    /// Ages the store if the total rank mass exceeds the policy threshold.
    /// Returns whether a sweep ran.
    pub fn age_if_needed(&mut self) -> bool {
        if self.total_mass() > self.policy.threshold {
            self.age();
            true
        } else {
            false
        }
    }

    /// Unconditionally applies one aging sweep: every rank is multiplied by
    /// the policy multiplier, and entries falling below
    /// [`AgingPolicy::EVICTION_FLOOR`] are removed. Returns the number of
    /// evicted entries.
    pub fn age(&mut self) -> usize {
        let multiplier = self.policy.multiplier;
        let before = self.entries.len();

        self.entries.retain_mut(|entry| {
            entry.history = entry.history.decayed(multiplier);
            entry.history.rank >= AgingPolicy::EVICTION_FLOOR
        });
        self.sort();

        let evicted = before - self.entries.len();
        info!(
            evicted,
            remaining = self.entries.len(),
            mass = self.total_mass(),
            "aged ranking store"
        );
        evicted
    }

    /// Forgets a single resource, returning its history if it was present.
    /// The relative order of the remaining entries is unchanged.
    pub fn remove(&mut self, id: &str) -> Option<AccessHistory> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).history)
    }

    /// Removes every entry.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Returns the history of a resource without counting it as an access.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AccessHistory> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.history)
    }

    /// Returns the current score of a resource, if it is tracked.
    #[must_use]
    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.get(id).map(|history| self.scorer.score(history))
    }

    /// Returns if the resource is tracked.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Returns the number of tracked resources.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns if no resources are tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the sum of every entry's rank. This is a linear time
    /// operation.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|entry| entry.history.rank).sum()
    }

    /// Returns the aging policy of this store.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> &AgingPolicy {
        &self.policy
    }

    /// Returns the scorer of this store.
    #[inline]
    #[must_use]
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Returns an iterator over identifiers and histories, highest score
    /// first.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Returns an iterator over identifiers, highest score first.
    #[inline]
    #[must_use]
    pub fn list_ranked(&self) -> Ranked<'_> {
        Ranked(self.iter())
    }

    /// Returns an iterator over identifiers paired with their score, highest
    /// score first. Scores are computed as the iterator advances.
    #[inline]
    #[must_use]
    pub fn list_ranked_with_score(&self) -> RankedWithScore<'_, S> {
        RankedWithScore {
            inner: self.iter(),
            scorer: &self.scorer,
        }
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn sort(&mut self) {
        let scorer = &self.scorer;
        // `sort_by` is stable, which the tie-breaking rules rely on.
        self.entries.sort_by(|a, b| {
            scorer
                .score(&b.history)
                .total_cmp(&scorer.score(&a.history))
        });
    }
}

impl<'a, S: Scorer> IntoIterator for &'a RankingStore<S> {
    type Item = (&'a str, &'a AccessHistory);

    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Scorer> IntoIterator for RankingStore<S> {
    type Item = (String, AccessHistory);

    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.entries.into_iter())
    }
}
