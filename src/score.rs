/// The access signal accumulated for a single resource.
///
/// `rank` is the decaying accumulator that ordering is based on. It grows by
/// a fixed weight per access and shrinks only when the owning store ages.
/// `visits` counts every recorded access and is never decayed; it is kept for
/// reporting purposes and has no influence on ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccessHistory {
    /// Weighted, decaying visit count. Always non-negative.
    pub rank: f64,
    /// Number of accesses ever recorded for this resource.
    pub visits: u64,
}

impl AccessHistory {
    /// An empty history, as if the resource had never been accessed.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rank: 0.0,
            visits: 0,
        }
    }

    /// Returns this history with its rank multiplied by `multiplier`.
    #[inline]
    #[must_use]
    pub fn decayed(self, multiplier: f64) -> Self {
        Self {
            rank: self.rank * multiplier,
            ..self
        }
    }
}

/// A frecency formula.
///
/// Implementations must uphold the following for every non-negative history
/// `h`:
///
/// - `score(update(h)) >= score(h)`; an access never lowers a rank.
/// - Repeated updates strictly increase the score with no upper cap.
/// - Both functions are deterministic and free of side effects.
/// - `score` is monotonic in [`AccessHistory::rank`].
///
/// [`RankingStore`](crate::RankingStore) calls `score` once per entry every
/// time it re-sorts, so it should be cheap.
pub trait Scorer {
    /// Computes the rank of a history. Higher is more relevant.
    fn score(&self, history: &AccessHistory) -> f64;

    /// Returns the history that results from one more access right now.
    fn update(&self, history: &AccessHistory) -> AccessHistory;
}

/// The default scorer: every access adds a fixed weight to the accumulator,
/// and the score is the accumulator itself.
///
/// Recency comes from the owning store's aging sweep, which multiplies every
/// accumulator down as total access volume grows. Resources that stop being
/// touched therefore sink below ones that are still in use.
///
/// ```
/// # use frecent::{AccessHistory, Scorer, VisitWeighted};
/// let scorer = VisitWeighted::default();
/// let once = scorer.update(&AccessHistory::empty());
/// let twice = scorer.update(&once);
/// assert!(scorer.score(&twice) > scorer.score(&once));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisitWeighted {
    weight: f64,
}

impl VisitWeighted {
    /// The weight added by a single access when none is configured.
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// Creates a scorer adding `weight` per access. Returns `None` unless the
    /// weight is finite and strictly positive, as anything else would break
    /// the monotonicity contract of [`Scorer`].
    #[inline]
    #[must_use]
    pub fn with_weight(weight: f64) -> Option<Self> {
        (weight.is_finite() && weight > 0.0).then_some(Self { weight })
    }

    /// The weight added per access.
    #[inline]
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

impl Default for VisitWeighted {
    fn default() -> Self {
        Self {
            weight: Self::DEFAULT_WEIGHT,
        }
    }
}

impl Scorer for VisitWeighted {
    #[inline]
    fn score(&self, history: &AccessHistory) -> f64 {
        history.rank
    }

    #[inline]
    fn update(&self, history: &AccessHistory) -> AccessHistory {
        AccessHistory {
            rank: history.rank + self.weight,
            visits: history.visits.saturating_add(1),
        }
    }
}
