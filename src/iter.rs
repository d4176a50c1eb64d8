use std::iter::FusedIterator;
use std::slice;
use std::vec;

use crate::score::{AccessHistory, Scorer};
use crate::store::Entry;

/// An iterator over the identifiers and histories of a ranking store, highest
/// score first.
///
/// This is constructed by calling [`RankingStore::iter`].
///
/// [`RankingStore::iter`]: crate::RankingStore::iter
#[derive(Clone, Debug)]
pub struct Iter<'a>(pub(crate) slice::Iter<'a, Entry>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a AccessHistory);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| (entry.id.as_str(), &entry.history))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

/// An iterator over the identifiers of a ranking store, highest score first.
///
/// This is constructed by calling [`RankingStore::list_ranked`].
///
/// [`RankingStore::list_ranked`]: crate::RankingStore::list_ranked
#[derive(Clone, Debug)]
pub struct Ranked<'a>(pub(crate) Iter<'a>);

impl<'a> Iterator for Ranked<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(id, _)| id)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Ranked<'_> {}

impl FusedIterator for Ranked<'_> {}

/// An iterator over the identifiers of a ranking store paired with their
/// current score, highest score first.
///
/// This is constructed by calling [`RankingStore::list_ranked_with_score`].
///
/// [`RankingStore::list_ranked_with_score`]: crate::RankingStore::list_ranked_with_score
#[derive(Debug)]
pub struct RankedWithScore<'a, S> {
    pub(crate) inner: Iter<'a>,
    pub(crate) scorer: &'a S,
}

impl<'a, S: Scorer> Iterator for RankedWithScore<'a, S> {
    type Item = (&'a str, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(id, history)| (id, self.scorer.score(history)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: Scorer> ExactSizeIterator for RankedWithScore<'_, S> {}

impl<S: Scorer> FusedIterator for RankedWithScore<'_, S> {}

/// A consuming iterator over the identifiers and histories of a ranking
/// store, highest score first.
///
/// This is constructed by calling `into_iter` on a
/// [`RankingStore`](crate::RankingStore).
// This is re-exported at the crate root, so this lint can be safely ignored.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct IntoIter(pub(crate) vec::IntoIter<Entry>);

impl Iterator for IntoIter {
    type Item = (String, AccessHistory);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| (entry.id, entry.history))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl FusedIterator for IntoIter {}

impl ExactSizeIterator for IntoIter {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}
