use regex::{Regex, RegexSet};

use crate::error::{Error, Result};

/// Returns if any of `patterns` matches anywhere in `id`.
///
/// ```
/// # use regex::Regex;
/// # use frecent::is_excluded;
/// let patterns = [Regex::new(r"\.git/").unwrap()];
/// assert!(is_excluded("/repo/.git/COMMIT_EDITMSG", &patterns));
/// assert!(!is_excluded("/repo/src/main.rs", &patterns));
/// ```
#[must_use]
pub fn is_excluded(id: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(id))
}

/// A compiled set of patterns naming resources that must never be ranked.
///
/// Patterns use [`regex`] syntax and are unanchored: a pattern matching any
/// part of an identifier excludes it.
#[derive(Clone, Debug)]
pub struct ExclusionFilter {
    set: RegexSet,
}

impl ExclusionFilter {
    /// Compiles `patterns` into a filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] naming the first pattern that fails
    /// to compile.
    pub fn new<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| pattern.as_ref().to_owned())
            .collect::<Vec<_>>();

        // Compiling individually first lets the error name the culprit.
        for pattern in &patterns {
            Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        let set = RegexSet::new(&patterns).map_err(|source| Error::InvalidPattern {
            pattern: patterns.join("|"),
            source,
        })?;
        Ok(Self { set })
    }

    /// A filter that excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }

    /// Returns if `id` matches any pattern of this filter.
    #[inline]
    #[must_use]
    pub fn is_excluded(&self, id: &str) -> bool {
        self.set.is_match(id)
    }

    /// Returns if the filter has no patterns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns the source text of every pattern, in the order provided.
    #[inline]
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        self.set.patterns()
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::{is_excluded, ExclusionFilter};
    use crate::Error;

    #[test]
    fn no_patterns_excludes_nothing() {
        assert!(!is_excluded("/a/b.txt", &[]));
        let filter = ExclusionFilter::empty();
        assert!(filter.is_empty());
        assert!(!filter.is_excluded("/a/b.txt"));
    }

    #[test]
    fn matches_anywhere_in_id() {
        let filter = ExclusionFilter::new([r"/tmp/", r"\.elc$"]).unwrap();
        assert!(filter.is_excluded("/tmp/scratch"));
        assert!(filter.is_excluded("/home/me/tmp/scratch"));
        assert!(filter.is_excluded("/lisp/init.elc"));
        assert!(!filter.is_excluded("/lisp/init.el"));
    }

    #[test]
    fn agrees_with_free_function() {
        let sources = ["COMMIT_EDITMSG$", "^/proc/", r"\.cache"];
        let regexes = sources
            .iter()
            .map(|source| Regex::new(source).unwrap())
            .collect::<Vec<_>>();
        let filter = ExclusionFilter::new(sources).unwrap();

        for id in [
            "/repo/.git/COMMIT_EDITMSG",
            "/proc/self/status",
            "/home/me/.cache/x",
            "/home/me/proc/x",
            "/home/me/notes.md",
        ] {
            assert_eq!(filter.is_excluded(id), is_excluded(id, &regexes));
        }
    }

    #[test]
    fn invalid_pattern_is_named() {
        let err = ExclusionFilter::new(["ok", "(unclosed"]).unwrap_err();
        match err {
            Error::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn patterns_are_kept_in_order() {
        let filter = ExclusionFilter::new(["b", "a"]).unwrap();
        assert_eq!(filter.patterns(), ["b", "a"]);
    }
}
