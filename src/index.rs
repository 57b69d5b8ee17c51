//! The searchable documentation index produced by the inventory parser.

use serde::Serialize;
use std::collections::HashMap;

/// Qualified object name → absolute documentation URL.
pub type Lookup = HashMap<String, String, ahash::RandomState>;

/// Counters collected while parsing an inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Sections that contributed text to the corpus
    pub sections: usize,
    /// Name/link pairs emitted (before deduplication by name)
    pub records: usize,
    /// Malformed sections that were skipped
    pub skipped: usize,
}

/// Immutable, queryable view of one documentation inventory.
///
/// Built once per cache epoch and shared behind an `Arc`; any reload builds a
/// fresh index rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusIndex {
    corpus: String,
    lookup: Lookup,
    stats: IndexStats,
    fingerprint: u64,
}

impl CorpusIndex {
    pub(crate) fn new(
        corpus: String,
        lookup: Lookup,
        stats: IndexStats,
        fingerprint: u64,
    ) -> Self {
        Self {
            corpus,
            lookup,
            stats,
            fingerprint,
        }
    }

    /// Assemble an index directly from a corpus string and name/URL pairs.
    ///
    /// Useful for embedding a pre-built index or for exercising the query
    /// engine without an inventory. Whitespace in the corpus is collapsed to
    /// single spaces, the form queries expect. The fingerprint is derived
    /// from the normalized corpus.
    pub fn from_parts<I, K, V>(corpus: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let corpus: String = corpus.into();
        let corpus = corpus.split_whitespace().collect::<Vec<_>>().join(" ");
        let lookup: Lookup = entries
            .into_iter()
            .map(|(name, url)| (name.into(), url.into()))
            .collect();
        let stats = IndexStats {
            sections: usize::from(!corpus.is_empty()),
            records: lookup.len(),
            skipped: 0,
        };
        let fingerprint = xxhash_rust::xxh3::xxh3_64(corpus.as_bytes());
        Self::new(corpus, lookup, stats, fingerprint)
    }

    /// The space-joined section text that queries scan.
    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub const fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Resolve a qualified name to its documentation URL.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.lookup.get(name).map(String::as_str)
    }

    pub const fn stats(&self) -> IndexStats {
        self.stats
    }

    /// xxh3 hash of the raw inventory bytes this index was parsed from.
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Number of distinct resolvable names.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
