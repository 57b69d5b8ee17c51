//! Token scan, filtering and result assembly.

use super::render::render_page;
use crate::index::CorpusIndex;
use regex::RegexBuilder;
use serde::Serialize;
use std::collections::BTreeSet;

/// A resolved search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub url: String,
}

impl Suggestion {
    /// One display line: a markdown link to the object's documentation.
    pub fn line(&self) -> String {
        format!("[{}]({})", self.name, self.url)
    }
}

/// Outcome of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// Every resolved hit, sorted by name
    pub suggestions: Vec<Suggestion>,
    /// Rendered lines, cut at a line boundary to fit the display limit
    pub display: String,
    /// Lines present in `display`
    pub displayed: usize,
    /// Lines dropped to fit the display limit
    pub filtered: usize,
}

impl QueryResult {
    /// Total number of resolved hits.
    pub const fn total(&self) -> usize {
        self.displayed + self.filtered
    }

    pub const fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Find every space-delimited corpus token containing `query`
/// (case-insensitive), excluding link fragments.
///
/// The returned set is deduplicated and ordered case-sensitively.
pub fn matching_tokens<'c>(corpus: &'c str, query: &str) -> BTreeSet<&'c str> {
    let mut tokens = BTreeSet::new();
    if query.is_empty() {
        return tokens;
    }

    // Dots are allowed on either side so a hit flush against a path
    // separator still lands inside the dotted name.
    let pattern = format!(r"\.?\w*{}\w*\.?", regex::escape(query));
    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Rejected search query {:?}: {}", query, e);
            return tokens;
        }
    };

    for m in re.find_iter(corpus) {
        let start = corpus[..m.start()].rfind(' ').map_or(0, |i| i + 1);
        let end = corpus[m.end()..]
            .find(' ')
            .map_or(corpus.len(), |i| m.end() + i);
        let token = &corpus[start..end];
        if !token.contains('/') {
            tokens.insert(token);
        }
    }

    tokens
}

/// Run a query against the index.
///
/// A blank query returns an empty result without scanning. Tokens that do not
/// resolve through the lookup table (section kinds such as `function` or
/// `class`) are not suggestions and are not counted.
pub fn search(index: &CorpusIndex, query: &str, max_display_chars: usize) -> QueryResult {
    let query = query.trim();
    if query.is_empty() {
        return QueryResult::default();
    }

    let suggestions: Vec<Suggestion> = matching_tokens(index.corpus(), query)
        .into_iter()
        .filter_map(|name| {
            index.resolve(name).map(|url| Suggestion {
                name: name.to_string(),
                url: url.to_string(),
            })
        })
        .collect();

    let (display, displayed) = render_page(&suggestions, max_display_chars);
    let filtered = suggestions.len() - displayed;

    tracing::debug!(
        "Query {:?}: {} suggestions, {} displayed",
        query,
        suggestions.len(),
        displayed
    );

    QueryResult {
        suggestions,
        display,
        displayed,
        filtered,
    }
}
