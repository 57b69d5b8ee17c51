//! "Did you mean" hints for queries with no hits.

use crate::index::CorpusIndex;
use rapidfuzz::distance::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a name to be offered as a hint.
const MIN_SIMILARITY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct CloseName {
    pub name: String,
    pub score: f64,
}

/// Names whose last path segment is most similar to `query`.
///
/// Best score first, ties broken by name.
pub fn close_names(index: &CorpusIndex, query: &str, limit: usize) -> Vec<CloseName> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut hints: Vec<CloseName> = index
        .lookup()
        .keys()
        .filter_map(|name| {
            let segment = name.rsplit('.').next().unwrap_or(name).to_lowercase();
            let score = jaro_winkler::similarity(query.chars(), segment.chars());
            (score >= MIN_SIMILARITY).then(|| CloseName {
                name: name.clone(),
                score,
            })
        })
        .collect();

    hints.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    hints.truncate(limit);
    hints
}
