//! Shared state behind the tool handlers.

use crate::cache::IndexCache;
use crate::config::FinderConfig;
use crate::error::FindError;
use crate::search::{self, QueryResult};

/// Owns the index cache and the display settings for queries.
#[derive(Debug)]
pub struct FindState {
    cache: IndexCache,
    max_display_chars: usize,
}

impl FindState {
    pub fn new(cache: IndexCache, max_display_chars: usize) -> Self {
        Self {
            cache,
            max_display_chars,
        }
    }

    pub fn from_config(config: &FinderConfig) -> Self {
        let cache = IndexCache::new(config.source.build(), config.build_settings());
        Self::new(cache, config.max_display_chars)
    }

    pub const fn cache(&self) -> &IndexCache {
        &self.cache
    }

    pub const fn max_display_chars(&self) -> usize {
        self.max_display_chars
    }

    /// Search the documentation, building the index on first use.
    ///
    /// A blank query never touches the cache.
    pub async fn find(&self, query: &str) -> Result<QueryResult, FindError> {
        if query.trim().is_empty() {
            return Ok(QueryResult::default());
        }
        let index = self.cache.get_index().await?;
        Ok(search::search(&index, query, self.max_display_chars))
    }
}
