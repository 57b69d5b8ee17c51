//! Substring search over a [`CorpusIndex`](crate::index::CorpusIndex).
//!
//! The engine is a pure function of the index and the query: it scans the
//! corpus for whole tokens containing the query, keeps the ones that resolve
//! through the lookup table, and renders a length-bounded page of results.

pub(crate) mod hints;
pub(crate) mod query;
pub(crate) mod render;

pub use hints::{CloseName, close_names};
pub use query::{QueryResult, Suggestion, matching_tokens, search};
pub use render::{DEFAULT_DISPLAY_LIMIT, render_page};
