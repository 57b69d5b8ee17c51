//! Substring search handler for documented objects.

use crate::search::close_names;
use crate::state::FindState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Number of close-name hints offered when a query has no hits.
const HINT_LIMIT: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindRequest {
    /// Text to look for inside documented object names (case-insensitive)
    pub query: String,
}

/// Execute a documentation lookup and format it for the caller.
pub async fn handle_find(state: &FindState, request: FindRequest) -> Result<String, String> {
    let query = request.query.trim();
    if query.is_empty() {
        return Ok(
            "Nothing to search for. Give part of an object name, e.g. `Detection`.".to_string(),
        );
    }

    let result = state.find(query).await.map_err(|e| {
        format!(
            "Documentation search is unavailable right now, try again in a moment.\n\nReason: {}",
            e
        )
    })?;

    if result.is_empty() {
        let mut msg = format!("No results found for '{}'.\n", query);

        // The index is built at this point; hints never trigger a fetch.
        if let Some(index) = state.cache().cached().await {
            let hints = close_names(&index, query, HINT_LIMIT);
            if !hints.is_empty() {
                msg.push_str("\nDid you mean:\n");
                for hint in hints {
                    let _ = writeln!(msg, "• `{}`", hint.name);
                }
            }
        }
        return Ok(msg);
    }

    let mut output = format!("Results for '{}' ({} shown", query, result.displayed);
    if result.filtered > 0 {
        let _ = write!(output, ", {} more not shown", result.filtered);
    }
    output.push_str("):\n\n");
    output.push_str(&result.display);

    if result.displayed == 0 {
        output.push_str("(results too long to display, try a more specific query)");
    }

    Ok(output)
}
