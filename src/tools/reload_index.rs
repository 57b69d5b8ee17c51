//! Administrative reload of the documentation index.

use crate::state::FindState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ReloadIndexRequest {
    /// Rebuild immediately instead of on the next search (default: false)
    #[serde(default)]
    pub rebuild: bool,
}

/// Drop the cached index and optionally rebuild it right away.
pub async fn handle_reload_index(
    state: &FindState,
    request: ReloadIndexRequest,
) -> Result<String, String> {
    let cache = state.cache();
    let previous = cache.cached().await.map(|index| index.fingerprint());

    cache.invalidate().await;

    if !request.rebuild {
        return Ok(
            "Documentation index cleared. It will be rebuilt on the next search.".to_string(),
        );
    }

    let index = cache
        .get_index()
        .await
        .map_err(|e| format!("Index cleared, but the rebuild failed: {}", e))?;

    let stats = index.stats();
    let mut output = format!(
        "Documentation index rebuilt: {} names from {} sections",
        index.len(),
        stats.sections
    );
    if stats.skipped > 0 {
        let _ = write!(output, " ({} malformed sections skipped)", stats.skipped);
    }
    output.push_str(".\n");

    match previous {
        Some(old) if old == index.fingerprint() => {
            output.push_str("Inventory unchanged since the previous build.\n");
        }
        Some(old) => {
            let _ = writeln!(
                output,
                "Inventory changed: {:016x} -> {:016x}",
                old,
                index.fingerprint()
            );
        }
        None => {}
    }

    Ok(output)
}
