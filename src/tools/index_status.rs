//! Cache diagnostics.

use crate::cache::CacheStatus;
use crate::state::FindState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct IndexStatusRequest {}

pub async fn handle_index_status(
    state: &FindState,
    _request: IndexStatusRequest,
) -> Result<String, String> {
    let source = state.cache().source().describe();
    let body = match state.cache().status().await {
        CacheStatus::Empty => "Index not built yet; the next search builds it.".to_string(),
        CacheStatus::Building => "Index build in progress.".to_string(),
        CacheStatus::Ready {
            stats,
            names,
            fingerprint,
            age,
        } => format!(
            "Index ready: {} names, {} sections, {} records, {} skipped.\n\
             Fingerprint: {:016x}\n\
             Built {}s ago.",
            names,
            stats.sections,
            stats.records,
            stats.skipped,
            fingerprint,
            age.as_secs()
        ),
    };

    Ok(format!("{}\nSource: {}", body, source))
}
