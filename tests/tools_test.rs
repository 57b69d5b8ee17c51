mod common;

use assert2::check;
use common::{MemorySource, SAMPLE_INVENTORY, sample_state, settings};
use docfind_mcp::cache::IndexCache;
use docfind_mcp::state::FindState;
use docfind_mcp::tools::find::{FindRequest, handle_find};
use docfind_mcp::tools::index_status::{IndexStatusRequest, handle_index_status};
use docfind_mcp::tools::reload_index::{ReloadIndexRequest, handle_reload_index};
use rstest::rstest;
use std::sync::Arc;

fn find(query: &str) -> FindRequest {
    FindRequest {
        query: query.to_string(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_lists_matches(sample_state: FindState) {
    let result = handle_find(&sample_state, find("detection")).await;
    check!(result.is_ok(), "Find should succeed: {:?}", result);

    let output = result.unwrap();
    check!(output.starts_with("Results for 'detection' (3 shown):"));
    check!(output.contains(
        "[edgeiq.ObjectDetection](https://docs.example/edgeiq_api/object_detection.html#edgeiq.ObjectDetection)"
    ));
    check!(!output.contains("more not shown"));
}

#[tokio::test(flavor = "multi_thread")]
async fn find_reports_truncated_count() {
    let state = FindState::new(
        IndexCache::new(Arc::new(MemorySource::new(SAMPLE_INVENTORY)), settings()),
        120,
    );
    let output = handle_find(&state, find("detection")).await.unwrap();
    check!(output.contains("1 shown, 2 more not shown"), "{}", output);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_suggests_close_names(sample_state: FindState) {
    let output = handle_find(&sample_state, find("Classificaton")).await.unwrap();
    check!(output.contains("No results found for 'Classificaton'"));
    check!(output.contains("Did you mean"));
    check!(output.contains("`edgeiq.Classification`"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_query_skips_index(sample_state: FindState) {
    let output = handle_find(&sample_state, find("  ")).await.unwrap();
    check!(output.contains("Nothing to search for"));

    let cached = sample_state.cache().cached().await;
    check!(cached.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn find_reports_unavailable_source() {
    let state = FindState::new(
        IndexCache::new(Arc::new(MemorySource::failing()), settings()),
        2048,
    );
    let result = handle_find(&state, find("detection")).await;
    check!(result.is_err());

    let message = result.unwrap_err();
    check!(message.contains("unavailable right now, try again"));
    check!(message.contains("connection refused"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_without_rebuild_clears(sample_state: FindState) {
    handle_find(&sample_state, find("markup")).await.unwrap();

    let output = handle_reload_index(&sample_state, ReloadIndexRequest { rebuild: false })
        .await
        .unwrap();
    check!(output.contains("rebuilt on the next search"));

    let cached = sample_state.cache().cached().await;
    check!(cached.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_with_rebuild_reports_unchanged(sample_state: FindState) {
    handle_find(&sample_state, find("markup")).await.unwrap();

    let output = handle_reload_index(&sample_state, ReloadIndexRequest { rebuild: true })
        .await
        .unwrap();
    check!(output.contains("6 names from 6 sections"), "{}", output);
    check!(output.contains("Inventory unchanged"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_before_and_after_build(sample_state: FindState) {
    let before = handle_index_status(&sample_state, IndexStatusRequest {})
        .await
        .unwrap();
    check!(before.contains("not built yet"));
    check!(before.contains("Source: memory"));

    handle_find(&sample_state, find("markup")).await.unwrap();

    let after = handle_index_status(&sample_state, IndexStatusRequest {})
        .await
        .unwrap();
    check!(after.contains("Index ready: 6 names, 6 sections"), "{}", after);
}
