//! Shared test fixtures and utilities for integration tests.
//!
//! Every test builds its own [`IndexCache`] around an in-memory inventory
//! source, so no state leaks between tests and fetches can be counted.
//!
//! # Available Fixtures
//!
//! - `sample_cache`: an empty cache over [`SAMPLE_INVENTORY`] plus its source
//! - `sample_state`: tool-handler state over [`SAMPLE_INVENTORY`]

#![allow(dead_code)] // Items used across different integration test crates

use docfind_mcp::cache::{BuildSettings, IndexCache};
use docfind_mcp::error::FindError;
use docfind_mcp::inventory::{DecodeStrategy, InventorySource, ParseOptions};
use docfind_mcp::search::DEFAULT_DISPLAY_LIMIT;
use docfind_mcp::state::FindState;
use futures::FutureExt;
use futures::future::BoxFuture;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BASE_URL: &str = "https://docs.example/";

/// A small plain-text inventory: one object per line, each line carrying the
/// `py:` role marker, a relative link and the qualified display name.
pub const SAMPLE_INVENTORY: &str = "\
# Sphinx inventory version 2
# Project: edgeiq
# Version: 2.0
edgeiq py:module 0 edgeiq_api/index.html#module-edgeiq - edgeiq.edge_tools std:doc -1 index.html Home
edgeiq.ObjectDetection py:class 1 edgeiq_api/object_detection.html#edgeiq.ObjectDetection - edgeiq.ObjectDetection
edgeiq.ObjectDetection.detect_objects py:method 1 edgeiq_api/object_detection.html#edgeiq.ObjectDetection.detect_objects - edgeiq.ObjectDetection.detect_objects
edgeiq.Classification py:class 1 edgeiq_api/classification.html#edgeiq.Classification - edgeiq.Classification
edgeiq.markup_image py:function 1 edgeiq_api/image_tools.html#edgeiq.markup_image - edgeiq.markup_image
edgeiq.ObjectDetectionResults.predictions py:attribute 1 edgeiq_api/object_detection.html#edgeiq.ObjectDetectionResults.predictions - edgeiq.ObjectDetectionResults.predictions
";

/// In-memory source that counts fetches and can fail or stall on demand.
#[derive(Debug, Default)]
pub struct MemorySource {
    raw: Vec<u8>,
    delay: Duration,
    fail: bool,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self {
            raw: raw.into(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InventorySource for MemorySource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, FindError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(FindError::CorpusUnavailable {
                    reason: "connection refused".to_string(),
                });
            }
            Ok(self.raw.clone())
        }
        .boxed()
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

pub fn settings() -> BuildSettings {
    BuildSettings {
        parse: ParseOptions {
            base_url: BASE_URL.to_string(),
            decode: DecodeStrategy::Utf8,
        },
        fetch_timeout: Duration::from_secs(5),
    }
}

/// A cache paired with the source it reads from, so tests can count fetches.
pub struct TestCache {
    pub source: Arc<MemorySource>,
    pub cache: IndexCache,
}

impl TestCache {
    pub fn new(source: MemorySource) -> Self {
        Self::with_settings(source, settings())
    }

    pub fn with_settings(source: MemorySource, settings: BuildSettings) -> Self {
        docfind_mcp::logging::init();
        let source = Arc::new(source);
        let cache = IndexCache::new(source.clone(), settings);
        Self { source, cache }
    }
}

/// Empty cache over [`SAMPLE_INVENTORY`].
#[fixture]
pub fn sample_cache() -> TestCache {
    TestCache::new(MemorySource::new(SAMPLE_INVENTORY))
}

/// Tool-handler state over [`SAMPLE_INVENTORY`].
#[fixture]
pub fn sample_state() -> FindState {
    docfind_mcp::logging::init();
    let source = Arc::new(MemorySource::new(SAMPLE_INVENTORY));
    FindState::new(IndexCache::new(source, settings()), DEFAULT_DISPLAY_LIMIT)
}
