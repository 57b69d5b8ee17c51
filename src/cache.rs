//! Process-lifetime cache for the parsed documentation index.
//!
//! The index is built lazily on first use and then shared read-only. Concurrent
//! callers that find the cache empty all await one shared build future, so the
//! inventory source is hit at most once per epoch. The build runs on its own
//! task, so it completes and is cached even if every caller gives up on it.
//! [`IndexCache::invalidate`] starts a new epoch: a build already in flight
//! still completes for the callers awaiting it, but its result is not stored
//! and the next caller starts over.

use crate::error::FindError;
use crate::index::{CorpusIndex, IndexStats};
use crate::inventory::{InventorySource, ParseOptions, parse_inventory};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default upper bound on a single inventory fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

type SharedBuild = Shared<BoxFuture<'static, Result<Arc<CorpusIndex>, FindError>>>;

/// Everything a build needs besides the source.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub parse: ParseOptions,
    pub fetch_timeout: Duration,
}

/// Snapshot of the cache for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Building,
    Ready {
        stats: IndexStats,
        names: usize,
        fingerprint: u64,
        age: Duration,
    },
}

#[derive(Debug)]
struct Ready {
    index: Arc<CorpusIndex>,
    built_at: Instant,
}

struct InFlight {
    id: u64,
    epoch: u64,
    future: SharedBuild,
}

#[derive(Default)]
struct CacheState {
    ready: Option<Ready>,
    in_flight: Option<InFlight>,
    epoch: u64,
    next_build_id: u64,
}

/// Lazily-built, single-flight holder of a [`CorpusIndex`].
pub struct IndexCache {
    source: Arc<dyn InventorySource>,
    settings: BuildSettings,
    state: Arc<Mutex<CacheState>>,
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("source", &self.source.describe())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl IndexCache {
    pub fn new(source: Arc<dyn InventorySource>, settings: BuildSettings) -> Self {
        Self {
            source,
            settings,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    pub fn source(&self) -> &Arc<dyn InventorySource> {
        &self.source
    }

    /// Get the index, building it if the cache is empty.
    ///
    /// 1. Returns the cached index if present
    /// 2. Joins an in-flight build for the current epoch if one exists
    /// 3. Otherwise starts a new build that later callers can join
    pub async fn get_index(&self) -> Result<Arc<CorpusIndex>, FindError> {
        let (build_id, epoch, future) = {
            let mut state = self.state.lock().await;
            if let Some(ready) = &state.ready {
                tracing::debug!("Index cache hit");
                return Ok(ready.index.clone());
            }

            let epoch = state.epoch;
            let joinable = state
                .in_flight
                .as_ref()
                .filter(|in_flight| in_flight.epoch == epoch)
                .map(|in_flight| (in_flight.id, in_flight.future.clone()));

            if let Some((id, future)) = joinable {
                tracing::debug!("Awaiting in-flight index build #{}", id);
                (id, epoch, future)
            } else {
                let id = state.next_build_id;
                state.next_build_id += 1;
                tracing::info!(
                    "Starting index build #{} from {}",
                    id,
                    self.source.describe()
                );
                let future = self.spawn_build(id, epoch);
                state.in_flight = Some(InFlight {
                    id,
                    epoch,
                    future: future.clone(),
                });
                (id, epoch, future)
            }
        };

        let result = future.await;

        // The build task records its own result; this covers a task that
        // panicked before it got the chance.
        record_build(&mut *self.state.lock().await, build_id, epoch, &result);

        result
    }

    /// Drop the cached index; the next [`get_index`](Self::get_index) rebuilds.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.epoch += 1;
        state.ready = None;
        tracing::info!("Index cache invalidated (epoch {})", state.epoch);
    }

    /// The cached index, without triggering a build.
    pub async fn cached(&self) -> Option<Arc<CorpusIndex>> {
        self.state
            .lock()
            .await
            .ready
            .as_ref()
            .map(|ready| ready.index.clone())
    }

    pub async fn status(&self) -> CacheStatus {
        let state = self.state.lock().await;
        if let Some(ready) = &state.ready {
            return CacheStatus::Ready {
                stats: ready.index.stats(),
                names: ready.index.len(),
                fingerprint: ready.index.fingerprint(),
                age: ready.built_at.elapsed(),
            };
        }
        match &state.in_flight {
            Some(in_flight) if in_flight.epoch == state.epoch => CacheStatus::Building,
            _ => CacheStatus::Empty,
        }
    }

    /// Run a build on its own task and return a future any caller can join.
    ///
    /// The task stores its result before finishing, so the build makes
    /// progress and lands in the cache whether or not anyone is awaiting it.
    fn spawn_build(&self, id: u64, epoch: u64) -> SharedBuild {
        let source = self.source.clone();
        let settings = self.settings.clone();
        let state = self.state.clone();

        let handle = tokio::spawn(async move {
            let result = build_index(source, settings).await;
            record_build(&mut *state.lock().await, id, epoch, &result);
            result
        });

        let joined: BoxFuture<'static, Result<Arc<CorpusIndex>, FindError>> =
            Box::pin(handle.map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(FindError::BuildAborted {
                        reason: e.to_string(),
                    })
                })
            }));

        joined.shared()
    }
}

/// Fetch and parse one inventory.
async fn build_index(
    source: Arc<dyn InventorySource>,
    settings: BuildSettings,
) -> Result<Arc<CorpusIndex>, FindError> {
    let raw = tokio::time::timeout(settings.fetch_timeout, source.fetch())
        .await
        .map_err(|_| {
            FindError::unavailable(format!(
                "fetch from {} timed out after {:?}",
                source.describe(),
                settings.fetch_timeout
            ))
        })??;

    tracing::debug!("Fetched {} inventory bytes", raw.len());

    // Parsing a full inventory is CPU-bound
    let parse = settings.parse;
    let index = tokio::task::spawn_blocking(move || parse_inventory(&raw, &parse))
        .await
        .map_err(|e| FindError::BuildAborted {
            reason: e.to_string(),
        })?;

    Ok(Arc::new(index))
}

/// Settle a finished build: clear its in-flight slot and cache the index if
/// the epoch it started in is still current. Safe to call more than once.
fn record_build(
    state: &mut CacheState,
    build_id: u64,
    epoch: u64,
    result: &Result<Arc<CorpusIndex>, FindError>,
) {
    if !state.in_flight.as_ref().is_some_and(|f| f.id == build_id) {
        return;
    }
    state.in_flight = None;

    match result {
        Ok(index) if epoch == state.epoch && state.ready.is_none() => {
            tracing::info!(
                "Cached index build #{}: {} names from {} sections",
                build_id,
                index.len(),
                index.stats().sections
            );
            state.ready = Some(Ready {
                index: index.clone(),
                built_at: Instant::now(),
            });
        }
        Ok(_) => {
            tracing::debug!("Discarding index build #{} from a stale epoch", build_id);
        }
        Err(e) => {
            tracing::warn!("Index build #{} failed: {}", build_id, e);
        }
    }
}
