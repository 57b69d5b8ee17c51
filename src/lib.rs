//! Documentation inventory indexer and lookup service.

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod inventory;
pub mod logging;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;

pub use cache::{BuildSettings, CacheStatus, IndexCache};
pub use config::FinderConfig;
pub use error::FindError;
pub use index::{CorpusIndex, IndexStats};
pub use search::{QueryResult, Suggestion};
pub use state::FindState;
