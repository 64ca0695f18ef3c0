pub mod coordinator;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod queue;
pub mod result;
pub mod searcher;
pub mod state;
pub mod stats;
mod workers;

pub use error::SearchError;
pub use extract::{Extraction, Extractor, WikiExtractor};
pub use fetch::{Fetcher, HttpFetcher};
pub use frontier::{ARTICLE_PREFIX, PageId, PagePath, page_id};
pub use result::{Discovery, DiscoveryKind, SearchOutcome};
pub use searcher::{RunPhase, SearchMonitor, SearchRun, Searcher, StopHandle};
pub use stats::StatsSnapshot;
pub use workers::RetryPolicy;
