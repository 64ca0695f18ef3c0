use crate::coordinator::Coordinator;
use crate::dedup::DedupSet;
use crate::error::SearchError;
use crate::extract::{Extraction, Extractor};
use crate::fetch::Fetcher;
use crate::frontier::{FetchedItem, PageId, PagePath};
use crate::queue::Recv;
use crate::result::{Discovery, DiscoveryKind, SearchOutcome};
use crate::stats::{SearchStats, StatsSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How a fetch worker treats transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Give up on a page after this many attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Pause between attempts. Zero retries immediately.
    pub delay: Duration,
}

/// Everything the workers of one run share.
pub(crate) struct SearchContext {
    pub(crate) coordinator: Coordinator,
    pub(crate) visited: DedupSet<PageId>,
    pub(crate) stats: SearchStats,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) extractor: Arc<dyn Extractor>,
    pub(crate) destination: PageId,
    pub(crate) retry: RetryPolicy,
}

impl SearchContext {
    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        let (fetched, parsed) = self.stats.take();
        StatsSnapshot {
            frontier_depth: self.coordinator.frontier().size(),
            parse_depth: self.coordinator.parse_queue().size(),
            known_pages: self.visited.size(),
            fetched,
            parsed,
        }
    }
}

enum FetchAttempt {
    Body(String),
    Dropped,
    Cancelled,
}

pub(crate) async fn fetch_worker(worker_id: usize, ctx: Arc<SearchContext>) {
    debug!("Fetch worker {} started", worker_id);

    while ctx.coordinator.is_running() {
        let item = match ctx.coordinator.frontier().wait_for_element().await {
            Recv::Item(item) => item,
            Recv::Cancelled => break,
        };

        match fetch_with_retry(&ctx, item.page()).await {
            FetchAttempt::Body(body) => {
                ctx.coordinator.parse_queue().push(FetchedItem {
                    path: item.path,
                    body,
                });
                ctx.stats.record_fetch();
            }
            FetchAttempt::Dropped => ctx.coordinator.retire(),
            FetchAttempt::Cancelled => break,
        }
    }

    debug!("Fetch worker {} finished", worker_id);
}

async fn fetch_with_retry(ctx: &SearchContext, page: &str) -> FetchAttempt {
    let mut attempt: u32 = 0;
    loop {
        if !ctx.coordinator.is_running() {
            return FetchAttempt::Cancelled;
        }
        attempt += 1;

        match ctx.fetcher.fetch(page).await {
            Ok(body) => return FetchAttempt::Body(body),
            Err(e) if !e.is_transient() => {
                warn!("Dropping {}: {}", page, e);
                return FetchAttempt::Dropped;
            }
            Err(e) => {
                if ctx.retry.max_attempts.is_some_and(|max| attempt >= max) {
                    warn!("Giving up on {} after {} attempts: {}", page, attempt, e);
                    return FetchAttempt::Dropped;
                }
                warn!("While attempting to fetch {} (attempt {}): {}", page, attempt, e);
                if !ctx.retry.delay.is_zero() {
                    tokio::time::sleep(ctx.retry.delay).await;
                }
            }
        }
    }
}

pub(crate) async fn parse_worker(worker_id: usize, ctx: Arc<SearchContext>) {
    debug!("Parse worker {} started", worker_id);

    while ctx.coordinator.is_running() {
        let FetchedItem { path, body } = match ctx.coordinator.parse_queue().wait_for_element().await
        {
            Recv::Item(item) => item,
            Recv::Cancelled => break,
        };
        if !ctx.coordinator.is_running() {
            break;
        }

        let extractor = ctx.extractor.clone();
        let extraction = match tokio::task::spawn_blocking(move || extractor.extract(&body)).await
        {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!("Extraction of {} failed: {}", path.last(), SearchError::from(e));
                Extraction::default()
            }
        };

        if let Some(discovery) = check_destination(&ctx.destination, &path, &extraction) {
            if ctx.coordinator.stop(SearchOutcome::Found(discovery.clone())) {
                info!("Found path {} via {:?}", discovery.path, discovery.via);
            }
            break;
        }

        expand(&ctx, &path, extraction.links);
        ctx.stats.record_parse();
        ctx.coordinator.retire();
    }

    debug!("Parse worker {} finished", worker_id);
}

/// Decide whether the page at the end of `path` reaches the destination,
/// either by being served as it or by linking straight to it.
pub(crate) fn check_destination(
    destination: &str,
    path: &PagePath,
    extraction: &Extraction,
) -> Option<Discovery> {
    if extraction.canonical.as_deref() == Some(destination) {
        return Some(Discovery {
            path: path.clone(),
            via: DiscoveryKind::Redirect,
        });
    }

    if extraction.links.iter().any(|link| link == destination) {
        return Some(Discovery {
            path: path.extended(destination),
            via: DiscoveryKind::Link,
        });
    }

    None
}

fn expand(ctx: &SearchContext, path: &PagePath, links: Vec<PageId>) {
    let mut scheduled = 0usize;
    for link in links {
        if ctx.visited.insert_if_absent(link.clone()) {
            ctx.coordinator.schedule(path.extended(link));
            scheduled += 1;
        }
    }
    debug!("Expanded {} with {} new page(s)", path.last(), scheduled);
}
