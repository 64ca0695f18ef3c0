use crate::monitor::{REPORT_INTERVAL, Reporter};
use crate::report::SearchReport;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;
use wikihop_scanner::searcher::{DEFAULT_FETCH_WORKERS, DEFAULT_PARSE_WORKERS};
use wikihop_scanner::{
    ARTICLE_PREFIX, HttpFetcher, SearchOutcome, Searcher, WikiExtractor, page_id,
};

pub const DEFAULT_SITE: &str = "https://en.wikipedia.org";
pub const DEFAULT_SOURCE: &str = "/wiki/GitHub";
pub const DEFAULT_DESTINATION: &str = "/wiki/Linus_Torvalds";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Options for configuring a search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub site: String,
    pub source: String,
    pub destination: String,
    pub fetch_workers: usize,
    pub parse_workers: usize,
    pub timeout_secs: u64,
    /// `None` keeps retrying a failing page until the search ends.
    pub max_fetch_attempts: Option<u32>,
    pub retry_delay: Duration,
    pub show_progress: bool,
    /// Turn Ctrl-C into an external stop instead of killing the process.
    pub stop_on_ctrl_c: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            fetch_workers: DEFAULT_FETCH_WORKERS,
            parse_workers: DEFAULT_PARSE_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_fetch_attempts: None,
            retry_delay: Duration::ZERO,
            show_progress: false,
            stop_on_ctrl_c: false,
        }
    }
}

/// Turn user input into a page identifier.
///
/// Accepts `/wiki/Title`, a full article URL, or a bare title such as
/// `Linus Torvalds`. Article titles come out escaped the same way the
/// extractor escapes links; other site paths are kept as given.
pub fn normalize_page(input: &str) -> String {
    let input = input.trim();
    let path = match Url::parse(input) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => input.to_string(),
    };
    if path.starts_with('/') && !path.starts_with(ARTICLE_PREFIX) {
        return path;
    }
    page_id(&path)
}

/// Execute a search with the given options
pub async fn execute_search(options: SearchOptions) -> Result<SearchReport> {
    let SearchOptions {
        site,
        source,
        destination,
        fetch_workers,
        parse_workers,
        timeout_secs,
        max_fetch_attempts,
        retry_delay,
        show_progress,
        stop_on_ctrl_c,
    } = options;

    let fetcher = HttpFetcher::with_timeout(&site, timeout_secs)
        .with_context(|| format!("Failed to set up HTTP client for {}", site))?;
    let searcher = Searcher::new(fetcher, WikiExtractor::new())
        .with_fetch_workers(fetch_workers)
        .with_parse_workers(parse_workers)
        .with_max_fetch_attempts(max_fetch_attempts)
        .with_retry_delay(retry_delay);

    let started = Instant::now();
    let run = searcher.start(&source, &destination);
    let monitor = run.monitor();

    let reporter = show_progress.then(|| Reporter::spawn(monitor.clone(), REPORT_INTERVAL));

    let interrupt = stop_on_ctrl_c.then(|| {
        let stop = run.stop_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() && stop.stop() {
                warn!("Interrupted, stopping search");
            }
        })
    });

    let outcome = run.wait().await.context("Search workers failed")?;
    let elapsed = started.elapsed();

    if let Some(interrupt) = interrupt {
        interrupt.abort();
    }
    if let Some(reporter) = reporter {
        let message = match &outcome {
            SearchOutcome::Found(_) => "Path found!",
            SearchOutcome::Exhausted => "Search space exhausted",
            SearchOutcome::Stopped => "Search stopped",
        };
        reporter.finish(message).await;
    }

    let pages_discovered = monitor.snapshot().known_pages;
    info!(
        "Search {} -> {} finished in {:?}",
        source, destination, elapsed
    );

    Ok(SearchReport {
        site,
        source,
        destination,
        outcome,
        pages_discovered,
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    })
}
