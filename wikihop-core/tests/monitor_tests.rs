// Live statistics reporter against real searches on a mock wiki

use std::time::Duration;
use tokio::time::{sleep, timeout};
use wikihop_core::monitor::Reporter;
use wikihop_scanner::{HttpFetcher, SearchOutcome, Searcher, WikiExtractor};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const TICK: Duration = Duration::from_millis(20);
const LIMIT: Duration = Duration::from_secs(10);

async fn mount_page(server: &MockServer, route: &str, body: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

fn searcher(server: &MockServer) -> Searcher {
    let fetcher = HttpFetcher::with_timeout(&server.uri(), 1).unwrap();
    Searcher::new(fetcher, WikiExtractor::new())
        .with_fetch_workers(2)
        .with_parse_workers(1)
}

async fn wait_until_idle(reporter: &Reporter) {
    timeout(LIMIT, async {
        while reporter.is_polling() {
            sleep(TICK).await;
        }
    })
    .await
    .expect("reporter kept polling after the search stopped");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reporter_polls_until_search_stops() {
    let server = MockServer::start().await;
    // Slow enough that the run is still going when the reporter ticks.
    mount_page(&server, "/wiki/Slow", "<html></html>", Duration::from_secs(5)).await;

    let run = searcher(&server).start("/wiki/Slow", "/wiki/Goal");
    let reporter = Reporter::hidden(run.monitor(), TICK);

    sleep(TICK * 5).await;
    assert!(reporter.is_polling());
    assert!(reporter.message().starts_with("Parsed/s: 0 | Fetched/s: 0"));
    assert!(reporter.message().contains("Known pages: 1"));

    assert!(run.stop_handle().stop());
    wait_until_idle(&reporter).await;

    let outcome = timeout(LIMIT, run.wait()).await.unwrap().unwrap();
    assert_eq!(outcome, SearchOutcome::Stopped);

    reporter.finish("Search stopped").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reporter_resets_counters_on_start() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Lonely", "<html></html>", Duration::ZERO).await;

    let run = searcher(&server).start("/wiki/Lonely", "/wiki/Goal");
    let monitor = run.monitor();
    let outcome = timeout(LIMIT, run.wait()).await.unwrap().unwrap();
    assert_eq!(outcome, SearchOutcome::Exhausted);

    // Counts from before the reporter existed are discarded by it.
    let reporter = Reporter::hidden(monitor.clone(), TICK);
    wait_until_idle(&reporter).await;

    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.fetched, 0);
    assert_eq!(snapshot.parsed, 0);
    assert_eq!(snapshot.known_pages, 1);
    assert_eq!(reporter.message(), "Searching... working");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_finish_aborts_a_running_reporter() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Slow", "<html></html>", Duration::from_secs(5)).await;

    let run = searcher(&server).start("/wiki/Slow", "/wiki/Goal");
    let reporter = Reporter::hidden(run.monitor(), Duration::from_secs(3600));
    assert!(reporter.is_polling());

    let message = "Search stopped";
    timeout(LIMIT, reporter.finish(message))
        .await
        .expect("finish hung on a live reporter");

    assert!(run.stop_handle().is_running());
    run.stop_handle().stop();
    let outcome = timeout(LIMIT, run.wait()).await.unwrap().unwrap();
    assert_eq!(outcome, SearchOutcome::Stopped);
}
