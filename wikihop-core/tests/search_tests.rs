// End-to-end searches against a mock wiki

use std::time::Duration;
use tokio::time::timeout;
use wikihop_core::search::{SearchOptions, execute_search, normalize_page};
use wikihop_scanner::{DiscoveryKind, SearchOutcome};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn article(name: &str, links: &[&str]) -> String {
    let mut html = format!(
        r#"<html><head><script>RLCONF={{"wgPageName":"{}"}};</script></head><body>"#,
        name
    );
    for link in links {
        html.push_str(&format!(r#"<a href="/wiki/{}">{}</a>"#, link, link));
    }
    html.push_str(r#"<a href="/wiki/Help:Contents">Help</a></body></html>"#);
    html
}

async fn mount_article(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/wiki/{}", route)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

fn options(server: &MockServer, source: &str, destination: &str) -> SearchOptions {
    SearchOptions {
        site: server.uri(),
        source: normalize_page(source),
        destination: normalize_page(destination),
        fetch_workers: 4,
        parse_workers: 2,
        timeout_secs: 5,
        ..SearchOptions::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_finds_two_hop_path() {
    let server = MockServer::start().await;
    mount_article(&server, "GitHub", article("GitHub", &["Git", "Microsoft"])).await;
    mount_article(&server, "Git", article("Git", &["Linus_Torvalds"])).await;
    mount_article(&server, "Microsoft", article("Microsoft", &["Windows"])).await;
    mount_article(&server, "Windows", article("Windows", &[])).await;

    let report = timeout(
        Duration::from_secs(10),
        execute_search(options(&server, "GitHub", "Linus Torvalds")),
    )
    .await
    .expect("search timed out")
    .unwrap();

    match &report.outcome {
        SearchOutcome::Found(discovery) => {
            assert_eq!(discovery.via, DiscoveryKind::Link);
            assert_eq!(
                discovery.path.clone().into_vec(),
                vec!["/wiki/GitHub", "/wiki/Git", "/wiki/Linus_Torvalds"]
            );
        }
        other => panic!("expected a path, got {:?}", other),
    }
    assert_eq!(report.hops(), Some(2));
    assert!(report.pages_discovered >= 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirected_source_matches_destination() {
    let server = MockServer::start().await;
    // Requesting Torvalds serves the Linus_Torvalds article.
    mount_article(&server, "Torvalds", article("Linus_Torvalds", &["Linux"])).await;

    let report = timeout(
        Duration::from_secs(10),
        execute_search(options(&server, "/wiki/Torvalds", "/wiki/Linus_Torvalds")),
    )
    .await
    .expect("search timed out")
    .unwrap();

    match &report.outcome {
        SearchOutcome::Found(discovery) => {
            assert_eq!(discovery.via, DiscoveryKind::Redirect);
            assert_eq!(discovery.path.clone().into_vec(), vec!["/wiki/Torvalds"]);
        }
        other => panic!("expected a redirect match, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unreachable_destination_is_exhausted() {
    let server = MockServer::start().await;
    mount_article(&server, "A", article("A", &["B", "C"])).await;
    mount_article(&server, "B", article("B", &["A"])).await;
    mount_article(&server, "C", article("C", &["Dead_end"])).await;
    // Dead_end is not mounted: wiremock answers 404 and the page is dropped.

    let report = timeout(
        Duration::from_secs(10),
        execute_search(options(&server, "A", "Z")),
    )
    .await
    .expect("search timed out")
    .unwrap();

    assert_eq!(report.outcome, SearchOutcome::Exhausted);
    assert_eq!(report.hops(), None);
    assert_eq!(report.pages_discovered, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_finds_non_ascii_destination() {
    let server = MockServer::start().await;
    mount_article(&server, "Coffee", article("Coffee", &["Espresso", "Caf%C3%A9"])).await;
    mount_article(&server, "Espresso", article("Espresso", &[])).await;
    mount_article(&server, "Caf%C3%A9", article("Café", &[])).await;

    let report = timeout(
        Duration::from_secs(10),
        execute_search(options(&server, "Coffee", "Café")),
    )
    .await
    .expect("search timed out")
    .unwrap();

    match &report.outcome {
        SearchOutcome::Found(discovery) => {
            assert_eq!(discovery.via, DiscoveryKind::Link);
            assert_eq!(
                discovery.path.clone().into_vec(),
                vec!["/wiki/Coffee", "/wiki/Caf%C3%A9"]
            );
        }
        other => panic!("expected a path, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirect_to_title_with_apostrophe() {
    let server = MockServer::start().await;
    mount_article(&server, "Books", article("Books", &["Enders_Game"])).await;
    // The redirect serves the article under its real name.
    mount_article(&server, "Enders_Game", article("Ender's_Game", &["Orson_Scott_Card"])).await;

    let report = timeout(
        Duration::from_secs(10),
        execute_search(options(&server, "Books", "Ender's Game")),
    )
    .await
    .expect("search timed out")
    .unwrap();

    match &report.outcome {
        SearchOutcome::Found(discovery) => {
            assert_eq!(discovery.via, DiscoveryKind::Redirect);
            assert_eq!(
                discovery.path.clone().into_vec(),
                vec!["/wiki/Books", "/wiki/Enders_Game"]
            );
        }
        other => panic!("expected a redirect match, got {:?}", other),
    }
    assert_eq!(report.destination, "/wiki/Ender%27s_Game");
}

#[tokio::test]
async fn test_invalid_site_is_an_error() {
    let options = SearchOptions {
        site: "definitely not a url".to_string(),
        ..SearchOptions::default()
    };

    let err = execute_search(options).await.unwrap_err();
    assert!(err.to_string().contains("Failed to set up HTTP client"));
}
