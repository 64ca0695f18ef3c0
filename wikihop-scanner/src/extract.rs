use crate::frontier::{ARTICLE_PREFIX, PageId, page_id};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static CANONICAL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="canonical"][href]"#).expect("static selector"));
static PAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""wgPageName"\s*:\s*"([^"]+)""#).expect("static regex"));
// Only used to normalise paths; never requested.
static PATH_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://wikihop.invalid/").expect("static url"));

pub const DEFAULT_EXCLUDED_NAMESPACES: &[&str] =
    &["Wikipedia:", "File:", "Help:", "Template:", "Special:"];

/// What a page says about itself and where it links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The identifier the page was served as, if it says.
    pub canonical: Option<PageId>,
    /// Outgoing content links, each listed once, in document order.
    pub links: Vec<PageId>,
}

/// Turns a page body into its canonical identity and outgoing links.
///
/// Synchronous; a body with nothing recognisable yields an empty extraction.
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &str) -> Extraction;
}

/// Extractor for MediaWiki article pages.
pub struct WikiExtractor {
    excluded_namespaces: Vec<String>,
}

impl WikiExtractor {
    pub fn new() -> Self {
        Self::with_excluded_namespaces(DEFAULT_EXCLUDED_NAMESPACES.iter().copied())
    }

    pub fn with_excluded_namespaces<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    /// Reduce an href to an article identifier, or `None` if it is not a
    /// content link.
    pub fn article_link(&self, href: &str) -> Option<PageId> {
        let title = href.strip_prefix(ARTICLE_PREFIX)?;
        let title = title.split(['#', '?']).next().unwrap_or_default();
        let id = page_id(title);
        let name = &id[ARTICLE_PREFIX.len()..];
        if name.is_empty()
            || self
                .excluded_namespaces
                .iter()
                .any(|ns| name.starts_with(ns.as_str()))
        {
            return None;
        }
        Some(id)
    }

    fn page_name(body: &str) -> Option<PageId> {
        let name = PAGE_NAME.captures(body)?.get(1)?.as_str().replace("\\/", "/");
        (!name.is_empty()).then(|| page_id(&name))
    }

    fn canonical_link(document: &Html) -> Option<PageId> {
        let href = document
            .select(&CANONICAL_SELECTOR)
            .next()?
            .value()
            .attr("href")?;
        let url = PATH_BASE.join(href).ok()?;
        url.path().starts_with(ARTICLE_PREFIX).then(|| page_id(url.path()))
    }
}

impl Default for WikiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for WikiExtractor {
    fn extract(&self, body: &str) -> Extraction {
        let document = Html::parse_document(body);

        let mut seen = HashSet::new();
        let links = document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| self.article_link(href))
            .filter(|link| seen.insert(link.clone()))
            .collect();

        let canonical = Self::page_name(body).or_else(|| Self::canonical_link(&document));

        Extraction { canonical, links }
    }
}
