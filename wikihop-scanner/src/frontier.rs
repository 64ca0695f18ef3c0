use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ARTICLE_PREFIX: &str = "/wiki/";

// Characters MediaWiki leaves bare in article URLs; everything else is escaped.
const TITLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b';')
    .remove(b':')
    .remove(b'@')
    .remove(b'$')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')')
    .remove(b',')
    .remove(b'/');

/// Site-relative page identifier, e.g. `/wiki/Rust_(programming_language)`.
pub type PageId = String;

/// Build the identifier for a title or `/wiki/` path.
///
/// Raw (`Café`, `Ender's Game`) and already-escaped (`Caf%C3%A9`,
/// `Ender%27s_Game`) spellings of one title produce the same identifier, so
/// user input, hrefs and a page's own name compare equal.
pub fn page_id(title: &str) -> PageId {
    let title = title.strip_prefix(ARTICLE_PREFIX).unwrap_or(title);
    let decoded = percent_decode_str(title).decode_utf8_lossy();
    let title = decoded.trim().replace(' ', "_");
    format!(
        "{}{}",
        ARTICLE_PREFIX,
        utf8_percent_encode(&title, TITLE_ENCODE_SET)
    )
}

/// Ordered chain of pages from the source to the most recently discovered one.
///
/// Paths are never shared between queue items: branching always produces a
/// fresh copy via [`PagePath::extended`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PagePath(Vec<PageId>);

impl PagePath {
    pub fn new(source: impl Into<PageId>) -> Self {
        Self(vec![source.into()])
    }

    /// The page this path currently ends at.
    pub fn last(&self) -> &str {
        // A path is created with its source and only ever grows.
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn source(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Copy of this path with `next` appended.
    pub fn extended(&self, next: impl Into<PageId>) -> Self {
        let mut pages = Vec::with_capacity(self.0.len() + 1);
        pages.extend(self.0.iter().cloned());
        pages.push(next.into());
        Self(pages)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of links followed, i.e. one less than the number of pages.
    pub fn hops(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<PageId> {
        self.0
    }
}

impl From<Vec<PageId>> for PagePath {
    fn from(pages: Vec<PageId>) -> Self {
        Self(pages)
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for page in &self.0 {
            write!(f, "{} ", page)?;
        }
        write!(f, "]")
    }
}

/// A path awaiting fetch of its last page.
#[derive(Debug, Clone)]
pub struct FrontierItem {
    pub path: PagePath,
}

impl FrontierItem {
    pub fn new(path: PagePath) -> Self {
        Self { path }
    }

    pub fn page(&self) -> &str {
        self.path.last()
    }
}

/// A fetched page body awaiting link extraction.
#[derive(Debug, Clone)]
pub struct FetchedItem {
    pub path: PagePath,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_copies_parent() {
        let parent = PagePath::new("/wiki/A").extended("/wiki/B");
        let left = parent.extended("/wiki/C");
        let right = parent.extended("/wiki/D");

        assert_eq!(parent.into_vec(), vec!["/wiki/A", "/wiki/B"]);
        assert_eq!(left.last(), "/wiki/C");
        assert_eq!(right.last(), "/wiki/D");
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn test_hops_and_source() {
        let path = PagePath::new("/wiki/A");
        assert_eq!(path.hops(), 0);
        assert_eq!(path.source(), "/wiki/A");

        let path = path.extended("/wiki/B").extended("/wiki/C");
        assert_eq!(path.hops(), 2);
        assert_eq!(path.source(), "/wiki/A");
    }

    #[test]
    fn test_page_id_escapes_like_mediawiki() {
        assert_eq!(page_id("Linus Torvalds"), "/wiki/Linus_Torvalds");
        assert_eq!(page_id("/wiki/Caf%C3%A9"), "/wiki/Caf%C3%A9");
        assert_eq!(page_id("Café"), "/wiki/Caf%C3%A9");
        assert_eq!(page_id("/wiki/Café"), "/wiki/Caf%C3%A9");
        assert_eq!(page_id("Ender's Game"), "/wiki/Ender%27s_Game");
        assert_eq!(page_id("/wiki/Ender%27s_Game"), "/wiki/Ender%27s_Game");
        assert_eq!(
            page_id("Rust_(programming_language)"),
            "/wiki/Rust_(programming_language)"
        );
        assert_eq!(page_id("AC/DC"), "/wiki/AC/DC");
        assert_eq!(page_id("Help:Contents"), "/wiki/Help:Contents");
    }

    #[test]
    fn test_page_id_keeps_stray_percent() {
        assert_eq!(page_id("100%"), "/wiki/100%25");
        assert_eq!(page_id("/wiki/100%25"), "/wiki/100%25");
    }

    #[test]
    fn test_display() {
        let path = PagePath::new("/wiki/A").extended("/wiki/B");
        assert_eq!(path.to_string(), "[ /wiki/A /wiki/B ]");
    }

    #[test]
    fn test_serializes_as_array() {
        let path = PagePath::new("/wiki/A").extended("/wiki/B");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["/wiki/A","/wiki/B"]"#);
    }
}
