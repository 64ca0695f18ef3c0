use crate::frontier::PagePath;
use serde::{Deserialize, Serialize};

/// How the destination was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryKind {
    /// Source and destination are the same page.
    Origin,
    /// The last page of the path was served as the destination (a redirect).
    Redirect,
    /// The last page of the path links to the destination.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub path: PagePath,
    pub via: DiscoveryKind,
}

/// Final result of a search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SearchOutcome {
    Found(Discovery),
    /// Every reachable page was expanded without meeting the destination.
    Exhausted,
    /// An external stop was requested before anything was found.
    Stopped,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&PagePath> {
        match self {
            SearchOutcome::Found(discovery) => Some(&discovery.path),
            _ => None,
        }
    }
}
