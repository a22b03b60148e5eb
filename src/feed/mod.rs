pub mod fetcher;
pub mod filter;
pub mod parser;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One feed item of interest.
///
/// `title` doubles as the identity key when deduplicating against the store.
/// Two announcements sharing a title are treated as the same release, and an
/// edited title shows up as a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: String,
    pub entries: Vec<Entry>,
}

/// Anything that can turn a feed URL into entries. The update cycle only
/// talks to this trait, so it can be driven without a network.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<Entry>>;
}

impl Entry {
    pub fn new(title: impl Into<String>, link: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            summary: summary.into(),
        }
    }

    /// Single-line form used when a match is reported.
    pub fn to_report_line(&self) -> String {
        format!("{} [{}] - Summary: {}", self.title, self.link, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_line() {
        let entry = Entry::new(
            "Ubuntu 22.04 released",
            "https://distrowatch.com/ubuntu",
            "LTS release",
        );
        assert_eq!(
            entry.to_report_line(),
            "Ubuntu 22.04 released [https://distrowatch.com/ubuntu] - Summary: LTS release"
        );
    }
}
