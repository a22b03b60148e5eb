use crate::feed::{Entry, ParsedFeed};
use crate::error::{Error, Result};
use feed_rs::model;
use feed_rs::parser as feed_parser;
use std::io::Read;

pub struct FeedParser;

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS or Atom document. Every item must carry a title, a link
    /// and a summary; the first item missing one fails the whole document.
    pub fn parse_feed<R: Read>(&self, reader: R) -> Result<ParsedFeed> {
        let feed = feed_parser::parse(reader)
            .map_err(|e| Error::FeedParse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content).unwrap_or_else(|| "Untitled Feed".to_string());

        let entries = feed
            .entries
            .into_iter()
            .map(Self::convert_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(ParsedFeed { title, entries })
    }

    fn convert_entry(entry: model::Entry) -> Result<Entry> {
        let title = entry
            .title
            .map(|t| t.content)
            .ok_or_else(|| Error::MalformedEntry(format!("item '{}' has no title", entry.id)))?;

        // Atom may list replies/edit/self links ahead of the permalink
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone())
            .ok_or_else(|| Error::MalformedEntry(format!("'{}' has no link", title)))?;

        // Atom items often carry only <content>
        let summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .ok_or_else(|| Error::MalformedEntry(format!("'{}' has no summary", title)))?;

        Ok(Entry { title, link, summary })
    }

    pub fn validate_feed_url(&self, url: &str) -> Result<()> {
        let parsed_url = url::Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("Invalid URL: {}", e)))?;

        match parsed_url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::InvalidUrl(format!("Unsupported scheme: {}", scheme))),
        }
    }
}
