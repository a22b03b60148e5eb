use regex::{Regex, RegexBuilder};
use tracing::info;

use crate::error::{Error, Result};
use crate::feed::Entry;

/// Matches entry titles against the tracked platform names.
///
/// Each pattern is literal text found anywhere in the title, ignoring case.
/// An empty pattern list matches nothing.
#[derive(Debug, Clone)]
pub struct PlatformFilter {
    patterns: Vec<String>,
    matcher: Option<Regex>,
}

impl PlatformFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();

        let matcher = if patterns.is_empty() {
            None
        } else {
            let alternation = patterns
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::Config(format!("Invalid platform patterns: {}", e)))?;
            Some(regex)
        };

        Ok(Self { patterns, matcher })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, title: &str) -> bool {
        self.matcher.as_ref().map_or(false, |m| m.is_match(title))
    }

    /// Keep the entries whose title mentions a tracked platform, in input
    /// order. Every kept entry is reported as it is found, whether or not it
    /// turns out to be new.
    pub fn filter(&self, entries: Vec<Entry>) -> Vec<Entry> {
        entries
            .into_iter()
            .filter(|entry| {
                let keep = self.matches(&entry.title);
                if keep {
                    info!("New entry found > {}", entry.to_report_line());
                }
                keep
            })
            .collect()
    }
}
