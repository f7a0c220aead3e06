//! Keyword matching over program entries
//!
//! Fields are tried in a fixed order and the first field containing any
//! keyword decides the match.

use super::entry::ProgramEntry;
use serde::Serialize;

/// Program field a keyword was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Info,
    Performers,
    Description,
}

impl MatchField {
    /// Order in which fields are searched
    pub const PRIORITY: [MatchField; 4] = [
        MatchField::Title,
        MatchField::Info,
        MatchField::Performers,
        MatchField::Description,
    ];

    /// Field text, `None` when the entry has no value for it
    pub fn text<'a>(&self, entry: &'a ProgramEntry) -> Option<&'a str> {
        match self {
            MatchField::Title => Some(entry.title.as_str()),
            MatchField::Info => entry.info.as_deref(),
            MatchField::Performers => Some(entry.performers.as_str()),
            MatchField::Description => entry.description.as_deref(),
        }
    }
}

/// Case-sensitive "any of these terms" matcher. With no terms it is
/// disabled and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordMatcher {
    terms: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matcher = Self::default();
        matcher.set_keywords(keywords);
        matcher
    }

    /// Replace the keyword list. An empty term is kept and matches every
    /// program; only an empty list disables the matcher.
    pub fn set_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = keywords
            .into_iter()
            .map(Into::into)
            .collect();
        tracing::debug!("Keywords set: {}", self.terms.join("|"));
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_enabled(&self) -> bool {
        !self.terms.is_empty()
    }

    fn found_in(&self, text: &str) -> bool {
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }

    /// First field, in [`MatchField::PRIORITY`] order, that contains a term
    pub fn matched_field(&self, entry: &ProgramEntry) -> Option<MatchField> {
        if !self.is_enabled() {
            return None;
        }

        MatchField::PRIORITY
            .into_iter()
            .find(|field| field.text(entry).is_some_and(|text| self.found_in(text)))
    }

    pub fn matches(&self, entry: &ProgramEntry) -> bool {
        self.matched_field(entry).is_some()
    }
}
