//! DTOs shaped for the phone XML templates.

use serde::Serialize;

use crate::domain::entry::DirectoryEntry;
use crate::domain::types::{Cursor, SearchCriteria, SessionKey};
use crate::pagination::{Listing, Page};

/// What a `/list` request asks for. Exactly one mode applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListRequest {
    /// Run a new directory query.
    Search(SearchCriteria),
    /// Continue paging the session's cached results.
    Page(Cursor),
}

/// Result of a `/list` request together with the session that owns the
/// cached results.
#[derive(Debug)]
pub struct ListOutcome {
    pub session: SessionKey,
    pub listing: Listing<DirectoryEntry>,
}

/// Title and body of a `CiscoIPPhoneText` screen.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn no_matches() -> Self {
        Self::new("Search Results", "No matching records found")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryView {
    pub name: String,
    pub number: String,
}

/// Data required to render the directory listing template.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DirectoryPageView {
    pub entries: Vec<EntryView>,
    pub first: usize,
    pub last: usize,
    pub total: usize,
    pub next_offset: Option<usize>,
}

impl From<&Page<DirectoryEntry>> for DirectoryPageView {
    fn from(page: &Page<DirectoryEntry>) -> Self {
        Self {
            entries: page
                .entries
                .iter()
                .map(|entry| EntryView {
                    name: entry.display_name(),
                    number: entry.number.clone().unwrap_or_default(),
                })
                .collect(),
            first: page.offset,
            last: page.last(),
            total: page.total,
            next_offset: page.next_offset,
        }
    }
}
