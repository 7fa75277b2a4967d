//! Model of the board catalog: every active thread, organized by pages.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Represents a catalog of threads and their attributes, organized by pages.
///
/// Fetched once per run and treated as read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pages: Vec<Page>,
}

impl Deref for Catalog {
    type Target = Vec<Page>;

    fn deref(&self) -> &Self::Target {
        &self.pages
    }
}

impl Catalog {
    /// Thread ids across all pages, flattened in catalog order.
    pub fn thread_ids(&self) -> Vec<u64> {
        self.pages
            .iter()
            .flat_map(Page::threads)
            .map(CatalogThread::no)
            .collect()
    }
}

/// Represents a page within the [`Catalog`], containing multiple threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// current page number
    page: u32,
    /// threads in the current page
    threads: Vec<CatalogThread>,
}

impl Page {
    /// Returns the page number of the page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the thread summaries on this page, in bump order.
    pub fn threads(&self) -> &[CatalogThread] {
        &self.threads
    }
}

/// Summary of a thread as it appears in the catalog.
///
/// Only the fields this tool reads are modelled; the upstream schema
/// carries many more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogThread {
    /// The numeric id of the OP.
    no: u64,

    /// OP subject text, when one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,

    /// Comment snippet (HTML escaped).
    #[serde(default)]
    com: String,

    /// Number of replies in the thread.
    #[serde(default)]
    replies: u64,

    /// Number of image attachments in the thread.
    #[serde(default)]
    images: u64,

    /// UNIX timestamp of the last thread modification.
    #[serde(default)]
    last_modified: u64,
}

impl CatalogThread {
    /// Returns the numeric id of the OP.
    pub fn no(&self) -> u64 {
        self.no
    }

    /// Returns the OP subject, if any.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Returns the reply count.
    pub fn replies(&self) -> u64 {
        self.replies
    }

    /// Returns the image count.
    pub fn images(&self) -> u64 {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn thread_ids_flatten_pages_in_order() {
        let catalog: Catalog = serde_json::from_str(
            r#"[
                { "page": 1, "threads": [ { "no": 10, "replies": 1 }, { "no": 11 } ] },
                { "page": 2, "threads": [ { "no": 20, "sub": "late thread" } ] }
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.thread_ids(), vec![10, 11, 20]);
    }

    #[test]
    fn empty_catalog_has_no_ids() {
        let catalog: Catalog = serde_json::from_str("[]").unwrap();
        assert!(catalog.thread_ids().is_empty());
    }
}
