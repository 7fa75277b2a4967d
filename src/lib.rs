#![deny(clippy::all, clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate)]
//! # fourget
//!
//! fourget fetches a bounded window of threads from an imageboard's
//! read-only JSON API and writes each thread's payload and image
//! attachments to disk.
//!
//! The pipeline is flat: validate the board code against a static
//! allow-list, fetch the board catalog, select the `[offset, offset + count)`
//! slice of its thread list, then fetch each selected thread and its
//! images with bounded parallelism. Per-thread and per-image failures are
//! logged and skipped; only board validation and the catalog fetch can
//! abort a run.
//!
//! Requests are paced through a global rate limiter (one request per
//! second by default) and retried a bounded number of times on failure.
//!
//! ## Example: fetching five threads from /po/
//!
//! ```no_run
//! use fourget::{Client, Fetcher};
//!
//! # async fn run() -> fourget::result::Result<()> {
//! let fetcher = Fetcher::new(Client::new(), "po", "archive")?;
//! let summary = fetcher.run(5, 0).await?;
//! println!("fetched {} threads", summary.fetched);
//! # Ok(())
//! # }
//! ```

/// Validation of board codes against the static allow-list.
pub mod board;

/// Client module contains [`Client`] for requesting data.
pub mod client;

/// Contains [`Error`]s that can be thrown by the crate.
///
/// [`Error`]: crate::error::Error
pub mod error;

/// Fetch-run orchestration and the on-disk layout.
pub mod fetcher;

/// Logging setup for the binary.
pub mod logging;

/// Serde models for the catalog and thread endpoints.
pub mod models;

/// Crate-wide [`Result`] alias.
///
/// [`Result`]: crate::result::Result
pub mod result;

pub use client::Client;
pub use fetcher::Fetcher;
