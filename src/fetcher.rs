//! Orchestration of a fetch run: window selection, bounded-parallel
//! thread processing, and filesystem writes.
//!
//! Threads in the window are processed concurrently by a small worker
//! pool; within one thread, the body fetch and each image download are
//! sequential. A single thread's failure never aborts the run.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{error, info, warn};

use crate::{board, client::Client, result::Result};

/// Number of threads processed concurrently.
const WORKERS: usize = 5;

/// File each thread's raw payload is written to.
const THREAD_FILE: &str = "thread.json";

/// Counters for a completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Threads selected by the window.
    pub selected: usize,
    /// Threads fully fetched and written.
    pub fetched: usize,
    /// Threads that failed and were skipped.
    pub failed: usize,
    /// Images written to disk.
    pub images: usize,
    /// Images that failed and were skipped.
    pub images_skipped: usize,
}

/// Drives one fetch run against a single board.
#[derive(Debug)]
pub struct Fetcher {
    client: Arc<Client>,
    board: String,
    out_root: PathBuf,
}

impl Fetcher {
    /// Validates the board code and fixes the output root.
    ///
    /// No network I/O happens here: an unknown board is rejected before a
    /// single request is dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidBoard`] for codes outside the
    /// allow-list.
    pub fn new(client: Client, board: &str, out_root: impl Into<PathBuf>) -> Result<Self> {
        let board = board::validate(board)?.to_string();
        Ok(Self {
            client: Arc::new(client),
            board,
            out_root: out_root.into(),
        })
    }

    /// Fetches the catalog, selects the `[offset, offset + count)` window
    /// of its thread list, and processes every selected thread.
    ///
    /// Per-thread and per-image failures are logged and counted in the
    /// returned [`Summary`]; they do not propagate.
    ///
    /// # Errors
    ///
    /// Only the catalog fetch is fatal: [`crate::error::Error::Network`]
    /// after retry exhaustion or [`crate::error::Error::Decode`] on a
    /// malformed catalog body.
    pub async fn run(&self, count: usize, offset: usize) -> Result<Summary> {
        let catalog = self.client.get_catalog(&self.board).await?;
        let ids = catalog.thread_ids();
        let selected = window(&ids, offset, count);
        info!(
            board = %self.board,
            catalog = ids.len(),
            selected = selected.len(),
            offset,
            "catalog fetched"
        );

        let workers = Arc::new(Semaphore::new(WORKERS));
        let mut tasks = JoinSet::new();
        for &no in selected {
            let client = Arc::clone(&self.client);
            let workers = Arc::clone(&workers);
            let board = self.board.clone();
            let dir = self.out_root.join(&board).join(no.to_string());
            tasks.spawn(async move {
                let result = async {
                    let _permit = workers.acquire_owned().await?;
                    process_thread(&client, &board, no, &dir).await
                }
                .await;
                (no, result)
            });
        }

        let mut summary = Summary {
            selected: selected.len(),
            ..Summary::default()
        };
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((no, Ok(counts))) => {
                    summary.fetched += 1;
                    summary.images += counts.saved;
                    summary.images_skipped += counts.skipped;
                    info!(board = %self.board, thread = no, images = counts.saved, "thread written");
                }
                Ok((no, Err(err))) => {
                    summary.failed += 1;
                    error!(board = %self.board, thread = no, %err, "thread skipped");
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(board = %self.board, %err, "worker panicked");
                }
            }
        }
        info!(
            fetched = summary.fetched,
            failed = summary.failed,
            images = summary.images,
            images_skipped = summary.images_skipped,
            "run complete"
        );
        Ok(summary)
    }
}

/// The `[offset, offset + count)` slice of `ids`, clamped to bounds.
fn window(ids: &[u64], offset: usize, count: usize) -> &[u64] {
    if offset >= ids.len() {
        return &[];
    }
    let end = ids.len().min(offset.saturating_add(count));
    &ids[offset..end]
}

#[derive(Debug, Default)]
struct ImageCounts {
    saved: usize,
    skipped: usize,
}

/// Fetches one thread body and its attachments into `dir`.
///
/// The raw body bytes are written verbatim as `thread.json`, so reruns
/// against an unchanged thread produce byte-identical files. Image
/// failures are logged and skipped; filesystem failures abort the thread.
async fn process_thread(client: &Client, board: &str, no: u64, dir: &Path) -> Result<ImageCounts> {
    let (thread, raw) = client.get_thread(board, no).await?;
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(THREAD_FILE), &raw).await?;

    let mut counts = ImageCounts::default();
    for attachment in thread.attachments() {
        match client.get_image(board, &attachment).await {
            Ok(blob) => {
                tokio::fs::write(dir.join(attachment.remote_name()), &blob).await?;
                counts.saved += 1;
            }
            Err(err) => {
                warn!(board, thread = no, file = %attachment.remote_name(), %err, "image skipped");
                counts.skipped += 1;
            }
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::window;

    #[test]
    fn window_is_clamped_to_catalog_bounds() {
        let ids: Vec<u64> = (0..10).collect();
        assert_eq!(window(&ids, 0, 5), &ids[0..5]);
        assert_eq!(window(&ids, 7, 5), &ids[7..10]);
        assert_eq!(window(&ids, 0, 100), &ids[..]);
    }

    #[test]
    fn offset_past_the_end_selects_nothing() {
        let ids: Vec<u64> = (0..10).collect();
        assert!(window(&ids, 10, 5).is_empty());
        assert!(window(&ids, usize::MAX, 5).is_empty());
        assert!(window(&[], 0, 5).is_empty());
    }

    #[test]
    fn zero_count_selects_nothing() {
        let ids: Vec<u64> = (0..10).collect();
        assert!(window(&ids, 3, 0).is_empty());
    }

    #[test]
    fn offset_plus_count_does_not_overflow() {
        let ids: Vec<u64> = (0..10).collect();
        assert_eq!(window(&ids, 5, usize::MAX), &ids[5..10]);
    }
}
