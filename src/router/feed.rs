//! Line-oriented notification feed
//!
//! Reads one JSON notification per line until EOF. Lines that do not parse
//! (bad JSON, unknown event, invalid UTF-8) are logged and skipped; a
//! storage failure stops the feed.
//!
//! `run_shared_feed` drives a router behind a mutex that is held for the
//! whole of each dispatch, so a shutdown handler that takes the same lock
//! only ever observes fully processed notifications.

use std::io::{self, BufRead};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info, warn};

use super::EventRouter;
use crate::gateway::Notification;
use crate::storage::{ActivityLog, StorageError, StorageResult};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to read feed: {0}")]
    Read(#[from] io::Error),

    #[error("storage failure at feed line {line}: {source}")]
    Storage {
        line: usize,
        #[source]
        source: StorageError,
    },
}

/// Line counts for one feed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub lines: usize,
    pub dispatched: usize,
    pub skipped: usize,
}

impl<L: ActivityLog> EventRouter<L> {
    /// Dispatch every notification from `reader` (blocking)
    pub fn run_feed<R: BufRead>(&mut self, reader: R) -> Result<FeedReport, FeedError> {
        let report = feed_lines(reader, |notification| self.dispatch(notification))?;
        self.log_summary();
        Ok(report)
    }
}

/// Like [`EventRouter::run_feed`], locking `router` for each dispatch
pub fn run_shared_feed<L, R>(router: &Mutex<EventRouter<L>>, reader: R) -> Result<FeedReport, FeedError>
where
    L: ActivityLog,
    R: BufRead,
{
    let report = feed_lines(reader, |notification| router.lock().dispatch(notification))?;
    router.lock().log_summary();
    Ok(report)
}

fn feed_lines<R, F>(mut reader: R, mut dispatch: F) -> Result<FeedReport, FeedError>
where
    R: BufRead,
    F: FnMut(Notification) -> StorageResult<()>,
{
    let mut report = FeedReport::default();
    let mut line = Vec::new();

    while reader.read_until(b'\n', &mut line)? > 0 {
        report.lines += 1;
        let trimmed = line.trim_ascii();
        if !trimmed.is_empty() {
            match serde_json::from_slice::<Notification>(trimmed) {
                Ok(notification) => {
                    if let Err(source) = dispatch(notification) {
                        error!("Storage failure on line {}: {}", report.lines, source);
                        return Err(FeedError::Storage {
                            line: report.lines,
                            source,
                        });
                    }
                    report.dispatched += 1;
                }
                Err(e) => {
                    warn!("Skipping feed line {}: {}", report.lines, e);
                    report.skipped += 1;
                }
            }
        }
        line.clear();
    }

    info!(
        "Feed ended after {} lines ({} dispatched, {} skipped)",
        report.lines, report.dispatched, report.skipped
    );
    Ok(report)
}
