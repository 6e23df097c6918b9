//! Concurrent parsing of located files.
//!
//! Parsing itself is synchronous; each file is handed to Tokio's blocking pool and the
//! results are collected in the order the files were given, so the report keeps the
//! locator's priority order.

use std::path::PathBuf;

use desktop_entries::DesktopFile;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::report::Finding;

/// Default parallelism when `--jobs` is not given.
pub fn default_jobs() -> usize {
    num_cpus::get().saturating_mul(4).max(8)
}

/// Parse a list of `.desktop` files with bounded parallelism.
///
/// - `jobs` caps how many files are read at once.
/// - Per-file errors are converted into a `Failed` finding.
pub async fn parse_files_concurrently(files: Vec<PathBuf>, jobs: usize) -> Vec<Finding> {
    let jobs = jobs.max(1);
    debug!(jobs, count = files.len(), "Starting concurrent parsing");

    stream::iter(files)
        .map(|path| async move {
            let task_path = path.clone();
            let joined = tokio::task::spawn_blocking(move || {
                let file = DesktopFile::new(task_path);
                file.entries().cloned()
            })
            .await;

            match joined {
                Ok(Ok(sections)) => Finding::parsed(path, sections),
                Ok(Err(e)) => {
                    warn!(file = %path.display(), error = %e, "Failed to parse file");
                    Finding::failed(path, e.to_string())
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Parse task failed");
                    Finding::failed(path, format!("Parse task failed: {e}"))
                }
            }
        })
        .buffered(jobs)
        .collect()
        .await
}
