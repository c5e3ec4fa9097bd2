//! Concurrent parsing of many sheets.
//!
//! Each sheet is loaded and parsed independently; the only thing shared
//! between workers is the read-only [`SheetParser`]. Parsing itself is CPU
//! bound, so it runs on the blocking pool while loads stay on the runtime.

use crate::error::{HeatmapError, Result};
use crate::loader::load_sheet;
use crate::parser::{ParseOptions, ParseResult, SheetParser};

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

/// Outcome for one input file
#[derive(Debug)]
pub struct SheetReport {
    pub path: PathBuf,
    /// `Err` when the file could not be read or the parse task died; parse
    /// failures live inside the `ParseResult`
    pub result: Result<ParseResult>,
}

impl SheetReport {
    pub fn is_success(&self) -> bool {
        self.result.as_ref().is_ok_and(ParseResult::is_success)
    }
}

/// Totals across one batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub sheets_parsed: usize,
    pub sheets_failed: usize,
    pub cells_parsed: usize,
    pub cell_errors: usize,
    pub elapsed: Duration,
}

/// Reports in input order plus totals
#[derive(Debug)]
pub struct BatchReport {
    pub sheets: Vec<SheetReport>,
    pub stats: BatchStats,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.stats.sheets_failed == 0
    }
}

fn parse_task_failure(path: &Path, err: JoinError) -> HeatmapError {
    let message = if err.is_panic() {
        "parser panicked".to_string()
    } else {
        err.to_string()
    };
    HeatmapError::ParseTask {
        path: path.to_path_buf(),
        message,
    }
}

async fn parse_one(parser: Arc<SheetParser>, path: PathBuf) -> SheetReport {
    let bytes = match load_sheet(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return SheetReport {
                path,
                result: Err(e),
            };
        }
    };

    let result = tokio::task::spawn_blocking(move || parser.parse(&bytes))
        .await
        .map_err(|e| parse_task_failure(&path, e));

    SheetReport { path, result }
}

/// Parse every path with at most `max_concurrent` sheets in flight
pub async fn parse_sheets(
    paths: Vec<PathBuf>,
    options: &ParseOptions,
    max_concurrent: usize,
    progress: Option<&ProgressBar>,
) -> BatchReport {
    let start_time = Instant::now();
    let parser = Arc::new(SheetParser::new(options.clone()));
    let concurrent_limit = max_concurrent.max(1).min(paths.len().max(1));
    debug!(
        "Parsing {} sheet(s) with concurrency {}",
        paths.len(),
        concurrent_limit
    );

    let mut indexed: Vec<(usize, SheetReport)> = stream::iter(paths.into_iter().enumerate())
        .map(|(index, path)| {
            let parser = Arc::clone(&parser);
            async move {
                if let Some(pb) = progress {
                    if let Some(file_name) = path.file_name() {
                        pb.set_message(format!("Parsing: {}", file_name.to_string_lossy()));
                    }
                }
                let report = parse_one(parser, path).await;
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                (index, report)
            }
        })
        .buffer_unordered(concurrent_limit)
        .collect()
        .await;
    indexed.sort_by_key(|(index, _)| *index);

    let mut stats = BatchStats::default();
    let sheets: Vec<SheetReport> = indexed
        .into_iter()
        .map(|(_, report)| {
            match &report.result {
                Ok(parsed) => {
                    if let Some(matrix) = parsed.matrix() {
                        stats.sheets_parsed += 1;
                        stats.cells_parsed += matrix.len();
                        info!(
                            "Parsed {}: {}×{}",
                            report.path.display(),
                            matrix.rows(),
                            matrix.columns()
                        );
                    } else {
                        stats.sheets_failed += 1;
                        stats.cell_errors += parsed.diagnostics.cell_error_count();
                        warn!(
                            "Sheet {} failed with {} finding(s)",
                            report.path.display(),
                            parsed.diagnostics.view().len()
                        );
                    }
                }
                Err(e) => {
                    stats.sheets_failed += 1;
                    error!("Could not process {}: {}", report.path.display(), e);
                }
            }
            report
        })
        .collect();

    stats.elapsed = start_time.elapsed();
    BatchReport { sheets, stats }
}
