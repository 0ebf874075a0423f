use crate::config::FilterConfig;
use crate::error::{ListingError, Result};
use crate::job::CancelFlag;
use crate::pipeline::{Aggregator, ArtifactPaths, DocumentPreset, OutputWriter};
use crate::scanner::{ensure_directory, DirectoryScanner, FilterSet};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Bounded so a stalled observer applies backpressure to the worker.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobState {
    Idle,
    Running,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub qualifying_files: usize,
    pub total_files: usize,
    pub lines_written: usize,
    pub artifacts: ArtifactPaths,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum JobEvent {
    Progress(u8),
    Finished(RunSummary),
    Failed(ListingError),
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress(_))
    }
}

/// Owns the single background listing task.
///
/// At most one run is active at a time; a second `start` while running is
/// rejected with [`ListingError::Busy`] rather than queued.
pub struct JobController {
    running: Arc<AtomicBool>,
    filter_config: FilterConfig,
    preset: DocumentPreset,
}

impl JobController {
    pub fn new(filter_config: FilterConfig, preset: DocumentPreset) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            filter_config,
            preset,
        }
    }

    pub fn state(&self) -> JobState {
        if self.running.load(Ordering::SeqCst) {
            JobState::Running
        } else {
            JobState::Idle
        }
    }

    /// Validate the request and spawn the run on the blocking pool of the
    /// current tokio runtime.
    ///
    /// Validation order is empty filter, then busy, then missing root; none of
    /// them touch the disk beyond checking that the root is a directory.
    /// Calling this outside a runtime is a `Config` error.
    pub fn start(&self, root: &Path, filters: &FilterSet, destination_base: &Path) -> Result<JobHandle> {
        if filters.is_empty() {
            return Err(ListingError::EmptyFilter);
        }

        let runtime = Handle::try_current().map_err(|e| ListingError::Config {
            message: format!("Listing runs need a tokio runtime: {}", e),
        })?;

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ListingError::Busy);
        }
        let guard = RunningGuard {
            running: self.running.clone(),
        };

        // Dropping the guard on this early return puts the controller back to Idle.
        ensure_directory(root)?;

        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancelFlag::new();

        let run = RunRequest {
            root: root.to_path_buf(),
            filters: filters.clone(),
            destination_base: destination_base.to_path_buf(),
            filter_config: self.filter_config.clone(),
            preset: self.preset.clone(),
            cancel: cancel.clone(),
        };

        tracing::info!(
            root = %run.root.display(),
            extensions = ?run.filters.to_vec(),
            "Starting listing run"
        );

        runtime.spawn_blocking(move || {
            let progress_sender = sender.clone();
            let result = run.execute(|percent| {
                // A dropped handle only loses the events; the run still completes.
                let _ = progress_sender.blocking_send(JobEvent::Progress(percent));
            });

            let terminal = match result {
                Ok(summary) => {
                    tracing::info!(
                        lines = summary.lines_written,
                        files = summary.qualifying_files,
                        elapsed = ?summary.elapsed,
                        "Listing run finished"
                    );
                    JobEvent::Finished(summary)
                }
                Err(e) => {
                    tracing::warn!("Listing run failed: {}", e);
                    JobEvent::Failed(e)
                }
            };

            drop(guard);
            let _ = sender.blocking_send(terminal);
        });

        Ok(JobHandle {
            events: receiver,
            cancel,
            finished: false,
        })
    }
}

struct RunningGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

struct RunRequest {
    root: PathBuf,
    filters: FilterSet,
    destination_base: PathBuf,
    filter_config: FilterConfig,
    preset: DocumentPreset,
    cancel: CancelFlag,
}

impl RunRequest {
    fn execute<F>(&self, mut on_progress: F) -> Result<RunSummary>
    where
        F: FnMut(u8),
    {
        let start = Instant::now();

        let enumeration = DirectoryScanner::new(&self.filter_config).enumerate(&self.root, &self.filters)?;

        let buffer = Aggregator::new()
            .with_cancel_flag(self.cancel.clone())
            .aggregate(&enumeration.qualifying, |progress| on_progress(progress.percent()))?;

        self.cancel.check()?;

        let lines_written = OutputWriter::new(self.preset.clone()).write(&buffer, &self.destination_base)?;

        Ok(RunSummary {
            root: enumeration.root,
            qualifying_files: enumeration.qualifying.len(),
            total_files: enumeration.all_files.len(),
            lines_written,
            artifacts: ArtifactPaths::for_base(&self.destination_base),
            elapsed: start.elapsed(),
        })
    }
}

/// Receiving side of one run: progress events, then exactly one terminal event.
pub struct JobHandle {
    events: mpsc::Receiver<JobEvent>,
    cancel: CancelFlag,
    finished: bool,
}

impl JobHandle {
    /// Next event of the run, or `None` once the terminal event was delivered.
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        if self.finished {
            return None;
        }

        let event = self.events.recv().await;
        if event.as_ref().is_none_or(JobEvent::is_terminal) {
            self.finished = true;
        }
        event
    }

    /// Forward every progress percent to `observer` and return the outcome.
    pub async fn wait<F>(mut self, mut observer: F) -> Result<RunSummary>
    where
        F: FnMut(u8),
    {
        while let Some(event) = self.next_event().await {
            match event {
                JobEvent::Progress(percent) => observer(percent),
                JobEvent::Finished(summary) => return Ok(summary),
                JobEvent::Failed(error) => return Err(error),
            }
        }

        Err(ListingError::Io(std::io::Error::other(
            "listing task ended without reporting a result",
        )))
    }

    /// Request cooperative cancellation; takes effect before the next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }
}
