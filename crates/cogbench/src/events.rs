//! Run events
//!
//! The runner reports progress and non-fatal problems (dropped benchmark
//! blocks, missing program fixtures) as [`RunEvent`]s through an
//! [`EventSink`]. The default sink logs them with `tracing`; tests use
//! [`RecordingEventSink`] to assert on them directly.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::parser::SkippedBlock;
use crate::task::TaskType;

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Benchmark file parsed
    TasksLoaded { valid: usize, skipped: usize },
    /// A benchmark block was dropped during parsing
    TaskSkipped(SkippedBlock),
    /// Result file recreated, tasks about to run
    ModelStarted { model: String, result_path: PathBuf },
    /// No program fixture for the task's type; the task is not run
    MissingFixture {
        model: String,
        task_id: String,
        task_type: TaskType,
        path: Option<PathBuf>,
    },
    /// Prompt sent for a task
    TaskStarted { model: String, task_id: String },
    /// Task output appended to the result file
    TaskFinished {
        model: String,
        task_id: String,
        chars: usize,
        duration_ms: u64,
    },
    /// Every task of a model has been processed
    ModelFinished {
        model: String,
        completed: usize,
        skipped: usize,
    },
}

/// Receiver for run events
pub trait EventSink: Send {
    fn emit(&mut self, event: RunEvent);
}

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&mut self, event: RunEvent) {
        match event {
            RunEvent::TasksLoaded { valid, skipped } => {
                info!(valid, skipped, "Loaded benchmark tasks");
            }
            RunEvent::TaskSkipped(block) => debug!("Dropped benchmark block: {}", block),
            RunEvent::ModelStarted { model, result_path } => {
                info!(%model, result = %result_path.display(), "Running benchmark");
            }
            RunEvent::MissingFixture {
                model,
                task_id,
                task_type,
                path,
            } => {
                let path = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<none configured>".to_string());
                warn!(
                    %model,
                    "Missing program file for TYPE={} ({}), skipping task {}",
                    task_type, path, task_id
                );
            }
            RunEvent::TaskStarted { model, task_id } => {
                info!(%model, %task_id, "Executing task");
            }
            RunEvent::TaskFinished {
                model,
                task_id,
                chars,
                duration_ms,
            } => {
                info!(%model, %task_id, chars, duration_ms, "Task finished");
            }
            RunEvent::ModelFinished {
                model,
                completed,
                skipped,
            } => {
                info!(%model, completed, skipped, "Finished all tasks for model");
            }
        }
    }
}

/// Keeps every event in a shared list
///
/// Clones share the same list, so a clone can be handed to the runner while
/// the original is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<RunEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&mut self, event: RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
