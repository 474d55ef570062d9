//! Benchmark file parser
//!
//! The benchmark file is a flat list of blocks:
//!
//! ```text
//! ### TASK: R01
//! TYPE: R
//! SCENARIO:
//! The scenario text, possibly spanning
//! several lines, up to the next block.
//! ```
//!
//! Blocks that lack a usable `TYPE:` or `SCENARIO:` field are dropped with a
//! warning instead of failing the whole file. The dropped blocks are returned
//! alongside the tasks so callers can report them.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{HarnessError, Result};
use crate::task::{Task, TaskType};

lazy_static! {
    /// Block marker; everything before the first one is ignored
    static ref TASK_MARKER: Regex = Regex::new(r"(?im)^###\s*TASK\s*:\s*").unwrap();

    /// First non-empty line of a block
    static ref TASK_ID: Regex = Regex::new(r"^\s*([^\r\n]+)").unwrap();

    /// `TYPE:` at line start; the value may sit on the following line and is
    /// validated separately
    static ref TYPE_FIELD: Regex = Regex::new(r"(?im)^[ \t]*TYPE[ \t]*:\s*(\S*)").unwrap();

    /// `SCENARIO:` and everything after it to the end of the block
    static ref SCENARIO_FIELD: Regex = Regex::new(r"(?is)SCENARIO\s*:\s*(.*)$").unwrap();
}

/// Why a block was left out of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing but whitespace followed the marker
    MissingId,
    /// No `TYPE:` field, or its value is not one of D, P, C, R
    MissingType,
    /// No `SCENARIO:` field
    MissingScenario,
    /// A `SCENARIO:` field with no text after it
    EmptyScenario,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingId => "missing task id",
            SkipReason::MissingType => "missing TYPE",
            SkipReason::MissingScenario => "missing SCENARIO",
            SkipReason::EmptyScenario => "empty SCENARIO",
        };
        f.write_str(text)
    }
}

/// A dropped block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Zero-based position of the block among all `### TASK:` blocks
    pub index: usize,
    /// Task id, when one could be read
    pub task_id: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.task_id {
            Some(id) => write!(f, "{} in task {}", self.reason, id),
            None => write!(f, "{} in block #{}", self.reason, self.index + 1),
        }
    }
}

/// Result of parsing a benchmark file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBenchmark {
    /// Valid tasks in source order
    pub tasks: Vec<Task>,
    /// Blocks that were dropped, in source order
    pub skipped: Vec<SkippedBlock>,
}

/// Read and parse a benchmark file
pub fn load_benchmark<P: AsRef<Path>>(path: P) -> Result<ParsedBenchmark> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HarnessError::MissingInput {
            what: "benchmark",
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(parse_benchmark(&text))
}

/// Parse benchmark text into tasks
///
/// Never fails: malformed blocks are logged and reported in
/// [`ParsedBenchmark::skipped`].
pub fn parse_benchmark(text: &str) -> ParsedBenchmark {
    let mut parsed = ParsedBenchmark::default();

    for (index, block) in TASK_MARKER.split(text).skip(1).enumerate() {
        match parse_block(block) {
            Ok(task) => {
                debug!(task_id = %task.id, task_type = %task.task_type, "Parsed task");
                parsed.tasks.push(task);
            }
            Err((task_id, reason)) => {
                let skipped = SkippedBlock {
                    index,
                    task_id,
                    reason,
                };
                warn!("{}, skipping", skipped);
                parsed.skipped.push(skipped);
            }
        }
    }

    parsed
}

fn parse_block(block: &str) -> std::result::Result<Task, (Option<String>, SkipReason)> {
    let id = TASK_ID
        .captures(block)
        .map(|caps| caps[1].trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or((None, SkipReason::MissingId))?;

    let task_type = TYPE_FIELD
        .captures(block)
        .and_then(|caps| single_code(&caps[1]))
        .ok_or_else(|| (Some(id.clone()), SkipReason::MissingType))?;

    let scenario = SCENARIO_FIELD
        .captures(block)
        .map(|caps| caps[1].trim().to_string())
        .ok_or_else(|| (Some(id.clone()), SkipReason::MissingScenario))?;

    if scenario.is_empty() {
        return Err((Some(id), SkipReason::EmptyScenario));
    }

    Ok(Task {
        id,
        task_type,
        scenario,
    })
}

fn single_code(value: &str) -> Option<TaskType> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => TaskType::from_code(code),
        _ => None,
    }
}
