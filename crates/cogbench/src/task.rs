//! Benchmark task records
//!
//! A task is one `### TASK:` block of the benchmark file after parsing. The
//! type code selects which CogBASIC program fixture the task is run against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed task categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskType {
    /// Declarations (`D`)
    #[serde(rename = "D")]
    Declaration,
    /// Procedures (`P`)
    #[serde(rename = "P")]
    Procedure,
    /// Conflicts (`C`)
    #[serde(rename = "C")]
    Conflict,
    /// Resolutions (`R`)
    #[serde(rename = "R")]
    Resolution,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::Declaration,
        TaskType::Procedure,
        TaskType::Conflict,
        TaskType::Resolution,
    ];

    /// Map a type letter to its category. Lowercase letters are accepted.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'D' => Some(TaskType::Declaration),
            'P' => Some(TaskType::Procedure),
            'C' => Some(TaskType::Conflict),
            'R' => Some(TaskType::Resolution),
            _ => None,
        }
    }

    /// The single-letter code used in benchmark and result files
    pub fn code(&self) -> char {
        match self {
            TaskType::Declaration => 'D',
            TaskType::Procedure => 'P',
            TaskType::Conflict => 'C',
            TaskType::Resolution => 'R',
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.code(), f)
    }
}

/// A parsed benchmark entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier from the `### TASK:` line (not required to be unique)
    pub id: String,
    /// Category selecting the program fixture
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Free-form scenario text, never empty
    pub scenario: String,
}
