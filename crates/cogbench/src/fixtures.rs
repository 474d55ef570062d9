//! CogBASIC program fixtures and prompt composition

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ProgramsConfig;
use crate::error::{HarnessError, Result};
use crate::task::TaskType;

/// First line of every prompt
pub const INTERPRETER_PREAMBLE: &str = "You are the CogBASIC Interpreter.";

/// Last line of every prompt
pub const EXECUTE_INSTRUCTION: &str = "Execute step by step and produce your full output.";

/// Program fixture paths keyed by task type
#[derive(Debug, Clone, Default)]
pub struct ProgramLibrary {
    paths: BTreeMap<TaskType, PathBuf>,
}

impl ProgramLibrary {
    pub fn new(paths: BTreeMap<TaskType, PathBuf>) -> Self {
        Self { paths }
    }

    pub fn from_config(programs: &ProgramsConfig) -> Self {
        Self::new(programs.paths())
    }

    /// Path configured for a task type, if any
    pub fn path(&self, task_type: TaskType) -> Option<&Path> {
        self.paths.get(&task_type).map(PathBuf::as_path)
    }

    /// Load the trimmed program text for a task type
    ///
    /// Returns `Ok(None)` when no path is configured for the type or the file
    /// does not exist. Only an existing but unreadable file is an error.
    pub fn load(&self, task_type: TaskType) -> Result<Option<String>> {
        let Some(path) = self.path(task_type) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Ok(Some(text.trim().to_string()))
    }
}

/// Build the prompt sent to the model for one task
pub fn compose_prompt(interpreter: &str, scenario: &str, program: &str) -> String {
    format!(
        "{INTERPRETER_PREAMBLE}\n{interpreter}\n\n\
         --- Scenario Text ---\n{scenario}\n--- End Scenario ---\n\n\
         --- CogBASIC Program ---\n{program}\n\n\
         {EXECUTE_INSTRUCTION}"
    )
}
