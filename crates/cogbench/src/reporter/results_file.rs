//! Per-model result files
//!
//! Layout of a result file:
//!
//! ```text
//! === RESULTS FOR MODEL: gpt-oss:20b ===
//!
//! ============================================================
//! TASK R01 (TYPE R)
//! ------------------------------------------------------------
//! <raw model output>
//!
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};
use crate::task::Task;

const SECTION_RULE: &str = "============================================================";
const HEADER_RULE: &str = "------------------------------------------------------------";

/// File name for a model's results, e.g. `results_gpt-oss_20b.txt`
///
/// Characters other than ASCII alphanumerics, `-`, `_` and `.` become `_`.
pub fn result_file_name(model: &str) -> String {
    let safe: String = model
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("results_{}.txt", safe)
}

/// Append-only result file for one model
#[derive(Debug, Clone)]
pub struct ResultFile {
    path: PathBuf,
}

impl ResultFile {
    /// Create (or truncate) the model's result file and write its header
    pub fn create(dir: &Path, model: &str) -> Result<Self> {
        let path = dir.join(result_file_name(model));
        fs::write(&path, format!("=== RESULTS FOR MODEL: {} ===\n\n", model))
            .map_err(|e| HarnessError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one task section
    ///
    /// Each call opens, writes and closes the file, so the file stays readable
    /// if the run stops between tasks.
    pub fn append_task(&self, task: &Task, output: &str) -> Result<()> {
        let section = format!(
            "{SECTION_RULE}\nTASK {} (TYPE {})\n{HEADER_RULE}\n{}\n\n",
            task.id, task.task_type, output
        );
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| HarnessError::io(&self.path, e))?;
        file.write_all(section.as_bytes())
            .map_err(|e| HarnessError::io(&self.path, e))
    }
}
