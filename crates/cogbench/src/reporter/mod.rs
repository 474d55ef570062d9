//! Benchmark result reporting
//!
//! Two kinds of output live here:
//!
//! - **Result files**: one plain-text file per model holding the raw output of
//!   every completed task ([`ResultFile`]).
//! - **Run summaries**: an overview of a finished run, formatted for the
//!   console or as JSON for scripts ([`Reporter`]).
//!
//! # Example
//!
//! ```no_run
//! use cogbench::reporter::{Reporter, OutputFormat};
//! use cogbench::runner::RunSummary;
//!
//! # fn example(summary: RunSummary) -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Console);
//! reporter.report(&summary)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::Json)
//!     .write_to_file(&summary, "summary.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod results_file;

use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::RunSummary;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use results_file::{result_file_name, ResultFile};

/// Output format for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable console output
    #[default]
    Console,
}

/// Reporter for run summaries
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report a summary to stdout
    pub fn report(&self, summary: &RunSummary) -> Result<()> {
        let output = self.format_summary(summary)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write a summary to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, summary: &RunSummary, path: P) -> Result<()> {
        let output = self.format_summary(summary)?;
        fs::write(path, output)?;
        Ok(())
    }

    /// Format a summary as a string
    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(summary, false),
            OutputFormat::JsonPretty => JsonReporter::format(summary, true),
            OutputFormat::Console => ConsoleReporter::format(summary),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
