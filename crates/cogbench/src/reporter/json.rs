//! JSON reporter for run summaries

use crate::runner::RunSummary;
use anyhow::Result;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format a run summary as JSON
    ///
    /// # Arguments
    ///
    /// * `summary` - The run summary to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(summary: &RunSummary, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(summary)?
        } else {
            serde_json::to_string(summary)?
        };
        Ok(output)
    }
}
