//! Console reporter for run summaries
//!
//! Provides human-readable output with ASCII tables and status indicators.

use anyhow::Result;
use std::fmt::Write;

use crate::runner::{ModelSummary, RunSummary};

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a run summary for console output
    pub fn format(summary: &RunSummary) -> Result<String> {
        let mut output = String::new();

        // Header
        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                       BENCHMARK SUMMARY                      ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Endpoint:  {}", summary.endpoint)?;
        writeln!(output, "Started:   {}", summary.started_at)?;
        writeln!(output, "Duration:  {}ms", summary.total_duration_ms)?;
        writeln!(
            output,
            "Tasks:     {} loaded, {} blocks dropped",
            summary.tasks_loaded, summary.blocks_skipped
        )?;
        writeln!(output)?;

        for model in &summary.models {
            Self::format_model(&mut output, model)?;
        }

        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(
            output,
            "Completed {} task runs across {} models",
            summary.completed_tasks(),
            summary.models.len()
        )?;
        writeln!(output)?;
        Ok(output)
    }

    fn format_model(output: &mut String, model: &ModelSummary) -> Result<()> {
        let status = if model.skipped_tasks.is_empty() { "✓" } else { "!" };

        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Model: {} {}", model.model, status)?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output)?;
        writeln!(output, "  Results:  {}", model.result_path.display())?;
        writeln!(output, "  Duration: {}ms", model.duration_ms)?;
        writeln!(output)?;

        if !model.completed.is_empty() {
            writeln!(output, "  ┌────────────┬──────┬───────────┬──────────┬────────────┐")?;
            writeln!(output, "  │ Task       │ Type │ Fragments │  Chars   │  Time (ms) │")?;
            writeln!(output, "  ├────────────┼──────┼───────────┼──────────┼────────────┤")?;
            for task in &model.completed {
                writeln!(
                    output,
                    "  │ {:<10} │ {:^4} │ {:>9} │ {:>8} │ {:>10} │",
                    task.task_id, task.task_type, task.fragments, task.chars, task.duration_ms
                )?;
            }
            writeln!(output, "  └────────────┴──────┴───────────┴──────────┴────────────┘")?;
            writeln!(output)?;
        }

        if !model.skipped_tasks.is_empty() {
            writeln!(output, "  Skipped (no program fixture):")?;
            for id in &model.skipped_tasks {
                writeln!(output, "    ✗ {}", id)?;
            }
            writeln!(output)?;
        }

        Ok(())
    }
}
