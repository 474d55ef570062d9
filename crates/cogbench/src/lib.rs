//! CogBASIC interpreter benchmark harness
//!
//! This crate runs a benchmark of CogBASIC interpreter tasks against language
//! models served by a local chat endpoint (Ollama's `/api/chat`), streaming
//! every response to the console and recording it in one result file per
//! model.
//!
//! # Features
//!
//! - **Benchmark parsing**: `### TASK:` blocks with `TYPE:` and `SCENARIO:`
//!   fields; malformed blocks are dropped with a diagnostic
//! - **Streaming client**: newline-delimited JSON decoded into a lazy stream of
//!   text fragments
//! - **Sequential runner**: models × tasks, one request at a time, result files
//!   truncated per model and appended per task
//! - **Run events**: dropped blocks and missing program fixtures reported
//!   through a pluggable [`events::EventSink`]
//! - **Summaries**: console and JSON run summaries
//!
//! # Example
//!
//! ```no_run
//! use cogbench::{Config, runner::BenchmarkRunner, reporter::{Reporter, OutputFormat}};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("cogbench.toml")?.resolve_paths(std::path::Path::new("."));
//!
//! let mut runner = BenchmarkRunner::new(config)?;
//! let summary = runner.run().await?;
//!
//! Reporter::new(OutputFormat::Console).report(&summary)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! models = ["mistral:7b", "gemma3:27b", "gpt-oss:20b"]
//!
//! [endpoint]
//! url = "http://0.0.0.0:11434/api/chat"
//! timeout_secs = 600
//!
//! [paths]
//! interpreter = "interpreter/interpreter.txt"
//! benchmark = "benchmark/bench_100.txt"
//! results_dir = "results"
//!
//! [programs]
//! D = "programs/program_decl.cogBASIC"
//! P = "programs/program_proc.cogBASIC"
//! C = "programs/program_conflict.cogBASIC"
//! R = "programs/program_resolution.cogBASIC"
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod parser;
pub mod reporter;
pub mod runner;
pub mod task;

// Re-export main types for convenience
pub use client::{ChatClient, ChatStream};
pub use config::Config;
pub use error::HarnessError;
pub use parser::{load_benchmark, parse_benchmark, ParsedBenchmark};
pub use reporter::{OutputFormat, Reporter};
pub use runner::{BenchmarkRunner, ModelSummary, RunSummary, TaskOutcome};
pub use task::{Task, TaskType};
