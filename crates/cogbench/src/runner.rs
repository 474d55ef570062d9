//! Benchmark execution orchestration
//!
//! The runner loads the interpreter text and the benchmark file, then runs
//! every task against every configured model:
//!
//! ```text
//! for model in models                      (sequential)
//!     recreate results_<model>.txt
//!     for task in tasks                    (sequential, parse order)
//!         program = fixture for task.type  (skip task if missing)
//!         prompt  = preamble + interpreter + scenario + program
//!         stream reply -> console + buffer
//!         append section to results_<model>.txt
//! ```
//!
//! Only one request is in flight at a time. A transport failure stops the
//! run; sections written before it stay in the result file.
//!
//! # Example
//!
//! ```no_run
//! use cogbench::{Config, runner::BenchmarkRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("cogbench.toml")?;
//! let mut runner = BenchmarkRunner::new(config)?;
//! let summary = runner.run().await?;
//!
//! for model in &summary.models {
//!     println!("{}: {} tasks", model.model, model.completed.len());
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

use crate::client::ChatClient;
use crate::config::Config;
use crate::error::HarnessError;
use crate::events::{EventSink, RunEvent, TracingEventSink};
use crate::fixtures::{compose_prompt, ProgramLibrary};
use crate::parser::{load_benchmark, SkippedBlock};
use crate::reporter::ResultFile;
use crate::task::{Task, TaskType};

const BANNER_RULE: &str = "============================================================";
const TASK_RULE: &str = "------------------------------------------------------------";

/// Results from a complete benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Chat endpoint the run talked to
    pub endpoint: String,
    /// Number of valid tasks in the benchmark file
    pub tasks_loaded: usize,
    /// Number of benchmark blocks dropped while parsing
    pub blocks_skipped: usize,
    /// Per-model results, in run order
    pub models: Vec<ModelSummary>,
    /// Total duration of the run
    pub total_duration_ms: u64,
    /// Timestamp when the run started
    pub started_at: String,
}

impl RunSummary {
    /// Tasks completed across all models
    pub fn completed_tasks(&self) -> usize {
        self.models.iter().map(|m| m.completed.len()).sum()
    }
}

/// Results for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: String,
    /// Result file written for this model
    pub result_path: PathBuf,
    /// Tasks that ran, in order
    pub completed: Vec<TaskOutcome>,
    /// Ids of tasks skipped for lack of a program fixture
    pub skipped_tasks: Vec<String>,
    pub duration_ms: u64,
}

/// Outcome of one task against one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: String,
    pub task_type: TaskType,
    /// Number of streamed fragments received
    pub fragments: usize,
    /// Length of the accumulated output in characters
    pub chars: usize,
    pub duration_ms: u64,
}

/// Everything read from disk before the first request
#[derive(Debug, Clone)]
pub struct BenchmarkInputs {
    /// Trimmed interpreter description
    pub interpreter: String,
    /// Valid tasks in parse order
    pub tasks: Vec<Task>,
    /// Blocks dropped by the parser
    pub skipped: Vec<SkippedBlock>,
}

/// The benchmark runner
pub struct BenchmarkRunner {
    config: Config,
    client: ChatClient,
    programs: ProgramLibrary,
    events: Box<dyn EventSink>,
    console: Box<dyn Write + Send>,
}

impl BenchmarkRunner {
    /// Create a runner that logs events with `tracing` and echoes model output to stdout
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ChatClient::new(&config.endpoint).context("Failed to build HTTP client")?;
        let programs = ProgramLibrary::from_config(&config.programs);
        Ok(Self {
            config,
            client,
            programs,
            events: Box::new(TracingEventSink),
            console: Box::new(io::stdout()),
        })
    }

    /// Send run events to `events` instead of the log
    pub fn with_events(mut self, events: impl EventSink + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    /// Echo banners and streamed output to `console` instead of stdout
    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the interpreter and benchmark files and prepare the results directory
    ///
    /// Fails with [`HarnessError::MissingInput`] before anything is sent to
    /// the endpoint if either input file is absent.
    pub fn load_inputs(&mut self) -> std::result::Result<BenchmarkInputs, HarnessError> {
        let paths = &self.config.paths;
        if !paths.interpreter.exists() {
            return Err(HarnessError::MissingInput {
                what: "interpreter",
                path: paths.interpreter.clone(),
            });
        }
        if !paths.benchmark.exists() {
            return Err(HarnessError::MissingInput {
                what: "benchmark",
                path: paths.benchmark.clone(),
            });
        }

        let interpreter = fs::read_to_string(&paths.interpreter)
            .map_err(|e| HarnessError::io(&paths.interpreter, e))?
            .trim()
            .to_string();
        let parsed = load_benchmark(&paths.benchmark)?;

        fs::create_dir_all(&paths.results_dir)
            .map_err(|e| HarnessError::io(&paths.results_dir, e))?;

        self.events.emit(RunEvent::TasksLoaded {
            valid: parsed.tasks.len(),
            skipped: parsed.skipped.len(),
        });
        for block in &parsed.skipped {
            self.events.emit(RunEvent::TaskSkipped(block.clone()));
        }

        Ok(BenchmarkInputs {
            interpreter,
            tasks: parsed.tasks,
            skipped: parsed.skipped,
        })
    }

    /// Run every configured model over the benchmark
    #[instrument(skip(self), fields(endpoint = %self.client.url()))]
    pub async fn run(&mut self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();

        writeln!(self.console, "Loading interpreter and benchmark...\n")?;
        let inputs = self.load_inputs()?;
        writeln!(self.console, "Found {} tasks.\n", inputs.tasks.len())?;

        info!(
            "Starting benchmark with {} models and {} tasks",
            self.config.models.len(),
            inputs.tasks.len()
        );

        let mut models = Vec::with_capacity(self.config.models.len());
        for model in self.config.models.clone() {
            models.push(self.run_model(&model, &inputs).await?);
        }

        let summary = RunSummary {
            endpoint: self.client.url().to_string(),
            tasks_loaded: inputs.tasks.len(),
            blocks_skipped: inputs.skipped.len(),
            models,
            total_duration_ms: start_time.elapsed().as_millis() as u64,
            started_at,
        };

        info!(
            "Benchmark completed {} tasks in {}ms",
            summary.completed_tasks(),
            summary.total_duration_ms
        );

        Ok(summary)
    }

    /// Run all tasks against one model, recreating its result file first
    #[instrument(skip(self, inputs))]
    pub async fn run_model(&mut self, model: &str, inputs: &BenchmarkInputs) -> Result<ModelSummary> {
        let start_time = Instant::now();

        writeln!(self.console, "\n{BANNER_RULE}")?;
        writeln!(self.console, "RUNNING BENCHMARK WITH MODEL: {}", model)?;
        writeln!(self.console, "{BANNER_RULE}\n")?;

        let result_file = ResultFile::create(&self.config.paths.results_dir, model)?;
        self.events.emit(RunEvent::ModelStarted {
            model: model.to_string(),
            result_path: result_file.path().to_path_buf(),
        });

        let mut completed = Vec::new();
        let mut skipped_tasks = Vec::new();

        for task in &inputs.tasks {
            let Some(program) = self.programs.load(task.task_type)? else {
                self.events.emit(RunEvent::MissingFixture {
                    model: model.to_string(),
                    task_id: task.id.clone(),
                    task_type: task.task_type,
                    path: self.programs.path(task.task_type).map(Path::to_path_buf),
                });
                skipped_tasks.push(task.id.clone());
                continue;
            };

            self.print_task_banner(task)?;
            self.events.emit(RunEvent::TaskStarted {
                model: model.to_string(),
                task_id: task.id.clone(),
            });

            let task_start = Instant::now();
            let prompt = compose_prompt(&inputs.interpreter, &task.scenario, &program);
            let (output, fragments) = self
                .stream_task(model, &prompt)
                .await
                .with_context(|| format!("Task {} failed for model {}", task.id, model))?;

            writeln!(self.console, "\n\nFinished.\n")?;
            result_file.append_task(task, &output)?;

            let outcome = TaskOutcome {
                task_id: task.id.clone(),
                task_type: task.task_type,
                fragments,
                chars: output.chars().count(),
                duration_ms: task_start.elapsed().as_millis() as u64,
            };
            self.events.emit(RunEvent::TaskFinished {
                model: model.to_string(),
                task_id: outcome.task_id.clone(),
                chars: outcome.chars,
                duration_ms: outcome.duration_ms,
            });
            completed.push(outcome);
        }

        self.events.emit(RunEvent::ModelFinished {
            model: model.to_string(),
            completed: completed.len(),
            skipped: skipped_tasks.len(),
        });

        writeln!(self.console, "{BANNER_RULE}")?;
        writeln!(self.console, "FINISHED ALL TASKS FOR MODEL {}", model)?;
        writeln!(self.console, "Saved results to {}", result_file.path().display())?;
        writeln!(self.console, "{BANNER_RULE}\n")?;

        Ok(ModelSummary {
            model: model.to_string(),
            result_path: result_file.path().to_path_buf(),
            completed,
            skipped_tasks,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Stream one prompt to completion, echoing fragments as they arrive
    async fn stream_task(&mut self, model: &str, prompt: &str) -> Result<(String, usize)> {
        let mut stream = self.client.stream_chat(model, prompt).await?;
        let mut output = String::new();
        let mut fragments = 0;

        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            self.console.write_all(fragment.as_bytes())?;
            self.console.flush()?;
            output.push_str(&fragment);
            fragments += 1;
        }

        Ok((output, fragments))
    }

    fn print_task_banner(&mut self, task: &Task) -> io::Result<()> {
        let program_name = self
            .programs
            .path(task.task_type)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        writeln!(self.console, "\n{BANNER_RULE}")?;
        writeln!(self.console, "TASK: {}   (TYPE {})", task.id, task.task_type)?;
        writeln!(self.console, "{TASK_RULE}")?;
        writeln!(self.console, "Scenario:\n{}\n", task.scenario)?;
        writeln!(self.console, "Using program: {}\n", program_name)?;
        writeln!(self.console, "Executing...\n")?;
        self.console.flush()
    }
}
