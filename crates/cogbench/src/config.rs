//! Configuration for benchmark runs
//!
//! This module provides TOML-based configuration for the chat endpoint, the
//! models to benchmark, and the input/output file locations. Every section is
//! optional; omitted values fall back to the defaults for a local Ollama
//! server and the standard repository layout.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::task::TaskType;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Models to benchmark, in run order
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Chat endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,
    /// Program fixture per task type
    #[serde(default)]
    pub programs: ProgramsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: default_models(),
            endpoint: EndpointConfig::default(),
            paths: PathsConfig::default(),
            programs: ProgramsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cogbench::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("cogbench.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use cogbench::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     models = ["llama3:8b"]
    ///
    ///     [endpoint]
    ///     url = "http://127.0.0.1:11434/api/chat"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.models, vec!["llama3:8b"]);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Make every relative path relative to `root` instead of the working directory
    pub fn resolve_paths(mut self, root: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        resolve(&mut self.paths.interpreter);
        resolve(&mut self.paths.benchmark);
        resolve(&mut self.paths.results_dir);
        for path in self.programs.paths_mut() {
            resolve(path);
        }
        self
    }

    /// Check values that TOML parsing alone cannot reject
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.models.is_empty() {
            bail!("At least one model must be configured");
        }
        if let Some(blank) = self.models.iter().find(|m| m.trim().is_empty()) {
            bail!("Model names must not be blank (got {:?})", blank);
        }
        if self.endpoint.timeout_secs == 0 {
            bail!("endpoint.timeout_secs must be greater than zero");
        }
        if !(self.endpoint.url.starts_with("http://") || self.endpoint.url.starts_with("https://"))
        {
            bail!(
                "endpoint.url must be an http(s) URL, got {}",
                self.endpoint.url
            );
        }
        Ok(())
    }
}

fn default_models() -> Vec<String> {
    vec![
        "mistral:7b".to_string(),
        "gemma3:27b".to_string(),
        "gpt-oss:20b".to_string(),
    ]
}

/// Chat endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Full URL of the chat API (default: local Ollama `/api/chat`)
    #[serde(default = "default_url")]
    pub url: String,
    /// Whole-request timeout in seconds (default: 600)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "http://0.0.0.0:11434/api/chat".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Interpreter description included in every prompt
    #[serde(default = "default_interpreter")]
    pub interpreter: PathBuf,
    /// Benchmark task file
    #[serde(default = "default_benchmark")]
    pub benchmark: PathBuf,
    /// Directory receiving one result file per model
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            benchmark: default_benchmark(),
            results_dir: default_results_dir(),
        }
    }
}

fn default_interpreter() -> PathBuf {
    PathBuf::from("interpreter/interpreter.txt")
}

fn default_benchmark() -> PathBuf {
    PathBuf::from("benchmark/bench_100.txt")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

/// Program fixture file for each task type
///
/// A type set to `None` has no fixture, and its tasks are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    #[serde(rename = "D", default)]
    pub declaration: Option<PathBuf>,
    #[serde(rename = "P", default)]
    pub procedure: Option<PathBuf>,
    #[serde(rename = "C", default)]
    pub conflict: Option<PathBuf>,
    #[serde(rename = "R", default)]
    pub resolution: Option<PathBuf>,
}

impl ProgramsConfig {
    /// Configured paths keyed by task type
    pub fn paths(&self) -> BTreeMap<TaskType, PathBuf> {
        TaskType::ALL
            .into_iter()
            .filter_map(|t| self.get(t).map(|p| (t, p.to_path_buf())))
            .collect()
    }

    pub fn get(&self, task_type: TaskType) -> Option<&Path> {
        let path = match task_type {
            TaskType::Declaration => &self.declaration,
            TaskType::Procedure => &self.procedure,
            TaskType::Conflict => &self.conflict,
            TaskType::Resolution => &self.resolution,
        };
        path.as_deref()
    }

    fn paths_mut(&mut self) -> impl Iterator<Item = &mut PathBuf> {
        [
            &mut self.declaration,
            &mut self.procedure,
            &mut self.conflict,
            &mut self.resolution,
        ]
        .into_iter()
        .flatten()
    }
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            declaration: Some(PathBuf::from("programs/program_decl.cogBASIC")),
            procedure: Some(PathBuf::from("programs/program_proc.cogBASIC")),
            conflict: Some(PathBuf::from("programs/program_conflict.cogBASIC")),
            resolution: Some(PathBuf::from("programs/program_resolution.cogBASIC")),
        }
    }
}
