//! Temporary benchmark workspace
//!
//! Lays out the default repository structure (interpreter, benchmark file,
//! one program per task type) in a temp dir.

use cogbench::config::Config;
use cogbench::reporter::result_file_name;
use cogbench::TaskType;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INTERPRETER: &str = "CogBASIC rules: evaluate lines in order.";

pub struct BenchWorkspace {
    dir: TempDir,
}

impl BenchWorkspace {
    pub fn new(benchmark: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let defaults = Config::default().resolve_paths(dir.path());

        write_file(&defaults.paths.interpreter, &format!("\n{}\n", INTERPRETER));
        write_file(&defaults.paths.benchmark, benchmark);
        for (task_type, path) in defaults.programs.paths() {
            write_file(&path, &format!("  {}\n", program_text(task_type)));
        }

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Config pointing at this workspace and `url`
    pub fn config(&self, url: &str, models: &[&str]) -> Config {
        let mut config = Config::default().resolve_paths(self.root());
        config.endpoint.url = url.to_string();
        config.endpoint.timeout_secs = 30;
        config.models = models.iter().map(|m| m.to_string()).collect();
        config
    }

    #[allow(dead_code)]
    pub fn remove_program(&self, task_type: TaskType) {
        let config = Config::default().resolve_paths(self.root());
        let path = config.programs.get(task_type).unwrap();
        fs::remove_file(path).unwrap();
    }

    pub fn result_path(&self, model: &str) -> PathBuf {
        self.root().join("results").join(result_file_name(model))
    }

    pub fn read_result(&self, model: &str) -> String {
        fs::read_to_string(self.result_path(model)).unwrap()
    }
}

/// Trimmed text of the fixture written for `task_type`
pub fn program_text(task_type: TaskType) -> String {
    format!("10 PROGRAM {}\n20 END", task_type)
}

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}
