//! Parse a config and its benchmark file without contacting any model
//!
//! Usage: cargo run -p cogbench --example check_benchmark -- [cogbench.toml]

use cogbench::config::Config;
use cogbench::fixtures::ProgramLibrary;
use cogbench::parser::load_benchmark;
use cogbench::TaskType;
use std::env;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            println!("Validating config file: {}", path.display());
            let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            Config::from_file(&path)?.resolve_paths(&root)
        }
        None => {
            println!("No config given, using defaults");
            Config::default().resolve_paths(Path::new("."))
        }
    };
    config.validate()?;

    println!("\nEndpoint: {} (timeout {}s)", config.endpoint.url, config.endpoint.timeout_secs);
    println!("Models: {}", config.models.join(", "));

    println!("\nProgram fixtures:");
    let programs = ProgramLibrary::from_config(&config.programs);
    for task_type in TaskType::ALL {
        let status = match (programs.path(task_type), programs.load(task_type)?) {
            (Some(path), Some(_)) => format!("✓ {}", path.display()),
            (Some(path), None) => format!("✗ missing {}", path.display()),
            (None, _) => "✗ not configured".to_string(),
        };
        println!("  {}: {}", task_type, status);
    }

    let parsed = load_benchmark(&config.paths.benchmark)?;
    println!("\nTasks ({}):", parsed.tasks.len());
    for task in &parsed.tasks {
        println!("  {} (TYPE {}) {} chars", task.id, task.task_type, task.scenario.len());
    }

    if !parsed.skipped.is_empty() {
        println!("\nDropped blocks ({}):", parsed.skipped.len());
        for block in &parsed.skipped {
            println!("  ✗ {}", block);
        }
    }

    Ok(())
}
