//! SysY Compiler Driver
//!
//! Command-line entry point. Builds one of the bundled IR samples through
//! the builder API and prints its textual form.

use clap::{Parser, Subcommand};
use sysc_common::CompilerError;
use sysc_ir::{samples, Module};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sysc")]
#[command(about = "SysY Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a bundled sample module and print its IR
    Demo {
        /// Which sample to build
        name: String,

        /// Write the IR to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print module statistics as JSON
        #[arg(long)]
        stats: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the bundled samples
    List,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { name, output, stats, verbose } => {
            if verbose {
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
            }
            if let Err(e) = run_demo(&name, output.as_deref(), stats) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::List => {
            for sample in samples::SAMPLES {
                println!("{:<12} {}", sample.name, sample.description);
            }
        }
    }
}

fn build_sample(name: &str) -> Result<Module, CompilerError> {
    let sample = samples::find(name).ok_or_else(|| CompilerError::unknown_sample(name))?;
    log::debug!("building sample '{}'", sample.name);
    let module = (sample.build)()?;
    log::debug!("module '{}' holds {} values", module.module_name(), module.num_values());
    Ok(module)
}

fn run_demo(name: &str, output_path: Option<&Path>, stats: bool) -> Result<(), CompilerError> {
    let module = build_sample(name)?;
    let text = module.to_string();

    match output_path {
        Some(path) => {
            fs::write(path, &text)?;
            println!("IR written to: {}", path.display());
        }
        None => print!("{}", text),
    }

    if stats {
        println!("{}", stats_json(&module)?);
    }

    Ok(())
}

fn stats_json(module: &Module) -> Result<String, CompilerError> {
    serde_json::to_string_pretty(&module.stats())
        .map_err(|e| CompilerError::InternalError { message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysc_ir::ModuleStats;

    #[test]
    fn test_every_sample_builds() {
        for sample in samples::SAMPLES {
            let module = build_sample(sample.name).unwrap();
            assert_eq!(module.stats().open_blocks, 0, "{}", sample.name);
        }
    }

    #[test]
    fn test_unknown_sample() {
        assert_eq!(
            build_sample("nope").unwrap_err(),
            CompilerError::UnknownSample { name: "nope".to_string() }
        );
    }

    #[test]
    fn test_stats_json() {
        let module = build_sample("call").unwrap();
        let json = stats_json(&module).unwrap();
        assert!(json.contains("\"instructions\": 14"));

        let parsed: ModuleStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, module.stats());
        assert_eq!(parsed.functions, 3);
    }

    #[test]
    fn test_demo_with_stats() {
        let path = std::env::temp_dir().join(format!("sysc-stats-{}.ll", std::process::id()));
        let result = run_demo("branch", Some(&path), true);
        let _ = fs::remove_file(&path);
        assert!(result.is_ok());
    }

    #[test]
    fn test_demo_writes_output_file() {
        let path = std::env::temp_dir().join(format!("sysc-demo-{}.ll", std::process::id()));
        run_demo("arithmetic", Some(&path), false).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert!(written.starts_with("define i32 @main() {\nentry:\n"));
    }
}
