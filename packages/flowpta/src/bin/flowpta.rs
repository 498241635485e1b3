//! flowpta CLI
//!
//! # Usage
//!
//! ```bash
//! # Analyze a program, writing result.txt
//! cargo run --bin flowpta --release -- analyze --program fixtures/order.json
//!
//! # Inspect the inlined CFG as Graphviz
//! cargo run --bin flowpta -- dump-cfg --program fixtures/field.json --dot | dot -Tsvg > cfg.svg
//!
//! # Print the effective configuration
//! cargo run --bin flowpta -- show-config --config pta.yaml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `warn`).

use clap::{Parser, Subcommand};
use flowpta::config::{OutputFormat, PtaConfig};
use flowpta::features::points_to::ports::file_sink;
use flowpta::{PointerAnalysis, Program};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowpta")]
#[command(about = "Flow-sensitive, call-inlining points-to analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis and write the result file
    Analyze {
        /// Program IR (JSON)
        #[arg(short, long)]
        program: PathBuf,

        /// Configuration file (YAML, version 1)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override max_inline_depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Override the result path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the result format (text|json)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Print statistics as JSON instead of a summary line
        #[arg(long)]
        stats_json: bool,
    },

    /// Print the inlined global CFG
    DumpCfg {
        /// Program IR (JSON)
        #[arg(short, long)]
        program: PathBuf,

        /// Configuration file (YAML, version 1)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Graphviz output instead of text
        #[arg(long)]
        dot: bool,
    },

    /// Print the effective configuration as YAML
    ShowConfig {
        /// Configuration file (YAML, version 1)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            program,
            config,
            max_depth,
            output,
            format,
            stats_json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(depth) = max_depth {
                config = config.max_inline_depth(depth);
            }
            if let Some(path) = output {
                config = config.output_path(path);
            }
            if let Some(format) = format {
                config = config.output_format(format);
            }
            analyze(&program, config, stats_json)?;
        }
        Commands::DumpCfg { program, config, dot } => {
            dump_cfg(&program, load_config(config.as_deref())?, dot)?;
        }
        Commands::ShowConfig { config } => {
            print!("{}", load_config(config.as_deref())?.to_yaml()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PtaConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(PtaConfig::from_yaml_file(path)?),
        None => Ok(PtaConfig::default()),
    }
}

fn analyze(program_path: &Path, config: PtaConfig, stats_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::from_json_file(program_path)?;
    let mut sink = file_sink(&config.output);
    let output = config.output.path.clone();

    let outcome = PointerAnalysis::new(&program, config).run_and_write(sink.as_mut())?;

    if stats_json {
        println!("{}", serde_json::to_string_pretty(&outcome.stats)?);
    } else {
        let stats = &outcome.stats;
        println!(
            "{} test points -> {} ({} methods, {} blocks, {} sites, {} evaluations{}{})",
            outcome.result.len(),
            output.display(),
            stats.methods_inlined,
            stats.blocks,
            stats.sites,
            stats.evaluations,
            if stats.converged { "" } else { ", NOT converged" },
            if stats.fallbacks > 0 {
                format!(", {} fallbacks", stats.fallbacks)
            } else {
                String::new()
            }
        );
    }
    Ok(())
}

fn dump_cfg(program_path: &Path, config: PtaConfig, dot: bool) -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::from_json_file(program_path)?;
    let context = PointerAnalysis::new(&program, config).build()?;
    if dot {
        println!("{}", context.cfg.to_dot(&program));
    } else {
        print!("{}", context.render(&program));
    }
    Ok(())
}
