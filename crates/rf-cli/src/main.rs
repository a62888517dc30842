//! rulefold CLI
//!
//! Compiles ad/tracker block lists into a deduplicated
//! `domain_set` / `domain_suffix_set` rule set.

mod config;
mod error;
mod fetch;
mod pipeline;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Serialize;

use rf_compiler::{classify_document, parse_rule_set, render_rule_set};
use rf_core::{Dialect, Host};

use crate::config::Config;
use crate::error::CliError;
use crate::fetch::normalize_line_endings;
use crate::pipeline::RunReport;

#[derive(Parser)]
#[command(name = "rulefold")]
#[command(about = "Block list to domain rule set compiler")]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, classify and merge sources into a rule set
    Compile {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source URL or path (repeatable, replaces configured sources)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Output rule set file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Classify one local document and print what it contributes
    Classify {
        /// Block list file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the classified hosts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check an emitted rule set
    Verify {
        /// Rule set file to verify
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compile {
            config,
            sources,
            output,
            report,
        } => cmd_compile(config.as_deref(), sources, output, report.as_deref()),
        Commands::Classify { input, json } => cmd_classify(&input, json),
        Commands::Verify { input } => cmd_verify(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn cmd_compile(
    config_path: Option<&Path>,
    sources: Vec<String>,
    output: Option<PathBuf>,
    report: Option<&Path>,
) -> Result<(), CliError> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_overrides(sources, output);
    config.validate()?;

    let start = Instant::now();
    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let sets = runtime.block_on(pipeline::compile_sources(&config))?;

    let rendered = render_rule_set(&sets)?;
    pipeline::write_output(&config.output, &rendered)?;

    if let Some(report_path) = report {
        pipeline::write_report(report_path, &RunReport::new(&config.output, &sets))?;
    }

    println!(
        "Wrote {} -> exact={}, suffix={} (allow={})",
        config.output.display(),
        sets.domain_set.len(),
        sets.domain_suffix_set.len(),
        sets.allow_count
    );
    log::debug!("compile finished in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let text = fs::read_to_string(path).map_err(|source| fetch::FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_line_endings(&text))
}

#[derive(Serialize)]
struct ClassifyOutput {
    dialect: &'static str,
    lines: usize,
    ignored: usize,
    block_exact: Vec<Host>,
    block_suffix: Vec<Host>,
    allow_exact: Vec<Host>,
}

fn sorted_hosts(hosts: std::collections::HashSet<Host>) -> Vec<Host> {
    let mut hosts: Vec<Host> = hosts.into_iter().collect();
    hosts.sort_unstable();
    hosts
}

fn cmd_classify(input: &Path, json: bool) -> Result<(), CliError> {
    let text = read_input(input)?;
    let result = classify_document(&text);

    if json {
        let output = ClassifyOutput {
            dialect: result.dialect.as_str(),
            lines: result.lines,
            ignored: result.ignored,
            block_exact: sorted_hosts(result.block_exact),
            block_suffix: sorted_hosts(result.block_suffix),
            allow_exact: sorted_hosts(result.allow_exact),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dialect = match result.dialect {
        Dialect::Abp => "ABP filters",
        Dialect::Plain => "hosts / plain domains",
    };
    println!("Document: {}", input.display());
    println!("  Dialect:     {}", dialect);
    println!("  Lines:       {} ({} ignored)", result.lines, result.ignored);
    println!("  Exact:       {}", result.block_exact.len());
    println!("  Suffix:      {}", result.block_suffix.len());
    println!("  Allow:       {}", result.allow_exact.len());

    Ok(())
}

fn cmd_verify(input: &Path) -> Result<(), CliError> {
    let text = read_input(input)?;
    let rule_set = parse_rule_set(&text)?;
    rule_set.verify()?;

    println!("Rule set '{}' is valid", input.display());
    println!("  domain_set:        {} entries", rule_set.domain_set.len());
    println!("  domain_suffix_set: {} entries", rule_set.domain_suffix_set.len());

    Ok(())
}
