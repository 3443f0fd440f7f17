//! enumscan CLI - extracts enumeration-like constants from a tree of Go
//! packages into a JSON report.
//!
//! ```text
//! enumscan <INPUT_DIR> <OUTPUT_FILE> [--skip-preview] [--ignore REGEX...]
//! ```
//!
//! Settings come from `enumscan.toml` in the input directory (or `--config`);
//! command-line flags take precedence.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use enumscan_core::{
    init_structured_logging, load_config, load_config_file, log_error, log_info, log_warn,
    AnalysisResult, Enumscan, EnumscanConfig, DEFAULT_MARKER_FILE,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract enumeration-like constants from a tree of Go packages")]
pub struct Cli {
    /// Root directory of the Go source tree
    input: PathBuf,

    /// Path of the JSON report to write
    output: PathBuf,

    /// Read settings from this file instead of <INPUT>/enumscan.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File name marking an auxiliary package whose parent is analyzed
    #[arg(long, value_name = "NAME")]
    marker_file: Option<String>,

    /// Leave *_test.go files out of both parse passes
    #[arg(long)]
    skip_tests: bool,

    /// Regexes over relative directory paths to leave out of the walk
    #[arg(long, num_args = 1.., value_name = "REGEX")]
    ignore: Vec<String>,

    /// Skip preview API versions
    #[arg(long)]
    skip_preview: bool,

    /// Write compact JSON instead of indented JSON
    #[arg(long)]
    compact: bool,
}

/// Effective settings after merging the config file and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    marker_file: String,
    include_test_files: bool,
    skip_preview: bool,
    ignore: Vec<String>,
    pretty: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: Option<&EnumscanConfig>) -> Result<Self> {
        let defaults = EnumscanConfig::default();
        let config = config.unwrap_or(&defaults);

        let marker_file = cli
            .marker_file
            .clone()
            .or_else(|| config.marker_file.clone())
            .unwrap_or_else(|| DEFAULT_MARKER_FILE.to_string());
        if marker_file.trim().is_empty() || marker_file.contains(['/', '\\']) {
            bail!("Marker file must be a plain file name, got '{}'", marker_file);
        }

        let mut ignore = config.ignore.clone().unwrap_or_default();
        ignore.extend(cli.ignore.iter().cloned());

        Ok(Self {
            marker_file,
            include_test_files: !cli.skip_tests && config.include_test_files.unwrap_or(true),
            skip_preview: cli.skip_preview || config.skip_preview.unwrap_or(false),
            ignore,
            pretty: !cli.compact && config.pretty(),
        })
    }
}

fn read_config(cli: &Cli, input: &Path) -> Result<Option<EnumscanConfig>> {
    match &cli.config {
        Some(path) => load_config_file(path).map(Some),
        None => load_config(input),
    }
}

/// One-line summary of a finished scan.
fn summarize(result: &AnalysisResult, output: &Path) -> String {
    format!(
        "Analysed {} package(s) ({} management-plane), {} constant(s); report written to {}",
        result.package_count(),
        result.management_plane_units().count(),
        result.constant_count(),
        output.display()
    )
}

fn run(cli: &Cli) -> Result<AnalysisResult> {
    let input = std::path::absolute(&cli.input)
        .with_context(|| format!("Failed to resolve input path: {}", cli.input.display()))?;
    let output = std::path::absolute(&cli.output)
        .with_context(|| format!("Failed to resolve output path: {}", cli.output.display()))?;

    if !input.is_dir() {
        bail!("Input is not a directory: {}", input.display());
    }

    let config = read_config(cli, &input)?;
    let settings = Settings::resolve(cli, config.as_ref())?;

    let result = Enumscan::new(&input)
        .marker_file(settings.marker_file.as_str())
        .include_test_files(settings.include_test_files)
        .skip_preview(settings.skip_preview)
        .ignore_patterns(settings.ignore.iter().cloned())
        .analyze()
        .with_context(|| format!("Failed to extract enumerations from {}", input.display()))?;

    result
        .report
        .write_json(&output, settings.pretty)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    if result.package_count() == 0 {
        log_warn("no packages matched; the report is empty");
    }
    log_info(&summarize(&result, &output));
    Ok(result)
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] enumscan internal error: {}", info);
        eprintln!("[PANIC] No report was written.");
    }));

    // JSON logs to stderr, filtered by RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();
    let result = run(&cli).inspect_err(|e| log_error(&format!("{e:#}")))?;

    println!("{}", summarize(&result, &cli.output));
    Ok(())
}
