//! Analyze Command
//!
//! Walks a source tree, aggregates the records and prints the report.

use std::path::Path;

use tracing::info;

use crate::analyzer::TreeWalker;
use crate::cli::ui::{OutputFormat, render};
use crate::config::ConfigLoader;
use crate::report::aggregate;
use crate::types::Result;

pub struct AnalyzeOptions<'a> {
    pub root: &'a Path,
    pub config_path: Option<&'a Path>,
    pub format: OutputFormat,
    pub detailed: bool,
}

pub fn run(options: AnalyzeOptions<'_>) -> Result<()> {
    let output = analyze_to_string(&options)?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Full pipeline without printing
pub fn analyze_to_string(options: &AnalyzeOptions<'_>) -> Result<String> {
    let config = ConfigLoader::load(options.config_path)?;

    info!("Analyzing {}", options.root.display());
    let files = TreeWalker::new(&config).walk(options.root)?;
    let report = aggregate(files, &config);

    render(&report, options.format, options.detailed)
}
