use std::collections::BTreeSet;
use std::fmt::Write as _;

use clap::ValueEnum;
use console::style;

use crate::report::Report;
use crate::types::{FileRecord, Result};

const IMPORT_PREVIEW: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Line-oriented text builder with styled headings
#[derive(Default)]
pub struct Output {
    buffer: String,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&mut self, message: &str) {
        let _ = writeln!(self.buffer, "{}", style(message).bold().underlined());
    }

    pub fn section(&mut self, message: &str) {
        let _ = writeln!(self.buffer, "\n{}", style(message).bold());
        let _ = writeln!(self.buffer, "{}", "─".repeat(40));
    }

    pub fn line(&mut self, message: &str) {
        let _ = writeln!(self.buffer, "{}", message);
    }

    pub fn item(&mut self, label: &str, value: &str) {
        let _ = writeln!(self.buffer, "  {} {}", style(format!("{label}:")).cyan(), value);
    }

    pub fn error(&mut self, message: &str) {
        let _ = writeln!(self.buffer, "  {} {}", style("✗").red(), message);
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Render a report in the requested format
pub fn render(report: &Report, format: OutputFormat, detailed: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report, detailed)),
    }
}

pub fn render_text(report: &Report, detailed: bool) -> String {
    let mut out = Output::new();

    out.header("Repository Guide");
    out.line(&format!(
        "{} analyzable files across {} languages ({} functions, {} classes)",
        report.files.len(),
        report.language_stats.len(),
        report.total_functions(),
        report.total_classes()
    ));

    out.section("Languages");
    for stats in &report.language_stats {
        out.line(&format!(
            "  {}: {} files ({} functions, {} classes)",
            stats.language.display_name(),
            stats.count,
            stats.function_total,
            stats.class_total
        ));
    }

    out.section("Structure");
    out.line(report.tree_view.trim_end());

    out.section("Key Files");
    for (key, record) in report.key_file_records() {
        out.line(&format!(
            "  {} {}",
            style(&key.path).bold(),
            style(format!("(score {})", key.score)).dim()
        ));
        out.item("Language", record.language.display_name());
        out.item("Lines", &record.metadata.line_count.to_string());
        out.item("Functions", &join_or_none(&record.metadata.function_names, None));
        out.item("Classes", &join_or_none(&record.metadata.class_names, None));
        out.item(
            "Imports",
            &join_or_none(&record.metadata.import_names, Some(IMPORT_PREVIEW)),
        );
    }

    if detailed {
        out.section("Files by Language");
        for (language, records) in report.files_by_language() {
            out.line(&format!("  {}", style(language.display_name()).bold()));
            for record in records {
                describe_record(&mut out, record);
            }
        }
    }

    if !report.insights.is_empty() {
        out.section("Architecture Insights");
        for insight in &report.insights {
            out.line(&format!("  - {}", insight));
        }
    }

    out.finish()
}

fn describe_record(out: &mut Output, record: &FileRecord) {
    out.line(&format!("    {}", record.path));
    if let Some(error) = &record.error {
        out.error(error);
        return;
    }
    let strategy = record.strategy.map(|s| s.as_str()).unwrap_or("-");
    out.item(
        "Size",
        &format!(
            "{} bytes ({} lines, {})",
            record.metadata.byte_size, record.metadata.line_count, strategy
        ),
    );
    if !record.metadata.function_names.is_empty() {
        out.item("Functions", &join_or_none(&record.metadata.function_names, None));
    }
    if !record.metadata.class_names.is_empty() {
        out.item("Classes", &join_or_none(&record.metadata.class_names, None));
    }
    if !record.metadata.import_names.is_empty() {
        out.item("Dependencies", &join_or_none(&record.metadata.import_names, Some(3)));
    }
}

/// Comma-join names, optionally previewing only the first `limit`
fn join_or_none(names: &BTreeSet<String>, limit: Option<usize>) -> String {
    if names.is_empty() {
        return "None".to_string();
    }
    let limit = limit.unwrap_or(names.len());
    let shown: Vec<&str> = names.iter().take(limit).map(String::as_str).collect();
    let mut joined = shown.join(", ");
    if names.len() > limit {
        let _ = write!(joined, " (and {} more)", names.len() - limit);
    }
    joined
}
