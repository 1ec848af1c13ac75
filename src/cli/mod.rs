pub mod commands;
pub mod ui;

pub use commands::analyze::AnalyzeOptions;
pub use ui::OutputFormat;
