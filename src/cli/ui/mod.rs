pub mod output;

pub use output::{Output, OutputFormat, render, render_text};
