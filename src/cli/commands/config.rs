//! Config Command
//!
//! Prints the effective configuration after all sources are merged.

use std::path::Path;

use crate::config::ConfigLoader;
use crate::types::Result;

pub fn show(config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
