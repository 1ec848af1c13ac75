//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults (`constants`)
//! 2. Project config (`.repoguide.toml`)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (`REPOGUIDE_*`)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
