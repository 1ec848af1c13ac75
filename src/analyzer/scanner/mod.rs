pub mod file_scanner;
pub mod walker;

pub use file_scanner::{FileScanner, ScanEntry, relative_path};
pub use walker::TreeWalker;
