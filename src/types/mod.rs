pub mod error;
pub mod record;

pub use error::{AnalysisError, GuideError, Result};
pub use record::{
    AnalysisSet, FileMetadata, FileRecord, NodeFamily, NodeKind, ParseStrategy, Span, StructuralNode,
    count_lines,
};
