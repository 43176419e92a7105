pub mod core;
pub mod efd;
pub mod utils;

// Re-exports
pub use crate::core::config::EfdConfig;
pub use efd::{EfdError, ParsedReport, ReportFormat, SearchCriteria, SearchResult, Session};
pub use utils::progress::ProgressTracker;
