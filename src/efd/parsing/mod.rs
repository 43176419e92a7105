pub mod columns;
pub mod table;
pub mod text;
pub mod types;

pub use table::{extract_annual, extract_paper, extract_ptr};
pub use types::{Extraction, PaperReport, ParsedReport, Transaction, NO_TICKER};
