pub mod error;
pub mod handler;
pub mod json;
pub mod parsing;
pub mod query;
pub mod report;
pub mod search;
pub mod session;

pub use error::{EfdError, Result};
pub use handler::HandledReport;
pub use json::{from_canonical_form, to_canonical_form, ReportJson};
pub use parsing::{PaperReport, ParsedReport, Transaction};
pub use query::{FilerType, ReportType, SearchCriteria};
pub use report::{classify, ReportFormat};
pub use search::{SearchOutcome, SearchResult};
pub use session::Session;
