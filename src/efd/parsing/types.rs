use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::efd::report::ReportFormat;

/// Ticker cell value used by the portal when an asset has no ticker.
pub const NO_TICKER: &str = "--";

/// One disclosed trade line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ticker: String,
    #[serde(rename = "assetname", default, skip_serializing_if = "String::is_empty")]
    pub asset_name: String,
    #[serde(rename = "assettype", default, skip_serializing_if = "String::is_empty")]
    pub asset_type: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub transaction_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Transaction {
    pub fn has_ticker(&self) -> bool {
        !self.ticker.is_empty() && self.ticker != NO_TICKER
    }
}

/// Page images of a scanned filing, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperReport {
    pub page_urls: Vec<Url>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReport {
    Ptr(Vec<Transaction>),
    Annual(Vec<Transaction>),
    Paper(PaperReport),
}

impl ParsedReport {
    pub fn format(&self) -> ReportFormat {
        match self {
            ParsedReport::Ptr(_) => ReportFormat::Ptr,
            ParsedReport::Annual(_) => ReportFormat::Annual,
            ParsedReport::Paper(_) => ReportFormat::Paper,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        match self {
            ParsedReport::Ptr(t) | ParsedReport::Annual(t) => t,
            ParsedReport::Paper(_) => &[],
        }
    }

    pub fn pages(&self) -> &[Url] {
        match self {
            ParsedReport::Paper(paper) => &paper.page_urls,
            _ => &[],
        }
    }
}

/// Items pulled out of a document plus the number of units that were dropped
/// along the way (malformed rows, unparsable cells or image sources).
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    pub items: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Extraction {
            items: Vec::new(),
            dropped: 0,
        }
    }
}

impl<T> Extraction<T> {
    pub fn extend(&mut self, other: Extraction<T>) {
        self.items.extend(other.items);
        self.dropped += other.dropped;
    }
}
