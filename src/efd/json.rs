use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::Result;
use super::parsing::{ParsedReport, Transaction};
use super::report::ReportFormat;
use super::search::SearchResult;

/// Canonical output document for one filing.
///
/// `reportformat` tells consumers which of `transactions` or `pages` is
/// populated; the other is always an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportJson {
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "reportname")]
    pub report_name: String,
    #[serde(rename = "reporturl")]
    pub report_url: Url,
    #[serde(rename = "datesubmitted")]
    pub date_submitted: NaiveDate,
    #[serde(rename = "reportformat")]
    pub report_format: ReportFormat,
    #[serde(rename = "reportid")]
    pub report_id: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub pages: Vec<Url>,
}

impl ReportJson {
    pub fn new(result: &SearchResult, report: &ParsedReport) -> Self {
        // the result's tag decides which list is populated
        let (transactions, pages) = match result.report_format {
            ReportFormat::Paper => (Vec::new(), report.pages().to_vec()),
            _ => (report.transactions().to_vec(), Vec::new()),
        };

        ReportJson {
            first_name: result.first_name.to_lowercase(),
            last_name: result.last_name.to_lowercase(),
            report_name: result.report_name.clone(),
            report_url: result.file_url.clone(),
            date_submitted: result.date_submitted,
            report_format: result.report_format,
            report_id: result.report_id.clone(),
            transactions,
            pages,
        }
    }
}

pub fn to_canonical_form(result: &SearchResult, report: &ParsedReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&ReportJson::new(result, report))?)
}

pub fn from_canonical_form(bytes: &[u8]) -> Result<ReportJson> {
    Ok(serde_json::from_slice(bytes)?)
}
