use log::{debug, warn};
use reqwest::header;
use url::Url;

use super::error::{EfdError, Result};
use super::parsing::{extract_annual, extract_paper, extract_ptr, Extraction, PaperReport, ParsedReport, Transaction};
use super::report::{paper_print_url, ReportFormat};
use super::search::SearchResult;
use super::session::Session;

/// Parsed document plus the number of rows or images that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct HandledReport {
    pub report: ParsedReport,
    pub dropped: usize,
}

impl Session {
    /// Fetches and parses the document behind a search result.
    ///
    /// Returns `Ok(None)` for formats without an extractor (extension
    /// notices, blind trusts, other documents, unknown).
    pub async fn handle_result(&mut self, result: &SearchResult) -> Result<Option<HandledReport>> {
        let handled = match result.report_format {
            ReportFormat::Ptr => {
                let extraction = self.handle_ptr(result).await?;
                HandledReport {
                    report: ParsedReport::Ptr(extraction.items),
                    dropped: extraction.dropped,
                }
            }
            ReportFormat::Annual => {
                let extraction = self.handle_annual(result).await?;
                HandledReport {
                    report: ParsedReport::Annual(extraction.items),
                    dropped: extraction.dropped,
                }
            }
            ReportFormat::Paper => {
                let extraction = self.handle_paper(result).await?;
                HandledReport {
                    report: ParsedReport::Paper(PaperReport {
                        page_urls: extraction.items,
                    }),
                    dropped: extraction.dropped,
                }
            }
            other => {
                debug!("No extractor for {} report {}", other, result.report_id);
                return Ok(None);
            }
        };

        if handled.dropped > 0 {
            warn!(
                "Dropped {} malformed entries from {} report {}",
                handled.dropped, result.report_format, result.report_id
            );
        }

        Ok(Some(handled))
    }

    pub async fn handle_ptr(&mut self, result: &SearchResult) -> Result<Extraction<Transaction>> {
        let html = self.fetch_document(&result.file_url).await?;
        Ok(extract_ptr(&html, &self.config().date_format))
    }

    pub async fn handle_annual(&mut self, result: &SearchResult) -> Result<Extraction<Transaction>> {
        let html = self.fetch_document(&result.file_url).await?;
        Ok(extract_annual(&html, &self.config().date_format))
    }

    pub async fn handle_paper(&mut self, result: &SearchResult) -> Result<Extraction<Url>> {
        let url = paper_print_url(&result.file_url);
        let html = self.fetch_document(&url).await?;
        Ok(extract_paper(&html, &url))
    }

    /// GETs a document page with the session's cookies, accepting the
    /// disclaimer first if needed. Non-2xx responses are errors so an error
    /// page is never parsed as an empty report.
    pub async fn fetch_document(&mut self, url: &Url) -> Result<String> {
        self.ensure_authenticated().await?;

        debug!("Fetching document {}", url);
        let response = self
            .client()
            .get(url.as_str())
            .header(header::USER_AGENT, &self.config().user_agent)
            .send()
            .await?;

        debug!("Response status: {}", response.status());
        if !response.status().is_success() {
            return Err(EfdError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.text().await?)
    }
}
