use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::header;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{form_urlencoded, Url};

use super::error::{EfdError, Result};
use super::parsing::text::{parse_anchor, TextError};
use super::query::SearchCriteria;
use super::report::{classify, paper_print_url, ReportFormat};
use super::session::{generate_csrf_token, Session};

/// Envelope returned by the search data endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub draw: i64,
    pub records_total: i64,
    #[serde(default)]
    pub records_filtered: i64,
    #[serde(default)]
    pub data: Vec<Vec<String>>,
    pub result: String,
}

/// One fully parsed search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub file_url: Url,
    pub report_name: String,
    pub report_format: ReportFormat,
    pub report_id: String,
    pub date_submitted: NaiveDate,
}

#[derive(Error, Debug)]
pub enum RowError {
    #[error("expected 5 fields, found {0}")]
    Shape(usize),
    #[error("unparsable submitted date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
    #[error("report link: {0}")]
    Anchor(#[from] TextError),
    #[error("report link has no href")]
    EmptyHref,
    #[error("report link: {0}")]
    Url(#[from] url::ParseError),
}

impl SearchResult {
    /// Builds a result from a `[first, last, full, link, submitted]` row.
    pub fn from_row(row: &[String], base: &Url, date_format: &str) -> std::result::Result<Self, RowError> {
        let [first_name, last_name, full_name, link, submitted] = row else {
            return Err(RowError::Shape(row.len()));
        };

        let date_submitted = NaiveDate::parse_from_str(submitted, date_format).map_err(|source| {
            RowError::Date {
                value: submitted.clone(),
                source,
            }
        })?;

        let anchor = parse_anchor(link)?;
        if anchor.href.is_empty() {
            return Err(RowError::EmptyHref);
        }

        let mut file_url = base.join(&anchor.href)?;
        let report_format = classify(&file_url);
        if report_format == ReportFormat::Paper {
            file_url = paper_print_url(&file_url);
        }

        Ok(SearchResult {
            first_name: first_name.to_lowercase(),
            last_name: last_name.to_lowercase(),
            full_name: full_name.to_lowercase(),
            report_id: report_id(&file_url),
            file_url,
            report_name: anchor.text,
            report_format,
            date_submitted,
        })
    }
}

/// Last non-empty path segment of a document URL.
pub fn report_id(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_string()
}

/// Parsed rows of one response page.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub dropped: usize,
    pub records_total: i64,
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub dropped: usize,
    pub pages: usize,
}

pub fn parse_page(envelope: SearchResults, base: &Url, date_format: &str) -> Result<SearchPage> {
    if envelope.result != "ok" {
        return Err(EfdError::SearchRejected(envelope.result));
    }

    let mut page = SearchPage {
        records_total: envelope.records_total,
        ..Default::default()
    };

    for (i, row) in envelope.data.iter().enumerate() {
        match SearchResult::from_row(row, base, date_format) {
            Ok(result) => page.results.push(result),
            Err(e) => {
                debug!("Dropping search row {}: {}", i, e);
                page.dropped += 1;
            }
        }
    }

    Ok(page)
}

impl Session {
    /// All results for `criteria`, fetched `page_size` rows at a time.
    pub async fn search(&mut self, criteria: &SearchCriteria, page_size: usize) -> Result<Vec<SearchResult>> {
        Ok(self.search_outcome(criteria, page_size).await?.results)
    }

    /// Periodic transaction reports filed by senators in the date range.
    pub async fn search_senator_ptrs(&mut self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SearchResult>> {
        let criteria = SearchCriteria::senator_ptrs(start, end);
        let page_size = self.config().page_size;
        self.search(&criteria, page_size).await
    }

    /// Like [`Session::search`] but also reports dropped rows and page count.
    pub async fn search_outcome(&mut self, criteria: &SearchCriteria, page_size: usize) -> Result<SearchOutcome> {
        if page_size == 0 {
            return Err(EfdError::InvalidPageSize);
        }
        self.ensure_authenticated().await?;

        let mut outcome = SearchOutcome::default();
        let mut start = 0;

        loop {
            let page = self.search_page(criteria, start, page_size).await?;
            outcome.results.extend(page.results);
            outcome.dropped += page.dropped;
            outcome.pages += 1;

            let remainder = page.records_total - start as i64 - page_size as i64;
            if remainder <= 0 {
                break;
            }
            start += page_size;
        }

        if outcome.dropped > 0 {
            warn!("Dropped {} malformed search rows", outcome.dropped);
        }
        info!(
            "Search returned {} results over {} pages",
            outcome.results.len(),
            outcome.pages
        );

        Ok(outcome)
    }

    /// One request to the search data endpoint. Expects an authenticated
    /// session.
    pub async fn search_page(&self, criteria: &SearchCriteria, start: usize, length: usize) -> Result<SearchPage> {
        let csrf_token = generate_csrf_token();
        self.set_csrf_cookie(&csrf_token);
        let endpoints = self.endpoints();

        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(criteria.form_fields(start, length, &csrf_token))
            .finish();

        debug!("Search request start={} length={}", start, length);

        let response = self
            .client()
            .post(endpoints.search_data.as_str())
            .header(header::REFERER, endpoints.search.as_str())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::CONTENT_LENGTH, body.len())
            .header(header::USER_AGENT, &self.config().user_agent)
            .header("X-CSRFToken", &csrf_token)
            .body(body)
            .send()
            .await?;

        debug!("Response status: {}", response.status());

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let is_json = content_type
            .parse::<mime::Mime>()
            .map(|m| m.essence_str() == mime::APPLICATION_JSON.essence_str())
            .unwrap_or(false);
        if !is_json {
            return Err(EfdError::UnexpectedContentType(content_type));
        }

        let envelope: SearchResults = response.json().await?;
        parse_page(envelope, &endpoints.base, &self.config().date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE_FORMAT: &str = "%m/%d/%Y";

    fn base() -> Url {
        Url::parse("https://efdsearch.senate.gov").unwrap()
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_row() {
        let r = row(&[
            "Jane",
            "DOE",
            "Doe, Jane",
            r#"<a href="/search/view/ptr/abc-123/" target="_blank">Periodic Transaction Report for 01/02/2020</a>"#,
            "01/02/2020",
        ]);
        let result = SearchResult::from_row(&r, &base(), DATE_FORMAT).unwrap();
        assert_eq!(result.first_name, "jane");
        assert_eq!(result.last_name, "doe");
        assert_eq!(result.full_name, "doe, jane");
        assert_eq!(result.report_format, ReportFormat::Ptr);
        assert_eq!(result.report_id, "abc-123");
        assert_eq!(result.report_name, "Periodic Transaction Report for 01/02/2020");
        assert_eq!(
            result.file_url.as_str(),
            "https://efdsearch.senate.gov/search/view/ptr/abc-123/"
        );
        assert_eq!(result.date_submitted, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    }

    #[test]
    fn test_paper_row_points_at_print_view() {
        let r = row(&[
            "a",
            "b",
            "a b",
            r#"<a href="/search/view/paper/F00D-1/">Annual Report</a>"#,
            "05/15/2012",
        ]);
        let result = SearchResult::from_row(&r, &base(), DATE_FORMAT).unwrap();
        assert_eq!(result.report_format, ReportFormat::Paper);
        assert_eq!(result.file_url.path(), "/search/print/paper/F00D-1/");
        assert_eq!(result.report_id, "F00D-1");
    }

    #[test]
    fn test_bad_rows() {
        let link = r#"<a href="/search/view/ptr/x/">PTR</a>"#;
        let cases = [
            row(&["a", "b", "a b", link]),
            row(&["a", "b", "a b", link, "01/02/2020", "extra"]),
            row(&["a", "b", "a b", link, "2020-01-02"]),
            row(&["a", "b", "a b", "no link here", "01/02/2020"]),
            row(&["a", "b", "a b", "<a>PTR</a>", "01/02/2020"]),
        ];
        for r in cases {
            assert!(SearchResult::from_row(&r, &base(), DATE_FORMAT).is_err(), "{:?}", r);
        }
    }

    #[test]
    fn test_parse_page_rejected() {
        let envelope = SearchResults {
            draw: 1,
            records_total: 0,
            records_filtered: 0,
            data: vec![],
            result: "error".to_string(),
        };
        assert!(matches!(
            parse_page(envelope, &base(), DATE_FORMAT),
            Err(EfdError::SearchRejected(status)) if status == "error"
        ));
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: SearchResults =
            serde_json::from_str(r#"{"result":"ok","recordsTotal":3,"data":[["a"]]}"#).unwrap();
        assert_eq!(envelope.records_total, 3);
        assert_eq!(envelope.draw, 0);

        let page = parse_page(envelope, &base(), DATE_FORMAT).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.dropped, 1);
    }

    #[test]
    fn test_report_id() {
        let u = Url::parse("https://efdsearch.senate.gov/search/view/annual/1234/").unwrap();
        assert_eq!(report_id(&u), "1234");
        let u = Url::parse("https://efdsearch.senate.gov/search/view/annual/1234").unwrap();
        assert_eq!(report_id(&u), "1234");
    }
}
