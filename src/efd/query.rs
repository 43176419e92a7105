use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// Who filed the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum FilerType {
    Senator,
    Candidate,
    FormerSenator,
}

impl FilerType {
    pub fn code(&self) -> u8 {
        match self {
            FilerType::Senator => 1,
            FilerType::Candidate => 4,
            FilerType::FormerSenator => 5,
        }
    }
}

impl fmt::Display for FilerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilerType::Senator => write!(f, "senator"),
            FilerType::Candidate => write!(f, "candidate"),
            FilerType::FormerSenator => write!(f, "former-senator"),
        }
    }
}

impl FromStr for FilerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coded(s, "filer type")
    }
}

/// Kind of report, as understood by the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum ReportType {
    Annual,
    DueDateExtension,
    PeriodicTransactionReport,
    BlindTrust,
    OtherDocuments,
}

impl ReportType {
    pub fn code(&self) -> u8 {
        match self {
            ReportType::Annual => 7,
            ReportType::DueDateExtension => 10,
            ReportType::PeriodicTransactionReport => 11,
            ReportType::BlindTrust => 14,
            ReportType::OtherDocuments => 15,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Annual => write!(f, "annual"),
            ReportType::DueDateExtension => write!(f, "extension"),
            ReportType::PeriodicTransactionReport => write!(f, "ptr"),
            ReportType::BlindTrust => write!(f, "blind-trust"),
            ReportType::OtherDocuments => write!(f, "other"),
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coded(s, "report type")
    }
}

/// Search form values that can be named either by label or by portal code.
trait Coded: IntoEnumIterator + fmt::Display + Copy {
    fn code(&self) -> u8;
}

impl Coded for FilerType {
    fn code(&self) -> u8 {
        FilerType::code(self)
    }
}

impl Coded for ReportType {
    fn code(&self) -> u8 {
        ReportType::code(self)
    }
}

fn parse_coded<T: Coded>(s: &str, kind: &str) -> Result<T, String> {
    let wanted = s.trim().to_lowercase();
    T::iter()
        .find(|v| v.to_string() == wanted || v.code().to_string() == wanted)
        .ok_or_else(|| format!("unknown {} {:?}, expected one of: {}", kind, s, T::iter().join(", ")))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub first_name: String,
    pub last_name: String,
    pub filer_types: Vec<FilerType>,
    pub state: String,
    pub report_types: Vec<ReportType>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchCriteria {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        SearchCriteria {
            first_name: String::new(),
            last_name: String::new(),
            filer_types: Vec::new(),
            state: String::new(),
            report_types: Vec::new(),
            start_date,
            end_date,
        }
    }

    /// Periodic transaction reports filed by sitting senators.
    pub fn senator_ptrs(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(start_date, end_date)
            .filer_types(vec![FilerType::Senator])
            .report_types(vec![ReportType::PeriodicTransactionReport])
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn filer_types(mut self, filer_types: Vec<FilerType>) -> Self {
        self.filer_types = filer_types;
        self
    }

    pub fn report_types(mut self, report_types: Vec<ReportType>) -> Self {
        self.report_types = report_types;
        self
    }

    /// Form fields for one page of the search data endpoint, in wire order.
    pub fn form_fields(&self, start: usize, length: usize, csrf_token: &str) -> Vec<(&'static str, String)> {
        vec![
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("filer_types", code_list(self.filer_types.iter().map(FilerType::code))),
            ("senator_state", self.state.clone()),
            ("report_types", code_list(self.report_types.iter().map(ReportType::code))),
            ("submitted_start_date", range_start(&self.start_date)),
            ("submitted_end_date", range_end(&self.end_date)),
            ("start", start.to_string()),
            ("length", length.to_string()),
            ("csrftoken", csrf_token.to_string()),
        ]
    }
}

/// `[11,7]` style list the search form expects.
pub fn code_list(mut codes: impl Iterator<Item = u8>) -> String {
    format!("[{}]", codes.join(","))
}

pub fn range_start<D: Datelike>(date: &D) -> String {
    format!("{:02}/{:02}/{:04} 00:00:00", date.month(), date.day(), date.year())
}

pub fn range_end<D: Datelike>(date: &D) -> String {
    format!("{:02}/{:02}/{:04} 23:59:59", date.month(), date.day(), date.year())
}
