use anyhow::Result;
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};

use crate::efd::{ReportFormat, SearchResult};

// Base data directory
pub const DATA_DIR: &str = "data";

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Cache location of a result relative to the data directory.
///
/// Annual reports are grouped by year (`YYYY/<id>.json`), everything else by
/// submission day (`YYYY/MM/DD/<id>.json`).
pub fn report_path(result: &SearchResult) -> PathBuf {
    let date = result.date_submitted;
    let mut path = PathBuf::from(format!("{:04}", date.year()));

    if result.report_format != ReportFormat::Annual {
        path.push(format!("{:02}", date.month()));
        path.push(format!("{:02}", date.day()));
    }

    path.push(format!("{}.json", result.report_id));
    path
}

/// Writes `contents` to the result's cache location under `data_dir`.
/// Returns `None` without touching the file if it exists and `overwrite` is off.
pub fn save_report(
    data_dir: &Path,
    result: &SearchResult,
    contents: &[u8],
    overwrite: bool,
) -> Result<Option<PathBuf>> {
    let filepath = data_dir.join(report_path(result));
    if filepath.exists() && !overwrite {
        log::debug!("Skipping existing {:?}", filepath);
        return Ok(None);
    }

    if let Some(parent) = filepath.parent() {
        ensure_dir(parent)?;
    }
    fs::write(&filepath, contents)?;
    log::debug!("Saved report to {:?}", filepath);

    Ok(Some(filepath))
}

pub fn report_exists(data_dir: &Path, result: &SearchResult) -> bool {
    data_dir.join(report_path(result)).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use url::Url;

    fn result(format: ReportFormat) -> SearchResult {
        SearchResult {
            first_name: "jane".to_string(),
            last_name: "doe".to_string(),
            full_name: "jane doe".to_string(),
            file_url: Url::parse("https://efdsearch.senate.gov/search/view/ptr/abc-123/").unwrap(),
            report_name: "PTR".to_string(),
            report_format: format,
            report_id: "abc-123".to_string(),
            date_submitted: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        }
    }

    #[test]
    fn test_report_path() {
        assert_eq!(
            report_path(&result(ReportFormat::Ptr)),
            PathBuf::from("2020").join("01").join("02").join("abc-123.json")
        );
        assert_eq!(
            report_path(&result(ReportFormat::Annual)),
            PathBuf::from("2020").join("abc-123.json")
        );
    }

    #[test]
    fn test_save_report_skips_existing() {
        let dir = tempdir().unwrap();
        let r = result(ReportFormat::Ptr);

        let written = save_report(dir.path(), &r, b"{}", false).unwrap().unwrap();
        assert!(report_exists(dir.path(), &r));
        assert_eq!(fs::read_to_string(&written).unwrap(), "{}");

        assert!(save_report(dir.path(), &r, b"[]", false).unwrap().is_none());
        assert_eq!(fs::read_to_string(&written).unwrap(), "{}");

        save_report(dir.path(), &r, b"[]", true).unwrap();
        assert_eq!(fs::read_to_string(&written).unwrap(), "[]");
    }
}
