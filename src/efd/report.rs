use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};
use url::Url;

/// Layout of a filing's document, derived from the shape of its URL.
///
/// Serialised as its numeric tag so consumers of the canonical output can
/// branch on it cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReportFormat {
    Annual,
    DueDateExtension,
    Ptr,
    BlindTrust,
    OtherDocument,
    Paper,
    Unknown,
}

impl From<ReportFormat> for u8 {
    fn from(format: ReportFormat) -> u8 {
        match format {
            ReportFormat::Annual => 0,
            ReportFormat::DueDateExtension => 1,
            ReportFormat::Ptr => 2,
            ReportFormat::BlindTrust => 3,
            ReportFormat::OtherDocument => 4,
            ReportFormat::Paper => 5,
            ReportFormat::Unknown => 6,
        }
    }
}

impl TryFrom<u8> for ReportFormat {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        ReportFormat::iter()
            .find(|f| u8::from(*f) == tag)
            .ok_or_else(|| format!("unknown report format tag: {}", tag))
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Annual => write!(f, "annual"),
            ReportFormat::DueDateExtension => write!(f, "extension-notice"),
            ReportFormat::Ptr => write!(f, "ptr"),
            ReportFormat::BlindTrust => write!(f, "blind-trust"),
            ReportFormat::OtherDocument => write!(f, "other"),
            ReportFormat::Paper => write!(f, "paper"),
            ReportFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classifies a document URL.
///
/// Portal paths look like `/search/view/<format>/<id>/`; the segment before
/// the document id names the format. Extension notices live one level deeper
/// under `extension-notice/regular/`.
pub fn classify(url: &Url) -> ReportFormat {
    let mut segments: Vec<&str> = match url.path_segments() {
        Some(segments) => segments.collect(),
        None => return ReportFormat::Unknown,
    };

    if segments.last() == Some(&"") {
        segments.pop();
    }
    // document id
    segments.pop();

    let parent = segments.pop();
    let grandparent = segments.pop();

    match (parent, grandparent) {
        (Some("ptr"), _) => ReportFormat::Ptr,
        (Some("annual"), _) => ReportFormat::Annual,
        (Some("paper"), _) => ReportFormat::Paper,
        (Some("regular"), Some("extension-notice")) => ReportFormat::DueDateExtension,
        _ => ReportFormat::Unknown,
    }
}

/// Points a paper filing at its printable variant, which lists the page images.
pub fn paper_print_url(url: &Url) -> Url {
    let mut rewritten = url.clone();
    let segments: Option<Vec<String>> = url
        .path_segments()
        .map(|s| s.map(str::to_string).collect());

    if let Some(mut segments) = segments {
        if let Some(view) = segments.iter_mut().find(|s| s.as_str() == "view") {
            *view = "print".to_string();
            rewritten.set_path(&format!("/{}", segments.join("/")));
        }
    }

    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://efdsearch.senate.gov")
            .unwrap()
            .join(path)
            .unwrap()
    }

    #[test]
    fn test_classify_known_shapes() {
        let cases = [
            ("/search/view/ptr/abc-123/", ReportFormat::Ptr),
            ("/search/view/annual/abc-123/", ReportFormat::Annual),
            ("/search/view/paper/abc-123/", ReportFormat::Paper),
            (
                "/search/view/extension-notice/regular/abc-123/",
                ReportFormat::DueDateExtension,
            ),
            ("/search/view/ptr/abc-123", ReportFormat::Ptr),
        ];

        for (path, expected) in cases {
            assert_eq!(classify(&url(path)), expected, "path {}", path);
        }
    }

    #[test]
    fn test_classify_unmatched_shapes() {
        for path in [
            "/search/view/regular/abc-123/",
            "/search/view/blind-trust/abc-123/",
            "/search/home/",
            "/",
        ] {
            assert_eq!(classify(&url(path)), ReportFormat::Unknown, "path {}", path);
        }
    }

    #[test]
    fn test_classify_is_pure() {
        let u = url("/search/view/annual/abc-123/");
        assert_eq!(classify(&u), classify(&u));
    }

    #[test]
    fn test_paper_print_url() {
        let u = url("/search/view/paper/abc-123/");
        let printed = paper_print_url(&u);
        assert_eq!(printed.path(), "/search/print/paper/abc-123/");
        // already rewritten urls are left alone
        assert_eq!(paper_print_url(&printed), printed);
    }

    #[test]
    fn test_format_tags_round_trip() {
        for format in ReportFormat::iter() {
            assert_eq!(ReportFormat::try_from(u8::from(format)), Ok(format));
        }
        assert_eq!(u8::from(ReportFormat::Ptr), 2);
        assert!(ReportFormat::try_from(42).is_err());
    }
}
