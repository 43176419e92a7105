use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

#[derive(Error, Debug, PartialEq)]
pub enum TextError {
    #[error("no anchor element in fragment")]
    MissingAnchor,
}

/// How aggressively a cell's markup is reduced to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLevel {
    /// Inner markup with surrounding whitespace trimmed. Tags survive.
    Trim,
    /// `Trim`, then runs of whitespace collapsed to one space.
    Strip,
    /// Tag-likes removed and whitespace collapsed.
    Remove,
}

impl TextLevel {
    pub fn apply(&self, element: &ElementRef) -> String {
        let markup = element.inner_html();
        match self {
            TextLevel::Trim => trim_html(&markup),
            TextLevel::Strip => strip_html(&markup),
            TextLevel::Remove => remove_html(&markup),
        }
    }
}

pub fn trim_html(markup: &str) -> String {
    markup.trim().to_string()
}

pub fn strip_html(markup: &str) -> String {
    WHITESPACE_RE
        .replace_all(&trim_html(markup), " ")
        .into_owned()
}

// Not an HTML parser: `<.*?>` is good enough for the portal's cells.
pub fn remove_html(markup: &str) -> String {
    let text = TAG_RE.replace_all(markup, " ");
    WHITESPACE_RE
        .replace_all(text.trim(), " ")
        .into_owned()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Anchor {
    pub href: String,
    pub target: String,
    pub text: String,
}

/// Parses a markup fragment and reads the first `<a>` in it.
pub fn parse_anchor(fragment: &str) -> Result<Anchor, TextError> {
    let html = Html::parse_fragment(fragment);
    let anchor = html
        .select(&ANCHOR_SELECTOR)
        .next()
        .ok_or(TextError::MissingAnchor)?;

    let attr = |name: &str| anchor.value().attr(name).unwrap_or_default().to_string();

    Ok(Anchor {
        href: attr("href"),
        target: attr("target"),
        text: anchor.text().collect(),
    })
}
