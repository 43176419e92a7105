use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

use super::text::{parse_anchor, TextError, TextLevel};
use super::types::{Transaction, NO_TICKER};

#[derive(Error, Debug)]
pub enum CellError {
    #[error("unparsable date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
    #[error("ticker cell: {0}")]
    Ticker(#[from] TextError),
    #[error("ticker anchor has no text")]
    EmptyTicker,
}

/// Transaction field a table column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Owner,
    Ticker,
    AssetName,
    AssetType,
    TransactionType,
    Amount,
    Comment,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Date => "date",
            Field::Owner => "owner",
            Field::Ticker => "ticker",
            Field::AssetName => "asset name",
            Field::AssetType => "asset type",
            Field::TransactionType => "transaction type",
            Field::Amount => "amount",
            Field::Comment => "comment",
        };
        write!(f, "{}", name)
    }
}

impl Field {
    /// Ticker cells may hold a link, so only their whitespace is normalised;
    /// everything else is read as plain text.
    pub const fn level(&self) -> TextLevel {
        match self {
            Field::Ticker => TextLevel::Strip,
            _ => TextLevel::Remove,
        }
    }

    /// Parses a normalised cell and stores it on the transaction.
    pub fn assign(&self, transaction: &mut Transaction, text: String, date_format: &str) -> Result<(), CellError> {
        match self {
            Field::Date => {
                transaction.date = NaiveDate::parse_from_str(&text, date_format)
                    .map_err(|source| CellError::Date { value: text, source })?;
            }
            Field::Owner => transaction.owner = text,
            Field::Ticker => transaction.ticker = parse_ticker(&text)?,
            Field::AssetName => transaction.asset_name = text,
            Field::AssetType => transaction.asset_type = text,
            Field::TransactionType => transaction.transaction_type = text,
            Field::Amount => transaction.amount = text,
            Field::Comment => transaction.comment = text,
        }
        Ok(())
    }
}

fn parse_ticker(text: &str) -> Result<String, CellError> {
    if text == NO_TICKER {
        return Ok(text.to_string());
    }

    let anchor = parse_anchor(text)?;
    if anchor.text.is_empty() {
        return Err(CellError::EmptyTicker);
    }
    Ok(anchor.text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub field: Field,
    pub level: TextLevel,
}

impl Column {
    pub const fn new(index: usize, field: Field) -> Self {
        Column {
            index,
            field,
            level: field.level(),
        }
    }
}

/// Column map of one transaction table variant.
///
/// Columns are listed in cell order; unlisted indices are ignored. The last
/// column is the validity gate: a row only counts once it has been read.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub name: &'static str,
    pub width: usize,
    pub columns: &'static [Column],
}

impl TableLayout {
    pub fn terminal(&self) -> Option<&Column> {
        self.columns.last()
    }
}

/// Standalone digital PTR. Column 0 is the transaction number.
pub const PTR: TableLayout = TableLayout {
    name: "ptr",
    width: 9,
    columns: &[
        Column::new(1, Field::Date),
        Column::new(2, Field::Owner),
        Column::new(3, Field::Ticker),
        Column::new(4, Field::AssetName),
        Column::new(5, Field::AssetType),
        Column::new(6, Field::TransactionType),
        Column::new(7, Field::Amount),
        Column::new(8, Field::Comment),
    ],
};

/// Annual report part 4a. Leading whitespace cell, then the transaction
/// number; no asset type column.
pub const ANNUAL_PTR_SUMMARY: TableLayout = TableLayout {
    name: "annual part 4a",
    width: 9,
    columns: &[
        Column::new(2, Field::Date),
        Column::new(3, Field::Owner),
        Column::new(4, Field::Ticker),
        Column::new(5, Field::AssetName),
        Column::new(6, Field::TransactionType),
        Column::new(7, Field::Amount),
        Column::new(8, Field::Comment),
    ],
};

/// Annual report part 4b.
pub const ANNUAL_TRANSACTIONS: TableLayout = TableLayout {
    name: "annual part 4b",
    width: 9,
    columns: &[
        Column::new(2, Field::Owner),
        Column::new(3, Field::Ticker),
        Column::new(4, Field::AssetName),
        Column::new(5, Field::TransactionType),
        Column::new(6, Field::Date),
        Column::new(7, Field::Amount),
        Column::new(8, Field::Comment),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_end_on_comment() {
        for layout in [PTR, ANNUAL_PTR_SUMMARY, ANNUAL_TRANSACTIONS] {
            let terminal = layout.terminal().unwrap();
            assert_eq!(terminal.field, Field::Comment, "{}", layout.name);
            assert_eq!(terminal.index, layout.width - 1, "{}", layout.name);
            assert!(
                layout.columns.windows(2).all(|w| w[0].index < w[1].index),
                "{} columns out of order",
                layout.name
            );
        }
    }

    #[test]
    fn test_asset_type_only_in_ptr() {
        let has_asset_type = |l: &TableLayout| l.columns.iter().any(|c| c.field == Field::AssetType);
        assert!(has_asset_type(&PTR));
        assert!(!has_asset_type(&ANNUAL_PTR_SUMMARY));
        assert!(!has_asset_type(&ANNUAL_TRANSACTIONS));
    }

    #[test]
    fn test_ticker_sentinel() {
        let mut tx = Transaction::default();
        Field::Ticker.assign(&mut tx, "--".to_string(), "%m/%d/%Y").unwrap();
        assert_eq!(tx.ticker, "--");
    }

    #[test]
    fn test_ticker_errors() {
        let mut tx = Transaction::default();
        assert!(matches!(
            Field::Ticker.assign(&mut tx, "AAPL".to_string(), "%m/%d/%Y"),
            Err(CellError::Ticker(TextError::MissingAnchor))
        ));
        assert!(matches!(
            Field::Ticker.assign(&mut tx, "<a href=\"x\"></a>".to_string(), "%m/%d/%Y"),
            Err(CellError::EmptyTicker)
        ));
    }

    #[test]
    fn test_date_assign() {
        let mut tx = Transaction::default();
        Field::Date.assign(&mut tx, "03/15/2020".to_string(), "%m/%d/%Y").unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert!(Field::Date.assign(&mut tx, "soon".to_string(), "%m/%d/%Y").is_err());
    }
}
