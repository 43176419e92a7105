use log::debug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::columns::{CellError, Field, TableLayout, ANNUAL_PTR_SUMMARY, ANNUAL_TRANSACTIONS, PTR};
use super::text::remove_html;
use super::types::{Extraction, Transaction};

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.table-responsive table.table tbody tr").unwrap());
static SECTION_HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section.card div.card-body h3.h4").unwrap());
static PAGE_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img.filingImage").unwrap());

pub const PTR_SUMMARY_HEADING: &str = "Part 4a. Periodic Transaction Report Summary";
pub const TRANSACTIONS_HEADING: &str = "Part 4b. Transactions";

/// Result of reading one table row against a layout.
#[derive(Debug)]
pub enum RowOutcome {
    Valid(Transaction),
    WrongWidth(usize),
    Failed {
        column: usize,
        field: Field,
        error: CellError,
    },
}

/// Reads the cells of a row field by field.
///
/// The first failing column ends the row; the row is only valid when the
/// layout's terminal column has been read.
pub fn extract_row(cells: &[ElementRef], layout: &TableLayout, date_format: &str) -> RowOutcome {
    if cells.len() != layout.width {
        return RowOutcome::WrongWidth(cells.len());
    }

    let mut transaction = Transaction::default();
    for column in layout.columns {
        let text = column.level.apply(&cells[column.index]);
        if let Err(error) = column.field.assign(&mut transaction, text, date_format) {
            return RowOutcome::Failed {
                column: column.index,
                field: column.field,
                error,
            };
        }
    }

    RowOutcome::Valid(transaction)
}

fn row_cells(row: ElementRef) -> Vec<ElementRef> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect()
}

/// Extracts every valid transaction row under `scope`.
pub fn extract_table(scope: ElementRef, layout: &TableLayout, date_format: &str) -> Extraction<Transaction> {
    let mut extraction = Extraction::default();

    for (i, row) in scope.select(&ROW_SELECTOR).enumerate() {
        match extract_row(&row_cells(row), layout, date_format) {
            RowOutcome::Valid(transaction) => extraction.items.push(transaction),
            RowOutcome::WrongWidth(width) => {
                debug!("{} row {}: expected {} cells, found {}", layout.name, i, layout.width, width);
                extraction.dropped += 1;
            }
            RowOutcome::Failed { column, field, error } => {
                debug!("{} row {}: column {} ({}) failed: {}", layout.name, i, column, field, error);
                extraction.dropped += 1;
            }
        }
    }

    extraction
}

/// Transactions of a digital periodic transaction report.
pub fn extract_ptr(html: &str, date_format: &str) -> Extraction<Transaction> {
    let document = Html::parse_document(html);
    extract_table(document.root_element(), &PTR, date_format)
}

/// Transactions of a digital annual report: part 4a rows, then part 4b rows.
pub fn extract_annual(html: &str, date_format: &str) -> Extraction<Transaction> {
    let document = Html::parse_document(html);
    let mut summary = Extraction::default();
    let mut transactions = Extraction::default();

    for heading in document.select(&SECTION_HEADING_SELECTOR) {
        let title = remove_html(&heading.inner_html());
        let (layout, target) = match title.as_str() {
            PTR_SUMMARY_HEADING => (&ANNUAL_PTR_SUMMARY, &mut summary),
            TRANSACTIONS_HEADING => (&ANNUAL_TRANSACTIONS, &mut transactions),
            _ => continue,
        };

        // heading sits in div.card-body inside the section.card
        let Some(section) = heading
            .parent()
            .and_then(|body| body.parent())
            .and_then(ElementRef::wrap)
        else {
            continue;
        };

        target.extend(extract_table(section, layout, date_format));
    }

    summary.extend(transactions);
    summary
}

/// Page image URLs of a scanned paper filing, resolved against `base`.
pub fn extract_paper(html: &str, base: &Url) -> Extraction<Url> {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for image in document.select(&PAGE_IMAGE_SELECTOR) {
        let Some(src) = image.value().attr("src") else {
            debug!("page image without src");
            extraction.dropped += 1;
            continue;
        };

        match base.join(src) {
            Ok(url) => extraction.items.push(url),
            Err(e) => {
                debug!("skipping page image {:?}: {}", src, e);
                extraction.dropped += 1;
            }
        }
    }

    extraction
}
