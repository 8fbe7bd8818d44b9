//! Booking table extraction from SRC HTML pages.

use crate::RawTable;
use crate::availability::{DAYS_PER_TABLE, ROW_WIDTH};
use canoebot_error::{SrcError, SrcErrorKind};
use scraper::{ElementRef, Html, Selector};

/// Extract the booking table from an SRC page.
///
/// The first table holding data rows wins. The hour cell spans all court
/// rows of its hour, so it only appears on the first of them; it is carried
/// down so every returned row reads `[hour, court, day0, .., day7]`. Rows
/// made only of `th` cells are headers and skipped.
pub fn parse_booking_table(html: &str) -> Result<RawTable, SrcError> {
    let document = Html::parse_document(html);
    let tables = Selector::parse("table").map_err(|e| {
        SrcError::new(SrcErrorKind::Format(format!("invalid table selector: {}", e)))
    })?;

    document
        .select(&tables)
        .map(extract_rows)
        .find(|rows| !rows.is_empty())
        .map(RawTable::new)
        .ok_or_else(|| SrcError::new(SrcErrorKind::TableNotFound))
}

fn extract_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut hour: Option<String> = None;
    let mut rows = Vec::new();

    for row in table_rows(table) {
        let cells: Vec<ElementRef<'_>> = child_elements(row)
            .filter(|cell| matches!(cell.value().name(), "td" | "th"))
            .collect();

        if !cells.iter().any(|cell| cell.value().name() == "td") {
            continue;
        }

        let texts: Vec<String> = cells.into_iter().map(cell_text).collect();
        if texts.len() < ROW_WIDTH - 1 {
            continue;
        }

        let first_day = texts.len() - DAYS_PER_TABLE;
        // header rows drawn with td cells carry a label, not a court number
        if texts[first_day - 1].trim().parse::<u32>().is_err() {
            continue;
        }
        if texts.len() >= ROW_WIDTH {
            hour = Some(texts[first_day - 2].clone());
        }
        // court rows before the first hour cell are not data
        let Some(hour) = hour.clone() else {
            continue;
        };

        let mut normalised = Vec::with_capacity(ROW_WIDTH);
        normalised.push(hour);
        normalised.push(texts[first_day - 1].clone());
        normalised.extend(texts[first_day..].iter().cloned());
        rows.push(normalised);
    }

    rows
}

/// `tr` elements belonging to this table, not to tables nested inside it.
fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(table)
        .flat_map(|child| match child.value().name() {
            "tr" => vec![child],
            "thead" | "tbody" | "tfoot" => child_elements(child)
                .filter(|row| row.value().name() == "tr")
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
