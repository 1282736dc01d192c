//! Presentation of a normalized catalog: notices, text table, CSV and JSON.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{CatalogStatus, CatalogView, NormalizedRow};
use crate::error::ReportError;

pub const NO_DATASETS_NOTICE: &str = "No datasets found in the catalog.";
pub const NO_MODIFIED_DATES_NOTICE: &str = "No 'modified' dates found in datasets.";

/// e.g. "April 05, 2024".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

pub fn status_notice(view: &CatalogView) -> String {
    match view.status() {
        CatalogStatus::NoDatasets => NO_DATASETS_NOTICE.to_string(),
        CatalogStatus::NoModifiedDates => NO_MODIFIED_DATES_NOTICE.to_string(),
        CatalogStatus::LastUpdated(date) => {
            format!("Catalog last updated on: {}", long_date(date))
        }
    }
}

/// Tab-separated table, header first. Empty when there are no datasets.
pub fn render_table(view: &CatalogView) -> String {
    if view.rows.is_empty() {
        return String::new();
    }

    let mut out = view
        .columns
        .iter()
        .map(|column| sanitize_cell(column))
        .collect::<Vec<_>>()
        .join("\t");
    out.push('\n');

    for row in &view.rows {
        out.push_str(&row_cells(view, row).join("\t"));
        out.push('\n');
    }
    out
}

pub fn write_csv<W: Write>(view: &CatalogView, writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if !view.columns.is_empty() {
        csv_writer.write_record(&view.columns)?;
    }
    for row in &view.rows {
        let cells: Vec<String> = view
            .columns
            .iter()
            .map(|column| row.get(column).map(ToString::to_string).unwrap_or_default())
            .collect();
        csv_writer.write_record(&cells)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewPayload<'a> {
    pub status: &'static str,
    pub notice: String,
    pub dataset_count: usize,
    pub columns: &'a [String],
    pub summary_date: Option<NaiveDate>,
    pub summary_display: Option<String>,
    pub rows: &'a [NormalizedRow],
}

pub fn view_payload(view: &CatalogView) -> ViewPayload<'_> {
    ViewPayload {
        status: view.status().as_str(),
        notice: status_notice(view),
        dataset_count: view.dataset_count,
        columns: &view.columns,
        summary_date: view.summary_date,
        summary_display: view.summary_date.map(long_date),
        rows: &view.rows,
    }
}

pub fn view_json(view: &CatalogView) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&view_payload(view))?)
}

fn row_cells(view: &CatalogView, row: &NormalizedRow) -> Vec<String> {
    view.columns
        .iter()
        .map(|column| {
            row.get(column)
                .map(|cell| sanitize_cell(&cell.to_string()))
                .unwrap_or_default()
        })
        .collect()
}

fn sanitize_cell(raw: &str) -> String {
    raw.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}
