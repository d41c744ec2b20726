//! Spreadsheet export of comparison reports.

use crate::comparator::ComparisonRecord;
use crate::format::{column_headers, totals};
use crate::pricing::CleanedPrice;
use crate::steam::Region;
use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

const SHEET_NAME: &str = "Comparison";

/// Writes records to an `.xlsx` workbook: a header row, one row per record and a
/// closing "Total" row.
pub fn write_report(
    path: impl AsRef<Path>,
    records: &[ComparisonRecord],
    home: Region,
    foreign: Region,
) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    fill_sheet(workbook.add_worksheet(), records, home, foreign)
        .context("Failed to build spreadsheet")?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to write spreadsheet: {}", path.display()))?;

    info!("Results saved to {}", path.display());
    Ok(())
}

fn fill_sheet(
    sheet: &mut Worksheet,
    records: &[ComparisonRecord],
    home: Region,
    foreign: Region,
) -> Result<(), XlsxError> {
    let header = Format::new().set_bold().set_align(FormatAlign::Center);
    let money = Format::new().set_num_format("0.00");
    let total_label = Format::new().set_bold();
    let total_money = Format::new().set_bold().set_num_format("0.00");

    sheet.set_name(SHEET_NAME)?;

    for (col, title) in column_headers(home, foreign).iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, title, &header)?;
        sheet.set_column_width(col, if col == 0 { 32 } else { 22 })?;
    }

    let mut row = 1;
    for record in records {
        sheet.write_string(row, 0, &record.product_name)?;
        for (col, price) in record.prices().iter().enumerate() {
            write_price(sheet, row, col as u16 + 1, price, &money)?;
        }
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "Total", &total_label)?;
    for (col, total) in totals(records).iter().enumerate() {
        write_price(sheet, row, col as u16 + 1, total, &total_money)?;
    }

    Ok(())
}

fn write_price(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    price: &CleanedPrice,
    format: &Format,
) -> Result<(), XlsxError> {
    match price.value().and_then(|v| v.to_f64()) {
        Some(value) => sheet.write_number_with_format(row, col, value, format)?,
        None => sheet.write_string(row, col, price.to_string())?,
    };
    Ok(())
}
