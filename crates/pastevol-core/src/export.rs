//! Tabular export of a parsed document.
//!
//! Values are rounded to four decimals for display only; the document keeps
//! full precision, and the summary row is computed from the unrounded values
//! before rounding.

use std::io;

use crate::document::BoardDocument;

/// Column headers, in output order.
pub const COLUMNS: [&str; 7] = [
    "Pad ID",
    "Shape",
    "Length",
    "Width",
    "Area",
    "Thickness",
    "Volume",
];

/// Display rounding for exported measurements.
#[must_use]
pub fn format_measurement(value: f64) -> String {
    format!("{value:.4}")
}

/// One row per pad plus a trailing `TOTAL` summary row.
#[must_use]
pub fn table_rows(document: &BoardDocument) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = document
        .pads()
        .iter()
        .map(|pad| {
            vec![
                pad.id.to_string(),
                pad.shape.to_string(),
                format_measurement(pad.length),
                format_measurement(pad.width),
                format_measurement(pad.area),
                format_measurement(pad.thickness),
                format_measurement(pad.volume),
            ]
        })
        .collect();

    // An empty f64 sum is -0.0; keep the zero unsigned.
    let total_area: f64 = document.pads().iter().map(|pad| pad.area).sum::<f64>() + 0.0;
    rows.push(vec![
        "TOTAL".to_string(),
        format!("{} pads", document.total_pad_count()),
        String::new(),
        String::new(),
        format_measurement(total_area),
        String::new(),
        format_measurement(document.total_volume()),
    ]);
    rows
}

/// Writes the pad table as CSV, header row included.
///
/// # Errors
///
/// Returns a [`csv::Error`] if writing to the underlying sink fails.
pub fn write_csv<W: io::Write>(document: &BoardDocument, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;
    for row in table_rows(document) {
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}
