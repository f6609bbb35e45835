//! Integration tests for CSV export of a parsed document.

use pastevol_core::export::{table_rows, write_csv, COLUMNS};
use pastevol_core::{parse, ParseOptions};

/// IT-EXP-001: CSV output carries the header, one row per pad, and the
/// summary row.
#[test]
#[allow(clippy::expect_used)]
fn it_exp_001_csv_structure() {
    let document = parse(include_bytes!("fixtures/paste_mm.gbr"), &ParseOptions::default())
        .expect("fixture parses");

    let mut buffer = Vec::new();
    write_csv(&document, &mut buffer).expect("in-memory write succeeds");
    let text = String::from_utf8(buffer).expect("csv output is UTF-8");
    let lines: Vec<&str> = text.lines().collect();

    // Header + three pads + TOTAL.
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines.first().copied(),
        Some("Pad ID,Shape,Length,Width,Area,Thickness,Volume")
    );
    let total = lines.last().expect("summary row present");
    assert!(total.starts_with("TOTAL,3 pads"));
}

/// IT-EXP-002: displayed values are rounded to four decimals while the
/// document keeps full precision.
#[test]
#[allow(clippy::expect_used)]
fn it_exp_002_rounding_is_display_only() {
    let document = parse(include_bytes!("fixtures/paste_mm.gbr"), &ParseOptions::default())
        .expect("fixture parses");

    let rows = table_rows(&document);
    let circle_row = rows.first().expect("circle pad row present");
    assert_eq!(circle_row.len(), COLUMNS.len());
    // pi * 0.25^2 = 0.19634954..., displayed as 0.1963.
    assert_eq!(circle_row.get(4).map(String::as_str), Some("0.1963"));

    let circle = document.pads().first().expect("circle pad present");
    assert!((circle.area - 0.1963).abs() > 1e-8, "document keeps full precision");
}
