//! Parses a paste layer and prints the pad table as CSV on stdout.
//!
//! Usage: `cargo run --example report -- path/to/paste.gbr [thickness-mm]`

use std::process::ExitCode;

use pastevol_core::{export, parse, ParseOptions};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: report <paste.gbr> [stencil-thickness-mm]");
        return ExitCode::FAILURE;
    };
    let options = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(stencil_thickness) => ParseOptions { stencil_thickness },
            Err(err) => {
                eprintln!("invalid stencil thickness `{raw}`: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => ParseOptions::default(),
    };

    let data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("cannot read `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let document = match parse(&data, &options) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("parse failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    for warning in document.warnings() {
        eprintln!("warning: {warning}");
    }
    if document.skipped_pad_count() > 0 {
        eprintln!("skipped pads: {}", document.skipped_pad_count());
    }

    if let Err(err) = export::write_csv(&document, std::io::stdout().lock()) {
        eprintln!("export failed: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
