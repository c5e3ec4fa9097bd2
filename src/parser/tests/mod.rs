//! Tests for the sheet parsing pipeline
//!
//! Exercises the stages together through [`SheetParser`], using small sheets
//! written the way spreadsheet exports look.

use crate::parser::{ParseOptions, SheetParser};


/// Sheet from the format description: corner, two column labels, two rows
pub fn create_basic_sheet() -> String {
    ";A;B\nX;1;2\nY;3;4".to_string()
}

/// German spreadsheet export with a corner marker, decimal commas and CRLF endings
pub fn create_german_export() -> String {
    [
        "Probe;Gen1;Gen2;Gen3",
        "Kontrolle;0,5;-1,25;2",
        "Behandlung;3,75;0;-4",
        "",
    ]
    .join("\r\n")
}

/// Parser with default options
pub fn default_parser() -> SheetParser {
    SheetParser::new(ParseOptions::default())
}
