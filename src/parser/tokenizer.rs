//! Text decoding and row/field splitting.
//!
//! Splitting is strict: fields are separated by the separator character only,
//! with no quoting or escaping. Field content, including surrounding
//! whitespace and empty trailing fields, is passed through untouched.

use crate::constants::UTF8_BOM;
use crate::error::{HeatmapError, Result};
use std::str::Lines;

/// Decode raw bytes as UTF-8 text, dropping a leading byte-order mark
pub fn decode(input: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(input).map_err(|e| HeatmapError::MalformedInput {
        reason: e.to_string(),
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}

/// One source line split into fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedRow<'a> {
    /// Zero-based row index in the source
    pub index: usize,
    pub fields: Vec<&'a str>,
}

impl TokenizedRow<'_> {
    /// A row whose fields are all empty or whitespace, such as `;;`
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|field| field.trim().is_empty())
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

/// Lazy row iterator over decoded text
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    lines: Lines<'a>,
    separator: char,
    next_index: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str, separator: char) -> Self {
        Self {
            lines: text.lines(),
            separator,
            next_index: 0,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = TokenizedRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let row = TokenizedRow {
            index: self.next_index,
            fields: line.split(self.separator).collect(),
        };
        self.next_index += 1;
        Some(row)
    }
}
