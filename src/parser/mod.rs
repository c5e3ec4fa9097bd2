//! Sheet parsing engine.
//!
//! Turns the raw bytes of a spreadsheet-exported delimited text file into a
//! labelled numeric [`Matrix`]. The parse runs as a fixed sequence of stages:
//!
//! - [`tokenizer`] - decode the text and split it into rows of fields
//! - [`validator`] - check the grid is rectangular and large enough
//! - [`classifier`] - separate labels from values and parse the numbers
//! - [`assembler`] - build the matrix, or refuse if any cell was bad
//!
//! Structural problems stop the parse at once. Bad cells are collected so the
//! caller sees all of them in one [`Diagnostics`] report.

pub mod assembler;
pub mod classifier;
pub mod tokenizer;
pub mod validator;

#[cfg(test)]
pub mod tests;

use self::classifier::Classifier;
use self::tokenizer::Tokenizer;
use self::validator::GridValidator;

use crate::constants::{DEFAULT_SEPARATOR, NUMERIC_CHARACTERS};
use crate::diagnostics::{Diagnostics, ParseStage};
use crate::error::{HeatmapError, Result};
use crate::models::Matrix;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Character read as the decimal point in numeric cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalMark {
    #[default]
    Point,
    /// Spreadsheet exports from locales that write `1,5`
    Comma,
}

/// Input format settings for one parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Field separator
    pub separator: char,

    /// Decimal point used in numeric cells
    pub decimal_mark: DecimalMark,

    /// Strip surrounding whitespace from labels and numeric cells
    pub trim_fields: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            decimal_mark: DecimalMark::Point,
            trim_fields: true,
        }
    }
}

impl ParseOptions {
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_decimal_mark(mut self, decimal_mark: DecimalMark) -> Self {
        self.decimal_mark = decimal_mark;
        self
    }

    pub fn without_trimming(mut self) -> Self {
        self.trim_fields = false;
        self
    }

    /// Reject separators that would make rows or numbers ambiguous
    pub fn validate(&self) -> Result<()> {
        if matches!(self.separator, '\n' | '\r') {
            return Err(HeatmapError::configuration(
                "separator cannot be a line break",
            ));
        }
        if NUMERIC_CHARACTERS.contains(self.separator) {
            return Err(HeatmapError::configuration(format!(
                "separator {:?} can appear inside a number",
                self.separator
            )));
        }
        if self.decimal_mark == DecimalMark::Comma && self.separator == ',' {
            return Err(HeatmapError::configuration(
                "decimal comma cannot be combined with a comma separator",
            ));
        }
        Ok(())
    }
}

/// Outcome of one parse together with everything found along the way
#[derive(Debug)]
pub struct ParseResult {
    /// The matrix, or the error that stopped the parse
    pub outcome: Result<Matrix>,

    /// Findings accumulated during this parse
    pub diagnostics: Diagnostics,

    /// Stages entered, in order, ending with `Succeeded` or `Failed`
    pub stages: Vec<ParseStage>,
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Terminal stage of the parse
    pub fn final_stage(&self) -> ParseStage {
        self.stages.last().copied().unwrap_or(ParseStage::Start)
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        self.outcome.as_ref().ok()
    }

    pub fn into_result(self) -> Result<Matrix> {
        self.outcome
    }
}

/// Walks the stage sequence, refusing transitions that skip a stage
#[derive(Debug)]
struct StageTracker {
    current: ParseStage,
    visited: Vec<ParseStage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: ParseStage::Start,
            visited: vec![ParseStage::Start],
        }
    }

    fn enter(&mut self, next: ParseStage) {
        debug_assert!(
            self.current.can_transition_to(next),
            "illegal parse transition {} -> {}",
            self.current,
            next
        );
        debug!("Parse stage: {} -> {}", self.current, next);
        self.current = next;
        self.visited.push(next);
    }

    fn current(&self) -> ParseStage {
        self.current
    }
}

/// Parser for delimited text sheets.
///
/// Holds only read-only options, so one instance can be shared across threads
/// and every call to [`SheetParser::parse`] is independent.
#[derive(Debug, Clone, Default)]
pub struct SheetParser {
    options: ParseOptions,
    validator: GridValidator,
}

impl SheetParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            validator: GridValidator::new(),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse raw bytes into a matrix with a diagnostics report.
    ///
    /// Options that cannot describe a sheet fail with
    /// [`HeatmapError::Configuration`] before any input is read.
    pub fn parse(&self, input: &[u8]) -> ParseResult {
        let mut stages = StageTracker::new();
        let mut diagnostics = Diagnostics::new();

        let outcome = self.run(input, &mut stages, &mut diagnostics);
        match &outcome {
            Ok(matrix) => {
                stages.enter(ParseStage::Succeeded);
                info!(
                    "Parsed {}×{} matrix",
                    matrix.rows(),
                    matrix.columns()
                );
            }
            Err(e) => {
                let failed_in = stages.current();
                stages.enter(ParseStage::Failed);
                info!("Parse failed while {}: {}", failed_in, e);
            }
        }

        ParseResult {
            outcome,
            diagnostics,
            stages: stages.visited,
        }
    }

    /// Parse text that is already decoded
    pub fn parse_str(&self, text: &str) -> ParseResult {
        self.parse(text.as_bytes())
    }

    fn run(
        &self,
        input: &[u8],
        stages: &mut StageTracker,
        diagnostics: &mut Diagnostics,
    ) -> Result<Matrix> {
        self.options.validate()?;

        stages.enter(ParseStage::Tokenizing);
        let text = tokenizer::decode(input).inspect_err(|e| {
            if let HeatmapError::MalformedInput {
                reason,
                valid_up_to,
            } = e
            {
                diagnostics.record_malformed(ParseStage::Tokenizing, reason.clone(), *valid_up_to);
            }
        })?;
        let rows = Tokenizer::new(text, self.options.separator);

        stages.enter(ParseStage::Validating);
        let grid = self.validator.validate(rows).map_err(|e| {
            diagnostics.record_shape(ParseStage::Validating, e.clone());
            HeatmapError::Shape(e)
        })?;

        stages.enter(ParseStage::Classifying);
        let classified = Classifier::new(&self.options).classify(&grid, diagnostics);
        drop(grid);

        stages.enter(ParseStage::Assembling);
        assembler::assemble(classified, diagnostics)
    }
}

/// Parse text with the given options, returning only the matrix or error
pub fn parse_sheet(text: &str, options: &ParseOptions) -> Result<Matrix> {
    SheetParser::new(options.clone()).parse_str(text).into_result()
}
