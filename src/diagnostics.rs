//! Per-parse diagnostics and the parse stage state machine.
//!
//! A fresh [`Diagnostics`] is created for every parse. Findings are appended in
//! the order they are discovered and never removed; [`Diagnostics::view`]
//! collapses findings that refer to the same grid position.

use crate::error::{CellParseError, ShapeError};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Stages a single parse moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStage {
    Start,
    Tokenizing,
    Validating,
    Classifying,
    Assembling,
    Succeeded,
    Failed,
}

impl ParseStage {
    /// The stage that follows on the success path
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::Tokenizing),
            Self::Tokenizing => Some(Self::Validating),
            Self::Validating => Some(Self::Classifying),
            Self::Classifying => Some(Self::Assembling),
            Self::Assembling => Some(Self::Succeeded),
            Self::Succeeded | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether moving from `self` to `to` is a legal transition
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Tokenizing => "tokenizing",
            Self::Validating => "validating",
            Self::Classifying => "classifying",
            Self::Assembling => "assembling",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Grid position a finding refers to. `column` is `None` for whole-row or
/// whole-grid findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: Option<usize>,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Diagnostic {
    Malformed {
        stage: ParseStage,
        reason: String,
        valid_up_to: usize,
    },
    Structural {
        stage: ParseStage,
        error: ShapeError,
    },
    Cell {
        stage: ParseStage,
        error: CellParseError,
    },
}

impl Diagnostic {
    pub fn stage(&self) -> ParseStage {
        match self {
            Self::Malformed { stage, .. }
            | Self::Structural { stage, .. }
            | Self::Cell { stage, .. } => *stage,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Malformed { .. } => Position {
                row: None,
                column: None,
            },
            Self::Structural { error, .. } => Position {
                row: error.row(),
                column: None,
            },
            Self::Cell { error, .. } => Position {
                row: Some(error.row),
                column: Some(error.column),
            },
        }
    }

    pub fn as_cell_error(&self) -> Option<&CellParseError> {
        match self {
            Self::Cell { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed {
                stage,
                reason,
                valid_up_to,
            } => write!(f, "[{}] {} at byte {}", stage, reason, valid_up_to),
            Self::Structural { stage, error } => write!(f, "[{}] {}", stage, error),
            Self::Cell { stage, error } => write!(f, "[{}] {}", stage, error),
        }
    }
}

/// Append-only accumulator of findings for one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_malformed(&mut self, stage: ParseStage, reason: String, valid_up_to: usize) {
        self.entries.push(Diagnostic::Malformed {
            stage,
            reason,
            valid_up_to,
        });
    }

    pub fn record_shape(&mut self, stage: ParseStage, error: ShapeError) {
        self.entries.push(Diagnostic::Structural { stage, error });
    }

    pub fn record_cell(&mut self, stage: ParseStage, error: CellParseError) {
        self.entries.push(Diagnostic::Cell { stage, error });
    }

    /// Every finding in discovery order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Findings in discovery order, keeping only the first per position
    pub fn view(&self) -> Vec<&Diagnostic> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| seen.insert(entry.position()))
            .collect()
    }

    pub fn cell_errors(&self) -> impl Iterator<Item = &CellParseError> {
        self.view().into_iter().filter_map(Diagnostic::as_cell_error)
    }

    pub fn cell_error_count(&self) -> usize {
        self.cell_errors().count()
    }

    pub fn has_cell_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, Diagnostic::Cell { .. }))
    }

    pub fn shape_error(&self) -> Option<&ShapeError> {
        self.entries.iter().find_map(|entry| match entry {
            Diagnostic::Structural { error, .. } => Some(error),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.view() {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
