/// Per-unit error taxonomy for the normalization pipeline
///
/// Design Philosophy:
/// - Every failure below the payload level is captured, never thrown
/// - Each variant carries the offending raw text for diagnostics
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
/// - The scope says how much input was skipped because of the error
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::types::BetType;

/// How much of the feed an error caused to be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorScope {
    /// Whole event skipped
    Event,
    /// One market skipped, sibling markets still processed
    Market,
    /// One selection skipped
    Selection,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("invalid event name format: {name} (event {event_id})")]
    InvalidEventName { event_id: i64, name: String },

    #[error("invalid event date format: {start} (event {event_id})")]
    InvalidEventDate { event_id: i64, start: String },

    #[error("invalid bet type: {market_name} (event {event_id})")]
    UnknownBetType { event_id: i64, market_name: String },

    #[error("invalid {bet_type} selection format: {selection}")]
    InvalidSelectionFormat { bet_type: BetType, selection: String },

    #[error("invalid {bet_type} number: {selection}")]
    InvalidNumericLine { bet_type: BetType, selection: String },
}

impl NormalizeError {
    pub const INVALID_EVENT_NAME: &'static str = "VALIDATION_INVALID_EVENT_NAME";
    pub const INVALID_EVENT_DATE: &'static str = "VALIDATION_INVALID_EVENT_DATE";
    pub const UNKNOWN_BET_TYPE: &'static str = "VALIDATION_UNKNOWN_BET_TYPE";
    pub const INVALID_SELECTION_FORMAT: &'static str = "VALIDATION_INVALID_SELECTION_FORMAT";
    pub const INVALID_NUMERIC_LINE: &'static str = "VALIDATION_INVALID_NUMERIC_LINE";

    /// Stable machine-readable code, also used as a metrics label
    pub fn code(&self) -> &'static str {
        match self {
            NormalizeError::InvalidEventName { .. } => Self::INVALID_EVENT_NAME,
            NormalizeError::InvalidEventDate { .. } => Self::INVALID_EVENT_DATE,
            NormalizeError::UnknownBetType { .. } => Self::UNKNOWN_BET_TYPE,
            NormalizeError::InvalidSelectionFormat { .. } => Self::INVALID_SELECTION_FORMAT,
            NormalizeError::InvalidNumericLine { .. } => Self::INVALID_NUMERIC_LINE,
        }
    }

    pub fn scope(&self) -> ErrorScope {
        match self {
            NormalizeError::InvalidEventName { .. } | NormalizeError::InvalidEventDate { .. } => {
                ErrorScope::Event
            }
            NormalizeError::UnknownBetType { .. } => ErrorScope::Market,
            NormalizeError::InvalidSelectionFormat { .. }
            | NormalizeError::InvalidNumericLine { .. } => ErrorScope::Selection,
        }
    }

    /// Event the error belongs to, when the error carries one
    pub fn event_id(&self) -> Option<i64> {
        match self {
            NormalizeError::InvalidEventName { event_id, .. }
            | NormalizeError::InvalidEventDate { event_id, .. }
            | NormalizeError::UnknownBetType { event_id, .. } => Some(*event_id),
            NormalizeError::InvalidSelectionFormat { .. }
            | NormalizeError::InvalidNumericLine { .. } => None,
        }
    }
}

/// Every per-unit failure from one pipeline run, reported as a single error
///
/// Order follows arrival at the error collector and is not meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateError {
    errors: Vec<NormalizeError>,
}

impl AggregateError {
    /// Returns `None` when there is nothing to report
    pub fn from_errors(errors: Vec<NormalizeError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[NormalizeError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<NormalizeError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error counts keyed by `NormalizeError::code`
    pub fn count_by_code(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.code()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encountered {} errors: [", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for AggregateError {}
