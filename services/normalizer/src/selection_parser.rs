//! Selection parsing
//!
//! Splits a selection display name such as `"Lakers -5.5"` into a side
//! label and a numeric line, according to the market's bet type.

use shared::{BetType, NormalizeError, RawSelection};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSelection {
    pub line: f64,
    pub side: String,
}

impl ParsedSelection {
    fn empty() -> Self {
        Self {
            line: 0.0,
            side: String::new(),
        }
    }
}

/// Parse a selection for a resolved bet type.
///
/// Moneyline keeps the name verbatim with a zero line. Spread and total
/// split on the last space; total side labels are lowercased while spread
/// labels keep their case.
pub fn parse_selection(
    bet_type: BetType,
    selection: &RawSelection,
) -> Result<ParsedSelection, NormalizeError> {
    match bet_type {
        BetType::Moneyline => Ok(ParsedSelection {
            line: 0.0,
            side: selection.name.clone(),
        }),
        BetType::Spread => {
            let (side, line) = split_line(bet_type, &selection.name)?;
            Ok(ParsedSelection {
                line,
                side: side.to_string(),
            })
        }
        BetType::Total => {
            let (side, line) = split_line(bet_type, &selection.name)?;
            Ok(ParsedSelection {
                line,
                side: side.to_lowercase(),
            })
        }
    }
}

/// Parse a selection given a canonical bet type tag.
///
/// Tags outside the known set succeed with a zero line and an empty side.
pub fn parse_selection_tag(
    tag: &str,
    selection: &RawSelection,
) -> Result<ParsedSelection, NormalizeError> {
    match tag.parse::<BetType>() {
        Ok(bet_type) => parse_selection(bet_type, selection),
        Err(_) => Ok(ParsedSelection::empty()),
    }
}

fn split_line(bet_type: BetType, name: &str) -> Result<(&str, f64), NormalizeError> {
    let (side, token) = name
        .rsplit_once(' ')
        .ok_or_else(|| NormalizeError::InvalidSelectionFormat {
            bet_type,
            selection: name.to_string(),
        })?;

    let line = token
        .parse::<f64>()
        .map_err(|_| NormalizeError::InvalidNumericLine {
            bet_type,
            selection: name.to_string(),
        })?;

    Ok((side, line))
}
