/// Feed and output types shared by the normalization services
///
/// Raw types mirror the upstream odds feed exactly and are decoded once,
/// then only read. `CanonicalMarket` is the flat record handed to callers.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Top-level payload of the upstream odds feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFeed {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// One fixture as delivered by the feed, e.g. `"Lakers @ Celtics"`
///
/// Missing fields decode to their zero values so that a bad event is
/// reported on its own instead of rejecting the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub id: i64,
    pub name: String,
    pub start: String,
    pub state: String,
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMarket {
    pub market_name: String,
    pub selections: Vec<RawSelection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSelection {
    pub name: String,
    pub odds: f64,
}

impl RawSelection {
    pub fn new(name: impl Into<String>, odds: f64) -> Self {
        Self {
            name: name.into(),
            odds,
        }
    }
}

/// Canonical bet type a raw market name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BetType {
    Moneyline,
    Spread,
    Total,
}

impl BetType {
    pub const ALL: [BetType; 3] = [BetType::Moneyline, BetType::Spread, BetType::Total];

    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Moneyline => "Moneyline",
            BetType::Spread => "Spread",
            BetType::Total => "Total",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised bet type tag: {0}")]
pub struct ParseBetTypeError(pub String);

impl FromStr for BetType {
    type Err = ParseBetTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BetType::ALL
            .into_iter()
            .find(|bet_type| bet_type.as_str() == s)
            .ok_or_else(|| ParseBetTypeError(s.to_string()))
    }
}

/// Flat, normalized record produced for every valid selection
///
/// Serialized field names follow the downstream storage schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMarket {
    pub fixture_id: Uuid,
    pub bet_type: BetType,
    pub is_live: bool,
    pub odds: f64,
    /// Spread or total line; always 0 for moneyline
    #[serde(rename = "number")]
    pub line: f64,
    #[serde(rename = "side_type")]
    pub side: String,
}
