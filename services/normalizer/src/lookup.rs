//! Market name lookup
//!
//! Maps the feed's human-readable market names to canonical bet types.
//! The table is immutable and shared by every worker without locking.

use shared::BetType;

/// Raw market name -> canonical bet type. Matching is exact.
pub static MARKET_NAMES: &[(&str, BetType)] = &[
    ("Money line", BetType::Moneyline),
    ("Points Spread", BetType::Spread),
    ("Total Points", BetType::Total),
];

/// Resolve a raw market name, `None` for markets we do not normalize
pub fn lookup_bet_type(market_name: &str) -> Option<BetType> {
    MARKET_NAMES
        .iter()
        .find(|(name, _)| *name == market_name)
        .map(|(_, bet_type)| *bet_type)
}
