//! Common fixtures and helpers for normalizer integration tests
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use normalizer::{CanonicalMarket, NormalizeError};
use shared::{RawEvent, RawMarket, RawSelection};

pub const START: &str = "2024-03-01T00:30:00Z";

pub fn market(name: &str, selections: &[(&str, f64)]) -> RawMarket {
    RawMarket {
        market_name: name.to_string(),
        selections: selections
            .iter()
            .map(|(name, odds)| RawSelection::new(*name, *odds))
            .collect(),
    }
}

pub fn event(id: i64, name: &str, state: &str, markets: Vec<RawMarket>) -> RawEvent {
    RawEvent {
        id,
        name: name.to_string(),
        start: START.to_string(),
        state: state.to_string(),
        markets,
    }
}

/// Moneyline, spread and total for one matchup: six selections
pub fn full_card(home: &str, away: &str) -> Vec<RawMarket> {
    vec![
        market("Money line", &[(home, 2.1), (away, 1.75)]),
        market(
            "Points Spread",
            &[(&format!("{} +4.5", home), 1.91), (&format!("{} -4.5", away), 1.91)],
        ),
        market("Total Points", &[("Over 221.5", 1.87), ("Under 221.5", 1.95)]),
    ]
}

pub fn feed_payload(events: &[RawEvent]) -> Vec<u8> {
    serde_json::to_vec(&json!({ "events": events })).expect("Failed to encode feed")
}

/// Order-insensitive view of a record set
pub fn market_multiset(markets: &[CanonicalMarket]) -> Vec<String> {
    let mut keys: Vec<String> = markets
        .iter()
        .map(|m| {
            format!(
                "{}|{}|{}|{}|{}|{}",
                m.fixture_id, m.bet_type, m.is_live, m.odds, m.line, m.side
            )
        })
        .collect();
    keys.sort();
    keys
}

pub fn error_multiset(errors: &[NormalizeError]) -> Vec<String> {
    let mut keys: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    keys.sort();
    keys
}

/// A randomly generated feed together with the counts it must produce
pub struct GeneratedFeed {
    pub events: Vec<RawEvent>,
    pub expected_records: usize,
    pub expected_errors: usize,
}

/// Build a seeded feed mixing valid units with every kind of per-unit failure
pub fn generated_feed(seed: u64, event_count: usize) -> GeneratedFeed {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut events = Vec::with_capacity(event_count);
    let mut expected_records = 0;
    let mut expected_errors = 0;

    for id in 0..event_count as i64 {
        let roll = rng.gen_range(0..20);
        let (name, start) = match roll {
            0 => (format!("Team{} vs Team{}", id, id + 1), START.to_string()),
            1 => (format!("Team{} @ Team{}", id, id + 1), "not-a-date".to_string()),
            _ => (
                format!("Team{} @ Team{}", id, id + 1),
                format!("2024-03-{:02}T{:02}:00:00Z", 1 + id % 28, id % 24),
            ),
        };
        let event_valid = roll >= 2;

        let mut markets = Vec::new();
        let mut event_records = 0;
        let mut event_errors = 0;

        for _ in 0..rng.gen_range(0..5) {
            let kind = rng.gen_range(0..4);
            let selection_count = rng.gen_range(0..4);

            let market = match kind {
                0 => {
                    let selections: Vec<_> = (0..selection_count)
                        .map(|i| RawSelection::new(format!("Team {} side {}", id, i), 1.5))
                        .collect();
                    event_records += selections.len();
                    RawMarket {
                        market_name: "Money line".to_string(),
                        selections,
                    }
                }
                1 | 2 => {
                    let market_name = if kind == 1 { "Points Spread" } else { "Total Points" };
                    let selections: Vec<_> = (0..selection_count)
                        .map(|i| match rng.gen_range(0..6) {
                            0 => {
                                event_errors += 1;
                                RawSelection::new(format!("Team{}-{}", id, i), 1.9)
                            }
                            1 => {
                                event_errors += 1;
                                RawSelection::new(format!("Team {} -five", id), 1.9)
                            }
                            _ => {
                                event_records += 1;
                                RawSelection::new(format!("Team {} {}.5", id, i), 1.9)
                            }
                        })
                        .collect();
                    RawMarket {
                        market_name: market_name.to_string(),
                        selections,
                    }
                }
                _ => {
                    event_errors += 1;
                    market("Player Props", &[("Anyone 10.5", 1.8)])
                }
            };
            markets.push(market);
        }

        if event_valid {
            expected_records += event_records;
            expected_errors += event_errors;
        } else {
            expected_errors += 1;
        }

        events.push(RawEvent {
            id,
            name,
            start,
            state: if rng.gen_bool(0.3) { "LIVE" } else { "PRE" }.to_string(),
            markets,
        });
    }

    events.shuffle(&mut rng);

    GeneratedFeed {
        events,
        expected_records,
        expected_errors,
    }
}
