//! Event normalization
//!
//! Flattens one raw event into a record per valid selection. Failures are
//! collected next to the records: a bad event name or start skips the whole
//! event, an unknown market skips that market, a bad selection skips only
//! itself.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

use shared::{
    CanonicalMarket, NormalizeError, RawEvent, EVENT_NAME_SEPARATOR, FIXTURE_NAMESPACE, LIVE_STATE,
};

use crate::lookup::lookup_bet_type;
use crate::selection_parser::parse_selection;

/// Records and errors produced by one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOutcome {
    pub markets: Vec<CanonicalMarket>,
    pub errors: Vec<NormalizeError>,
}

impl EventOutcome {
    fn failed(error: NormalizeError) -> Self {
        Self {
            markets: Vec::new(),
            errors: vec![error],
        }
    }
}

pub fn normalize_event(event: &RawEvent) -> EventOutcome {
    let Some((team1, team2)) = split_teams(&event.name) else {
        return EventOutcome::failed(NormalizeError::InvalidEventName {
            event_id: event.id,
            name: event.name.clone(),
        });
    };

    let start = match DateTime::parse_from_rfc3339(&event.start) {
        Ok(start) => start.with_timezone(&Utc),
        Err(_) => {
            return EventOutcome::failed(NormalizeError::InvalidEventDate {
                event_id: event.id,
                start: event.start.clone(),
            });
        }
    };

    let is_live = event.state == LIVE_STATE;
    let fixture_id = fixture_id(team1, team2, start);
    let mut outcome = EventOutcome::default();

    for market in &event.markets {
        let Some(bet_type) = lookup_bet_type(&market.market_name) else {
            debug!(
                event_id = event.id,
                market_name = %market.market_name,
                "Unknown market name, skipping market"
            );
            outcome.errors.push(NormalizeError::UnknownBetType {
                event_id: event.id,
                market_name: market.market_name.clone(),
            });
            continue;
        };

        for selection in &market.selections {
            match parse_selection(bet_type, selection) {
                Ok(parsed) => outcome.markets.push(CanonicalMarket {
                    fixture_id,
                    bet_type,
                    is_live,
                    odds: selection.odds,
                    line: parsed.line,
                    side: parsed.side,
                }),
                Err(e) => {
                    debug!(
                        event_id = event.id,
                        %bet_type,
                        selection = %selection.name,
                        error = %e,
                        "Skipping selection"
                    );
                    outcome.errors.push(e);
                }
            }
        }
    }

    outcome
}

/// Deterministic fixture identifier for a matchup at a start instant.
///
/// Name-based UUID over a length-prefixed key, so distinct team pairs cannot
/// collide through concatenation.
pub fn fixture_id(team1: &str, team2: &str, start: DateTime<Utc>) -> Uuid {
    let key = format!(
        "{}:{}|{}:{}|{}",
        team1.len(),
        team1,
        team2.len(),
        team2,
        start.to_rfc3339_opts(SecondsFormat::Nanos, true)
    );
    Uuid::new_v5(&FIXTURE_NAMESPACE, key.as_bytes())
}

fn split_teams(name: &str) -> Option<(&str, &str)> {
    let (team1, team2) = name.split_once(EVENT_NAME_SEPARATOR)?;
    if team1.is_empty() || team2.is_empty() {
        return None;
    }
    Some((team1, team2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{BetType, ErrorScope, RawMarket, RawSelection};

    fn market(name: &str, selections: &[(&str, f64)]) -> RawMarket {
        RawMarket {
            market_name: name.to_string(),
            selections: selections
                .iter()
                .map(|(name, odds)| RawSelection::new(*name, *odds))
                .collect(),
        }
    }

    fn event(name: &str, start: &str, markets: Vec<RawMarket>) -> RawEvent {
        RawEvent {
            id: 42,
            name: name.to_string(),
            start: start.to_string(),
            state: "LIVE".to_string(),
            markets,
        }
    }

    fn full_card() -> Vec<RawMarket> {
        vec![
            market("Money line", &[("Lakers", 2.1), ("Celtics", 1.75)]),
            market("Points Spread", &[("Lakers +4.5", 1.91), ("Celtics -4.5", 1.91)]),
            market("Total Points", &[("Over 221.5", 1.87), ("Under 221.5", 1.95)]),
        ]
    }

    #[test]
    fn test_full_event() {
        let outcome = normalize_event(&event("Lakers @ Celtics", "2024-03-01T00:30:00Z", full_card()));

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.markets.len(), 6);

        let fixture = outcome.markets[0].fixture_id;
        assert!(outcome.markets.iter().all(|m| m.fixture_id == fixture));
        assert!(outcome.markets.iter().all(|m| m.is_live));

        let spread = &outcome.markets[2];
        assert_eq!(spread.bet_type, BetType::Spread);
        assert_eq!(spread.side, "Lakers");
        assert_eq!(spread.line, 4.5);
        assert_eq!(spread.odds, 1.91);

        let under = &outcome.markets[5];
        assert_eq!(under.bet_type, BetType::Total);
        assert_eq!(under.side, "under");
        assert_eq!(under.line, 221.5);
    }

    #[test]
    fn test_not_live_state() {
        let mut raw = event("Lakers @ Celtics", "2024-03-01T00:30:00Z", full_card());
        raw.state = "live".to_string();

        let outcome = normalize_event(&raw);
        assert!(outcome.markets.iter().all(|m| !m.is_live));
    }

    #[test]
    fn test_missing_separator_skips_event() {
        let outcome = normalize_event(&event("Lakers vs Celtics", "2024-03-01T00:30:00Z", full_card()));

        assert!(outcome.markets.is_empty());
        assert_eq!(
            outcome.errors,
            vec![NormalizeError::InvalidEventName {
                event_id: 42,
                name: "Lakers vs Celtics".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_team_token_rejected() {
        let outcome = normalize_event(&event(" @ Celtics", "2024-03-01T00:30:00Z", full_card()));
        assert!(outcome.markets.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code(), NormalizeError::INVALID_EVENT_NAME);
    }

    #[test]
    fn test_whitespace_in_team_tokens_is_kept() {
        let plain = normalize_event(&event("Lakers @ Celtics", "2024-03-01T00:30:00Z", full_card()));
        let padded = normalize_event(&event("Lakers  @  Celtics", "2024-03-01T00:30:00Z", full_card()));

        assert!(plain.errors.is_empty());
        assert!(padded.errors.is_empty());
        assert_ne!(plain.markets[0].fixture_id, padded.markets[0].fixture_id);
    }

    #[test]
    fn test_blank_but_non_empty_team_accepted() {
        let outcome = normalize_event(&event("Lakers @  ", "2024-03-01T00:30:00Z", full_card()));

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.markets.len(), 6);
    }

    #[test]
    fn test_bad_start_skips_event() {
        let outcome = normalize_event(&event("Lakers @ Celtics", "2024-03-01 00:30", full_card()));

        assert!(outcome.markets.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].scope(), ErrorScope::Event);
        assert_eq!(outcome.errors[0].code(), NormalizeError::INVALID_EVENT_DATE);
    }

    #[test]
    fn test_unknown_market_does_not_block_siblings() {
        let mut markets = full_card();
        markets.insert(1, market("Player Props", &[("LeBron Over 25.5", 1.8)]));

        let outcome = normalize_event(&event("Lakers @ Celtics", "2024-03-01T00:30:00Z", markets));

        assert_eq!(outcome.markets.len(), 6);
        assert_eq!(
            outcome.errors,
            vec![NormalizeError::UnknownBetType {
                event_id: 42,
                market_name: "Player Props".to_string(),
            }]
        );
    }

    #[test]
    fn test_bad_selection_does_not_block_siblings() {
        let markets = vec![market(
            "Points Spread",
            &[("Lakers -five", 1.9), ("Lakers+4.5", 1.9), ("Celtics -4.5", 1.9)],
        )];

        let outcome = normalize_event(&event("Lakers @ Celtics", "2024-03-01T00:30:00Z", markets));

        assert_eq!(outcome.markets.len(), 1);
        assert_eq!(outcome.markets[0].side, "Celtics");
        let codes: Vec<_> = outcome.errors.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            vec![
                NormalizeError::INVALID_NUMERIC_LINE,
                NormalizeError::INVALID_SELECTION_FORMAT
            ]
        );
    }

    #[test]
    fn test_fixture_id_is_stable() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T00:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(fixture_id("Lakers", "Celtics", start), fixture_id("Lakers", "Celtics", start));
        assert_ne!(fixture_id("Lakers", "Celtics", start), fixture_id("Celtics", "Lakers", start));
        assert_ne!(
            fixture_id("Lakers", "Celtics", start),
            fixture_id("Lakers", "Celtics", start + chrono::Duration::seconds(1))
        );
        assert_ne!(fixture_id("a|1:b", "c", start), fixture_id("a", "b|1:c", start));
    }

    #[test]
    fn test_fixture_id_uses_instant_not_offset() {
        let utc = normalize_event(&event("Lakers @ Celtics", "2024-03-01T00:30:00Z", full_card()));
        let offset =
            normalize_event(&event("Lakers @ Celtics", "2024-02-29T19:30:00-05:00", full_card()));

        assert_eq!(utc.markets[0].fixture_id, offset.markets[0].fixture_id);
    }
}
