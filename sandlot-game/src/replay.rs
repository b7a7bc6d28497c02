//! Shareable replay links.
//!
//! A replay is the seed plus the manager's answers, each keyed by the pitch
//! it was given at: `?seed=k3x9q1&decisions=12%3Abunt%3B40%3Amodifier%3Atake`.
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::reducer::GameAction;
use crate::seed::{encode_seed, parse_seed};
use crate::state::{Base, OnePitchModifier};
use crate::strategy::Strategy;

/// How the manager answered a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DecisionChoice {
    Steal { base: Base, success_pct: u32 },
    Bunt,
    IntentionalWalk,
    Modifier { modifier: OnePitchModifier },
    Skip,
    PinchHit,
    Shift { active: bool },
}

impl DecisionChoice {
    /// The action that carries out this choice for a batting team playing `strategy`.
    #[must_use]
    pub fn to_action(self, strategy: Strategy) -> GameAction {
        match self {
            Self::Steal { base, success_pct } => GameAction::StealAttempt { base, success_pct },
            Self::Bunt => GameAction::BuntAttempt { strategy },
            Self::IntentionalWalk => GameAction::IntentionalWalk,
            Self::Modifier { modifier } => GameAction::SetOnePitchModifier { modifier },
            Self::Skip => GameAction::SkipDecision,
            Self::PinchHit => GameAction::PinchHit,
            Self::Shift { active } => GameAction::SetDefensiveShift { active },
        }
    }

    /// The choice an action represents, if it answers a decision.
    #[must_use]
    pub const fn from_action(action: &GameAction) -> Option<Self> {
        match action {
            GameAction::StealAttempt { base, success_pct } => Some(Self::Steal {
                base: *base,
                success_pct: *success_pct,
            }),
            GameAction::BuntAttempt { .. } => Some(Self::Bunt),
            GameAction::IntentionalWalk => Some(Self::IntentionalWalk),
            GameAction::SetOnePitchModifier { modifier } => Some(Self::Modifier {
                modifier: *modifier,
            }),
            GameAction::SkipDecision => Some(Self::Skip),
            GameAction::PinchHit => Some(Self::PinchHit),
            GameAction::SetDefensiveShift { active } => Some(Self::Shift { active: *active }),
            _ => None,
        }
    }
}

/// One entry of the decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayDecision {
    pub pitch_key: u32,
    pub choice: DecisionChoice,
}

impl ReplayDecision {
    #[must_use]
    pub const fn new(pitch_key: u32, choice: DecisionChoice) -> Self {
        Self { pitch_key, choice }
    }
}

impl fmt::Display for ReplayDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.pitch_key;
        match self.choice {
            DecisionChoice::Steal { base, success_pct } => {
                write!(f, "{key}:steal:{}:{success_pct}", base.number())
            }
            DecisionChoice::Bunt => write!(f, "{key}:bunt"),
            DecisionChoice::IntentionalWalk => write!(f, "{key}:ibb"),
            DecisionChoice::Modifier { modifier } => write!(f, "{key}:modifier:{modifier}"),
            DecisionChoice::Skip => write!(f, "{key}:skip"),
            DecisionChoice::PinchHit => write!(f, "{key}:pinch"),
            DecisionChoice::Shift { active } => {
                write!(f, "{key}:shift:{}", if active { "on" } else { "off" })
            }
        }
    }
}

impl FromStr for ReplayDecision {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let mut parts = entry.split(':');
        let key_text = parts.next().unwrap_or_default();
        let pitch_key = key_text
            .parse()
            .map_err(|_| invalid(entry, "pitch key", key_text))?;
        let action = parts.next().ok_or_else(|| missing(entry, "action"))?;
        let choice = match action {
            "steal" => {
                let base_text = parts.next().ok_or_else(|| missing(entry, "base"))?;
                let base = base_text
                    .parse()
                    .ok()
                    .and_then(Base::from_number)
                    .filter(|base| *base != Base::First)
                    .ok_or_else(|| invalid(entry, "base", base_text))?;
                let pct_text = parts.next().ok_or_else(|| missing(entry, "success pct"))?;
                let success_pct = pct_text
                    .parse::<u32>()
                    .ok()
                    .filter(|pct| *pct <= 100)
                    .ok_or_else(|| invalid(entry, "success pct", pct_text))?;
                DecisionChoice::Steal { base, success_pct }
            }
            "bunt" => DecisionChoice::Bunt,
            "ibb" => DecisionChoice::IntentionalWalk,
            "modifier" => {
                let text = parts.next().ok_or_else(|| missing(entry, "modifier"))?;
                let modifier = text
                    .parse()
                    .map_err(|_| invalid(entry, "modifier", text))?;
                DecisionChoice::Modifier { modifier }
            }
            "skip" => DecisionChoice::Skip,
            "pinch" => DecisionChoice::PinchHit,
            "shift" => {
                let text = parts.next().ok_or_else(|| missing(entry, "shift flag"))?;
                let active = match text {
                    "on" | "1" | "true" => true,
                    "off" | "0" | "false" => false,
                    _ => return Err(invalid(entry, "shift flag", text)),
                };
                DecisionChoice::Shift { active }
            }
            other => return Err(ParseError::unknown("decision action", other)),
        };
        if let Some(extra) = parts.next() {
            return Err(invalid(entry, "trailing field", extra));
        }
        Ok(Self { pitch_key, choice })
    }
}

fn missing(entry: &str, field: &'static str) -> ParseError {
    ParseError::MissingField {
        entry: entry.to_string(),
        field,
    }
}

fn invalid(entry: &str, field: &'static str, value: &str) -> ParseError {
    ParseError::InvalidField {
        entry: entry.to_string(),
        field,
        value: value.to_string(),
    }
}

/// Build the query string that reproduces a game.
#[must_use]
pub fn build_replay_url(seed: u32, decisions: &[ReplayDecision]) -> String {
    let mut url = format!("?seed={}", encode_seed(seed));
    if !decisions.is_empty() {
        let joined = decisions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";");
        url.push_str("&decisions=");
        url.push_str(&percent_encode(&joined));
    }
    url
}

/// Seed named by a replay link, if present and well formed.
#[must_use]
pub fn seed_from_url(url: &str) -> Option<u32> {
    query_pairs(url)
        .into_iter()
        .find(|(name, _)| name == "seed")
        .and_then(|(_, value)| parse_seed(&value))
}

/// Decision log named by a replay link. Malformed entries are skipped.
#[must_use]
pub fn decisions_from_url(url: &str) -> Vec<ReplayDecision> {
    let Some(raw) = decisions_param(url) else {
        return Vec::new();
    };
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<ReplayDecision>() {
            Ok(decision) => Some(decision),
            Err(err) => {
                log::debug!("skipping replay entry: {err}");
                None
            }
        })
        .collect()
}

/// The `decisions` value, with any bare `&`-joined entries that follow it
/// folded back in.
fn decisions_param(url: &str) -> Option<String> {
    let query = query_of(url);
    let mut segments = query.split('&');
    let first = segments.find_map(|segment| segment.strip_prefix("decisions="))?;
    let mut entries = vec![percent_decode(first)];
    entries.extend(
        segments
            .take_while(|segment| !segment.contains('='))
            .map(percent_decode),
    );
    Some(entries.join(";"))
}

fn query_pairs(url: &str) -> Vec<(String, String)> {
    query_of(url)
        .split('&')
        .filter_map(|segment| segment.split_once('='))
        .map(|(name, value)| (percent_decode(name), percent_decode(value)))
        .collect()
}

fn query_of(url: &str) -> &str {
    let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
    without_fragment
        .split_once('?')
        .map_or(without_fragment, |(_, query)| query)
}

/// Query values keep RFC 3986 unreserved characters as is.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, QUERY_VALUE).to_string()
}

fn percent_decode(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}

/// Recorded decisions waiting to be replayed, in pitch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayQueue {
    pending: VecDeque<ReplayDecision>,
}

impl ReplayQueue {
    #[must_use]
    pub fn new(decisions: Vec<ReplayDecision>) -> Self {
        Self {
            pending: decisions.into(),
        }
    }

    #[must_use]
    pub fn from_url(url: &str) -> Self {
        Self::new(decisions_from_url(url))
    }

    /// Answer for the pause at `pitch_key`. Entries recorded for earlier
    /// pitches can no longer apply and are dropped.
    pub fn take_for(&mut self, pitch_key: u32) -> Option<ReplayDecision> {
        while let Some(front) = self.pending.front() {
            if front.pitch_key >= pitch_key {
                break;
            }
            log::debug!("dropping stale replay entry {front}");
            self.pending.pop_front();
        }
        if self.pending.front()?.pitch_key == pitch_key {
            self.pending.pop_front()
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> Vec<ReplayDecision> {
        vec![
            ReplayDecision::new(
                4,
                DecisionChoice::Steal {
                    base: Base::Second,
                    success_pct: 91,
                },
            ),
            ReplayDecision::new(12, DecisionChoice::Bunt),
            ReplayDecision::new(
                30,
                DecisionChoice::Modifier {
                    modifier: OnePitchModifier::Take,
                },
            ),
            ReplayDecision::new(31, DecisionChoice::Shift { active: true }),
            ReplayDecision::new(55, DecisionChoice::Skip),
        ]
    }

    #[test]
    fn url_round_trips_seed_and_log() {
        let url = build_replay_url(0x00C0_FFEE, &sample_log());
        assert!(url.starts_with("?seed="));
        assert!(!url.contains(';'));
        assert_eq!(seed_from_url(&url), Some(0x00C0_FFEE));
        assert_eq!(decisions_from_url(&url), sample_log());
    }

    #[test]
    fn decisions_value_is_percent_encoded() {
        let log = [
            ReplayDecision::new(12, DecisionChoice::Bunt),
            ReplayDecision::new(13, DecisionChoice::Skip),
        ];
        assert_eq!(
            build_replay_url(723, &log),
            "?seed=k3&decisions=12%3Abunt%3B13%3Askip"
        );
        assert_eq!(percent_encode("a-b_c.d~e f"), "a-b_c.d~e%20f");
        assert_eq!(percent_decode("3%3abunt%3B50%"), "3:bunt;50%");
        assert_eq!(percent_decode("%zz%4"), "%zz%4");
    }

    #[test]
    fn empty_log_omits_decisions_param() {
        let url = build_replay_url(723, &[]);
        assert_eq!(url, "?seed=k3");
        assert!(decisions_from_url(&url).is_empty());
    }

    #[test]
    fn entries_render_as_key_action_args() {
        let rendered: Vec<String> = sample_log().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            ["4:steal:2:91", "12:bunt", "30:modifier:take", "31:shift:on", "55:skip"]
        );
    }

    #[test]
    fn tolerant_decoding() {
        let url = "https://example.test/play?seed=k3&decisions=3:bunt;bogus;9:warp&10:ibb#top";
        assert_eq!(seed_from_url(url), Some(723));
        assert_eq!(
            decisions_from_url(url),
            vec![
                ReplayDecision::new(3, DecisionChoice::Bunt),
                ReplayDecision::new(10, DecisionChoice::IntentionalWalk),
            ]
        );
        assert!(decisions_from_url("seed=abc").is_empty());
        assert!(decisions_from_url("?decisions=").is_empty());
        assert_eq!(seed_from_url("?seed=&decisions=1:skip"), None);
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!("x:bunt".parse::<ReplayDecision>().is_err());
        assert!("5".parse::<ReplayDecision>().is_err());
        assert!("5:steal:1:80".parse::<ReplayDecision>().is_err());
        assert!("5:steal:2:180".parse::<ReplayDecision>().is_err());
        assert!("5:modifier:wild".parse::<ReplayDecision>().is_err());
        assert!("5:bunt:extra".parse::<ReplayDecision>().is_err());
        assert!(matches!(
            "5:hitandrun".parse::<ReplayDecision>(),
            Err(ParseError::UnknownName { .. })
        ));
    }

    #[test]
    fn queue_drops_stale_entries() {
        let mut queue = ReplayQueue::new(sample_log());
        assert_eq!(queue.take_for(2), None);
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.take_for(12).map(|d| d.choice), Some(DecisionChoice::Bunt));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.take_for(31).map(|d| d.pitch_key), Some(31));
        assert_eq!(queue.take_for(100), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn choices_map_to_actions_and_back() {
        for decision in sample_log() {
            let action = decision.choice.to_action(Strategy::Contact);
            assert_eq!(DecisionChoice::from_action(&action), Some(decision.choice));
        }
        assert_eq!(
            DecisionChoice::from_action(&GameAction::Foul { pitch_type: None }),
            None
        );
    }
}
