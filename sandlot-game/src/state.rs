//! Game state snapshot and the vocabulary it is described in.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_TEAMS;
use crate::decision::Decision;
use crate::error::ParseError;

/// Occupancy of first, second and third base.
pub type BaseLayout = [bool; 3];

/// Which half of the inning is being played. Top = visitors bat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    #[default]
    Top,
    Bottom,
}

impl Half {
    #[must_use]
    pub const fn batting_team(self) -> Team {
        match self {
            Self::Top => Team::Visitors,
            Self::Bottom => Team::Home,
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Visitors,
    Home,
}

impl Team {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Visitors => 0,
            Self::Home => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Visitors => Self::Home,
            Self::Home => Self::Visitors,
        }
    }
}

impl FromStr for Team {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visitors" | "away" | "0" => Ok(Self::Visitors),
            "home" | "1" => Ok(Self::Home),
            _ => Err(ParseError::unknown("team", s)),
        }
    }
}

/// A base a runner can stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    /// Slot in a [`BaseLayout`].
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }

    /// Conventional base number (1, 2, 3).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// The base a runner leaves when stealing this one.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::First => None,
            Self::Second => Some(Self::First),
            Self::Third => Some(Self::Second),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        }
    }
}

/// Category handed to runner advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
}

impl HitKind {
    pub const ALL: [Self; 5] = [
        Self::Single,
        Self::Double,
        Self::Triple,
        Self::HomeRun,
        Self::Walk,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::HomeRun => "home_run",
            Self::Walk => "walk",
        }
    }
}

impl FromStr for HitKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| ParseError::unknown("hit kind", s))
    }
}

/// Outcome of a completed plate appearance as recorded in the play log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayEvent {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    IntentionalWalk,
    PopOut,
    Strikeout,
    Sacrifice,
    BuntSingle,
    BuntPopOut,
}

impl PlayEvent {
    /// Whether the event puts the batter on base.
    #[must_use]
    pub const fn reached_base(self) -> bool {
        !matches!(
            self,
            Self::PopOut | Self::Strikeout | Self::Sacrifice | Self::BuntPopOut
        )
    }

    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(
            self,
            Self::Single | Self::Double | Self::Triple | Self::HomeRun | Self::BuntSingle
        )
    }
}

impl From<HitKind> for PlayEvent {
    fn from(kind: HitKind) -> Self {
        match kind {
            HitKind::Single => Self::Single,
            HitKind::Double => Self::Double,
            HitKind::Triple => Self::Triple,
            HitKind::HomeRun => Self::HomeRun,
            HitKind::Walk => Self::Walk,
        }
    }
}

/// Behavioral override applied to exactly the next pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnePitchModifier {
    Take,
    Swing,
    Protect,
    Normal,
}

impl OnePitchModifier {
    pub const ALL: [Self; 4] = [Self::Take, Self::Swing, Self::Protect, Self::Normal];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Take => "take",
            Self::Swing => "swing",
            Self::Protect => "protect",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for OnePitchModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnePitchModifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|modifier| modifier.as_str() == s.trim())
            .ok_or_else(|| ParseError::unknown("one-pitch modifier", s))
    }
}

/// Immutable record of a completed plate appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayLogEntry {
    pub inning: u8,
    pub half: Half,
    /// One-based lineup slot of the batter.
    pub batter_num: u8,
    pub team: Team,
    pub event: PlayEvent,
    pub runs: u32,
}

/// Single source of truth for a game in progress.
///
/// The reducer never hands out a mutated alias of a previous snapshot: every
/// dispatched action yields a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub inning: u8,
    pub at_bat: Half,
    pub score: [u32; 2],
    pub base_layout: BaseLayout,
    pub outs: u8,
    pub balls: u8,
    pub strikes: u8,
    pub teams: [String; 2],
    pub batter_index: [u8; 2],
    #[serde(default)]
    pub inning_runs: [BTreeMap<u8, u32>; 2],
    #[serde(default)]
    pub play_log: Vec<PlayLogEntry>,
    #[serde(default)]
    pub pending_decision: Option<Decision>,
    #[serde(default)]
    pub one_pitch_modifier: Option<OnePitchModifier>,
    pub game_over: bool,
    pub pitch_key: u32,
    #[serde(default)]
    pub hit_type: Option<PlayEvent>,
    #[serde(default)]
    pub defensive_shift: bool,
    #[serde(default)]
    pub pinch_hitter: bool,
    #[serde(default)]
    pub pinch_hitters_used: [u8; 2],
    #[serde(default)]
    pub decision_checked_at: Option<u32>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new([DEFAULT_TEAMS[0].to_string(), DEFAULT_TEAMS[1].to_string()])
    }
}

impl GameState {
    /// Fresh first-pitch state for the given teams.
    #[must_use]
    pub fn new(teams: [String; 2]) -> Self {
        Self {
            inning: 1,
            at_bat: Half::Top,
            score: [0, 0],
            base_layout: [false; 3],
            outs: 0,
            balls: 0,
            strikes: 0,
            teams,
            batter_index: [0, 0],
            inning_runs: [BTreeMap::new(), BTreeMap::new()],
            play_log: Vec::new(),
            pending_decision: None,
            one_pitch_modifier: None,
            game_over: false,
            pitch_key: 0,
            hit_type: None,
            defensive_shift: false,
            pinch_hitter: false,
            pinch_hitters_used: [0, 0],
            decision_checked_at: None,
        }
    }

    #[must_use]
    pub const fn batting_team(&self) -> Team {
        self.at_bat.batting_team()
    }

    #[must_use]
    pub const fn fielding_team(&self) -> Team {
        self.batting_team().opponent()
    }

    #[must_use]
    pub fn team_name(&self, team: Team) -> &str {
        &self.teams[team.index()]
    }

    #[must_use]
    pub fn occupied(&self, base: Base) -> bool {
        self.base_layout[base.slot()]
    }

    #[must_use]
    pub fn runners_on(&self) -> usize {
        count_occupied(&self.base_layout)
    }

    #[must_use]
    pub fn runner_in_scoring_position(&self) -> bool {
        self.occupied(Base::Second) || self.occupied(Base::Third)
    }

    /// Absolute run difference between the two teams.
    #[must_use]
    pub const fn margin(&self) -> u32 {
        self.score[0].abs_diff(self.score[1])
    }

    /// Lineup slot (zero-based) of the batter currently at the plate.
    #[must_use]
    pub const fn current_batter_slot(&self) -> u8 {
        self.batter_index[self.batting_team().index()]
    }

    /// Runs scored by `team` in each inning played so far (missing innings are zero).
    #[must_use]
    pub fn line_score(&self, team: Team) -> Vec<u32> {
        let runs = &self.inning_runs[team.index()];
        (1..=self.inning)
            .map(|inning| runs.get(&inning).copied().unwrap_or(0))
            .collect()
    }

    /// Winner once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        if !self.game_over || self.score[0] == self.score[1] {
            return None;
        }
        if self.score[1] > self.score[0] {
            Some(Team::Home)
        } else {
            Some(Team::Visitors)
        }
    }
}

/// Number of occupied bases in a layout.
#[must_use]
pub fn count_occupied(bases: &BaseLayout) -> usize {
    bases.iter().filter(|occupied| **occupied).count()
}
