//! Runner advancement tables.
//!
//! Pure functions over base occupancy. Inputs are borrowed and never
//! modified; every call returns a fresh layout.
use serde::{Deserialize, Serialize};

use crate::state::{BaseLayout, HitKind, count_occupied};

/// New occupancy plus the runs that crossed the plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advancement {
    pub bases: BaseLayout,
    pub runs: u32,
}

impl Advancement {
    const fn new(bases: BaseLayout, runs: u32) -> Self {
        Self { bases, runs }
    }
}

/// Advance runners (and place the batter) for a batted-ball or walk outcome.
#[must_use]
pub fn advance_runners(kind: HitKind, bases: &BaseLayout) -> Advancement {
    let [first, second, third] = *bases;
    match kind {
        HitKind::HomeRun => Advancement::new([false; 3], runs_from(count_occupied(bases)) + 1),
        HitKind::Triple => Advancement::new([false, false, true], runs_from(count_occupied(bases))),
        HitKind::Double => {
            Advancement::new([false, true, first], u32::from(second) + u32::from(third))
        }
        HitKind::Single => Advancement::new([true, first, second], u32::from(third)),
        HitKind::Walk => force_walk(bases),
    }
}

/// Batter takes first; runners move only while the chain behind them is full.
fn force_walk(bases: &BaseLayout) -> Advancement {
    match *bases {
        [false, second, third] => Advancement::new([true, second, third], 0),
        [true, false, third] => Advancement::new([true, true, third], 0),
        [true, true, false] => Advancement::new([true, true, true], 0),
        [true, true, true] => Advancement::new([true, true, true], 1),
    }
}

/// Every runner moves up one base; the batter is retired and not placed.
#[must_use]
pub fn sacrifice_advance(bases: &BaseLayout) -> Advancement {
    let [first, second, third] = *bases;
    Advancement::new([false, first, second], u32::from(third))
}

fn runs_from(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(0)
}
