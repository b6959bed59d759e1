//! Scoring module - run points, combo multiplier and cue selection
//!
//! Rules:
//! - A run of length `n` is worth `points_per_unit * n^2`.
//! - A run uniform in both color and shape counts once, times `dual_run_multiplier`.
//! - The sum over a move is multiplied by the combo level (consecutive scoring moves).
//! - The first gain of a match plays [`Cue::FirstScore`]; otherwise a large gain outside
//!   a chain plays [`Cue::BigWin`]; otherwise combos of 2+ play their level cue.

use crate::config::ScoringConfig;
use crate::types::Cue;

/// Which attribute a run is uniform in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunAttribute {
    Color,
    Shape,
    /// Uniform in both color and shape
    Both,
}

/// Points for a single run
pub fn run_points(len: usize, attribute: RunAttribute, config: &ScoringConfig) -> u32 {
    let len = len as u32;
    let base = config
        .points_per_unit
        .saturating_mul(len.saturating_mul(len));
    match attribute {
        RunAttribute::Both => base.saturating_mul(config.dual_run_multiplier),
        RunAttribute::Color | RunAttribute::Shape => base,
    }
}

/// Apply the combo multiplier to a move's base gain
pub fn apply_combo(gained: u32, combo: u32) -> u32 {
    gained.saturating_mul(combo)
}

/// Pick the cue for a scoring move.
///
/// `score_before` is the score prior to adding `final_gain`; `combo` is the
/// already-incremented combo level.
pub fn select_cue(score_before: u32, final_gain: u32, combo: u32, config: &ScoringConfig) -> Cue {
    if final_gain == 0 {
        return Cue::None;
    }
    if score_before == 0 {
        return Cue::FirstScore;
    }
    if combo < 2 && final_gain >= config.big_win_threshold {
        return Cue::BigWin;
    }
    Cue::combo(combo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_points() {
        let config = ScoringConfig::default();
        assert_eq!(run_points(3, RunAttribute::Color, &config), 900);
        assert_eq!(run_points(4, RunAttribute::Shape, &config), 1600);
        assert_eq!(run_points(5, RunAttribute::Color, &config), 2500);
    }

    #[test]
    fn test_dual_run_multiplier() {
        let mut config = ScoringConfig::default();
        assert_eq!(run_points(3, RunAttribute::Both, &config), 900);

        config.dual_run_multiplier = 2;
        assert_eq!(run_points(3, RunAttribute::Both, &config), 1800);
        assert_eq!(run_points(3, RunAttribute::Color, &config), 900);
    }

    #[test]
    fn test_apply_combo() {
        assert_eq!(apply_combo(900, 1), 900);
        assert_eq!(apply_combo(900, 2), 1800);
        assert_eq!(apply_combo(u32::MAX, 3), u32::MAX);
    }

    #[test]
    fn test_cue_selection() {
        let config = ScoringConfig::default();

        assert_eq!(select_cue(0, 900, 1, &config), Cue::FirstScore);
        assert_eq!(select_cue(900, 900, 1, &config), Cue::None);
        assert_eq!(select_cue(900, 1600, 1, &config), Cue::BigWin);
        assert_eq!(select_cue(900, 1800, 2, &config), Cue::Combo(2));
        assert_eq!(select_cue(5000, 900 * 9, 9, &config), Cue::Combo(7));
        assert_eq!(select_cue(5000, 0, 0, &config), Cue::None);
    }
}
