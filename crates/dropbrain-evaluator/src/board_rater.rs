//! Board rating for simulated placements.
//!
//! A [`BoardRater`] assigns a score to a board state right after a simulated
//! placement. Lower scores are better. [`StackRater`] is the stock rater: it
//! penalizes tall stacks, covered holes and uneven surfaces and rewards cleared
//! rows.
//!
//! # Formula
//!
//! ```text
//! score = height_cube   * max_height^3
//!       + hole_square   * holes^2
//!       - line_clear    * rows_cleared
//!       + spread_square * (max_height - min_height)^2
//! ```

use std::fmt;

use derive_more::{Display, Error};
use dropbrain_engine::Board;
use serde::{Deserialize, Serialize};

use crate::board_analysis::BoardAnalysis;

/// Scores one board state. Lower is better.
pub trait BoardRater: fmt::Debug + Send + Sync {
    /// Rates `board` as it stands after a placement that removed `rows_cleared`
    /// rows.
    fn rate_board(&self, board: &Board, rows_cleared: usize) -> f64;
}

/// Coefficients of the [`StackRater`] formula.
///
/// Scores are real-valued. The default `height_cube` of `1/3` is applied
/// without truncation, so a stack one row high already scores above an empty
/// board; integer scoring (`max_height³ / 3` rounded down) would tie them and
/// can pick a different placement among such ties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaterWeights {
    pub height_cube: f64,
    pub hole_square: f64,
    pub line_clear: f64,
    pub spread_square: f64,
}

impl Default for RaterWeights {
    fn default() -> Self {
        Self {
            height_cube: 1.0 / 3.0,
            hole_square: 2.0,
            line_clear: 200.0,
            spread_square: 2.0,
        }
    }
}

#[derive(Debug, Clone, Display, Error)]
pub enum RaterWeightsError {
    #[display("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[display("weight `line_clear` must be positive, got {value}")]
    NonPositiveLineClear { value: f64 },
}

impl RaterWeights {
    /// Checks that every weight is finite and non-negative and that clearing
    /// rows is rewarded.
    pub fn validate(&self) -> Result<(), RaterWeightsError> {
        let named = [
            ("height_cube", self.height_cube),
            ("hole_square", self.hole_square),
            ("line_clear", self.line_clear),
            ("spread_square", self.spread_square),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(RaterWeightsError::InvalidWeight { name, value });
            }
        }
        if self.line_clear <= 0.0 {
            return Err(RaterWeightsError::NonPositiveLineClear {
                value: self.line_clear,
            });
        }
        Ok(())
    }
}

/// Stock rater penalizing stack height, holes and surface spread.
#[derive(Debug, Clone)]
pub struct StackRater {
    weights: RaterWeights,
}

impl StackRater {
    pub fn new(weights: RaterWeights) -> Result<Self, RaterWeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    #[must_use]
    pub fn weights(&self) -> &RaterWeights {
        &self.weights
    }

    /// Applies the formula to precomputed board metrics.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, analysis: &BoardAnalysis, rows_cleared: usize) -> f64 {
        let w = &self.weights;
        let max_height = analysis.max_height() as f64;
        let holes = analysis.holes() as f64;
        let spread = analysis.height_spread() as f64;

        w.height_cube * max_height.powi(3) + w.hole_square * holes.powi(2)
            - w.line_clear * rows_cleared as f64
            + w.spread_square * spread.powi(2)
    }
}

impl Default for StackRater {
    fn default() -> Self {
        Self {
            weights: RaterWeights::default(),
        }
    }
}

impl BoardRater for StackRater {
    fn rate_board(&self, board: &Board, rows_cleared: usize) -> f64 {
        self.score(&BoardAnalysis::from_board(board), rows_cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::new(10, 20).unwrap();
        assert_close(StackRater::default().rate_board(&board, 0), 0.0);
    }

    #[test]
    fn test_height_cube_is_not_truncated() {
        let rater = StackRater::default();
        let empty = Board::new(4, 2).unwrap();
        assert_close(rater.rate_board(&empty, 0), 0.0);

        let one_high = Board::from_ascii(
            r"
            ....
            ####
            ",
        );
        // max 1, spread 0, no holes
        assert_close(rater.rate_board(&one_high, 0), 1.0 / 3.0);
        assert!(rater.rate_board(&one_high, 0) > rater.rate_board(&empty, 0));
    }

    #[test]
    fn test_default_formula() {
        let board = Board::from_ascii(
            r"
            #...
            ....
            #.#.
            ",
        );
        // max 3, holes 1, spread 3
        let expected = 27.0 / 3.0 + 2.0 * 1.0 + 2.0 * 9.0;
        assert_close(StackRater::default().rate_board(&board, 0), expected);
        assert_close(
            StackRater::default().rate_board(&board, 2),
            expected - 400.0,
        );
    }

    #[test]
    fn test_more_holes_never_rates_better() {
        let rater = StackRater::default();
        let solid = Board::from_ascii(
            r"
            ##..
            ##..
            ",
        );
        let holed = Board::from_ascii(
            r"
            ##..
            .#..
            ",
        );
        assert!(rater.rate_board(&holed, 0) > rater.rate_board(&solid, 0));
    }

    #[test]
    fn test_taller_stack_never_rates_better() {
        let rater = StackRater::default();
        let low = Board::from_ascii(
            r"
            ....
            ....
            ####
            ",
        );
        let high = Board::from_ascii(
            r"
            ....
            ####
            ####
            ",
        );
        assert!(rater.rate_board(&high, 0) > rater.rate_board(&low, 0));
    }

    #[test]
    fn test_rows_cleared_strictly_improve_score() {
        let rater = StackRater::default();
        let board = Board::from_ascii(
            r"
            .#..
            ##.#
            ",
        );
        let mut previous = rater.rate_board(&board, 0);
        for rows in 1..=4 {
            let score = rater.rate_board(&board, rows);
            assert!(score < previous);
            previous = score;
        }
    }

    #[test]
    fn test_custom_weights() {
        let rater = StackRater::new(RaterWeights {
            height_cube: 0.0,
            hole_square: 0.0,
            line_clear: 1.0,
            spread_square: 1.0,
        })
        .unwrap();
        let board = Board::from_ascii(
            r"
            #..
            #..
            ",
        );
        assert_close(rater.rate_board(&board, 1), 4.0 - 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let negative = RaterWeights {
            hole_square: -1.0,
            ..RaterWeights::default()
        };
        assert!(matches!(
            StackRater::new(negative),
            Err(RaterWeightsError::InvalidWeight {
                name: "hole_square",
                ..
            })
        ));

        let nan = RaterWeights {
            height_cube: f64::NAN,
            ..RaterWeights::default()
        };
        assert!(nan.validate().is_err());

        let no_reward = RaterWeights {
            line_clear: 0.0,
            ..RaterWeights::default()
        };
        assert!(matches!(
            no_reward.validate(),
            Err(RaterWeightsError::NonPositiveLineClear { .. })
        ));

        assert!(RaterWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_serde_defaults() {
        let weights: RaterWeights = serde_json::from_str(r#"{ "line_clear": 50.0 }"#).unwrap();
        assert_close(weights.line_clear, 50.0);
        assert_close(weights.hole_square, 2.0);
        assert_close(weights.height_cube, 1.0 / 3.0);

        let json = serde_json::to_string(&RaterWeights::default()).unwrap();
        let back: RaterWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RaterWeights::default());
    }
}
