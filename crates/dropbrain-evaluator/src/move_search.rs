//! Move search: choosing the next command for the falling piece.
//!
//! This module implements the top level of the evaluator architecture: every
//! rotation × column placement of the current piece is simulated on the board,
//! rated, and the best one is turned into a single [`Move`].
//!
//! # How It Works
//!
//! 1. **Walk Rotations** - Follow the rotation ring from the piece's current state
//!    until it comes back around
//! 2. **Try Columns** - For each rotation, drop the piece at every left edge that keeps
//!    it inside the board
//! 3. **Filter** - Skip landings whose top would rise above the height limit
//! 4. **Rate** - Place through a [`PlacementGuard`], clear filled rows, and score with a
//!    [`BoardRater`]; the lowest score wins, ties keep the earliest candidate
//! 5. **Translate** - Emit one command that moves the piece toward the winner
//!
//! The board is restored after every candidate, so the caller sees it unchanged.
//!
//! # Usage
//!
//! ```rust
//! use dropbrain_engine::{Board, Move, Piece, PieceKind};
//! use dropbrain_evaluator::{
//!     board_rater::StackRater, move_search::MoveSearch, search_policy::SearchPolicy,
//! };
//!
//! let search = MoveSearch::new(Box::new(StackRater::default()), SearchPolicy::default());
//! let mut board = Board::new(10, 20).unwrap();
//!
//! let report = search.search(&mut board, Piece::new(PieceKind::I), 20);
//! let best = report.best().unwrap();
//! assert_eq!(best.x(), 0);
//! assert_eq!(report.to_move(Piece::new(PieceKind::I), 4), Move::Left);
//! ```

use dropbrain_engine::{Board, Move, PlaceResult, Piece};

use crate::{
    board_rater::BoardRater, placement_guard::PlacementGuard, search_policy::SearchPolicy,
};

/// A scored resting position of a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    piece: Piece,
    x: usize,
    y: usize,
    cleared_rows: usize,
    score: f64,
}

impl Placement {
    /// Returns the piece in its final rotation.
    #[must_use]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub fn x(&self) -> usize {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> usize {
        self.y
    }

    #[must_use]
    pub fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Outcome of one [`MoveSearch::search`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchReport {
    best: Option<Placement>,
    rotations_examined: usize,
    candidates_scored: usize,
}

impl SearchReport {
    /// Returns the winning placement, or `None` if nothing fit under the height
    /// limit.
    #[must_use]
    pub fn best(&self) -> Option<&Placement> {
        self.best.as_ref()
    }

    #[must_use]
    pub fn rotations_examined(&self) -> usize {
        self.rotations_examined
    }

    #[must_use]
    pub fn candidates_scored(&self) -> usize {
        self.candidates_scored
    }

    /// Translates the winning placement into the command for a piece currently
    /// in state `piece` with its left edge at `piece_x`.
    ///
    /// Rotation is settled before horizontal position. Without a winner the
    /// piece just moves down.
    #[must_use]
    pub fn to_move(&self, piece: Piece, piece_x: usize) -> Move {
        let Some(best) = &self.best else {
            return Move::Down;
        };
        if best.piece != piece {
            Move::Rotate
        } else if best.x == piece_x {
            Move::Drop
        } else if best.x < piece_x {
            Move::Left
        } else {
            Move::Right
        }
    }
}

/// Exhaustive single-piece placement search.
///
/// Holds no per-call state, so one instance can serve any number of boards.
#[derive(Debug)]
pub struct MoveSearch<'a> {
    rater: Box<dyn BoardRater + 'a>,
    policy: SearchPolicy,
}

impl<'a> MoveSearch<'a> {
    #[must_use]
    pub fn new(rater: Box<dyn BoardRater + 'a>, policy: SearchPolicy) -> Self {
        Self { rater, policy }
    }

    /// Returns the command that moves the falling piece toward the best
    /// placement.
    ///
    /// `piece_y` is part of the falling piece's state but does not influence
    /// the choice: candidates are always dropped from above.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`search`](Self::search).
    #[must_use]
    pub fn best_move(
        &self,
        board: &mut Board,
        piece: Piece,
        piece_x: usize,
        _piece_y: usize,
        height_limit: usize,
    ) -> Move {
        self.search(board, piece, height_limit).to_move(piece, piece_x)
    }

    /// Rates every placement of `piece` whose top stays within `height_limit`
    /// rows and reports the best one.
    ///
    /// The board is used as scratch space and is restored before returning.
    ///
    /// # Panics
    ///
    /// Panics if the board has a pending placement or if `height_limit`
    /// exceeds the board height.
    pub fn search(&self, board: &mut Board, piece: Piece, height_limit: usize) -> SearchReport {
        assert!(board.is_committed(), "move search requires a committed board");
        assert!(
            height_limit <= board.height(),
            "height limit {height_limit} exceeds board height {}",
            board.height()
        );

        let mut best: Option<Placement> = None;
        let mut best_score = f64::INFINITY;
        let mut rotations_examined = 0;
        let mut candidates_scored = 0;

        for rotation in piece.rotations() {
            rotations_examined += 1;
            let (width, height) = (rotation.width(), rotation.height());

            for x in 0..(board.width() + 1).saturating_sub(width) {
                let y = board.drop_height(rotation, x);
                if y + height > height_limit {
                    continue;
                }

                let mut guard = PlacementGuard::place(board, rotation, x, y);
                let cleared_rows = match guard.result() {
                    PlaceResult::Ok => 0,
                    PlaceResult::RowFilled => guard.clear_rows(),
                    PlaceResult::OutOfBounds | PlaceResult::Collision => continue,
                };

                let score = self.rater.rate_board(&guard, cleared_rows);
                candidates_scored += 1;
                if score < best_score {
                    best_score = score;
                    best = Some(Placement {
                        piece: rotation,
                        x,
                        y,
                        cleared_rows,
                        score,
                    });
                }
            }

            if self.policy.stops_after(width) {
                break;
            }
            if let Some(ceiling) = self.policy.score_ceiling_after(width) {
                best_score = ceiling;
            }
        }

        SearchReport {
            best,
            rotations_examined,
            candidates_scored,
        }
    }
}

#[cfg(test)]
mod tests {
    use dropbrain_engine::PieceKind;

    use super::*;
    use crate::board_rater::StackRater;

    fn default_search() -> MoveSearch<'static> {
        MoveSearch::new(Box::new(StackRater::default()), SearchPolicy::default())
    }

    fn exhaustive_search() -> MoveSearch<'static> {
        MoveSearch::new(Box::new(StackRater::default()), SearchPolicy::exhaustive())
    }

    fn rotated(kind: PieceKind, rotation: u8) -> Piece {
        Piece::with_rotation(kind, rotation).unwrap()
    }

    fn cluttered_board() -> Board {
        Board::from_ascii(
            r"
            ..........
            ..........
            ..........
            .#........
            ##...#....
            ###.##..#.
            #.#####.##
            ",
        )
    }

    #[test]
    fn test_board_is_unchanged() {
        for search in [default_search(), exhaustive_search()] {
            for kind in PieceKind::ALL {
                for piece in Piece::new(kind).rotations() {
                    let mut board = cluttered_board();
                    let before = board.clone();
                    let _ = search.best_move(&mut board, piece, 3, 5, 7);
                    assert_eq!(board, before, "{piece}");
                    assert_eq!(board.column_heights(), before.column_heights());
                    assert!(board.is_committed());
                }
            }
        }
    }

    #[test]
    fn test_square_examines_one_rotation() {
        let mut board = cluttered_board();
        let report = exhaustive_search().search(&mut board, Piece::new(PieceKind::O), 7);
        assert_eq!(report.rotations_examined(), 1);
        assert_eq!(report.best().unwrap().piece(), Piece::new(PieceKind::O));
    }

    #[test]
    fn test_four_state_pieces_examine_each_rotation_once() {
        for kind in [PieceKind::J, PieceKind::L, PieceKind::T] {
            for start in Piece::new(kind).rotations() {
                let mut board = Board::new(10, 20).unwrap();
                let report = default_search().search(&mut board, start, 20);
                assert_eq!(report.rotations_examined(), 4, "{start}");
            }
        }
    }

    #[test]
    fn test_single_column_rotation_stops_the_walk() {
        let vertical = Piece::new(PieceKind::I);
        assert_eq!(vertical.width(), 1);
        let horizontal = vertical.next_rotation();

        let mut board = Board::new(10, 20).unwrap();
        assert_eq!(default_search().search(&mut board, vertical, 20).rotations_examined(), 1);
        assert_eq!(
            default_search().search(&mut board, horizontal, 20).rotations_examined(),
            2
        );
        assert_eq!(
            exhaustive_search().search(&mut board, vertical, 20).rotations_examined(),
            2
        );
    }

    #[test]
    fn test_wide_rotation_ceiling_favors_later_rotations() {
        let horizontal = rotated(PieceKind::I, 1);
        assert_eq!(horizontal.width(), 4);

        // Lying flat clears the bottom row, standing up does not.
        let mut board = Board::new(4, 8).unwrap();

        let exhaustive = exhaustive_search().search(&mut board, horizontal, 8);
        let best = exhaustive.best().unwrap();
        assert_eq!(best.piece(), horizontal);
        assert_eq!(best.cleared_rows(), 1);
        assert_eq!(exhaustive.to_move(horizontal, 0), Move::Drop);

        let biased = default_search().search(&mut board, horizontal, 8);
        let best = biased.best().unwrap();
        assert_eq!(best.piece(), Piece::new(PieceKind::I));
        assert_eq!(best.x(), 0);
        assert_eq!(biased.to_move(horizontal, 0), Move::Rotate);
    }

    #[test]
    fn test_ceiling_keeps_wide_placement_without_later_candidates() {
        let horizontal = rotated(PieceKind::I, 1);
        // Only the flat piece fits below the limit.
        let mut board = Board::new(4, 8).unwrap();
        let report = default_search().search(&mut board, horizontal, 3);
        let best = report.best().unwrap();
        assert_eq!(best.piece(), horizontal);
        assert_eq!(report.candidates_scored(), 1);
    }

    #[test]
    fn test_down_when_nothing_fits() {
        let mut board = Board::from_ascii(
            r"
            ....
            ###.
            ###.
            ###.
            ",
        );
        let square = Piece::new(PieceKind::O);
        let report = default_search().search(&mut board, square, 4);
        assert!(report.best().is_none());
        assert_eq!(report.candidates_scored(), 0);
        assert_eq!(default_search().best_move(&mut board, square, 1, 2, 4), Move::Down);
    }

    #[test]
    fn test_piece_wider_than_board() {
        let mut board = Board::new(3, 6).unwrap();
        let horizontal = rotated(PieceKind::I, 1);
        let report = exhaustive_search().search(&mut board, horizontal, 6);
        assert_eq!(report.rotations_examined(), 2);
        assert_eq!(report.best().unwrap().piece(), Piece::new(PieceKind::I));
    }

    #[test]
    fn test_to_move_translation() {
        let piece = Piece::new(PieceKind::T);
        let report = |best_piece: Piece, x: usize| SearchReport {
            best: Some(Placement {
                piece: best_piece,
                x,
                y: 0,
                cleared_rows: 0,
                score: 0.0,
            }),
            rotations_examined: 4,
            candidates_scored: 1,
        };

        assert_eq!(report(piece, 4).to_move(piece, 4), Move::Drop);
        assert_eq!(report(piece, 2).to_move(piece, 4), Move::Left);
        assert_eq!(report(piece, 6).to_move(piece, 4), Move::Right);
        assert_eq!(report(piece.next_rotation(), 4).to_move(piece, 4), Move::Rotate);
        assert_eq!(report(piece.next_rotation(), 0).to_move(piece, 4), Move::Rotate);

        let empty = SearchReport {
            best: None,
            rotations_examined: 4,
            candidates_scored: 0,
        };
        assert_eq!(empty.to_move(piece, 4), Move::Down);
    }

    #[test]
    fn test_empty_board_single_column_piece_takes_lowest_x() {
        let mut board = Board::new(10, 20).unwrap();
        let stick = Piece::new(PieceKind::I);
        let search = default_search();

        let report = search.search(&mut board, stick, 20);
        assert_eq!(report.candidates_scored(), 10);
        assert_eq!(report.best().unwrap().x(), 0);

        assert_eq!(search.best_move(&mut board, stick, 0, 16, 20), Move::Drop);
        assert_eq!(search.best_move(&mut board, stick, 5, 16, 20), Move::Left);
    }

    #[test]
    fn test_fills_the_lowest_column() {
        let mut board = Board::from_ascii(
            r"
            ........
            ........
            ........
            ........
            ........
            ........
            ###.####
            ###.####
            ",
        );
        let stick = Piece::new(PieceKind::I);
        let report = default_search().search(&mut board, stick, 8);
        let best = report.best().unwrap();
        assert_eq!(best.x(), 3);
        assert_eq!(best.cleared_rows(), 2);
        assert_eq!(
            default_search().best_move(&mut board, stick, 0, 4, 8),
            Move::Right
        );
    }

    #[test]
    fn test_row_clear_beats_equal_placement_by_bonus() {
        let mut board = Board::from_ascii(
            r"
            ....
            ....
            ....
            ....
            ....
            ....
            ....
            ###.
            ",
        );
        let stick = Piece::new(PieceKind::I);
        let rater = StackRater::default();

        let report = default_search().search(&mut board, stick, 8);
        let best = *report.best().unwrap();
        assert_eq!((best.x(), best.cleared_rows()), (3, 1));

        let unfinished = {
            let guard = PlacementGuard::place(&mut board, stick, 0, 1);
            assert_eq!(guard.result(), PlaceResult::Ok);
            rater.rate_board(&guard, 0)
        };
        assert!(unfinished - best.score() >= rater.weights().line_clear);
    }

    #[test]
    #[should_panic(expected = "committed")]
    fn test_rejects_pending_board() {
        let mut board = Board::new(4, 8).unwrap();
        let _ = board.place(Piece::new(PieceKind::O), 0, 0);
        let _ = default_search().search(&mut board, Piece::new(PieceKind::O), 8);
    }

    #[test]
    #[should_panic(expected = "exceeds board height")]
    fn test_rejects_limit_above_board() {
        let mut board = Board::new(4, 8).unwrap();
        let _ = default_search().search(&mut board, Piece::new(PieceKind::O), 9);
    }
}
