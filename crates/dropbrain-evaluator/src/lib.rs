//! Move selection for a falling Tetris piece.
//!
//! This crate implements a two-level decision architecture:
//!
//! 1. **Board Rating** ([`board_rater`]) - Scores a board state after a simulated
//!    placement. Lower is better.
//!
//! 2. **Move Search** ([`move_search`]) - Enumerates every rotation × column placement
//!    of the current piece, rates each resulting board and turns the best placement
//!    into the single command to issue on this tick.
//!
//! # Architecture
//!
//! ```text
//! Move Search (one command per tick)
//!     ↓ uses
//! Board Rating (score one simulated placement)
//!     ↓ uses
//! Board Analysis (heights, holes, spread)
//! ```
//!
//! # Supporting Modules
//!
//! - [`board_analysis`] - Column metrics of a board (heights, holes, spread)
//! - [`placement_guard`] - Scoped simulated placement that is always undone
//! - [`search_policy`] - Rotation-width rules applied while walking the rotation ring
//!
//! # Example
//!
//! ```
//! use dropbrain_engine::{Board, Move, Piece, PieceKind};
//! use dropbrain_evaluator::{
//!     board_rater::{RaterWeights, StackRater},
//!     move_search::MoveSearch,
//!     search_policy::SearchPolicy,
//! };
//!
//! let rater = StackRater::new(RaterWeights::default()).unwrap();
//! let search = MoveSearch::new(Box::new(rater), SearchPolicy::default());
//!
//! let mut board = Board::from_ascii(
//!     r"
//!     ....
//!     ....
//!     ....
//!     ..##
//!     ",
//! );
//! let square = Piece::new(PieceKind::O);
//!
//! // The square completes the bottom row on the left.
//! assert_eq!(search.best_move(&mut board, square, 1, 2, 4), Move::Left);
//! assert_eq!(search.best_move(&mut board, square, 0, 2, 4), Move::Drop);
//! ```
//!
//! # Design Notes
//!
//! The search is greedy: it looks at the current piece only, with no lookahead and no
//! memory between calls. The board is borrowed mutably for the duration of one call and
//! every simulated placement is backed out before the call returns, so callers observe
//! the board unchanged.

pub mod board_analysis;
pub mod board_rater;
pub mod move_search;
pub mod placement_guard;
pub mod search_policy;
