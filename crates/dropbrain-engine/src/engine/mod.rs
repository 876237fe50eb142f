//! Game loop around the core data structures.
//!
//! - [`Game`] - Board, falling piece and piece supply, advanced one [`Move`] per tick
//! - [`GameStats`] - Game statistics (pieces, cleared rows, score)
//! - [`PieceGenerator`] - Seeded random piece sequence
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] with a board size and a [`PieceGenerator`]
//! 2. Each tick, a player or a brain picks a [`Move`] for the falling piece
//! 3. [`Game::tick`] applies it; a piece that cannot fall any further lands
//! 4. Full rows are cleared and the next piece spawns at the top
//! 5. Repeat until a piece cannot spawn or the stack rises above the height limit
//!
//! # Example
//!
//! ```
//! use dropbrain_engine::{Game, Move, PieceGenerator, TickOutcome};
//!
//! let mut game = Game::new(10, 20, PieceGenerator::from_seed(7)).unwrap();
//! let outcome = game.tick(Move::Drop).unwrap();
//! assert_eq!(outcome, TickOutcome::Moved);
//!
//! let outcome = game.tick(Move::Drop).unwrap();
//! assert!(outcome.is_landed());
//! assert_eq!(game.stats().completed_pieces(), 1);
//! ```
//!
//! [`Move`]: crate::Move

pub use self::{game::*, game_stats::*, piece_generator::*};

mod game;
mod game_stats;
mod piece_generator;
