use crate::{
    GameOverError,
    core::{
        board::{Board, BoardError},
        moves::Move,
        piece::Piece,
    },
};

use super::{game_stats::GameStats, piece_generator::PieceGenerator};

/// Rows above the height limit where pieces spawn.
pub const TOP_SPACE: usize = 4;

/// The falling piece and the position of its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPiece {
    piece: Piece,
    x: usize,
    y: usize,
}

impl FallingPiece {
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
}

/// What happened to the falling piece during one [`Game::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The piece moved or rotated.
    Moved,
    /// The command was refused because the piece would collide.
    Blocked,
    /// The piece landed and the next piece spawned.
    Landed { cleared_rows: usize },
    /// The piece landed above the height limit, or the next piece could not
    /// spawn.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameState {
    Playing,
    GameOver,
}

/// A single game: committed board, falling piece and piece supply.
///
/// The board has [`TOP_SPACE`] rows above `height_limit`. Pieces spawn
/// horizontally centered with their bottom at `height_limit`, and the game
/// ends when a landed piece leaves the stack above `height_limit`.
///
/// The falling piece is never written into the board until it lands, so
/// [`board`](Self::board) always returns the committed stack.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    height_limit: usize,
    generator: PieceGenerator,
    falling: FallingPiece,
    stats: GameStats,
    state: GameState,
}

impl Game {
    /// Starts a game on an empty board.
    pub fn new(
        width: usize,
        height_limit: usize,
        generator: PieceGenerator,
    ) -> Result<Self, BoardError> {
        let board = Board::new(width, height_limit + TOP_SPACE)?;
        Ok(Self::with_board(board, height_limit, generator))
    }

    /// Starts a game on an existing committed board.
    ///
    /// # Panics
    ///
    /// Panics if the board is pending or has fewer than
    /// `height_limit + TOP_SPACE` rows.
    #[must_use]
    pub fn with_board(board: Board, height_limit: usize, mut generator: PieceGenerator) -> Self {
        assert!(board.is_committed(), "game board must be committed");
        assert!(
            board.height() >= height_limit + TOP_SPACE,
            "board height {} leaves no spawn space above height limit {height_limit}",
            board.height()
        );

        let piece = generator.next_piece();
        let (falling, state) = match spawn(&board, height_limit, piece) {
            Some(falling) => (falling, GameState::Playing),
            None => (
                FallingPiece {
                    piece,
                    x: 0,
                    y: height_limit,
                },
                GameState::GameOver,
            ),
        };

        Self {
            board,
            height_limit,
            generator,
            falling,
            stats: GameStats::new(),
            state,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the committed board, for searches that simulate
    /// placements and undo them.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn height_limit(&self) -> usize {
        self.height_limit
    }

    #[must_use]
    pub fn falling_piece(&self) -> FallingPiece {
        self.falling
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Applies one command to the falling piece.
    ///
    /// - `Rotate` advances the rotation ring keeping the piece centered
    /// - `Left` / `Right` shift by one column
    /// - `Down` falls one row, or lands the piece if it cannot fall
    /// - `Drop` falls straight to the resting row, or lands the piece if it
    ///   is already resting there
    pub fn tick(&mut self, mv: Move) -> Result<TickOutcome, GameOverError> {
        if self.state.is_game_over() {
            return Err(GameOverError);
        }

        let FallingPiece { piece, x, y } = self.falling;
        let candidate = match mv {
            Move::Rotate => self.rotated(),
            Move::Left => x.checked_sub(1).map(|x| FallingPiece { piece, x, y }),
            Move::Right => Some(FallingPiece { piece, x: x + 1, y }),
            Move::Down => return Ok(self.fall_or_land()),
            Move::Drop => {
                let target = self.board.drop_height(piece, x);
                if target >= y || !self.board.can_place(piece, x, target) {
                    return Ok(self.fall_or_land());
                }
                Some(FallingPiece { piece, x, y: target })
            }
        };

        let outcome = match candidate.filter(|f| self.board.can_place(f.piece, f.x, f.y)) {
            Some(falling) => {
                self.falling = falling;
                TickOutcome::Moved
            }
            None => TickOutcome::Blocked,
        };
        Ok(outcome)
    }

    fn rotated(&self) -> Option<FallingPiece> {
        let FallingPiece { piece, x, y } = self.falling;
        let next = piece.next_rotation();
        Some(FallingPiece {
            piece: next,
            x: x.checked_add_signed(centering_offset(piece.width(), next.width()))?,
            y: y.checked_add_signed(centering_offset(piece.height(), next.height()))?,
        })
    }

    fn fall_or_land(&mut self) -> TickOutcome {
        let FallingPiece { piece, x, y } = self.falling;
        if y > 0 && self.board.can_place(piece, x, y - 1) {
            self.falling.y = y - 1;
            return TickOutcome::Moved;
        }
        self.land()
    }

    fn land(&mut self) -> TickOutcome {
        let FallingPiece { piece, x, y } = self.falling;
        let result = self.board.place(piece, x, y);
        debug_assert!(
            result.is_accepted(),
            "falling piece {piece} rejected at ({x}, {y}): {result:?}"
        );
        let cleared_rows = if result.is_row_filled() {
            self.board.clear_rows()
        } else {
            0
        };
        self.board.commit();
        self.stats.complete_piece_drop(cleared_rows);

        if self.board.max_height() > self.height_limit {
            self.state = GameState::GameOver;
            return TickOutcome::GameOver;
        }

        let next = self.generator.next_piece();
        let Some(falling) = spawn(&self.board, self.height_limit, next) else {
            self.state = GameState::GameOver;
            return TickOutcome::GameOver;
        };
        self.falling = falling;
        TickOutcome::Landed { cleared_rows }
    }
}

fn spawn(board: &Board, height_limit: usize, piece: Piece) -> Option<FallingPiece> {
    let x = board.width().checked_sub(piece.width())? / 2;
    let y = height_limit;
    board
        .can_place(piece, x, y)
        .then_some(FallingPiece { piece, x, y })
}

/// Shift that keeps a rotated piece centered on the old bounding box.
#[expect(clippy::cast_possible_wrap)]
fn centering_offset(old: usize, new: usize) -> isize {
    (old as isize - new as isize) / 2
}
