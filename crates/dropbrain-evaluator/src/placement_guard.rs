//! Scoped simulated placement.
//!
//! [`PlacementGuard`] places a piece on a committed board and undoes the
//! placement when it goes out of scope, including during unwinding. Between the
//! two, the guard derefs to the board so the placement can be inspected and
//! rated.

use std::ops::Deref;

use dropbrain_engine::{Board, PlaceResult, Piece};

#[derive(Debug)]
pub struct PlacementGuard<'a> {
    board: &'a mut Board,
    result: PlaceResult,
}

impl<'a> PlacementGuard<'a> {
    /// Places `piece` with its lower-left corner at `(x, y)`.
    ///
    /// The board must be committed. The placement is undone when the guard is
    /// dropped, whatever the [`PlaceResult`].
    pub fn place(board: &'a mut Board, piece: Piece, x: usize, y: usize) -> Self {
        let result = board.place(piece, x, y);
        Self { board, result }
    }

    #[must_use]
    pub fn result(&self) -> PlaceResult {
        self.result
    }

    /// Removes the rows the placement filled and returns how many were removed.
    pub fn clear_rows(&mut self) -> usize {
        self.board.clear_rows()
    }
}

impl Deref for PlacementGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl Drop for PlacementGuard<'_> {
    fn drop(&mut self) {
        self.board.undo();
    }
}
