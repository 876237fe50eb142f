use dropbrain_engine::{Move, Piece};
use dropbrain_evaluator::move_search::{Placement, SearchReport};
use serde::Serialize;

/// Result of a one-shot `best-move` search.
#[derive(Debug, Clone, Serialize)]
pub struct BestMoveReport {
    pub command: Move,
    pub piece: Piece,
    pub x: usize,
    pub y: usize,
    pub height_limit: usize,
    pub best: Option<PlacementRecord>,
    pub rotations_examined: usize,
    pub candidates_scored: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementRecord {
    pub piece: Piece,
    pub x: usize,
    pub y: usize,
    pub cleared_rows: usize,
    pub score: f64,
}

impl From<&Placement> for PlacementRecord {
    fn from(placement: &Placement) -> Self {
        Self {
            piece: placement.piece(),
            x: placement.x(),
            y: placement.y(),
            cleared_rows: placement.cleared_rows(),
            score: placement.score(),
        }
    }
}

impl BestMoveReport {
    pub(crate) fn new(
        report: &SearchReport,
        piece: Piece,
        x: usize,
        y: usize,
        height_limit: usize,
    ) -> Self {
        Self {
            command: report.to_move(piece, x),
            piece,
            x,
            y,
            height_limit,
            best: report.best().map(PlacementRecord::from),
            rotations_examined: report.rotations_examined(),
            candidates_scored: report.candidates_scored(),
        }
    }
}
