use chrono::{DateTime, Utc};
use dropbrain_engine::{Board, GameStats};
use dropbrain_evaluator::board_analysis::BoardAnalysis;
use serde::Serialize;

use super::brain_config::BrainConfig;

/// Summary of one auto-play game.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub played_at: DateTime<Utc>,
    pub seed: u64,
    pub width: usize,
    pub height_limit: usize,
    pub config: BrainConfig,
    pub ticks: usize,
    pub game_over: bool,
    pub stats: GameStats,
    pub final_stack: StackSummary,
    pub final_board: Board,
}

/// Shape of the stack left on the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackSummary {
    pub cells: usize,
    pub max_height: usize,
    pub avg_height: f64,
    pub holes: usize,
}

impl From<&BoardAnalysis> for StackSummary {
    fn from(analysis: &BoardAnalysis) -> Self {
        Self {
            cells: analysis.cells(),
            max_height: analysis.max_height(),
            avg_height: analysis.avg_height(),
            holes: analysis.holes(),
        }
    }
}
