use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use dropbrain_engine::{Game, GameOverError, Move, PieceGenerator, TickOutcome};
use dropbrain_evaluator::{board_analysis::BoardAnalysis, move_search::MoveSearch};
use tracing::{debug, info, trace};

use crate::{
    schema::{
        brain_config::BrainConfig,
        session_report::{SessionReport, StackSummary},
    },
    util::Output,
};

const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Brain configuration file (JSON; defaults if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed of the piece sequence (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Board width in columns
    #[arg(long, default_value_t = 10)]
    width: usize,
    /// Height limit in rows
    #[arg(long, default_value_t = 20)]
    height: usize,
    /// Stop after this many landed pieces
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Stop after this many ticks
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: usize,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct SessionLimits {
    max_pieces: usize,
    max_ticks: usize,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let config = BrainConfig::load(arg.config.as_deref())?;
    let search = config.to_move_search()?;
    let generator = arg
        .seed
        .map_or_else(PieceGenerator::from_entropy, PieceGenerator::from_seed);
    let mut game = Game::new(arg.width, arg.height, generator)
        .with_context(|| format!("Invalid board size {}x{}", arg.width, arg.height))?;

    info!(
        seed = game.seed(),
        width = arg.width,
        height = arg.height,
        "starting auto-play"
    );
    let limits = SessionLimits {
        max_pieces: arg.max_pieces,
        max_ticks: arg.max_ticks,
    };
    let ticks = play_session(&search, &mut game, limits)?;

    let stats = game.stats();
    info!(
        pieces = stats.completed_pieces(),
        rows = stats.total_cleared_rows(),
        score = stats.score(),
        game_over = game.state().is_game_over(),
        "auto-play finished"
    );

    let report = SessionReport {
        played_at: Utc::now(),
        seed: game.seed(),
        width: arg.width,
        height_limit: game.height_limit(),
        config,
        ticks,
        game_over: game.state().is_game_over(),
        stats: stats.clone(),
        final_stack: StackSummary::from(&BoardAnalysis::from_board(game.board())),
        final_board: game.board().clone(),
    };
    Output::from_output_path(arg.output.clone()).write_json("session report", &report)
}

/// Lets the brain issue one command per tick until the game ends or a limit is
/// hit. Returns the number of ticks played.
///
/// A refused command is followed by `Down` so the piece keeps falling.
fn play_session(
    search: &MoveSearch<'_>,
    game: &mut Game,
    limits: SessionLimits,
) -> Result<usize, GameOverError> {
    let mut ticks = 0;
    while game.state().is_playing()
        && ticks < limits.max_ticks
        && game.stats().completed_pieces() < limits.max_pieces
    {
        let falling = game.falling_piece();
        let height_limit = game.height_limit();
        let mv = search.best_move(
            game.board_mut(),
            falling.piece(),
            falling.x(),
            falling.y(),
            height_limit,
        );
        trace!(piece = %falling.piece(), x = falling.x(), y = falling.y(), %mv, "tick");

        let mut outcome = game.tick(mv)?;
        ticks += 1;
        if outcome.is_blocked() {
            debug!(piece = %falling.piece(), %mv, "command refused, moving down");
            outcome = game.tick(Move::Down)?;
            ticks += 1;
        }

        match outcome {
            TickOutcome::Landed { cleared_rows } => {
                let pieces = game.stats().completed_pieces();
                if cleared_rows > 0 {
                    debug!(pieces, cleared_rows, "rows cleared");
                }
                if pieces % PROGRESS_INTERVAL == 0 {
                    let analysis = BoardAnalysis::from_board(game.board());
                    info!(
                        pieces,
                        rows = game.stats().total_cleared_rows(),
                        max_height = analysis.max_height(),
                        avg_height = analysis.avg_height(),
                        holes = analysis.holes(),
                        "progress"
                    );
                }
            }
            TickOutcome::GameOver => {
                info!(pieces = game.stats().completed_pieces(), "game over");
            }
            TickOutcome::Moved | TickOutcome::Blocked => {}
        }
    }
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: u64, limits: SessionLimits) -> (Game, usize) {
        let search = BrainConfig::default().to_move_search().unwrap();
        let mut game = Game::new(10, 20, PieceGenerator::from_seed(seed)).unwrap();
        let ticks = play_session(&search, &mut game, limits).unwrap();
        (game, ticks)
    }

    #[test]
    fn test_stops_at_piece_limit() {
        let (game, ticks) = session(
            3,
            SessionLimits {
                max_pieces: 25,
                max_ticks: usize::MAX,
            },
        );
        assert!(ticks > 0);
        if game.state().is_playing() {
            assert_eq!(game.stats().completed_pieces(), 25);
        }
    }

    #[test]
    fn test_stops_at_tick_limit() {
        let (game, ticks) = session(
            3,
            SessionLimits {
                max_pieces: usize::MAX,
                max_ticks: 10,
            },
        );
        // A refused command may add one extra tick.
        assert!((10..=11).contains(&ticks));
        assert!(game.state().is_playing());
    }
}
