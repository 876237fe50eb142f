use std::path::PathBuf;

use anyhow::ensure;
use dropbrain_engine::{Board, Piece};
use tracing::info;

use crate::{
    schema::{best_move_report::BestMoveReport, brain_config::BrainConfig},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BestMoveArg {
    /// Board snapshot file (JSON)
    #[arg(long)]
    board: PathBuf,
    /// Falling piece as KIND or KIND#ROTATION, e.g. `T` or `T#1`
    #[arg(long)]
    piece: Piece,
    /// Left edge of the falling piece (centered if omitted)
    #[arg(long)]
    x: Option<usize>,
    /// Bottom row of the falling piece (the height limit if omitted)
    #[arg(long)]
    y: Option<usize>,
    /// Highest row a landed piece may reach (board height if omitted)
    #[arg(long)]
    height_limit: Option<usize>,
    /// Brain configuration file (JSON; defaults if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BestMoveArg) -> anyhow::Result<()> {
    let BestMoveArg {
        board,
        piece,
        x,
        y,
        height_limit,
        config,
        output,
    } = arg;

    let search = BrainConfig::load(config.as_deref())?.to_move_search()?;
    let mut board: Board = util::read_json_file("board", board)?;

    let height_limit = height_limit.unwrap_or(board.height());
    ensure!(
        height_limit <= board.height(),
        "Height limit {height_limit} exceeds board height {}",
        board.height()
    );
    let x = x.unwrap_or(board.width().saturating_sub(piece.width()) / 2);
    let y = y.unwrap_or(height_limit);

    let report = search.search(&mut board, *piece, height_limit);
    let report = BestMoveReport::new(&report, *piece, x, y, height_limit);
    info!(
        piece = %piece,
        command = %report.command,
        candidates = report.candidates_scored,
        "search finished"
    );

    Output::from_output_path(output.clone()).write_json("best move report", &report)
}
