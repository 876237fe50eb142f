use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::prelude::*;

use self::{auto_play::AutoPlayArg, best_move::BestMoveArg, default_config::DefaultConfigArg};

mod auto_play;
mod best_move;
mod default_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a headless game where the brain issues every command
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Pick the next command for one piece on a board snapshot
    BestMove(#[clap(flatten)] BestMoveArg),
    /// Write the default brain configuration
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);

    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::BestMove(arg) => best_move::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout carries the JSON reports
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}
