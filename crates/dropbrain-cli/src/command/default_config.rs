use std::path::PathBuf;

use crate::{schema::brain_config::BrainConfig, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    Output::from_output_path(arg.output.clone()).write_json("brain config", &BrainConfig::default())
}
