use std::path::PathBuf;

use aopnet_analysis::{AnalysisOptions, analyze};
use clap::Args;

use super::feedback::{RelationshipsOutput, render_relationships_human, render_relationships_text};
use super::{load, rows};
use crate::output::{OutputMode, render_mode};

#[derive(Args, Debug)]
pub struct IndirectArgs {
    /// Network file (.json, .yaml, .yml or .toml).
    pub file: PathBuf,
}

/// Indirect relationships are computed on the network with its feedback
/// relationships removed, so the strategy still matters here.
pub fn run_indirect(
    args: &IndirectArgs,
    output: OutputMode,
    options: &AnalysisOptions,
) -> anyhow::Result<()> {
    let network = load(&args.file)?;
    let analysis = analyze(&network, options)?;
    let payload = RelationshipsOutput::new(
        "indirect",
        analysis.strategy.as_str(),
        rows(&analysis.indirect),
    );
    render_mode(
        output,
        &payload,
        |p, w| render_relationships_text(p, w),
        |p, w| render_relationships_human(p, w),
    )
}
