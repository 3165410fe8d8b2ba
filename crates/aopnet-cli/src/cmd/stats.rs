use std::io::{self, Write};
use std::path::PathBuf;

use aopnet_analysis::{AnalysisOptions, NetworkStats};
use clap::Args;

use super::load;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Network file (.json, .yaml, .yml or .toml).
    pub file: PathBuf,
}

pub fn run_stats(args: &StatsArgs, output: OutputMode, options: &AnalysisOptions) -> anyhow::Result<()> {
    let network = load(&args.file)?;
    let stats = NetworkStats::from_network(&network, options)?;
    render_mode(
        output,
        &stats,
        |s, w| render_stats_text(s, w),
        |s, w| render_stats_human(s, w),
    )
}

fn rows(stats: &NetworkStats) -> [(&'static str, usize); 11] {
    [
        ("events", stats.event_count),
        ("relationships", stats.relationship_count),
        ("roots", stats.root_count),
        ("sinks", stats.sink_count),
        ("self_loops", stats.self_loop_count),
        ("feedback", stats.feedback_count),
        ("indirect", stats.indirect_count),
        ("displayed", stats.displayed_count),
        ("layers", stats.layer_count),
        ("widest_layer", stats.widest_layer),
        ("unplaced", stats.unplaced_count),
    ]
}

/// `key value` pairs, one per line, then `level.<name> <count>`.
pub fn render_stats_text(stats: &NetworkStats, w: &mut dyn Write) -> io::Result<()> {
    for (key, value) in rows(stats) {
        writeln!(w, "{key} {value}")?;
    }
    for (level, count) in &stats.levels {
        writeln!(w, "level.{level} {count}")?;
    }
    Ok(())
}

pub fn render_stats_human(stats: &NetworkStats, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Network statistics")?;
    for (key, value) in rows(stats) {
        pretty_kv(w, &key.replace('_', " "), value.to_string())?;
    }
    writeln!(w)?;
    pretty_section(w, "Events per level")?;
    for (level, count) in &stats.levels {
        pretty_kv(w, level.as_str(), count.to_string())?;
    }
    Ok(())
}
