use std::io::{self, Write};
use std::path::PathBuf;

use aopnet_analysis::{AnalysisOptions, analyze};
use clap::Args;
use serde::Serialize;

use super::analyze::{LayerRow, layer_rows};
use super::load;
use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct LayersArgs {
    /// Network file (.json, .yaml, .yml or .toml).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct LayersOutput<'a> {
    pub layers: Vec<LayerRow<'a>>,
    pub unplaced: Vec<&'a str>,
}

pub fn run_layers(
    args: &LayersArgs,
    output: OutputMode,
    options: &AnalysisOptions,
) -> anyhow::Result<()> {
    let network = load(&args.file)?;
    let analysis = analyze(&network, options)?;
    let payload = LayersOutput {
        layers: layer_rows(&analysis),
        unplaced: analysis.unplaced.iter().map(|e| e.id.as_str()).collect(),
    };
    render_mode(
        output,
        &payload,
        |p, w| render_layers_text(p, w),
        |p, w| render_layers_human(p, w),
    )
}

/// One tab-separated line per layer: index, level, comma-joined event ids.
pub fn render_layers_text(payload: &LayersOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    for layer in &payload.layers {
        writeln!(w, "{}\t{}\t{}", layer.index, layer.level, layer.events.join(","))?;
    }
    Ok(())
}

pub fn render_layers_human(payload: &LayersOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Layers ({})", payload.layers.len()))?;
    if payload.layers.is_empty() {
        writeln!(w, "  (no root events; nothing to layer)")?;
    }
    for layer in &payload.layers {
        writeln!(w, "  {:>2}. {}", layer.index, layer.level)?;
        for id in &layer.events {
            writeln!(w, "        {id}")?;
        }
    }
    if !payload.unplaced.is_empty() {
        writeln!(w)?;
        writeln!(w, "  not placed: {}", payload.unplaced.join(", "))?;
    }
    Ok(())
}
