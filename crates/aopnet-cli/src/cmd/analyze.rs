use std::io::{self, Write};
use std::path::PathBuf;

use aopnet_analysis::{AnalysisOptions, NetworkAnalysis, analyze};
use clap::Args;
use serde::Serialize;

use super::{RelationshipRow, load, rows, write_row};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Network file (.json, .yaml, .yml or .toml).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct LayerRow<'a> {
    pub index: usize,
    pub level: &'static str,
    pub events: Vec<&'a str>,
}

/// Flattened view of a [`NetworkAnalysis`] for rendering.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<&'a str>,
    pub strategy: &'static str,
    pub fingerprint: String,
    pub layers: Vec<LayerRow<'a>>,
    pub feedback: Vec<RelationshipRow<'a>>,
    pub indirect: Vec<RelationshipRow<'a>>,
    pub displayed: Vec<RelationshipRow<'a>>,
    pub unplaced: Vec<&'a str>,
}

impl<'a> AnalyzeOutput<'a> {
    pub fn new(network: Option<&'a str>, analysis: &NetworkAnalysis<'a>) -> Self {
        Self {
            network,
            strategy: analysis.strategy.as_str(),
            fingerprint: analysis.fingerprint.clone(),
            layers: layer_rows(analysis),
            feedback: rows(&analysis.feedback),
            indirect: rows(&analysis.indirect),
            displayed: rows(&analysis.displayed),
            unplaced: analysis.unplaced.iter().map(|e| e.id.as_str()).collect(),
        }
    }
}

pub fn layer_rows<'a>(analysis: &NetworkAnalysis<'a>) -> Vec<LayerRow<'a>> {
    analysis
        .layers
        .iter()
        .enumerate()
        .map(|(i, layer)| LayerRow {
            index: i + 1,
            level: layer.level().as_str(),
            events: layer.events().iter().map(|e| e.id.as_str()).collect(),
        })
        .collect()
}

pub fn run_analyze(
    args: &AnalyzeArgs,
    output: OutputMode,
    options: &AnalysisOptions,
) -> anyhow::Result<()> {
    let network = load(&args.file)?;
    let analysis = analyze(&network, options)?;
    let payload = AnalyzeOutput::new(network.title(), &analysis);
    render_mode(
        output,
        &payload,
        |p, w| render_analyze_text(p, w),
        |p, w| render_analyze_pretty(p, w),
    )
}

pub fn render_analyze_text(payload: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    for layer in &payload.layers {
        writeln!(
            w,
            "layer {} {}: {}",
            layer.index,
            layer.level,
            layer.events.join(", ")
        )?;
    }
    for (kind, rels) in [
        ("feedback", &payload.feedback),
        ("indirect", &payload.indirect),
        ("displayed", &payload.displayed),
    ] {
        for row in rels {
            write_row(w, &format!("{kind} "), row)?;
        }
    }
    if !payload.unplaced.is_empty() {
        writeln!(w, "unplaced: {}", payload.unplaced.join(", "))?;
    }
    writeln!(w, "fingerprint {}", payload.fingerprint)
}

pub fn render_analyze_pretty(payload: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, payload.network.unwrap_or("Network analysis"))?;
    pretty_kv(w, "strategy", payload.strategy)?;
    pretty_kv(w, "fingerprint", &payload.fingerprint)?;
    writeln!(w)?;

    pretty_section(w, &format!("Layers ({})", payload.layers.len()))?;
    if payload.layers.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for layer in &payload.layers {
        writeln!(
            w,
            "  {:>2}. {:<11} {}",
            layer.index,
            layer.level,
            layer.events.join(", ")
        )?;
    }

    for (heading, rels) in [
        ("Feedback", &payload.feedback),
        ("Indirect", &payload.indirect),
        ("Displayed", &payload.displayed),
    ] {
        writeln!(w)?;
        pretty_section(w, &format!("{heading} ({})", rels.len()))?;
        if rels.is_empty() {
            writeln!(w, "  (none)")?;
        }
        for row in rels {
            write_row(w, "  ", row)?;
        }
    }

    if !payload.unplaced.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Unplaced ({})", payload.unplaced.len()))?;
        for id in &payload.unplaced {
            writeln!(w, "  {id}")?;
        }
    }
    Ok(())
}
