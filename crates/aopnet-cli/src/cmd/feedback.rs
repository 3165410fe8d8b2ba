use std::io::{self, Write};
use std::path::PathBuf;

use aopnet_analysis::{AnalysisOptions, analyze};
use clap::Args;
use serde::Serialize;

use super::{RelationshipRow, load, rows, write_row};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct FeedbackArgs {
    /// Network file (.json, .yaml, .yml or .toml).
    pub file: PathBuf,
}

/// A single relationship category, shared with `indirect`.
#[derive(Debug, Serialize)]
pub struct RelationshipsOutput<'a> {
    pub kind: &'static str,
    pub strategy: &'static str,
    pub count: usize,
    pub relationships: Vec<RelationshipRow<'a>>,
}

impl<'a> RelationshipsOutput<'a> {
    pub fn new(
        kind: &'static str,
        strategy: &'static str,
        relationships: Vec<RelationshipRow<'a>>,
    ) -> Self {
        Self {
            kind,
            strategy,
            count: relationships.len(),
            relationships,
        }
    }
}

pub fn run_feedback(
    args: &FeedbackArgs,
    output: OutputMode,
    options: &AnalysisOptions,
) -> anyhow::Result<()> {
    let network = load(&args.file)?;
    let analysis = analyze(&network, options)?;
    let payload = RelationshipsOutput::new(
        "feedback",
        analysis.strategy.as_str(),
        rows(&analysis.feedback),
    );
    render_mode(
        output,
        &payload,
        |p, w| render_relationships_text(p, w),
        |p, w| render_relationships_human(p, w),
    )
}

pub fn render_relationships_text(
    payload: &RelationshipsOutput<'_>,
    w: &mut dyn Write,
) -> io::Result<()> {
    for row in &payload.relationships {
        write_row(w, "", row)?;
    }
    Ok(())
}

pub fn render_relationships_human(
    payload: &RelationshipsOutput<'_>,
    w: &mut dyn Write,
) -> io::Result<()> {
    let mut heading = payload.kind.to_string();
    if let Some(first) = heading.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    pretty_section(w, &format!("{heading} relationships ({})", payload.count))?;
    if payload.kind == "feedback" {
        pretty_kv(w, "strategy", payload.strategy)?;
    }
    if payload.relationships.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for row in &payload.relationships {
        write_row(w, "  ", row)?;
    }
    Ok(())
}
