use std::io::{self, Write};
use std::path::PathBuf;

use aopnet_analysis::{AnalysisOptions, Finding, diagnose};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use super::load;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Network file (.json, .yaml, .yml or .toml).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub valid: bool,
    pub events: usize,
    pub relationships: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
    pub findings: Vec<Finding>,
}

/// Validate the network and collect diagnostics.
///
/// A malformed network is reported as a result, not an error; the return
/// value says whether the network was valid so the caller can pick the exit
/// code.
pub fn run_check(args: &CheckArgs, output: OutputMode, options: &AnalysisOptions) -> anyhow::Result<bool> {
    let network = load(&args.file)?;
    let payload = check(&network, options);
    render_mode(
        output,
        &payload,
        |p, w| render_check_text(p, w),
        |p, w| render_check_human(p, w),
    )?;
    Ok(payload.valid)
}

pub fn check(network: &aopnet_core::Network, options: &AnalysisOptions) -> CheckOutput {
    let (error, findings) = match diagnose(network, options) {
        Ok(findings) => (None, findings),
        Err(err) => {
            warn!(error = %err, "network is malformed");
            (Some(CliError::from(&err)), Vec::new())
        }
    };
    CheckOutput {
        valid: error.is_none(),
        events: network.events.len(),
        relationships: network.relationships.len(),
        error,
        findings,
    }
}

pub fn render_check_text(payload: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    match &payload.error {
        None => writeln!(
            w,
            "ok {} events {} relationships",
            payload.events, payload.relationships
        )?,
        Some(error) => writeln!(
            w,
            "invalid {} {}",
            error.error_code.as_deref().unwrap_or("-"),
            error.message
        )?,
    }
    for finding in &payload.findings {
        writeln!(w, "warning {}: {finding}", finding.kind())?;
    }
    Ok(())
}

pub fn render_check_human(payload: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Network check")?;
    pretty_kv(w, "events", payload.events.to_string())?;
    pretty_kv(w, "relationships", payload.relationships.to_string())?;
    match &payload.error {
        None => pretty_kv(w, "status", "valid")?,
        Some(error) => {
            pretty_kv(w, "status", "MALFORMED")?;
            if let Some(code) = &error.error_code {
                pretty_kv(w, "code", code)?;
            }
            pretty_kv(w, "error", &error.message)?;
            if let Some(suggestion) = &error.suggestion {
                pretty_kv(w, "suggestion", suggestion)?;
            }
        }
    }
    if !payload.findings.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Warnings ({})", payload.findings.len()))?;
        for finding in &payload.findings {
            writeln!(w, "  ! {finding}")?;
        }
    }
    Ok(())
}
