//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for pipes and
//! scripts, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[output] format` in `aopnet.toml`, then in the user config
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Steps 2 to 4 live in [`aopnet_core::config::resolve_config`]; this module
//! only maps the resolved name back onto [`OutputMode`].

use aopnet_core::config::ConfigParseError;
use aopnet_core::{ErrorCode, GraphError, LoadError};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Line-oriented plain text for pipes and scripts.
    Text,
    /// Machine-readable JSON (one object per command).
    Json,
}

impl OutputMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Map a resolved mode name back to a variant. Unknown names fall back
    /// to text.
    #[must_use]
    pub fn from_resolved(name: &str) -> Self {
        match name {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// The mode requested on the command line, if any. `--format` wins over the
/// hidden `--json` alias.
#[must_use]
pub fn flag_mode(format_flag: Option<OutputMode>, json_flag: bool) -> Option<OutputMode> {
    format_flag.or(json_flag.then_some(OutputMode::Json))
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Attach the code and hint of `code` to `message`.
    pub fn with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&LoadError> for CliError {
    fn from(err: &LoadError) -> Self {
        Self::with_code(err.to_string(), err.error_code())
    }
}

impl From<&GraphError> for CliError {
    fn from(err: &GraphError) -> Self {
        Self::with_code(err.to_string(), err.error_code())
    }
}

impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        if let Some(parse) = err.downcast_ref::<ConfigParseError>() {
            return Self::with_code(parse.to_string(), ErrorCode::ConfigParseError);
        }
        if let Some(load) = err.downcast_ref::<LoadError>() {
            return Self::from(load);
        }
        if let Some(graph) = err.downcast_ref::<GraphError>() {
            return Self::from(graph);
        }
        Self::new(format!("{err:#}"))
    }
}

/// Write an error in the requested format.
pub fn write_error(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *w, &wrapper)?;
            writeln!(w)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
                None => writeln!(w, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(w, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aopnet_core::MalformedGraphError;

    fn error_text(mode: OutputMode, error: &CliError) -> String {
        let mut buf = Vec::new();
        write_error(&mut buf, mode, error).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    // ── OutputMode ──────────────────────────────────────────────────────────

    #[test]
    fn resolved_names_round_trip() {
        for mode in [OutputMode::Pretty, OutputMode::Text, OutputMode::Json] {
            assert_eq!(OutputMode::from_resolved(mode.as_str()), mode);
        }
        assert_eq!(OutputMode::from_resolved("bogus"), OutputMode::Text);
    }

    #[test]
    fn format_flag_beats_json_alias() {
        assert_eq!(
            flag_mode(Some(OutputMode::Text), true),
            Some(OutputMode::Text)
        );
        assert_eq!(flag_mode(None, true), Some(OutputMode::Json));
        assert_eq!(flag_mode(None, false), None);
    }

    // ── Pretty helpers ──────────────────────────────────────────────────────

    #[test]
    fn pretty_section_underlines_heading() {
        let mut buf = Vec::new();
        pretty_section(&mut buf, "Layers").expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Layers");
        assert_eq!(lines[1].len(), PRETTY_RULE_WIDTH);
    }

    #[test]
    fn pretty_kv_aligns_values() {
        let mut buf = Vec::new();
        pretty_kv(&mut buf, "events", "5").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "events:        5\n");
    }

    // ── Errors ──────────────────────────────────────────────────────────────

    #[test]
    fn graph_error_carries_code_and_hint() {
        let err = GraphError::Malformed(MalformedGraphError::DuplicateEvent("KE1".to_string()));
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2002"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn anyhow_error_downcasts_load_error() {
        let err = anyhow::Error::new(LoadError::UnsupportedFormat("csv".to_string()));
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1003"));
    }

    #[test]
    fn plain_anyhow_error_has_no_code() {
        let err = anyhow::anyhow!("boom");
        let cli = CliError::from(&err);
        assert_eq!(cli, CliError::new("boom"));
    }

    #[test]
    fn text_error_shows_code_and_suggestion() {
        let cli = CliError::with_code("duplicate event id 'A'", ErrorCode::DuplicateEvent);
        let text = error_text(OutputMode::Text, &cli);
        assert!(text.starts_with("error[E2002]: duplicate event id 'A'"));
        assert!(text.contains("suggestion: Give every event a unique `id`."));
    }

    #[test]
    fn json_error_is_wrapped() {
        let cli = CliError::new("boom");
        let text = error_text(OutputMode::Json, &cli);
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["error"]["message"], "boom");
        assert!(value["error"].get("error_code").is_none());
    }
}
