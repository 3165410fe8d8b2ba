use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `aopnet completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate shell completion script to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_completions(shell, command, &mut out);
    out.flush()?;
    Ok(())
}

fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, "aopnet", out);
}
