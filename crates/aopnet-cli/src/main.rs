#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::process::ExitCode;

use aopnet_analysis::AnalysisOptions;
use aopnet_core::FeedbackStrategy;
use aopnet_core::config::{self, EffectiveConfig};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use output::{CliError, OutputMode, flag_mode, render_error};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "aopnet: layering and cycle analysis for Adverse Outcome Pathway networks",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress log output below errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Feedback detection strategy; overrides `aopnet.toml`.
    #[arg(long, global = true, value_enum)]
    strategy: Option<StrategyArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    PathLocal,
    EdgeColoring,
}

impl From<StrategyArg> for FeedbackStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::PathLocal => Self::PathLocal,
            StrategyArg::EdgeColoring => Self::EdgeColoring,
        }
    }
}

impl Cli {
    fn flag_output(&self) -> Option<OutputMode> {
        flag_mode(self.format, self.json)
    }

    /// `--strategy` wins over the project config.
    fn analysis_options(&self, config: &EffectiveConfig) -> AnalysisOptions {
        let strategy = self.strategy.map_or(
            config.project.analysis.feedback_strategy,
            FeedbackStrategy::from,
        );
        AnalysisOptions::with_strategy(strategy)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Run every analysis on a network",
        long_about = "Compute layers, feedback, indirect and displayed relationships, unplaced events and the network fingerprint in one pass.",
        after_help = "EXAMPLES:\n    # Analyse a network\n    aopnet analyze network.json\n\n    # Use edge coloring for feedback detection\n    aopnet analyze network.yaml --strategy edge-coloring\n\n    # Emit machine-readable output\n    aopnet analyze network.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Show the ordered biological layers",
        long_about = "Group events into ordered layers of a single biological level, ignoring feedback relationships.",
        after_help = "EXAMPLES:\n    # Print layers\n    aopnet layers network.json\n\n    # Tab-separated output for scripts\n    aopnet layers network.json --format text"
    )]
    Layers(cmd::layers::LayersArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "List feedback relationships",
        long_about = "List the relationships that close a cycle when walking from the root events.",
        after_help = "EXAMPLES:\n    # Default path-local detection\n    aopnet feedback network.json\n\n    # Depth-first edge coloring\n    aopnet feedback network.json --strategy edge-coloring"
    )]
    Feedback(cmd::feedback::FeedbackArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "List indirect relationships",
        long_about = "List relationships already implied by a longer path, ignoring feedback relationships.",
        after_help = "EXAMPLES:\n    # Print indirect relationships\n    aopnet indirect network.json"
    )]
    Indirect(cmd::indirect::IndirectArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show network statistics",
        long_about = "Summarize event, relationship and layer counts for a network.",
        after_help = "EXAMPLES:\n    # Print statistics\n    aopnet stats network.json\n\n    # Emit machine-readable output\n    aopnet stats network.json --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Validate a network",
        long_about = "Check that every relationship references a known event and that event ids are unique, then list warnings. Exits with status 1 when the network is malformed.",
        after_help = "EXAMPLES:\n    # Validate before rendering\n    aopnet check network.json && aopnet layers network.json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Utility",
        about = "Generate shell completions",
        long_about = "Print a shell completion script for aopnet.",
        after_help = "EXAMPLES:\n    # Bash\n    aopnet completions bash > /etc/bash_completion.d/aopnet"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// parseable.
///
/// `AOPNET_LOG` takes an `EnvFilter` directive and wins over `-v`/`-q`.
/// `AOPNET_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("AOPNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "aopnet=debug,info"
        } else {
            "aopnet=info,warn"
        })
    });

    let format = env::var("AOPNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Returns `Ok(false)` when the command ran but found the input invalid.
fn dispatch(cli: &Cli, output: OutputMode, options: &AnalysisOptions) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, output, options)?,
        Commands::Layers(args) => cmd::layers::run_layers(args, output, options)?,
        Commands::Feedback(args) => cmd::feedback::run_feedback(args, output, options)?,
        Commands::Indirect(args) => cmd::indirect::run_indirect(args, output, options)?,
        Commands::Stats(args) => cmd::stats::run_stats(args, output, options)?,
        Commands::Check(args) => return cmd::check::run_check(args, output, options),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)?;
        }
    }
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let resolved = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|root| config::resolve_config(&root, cli.flag_output().map(OutputMode::as_str)));
    let effective = match resolved {
        Ok(effective) => effective,
        Err(err) => {
            let output = cli.flag_output().unwrap_or(OutputMode::Text);
            // Nothing else to report to if stderr itself fails.
            let _ = render_error(output, &CliError::from(&err));
            return ExitCode::FAILURE;
        }
    };

    let output = OutputMode::from_resolved(&effective.resolved_output);
    let options = cli.analysis_options(&effective);
    debug!(
        output = output.as_str(),
        strategy = options.feedback_strategy.as_str(),
        "configuration resolved"
    );

    match dispatch(&cli, output, &options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let _ = render_error(output, &CliError::from(&err));
            ExitCode::FAILURE
        }
    }
}
