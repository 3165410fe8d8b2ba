use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// File name of the project configuration, looked up in the working
/// directory.
pub const PROJECT_CONFIG_FILE: &str = "aopnet.toml";

/// How feedback (cycle-closing) relationships are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackStrategy {
    /// Walk every path from each root edge with a path-local visited set and
    /// report the first relationship that repeats on the path.
    #[default]
    PathLocal,
    /// Single depth-first search from the roots; report relationships that
    /// reach a node still on the search stack.
    EdgeColoring,
}

impl FeedbackStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PathLocal => "path-local",
            Self::EdgeColoring => "edge-coloring",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub feedback_strategy: FeedbackStrategy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// A configuration file exists but is not valid TOML for its schema.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse {path}: {source}")]
pub struct ConfigParseError {
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    load_toml_or_default(&project_root.join(PROJECT_CONFIG_FILE))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_toml_or_default(&config_dir.join("aopnet/config.toml"))
}

fn load_toml_or_default<T>(path: &Path) -> Result<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed = toml::from_str::<T>(&content).map_err(|source| ConfigParseError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parsed)
}

/// Load both configuration files and resolve the output mode.
///
/// Output precedence: `format_flag`, then the `FORMAT` environment variable,
/// then the project file, then the user file, then TTY detection.
pub fn resolve_config(project_root: &Path, format_flag: Option<&str>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        format_flag,
        env_format.as_deref(),
        project.output.format.as_deref(),
        user.output.format.as_deref(),
        std::io::stdout().is_terminal(),
    )
    .to_string();

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn resolve_output(
    format_flag: Option<&str>,
    env_format: Option<&str>,
    project_format: Option<&str>,
    user_format: Option<&str>,
    is_tty: bool,
) -> &'static str {
    [format_flag, env_format, project_format, user_format]
        .into_iter()
        .flatten()
        .find_map(normalize_output_mode)
        .unwrap_or(if is_tty { "pretty" } else { "text" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_project_config(dir.path()).expect("defaults");
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(
            config.analysis.feedback_strategy,
            FeedbackStrategy::PathLocal
        );
    }

    #[test]
    fn project_config_reads_strategy_and_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[analysis]\nfeedback_strategy = \"edge-coloring\"\n\n[output]\nformat = \"json\"\n",
        )
        .expect("write config");

        let config = load_project_config(dir.path()).expect("parse");
        assert_eq!(
            config.analysis.feedback_strategy,
            FeedbackStrategy::EdgeColoring
        );
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn malformed_project_config_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[analysis]\nfeedback_strategy = \"sideways\"\n",
        )
        .expect("write config");

        let err = load_project_config(dir.path()).unwrap_err();
        let parse = err
            .downcast_ref::<ConfigParseError>()
            .expect("typed parse error");
        assert!(parse.path.ends_with(PROJECT_CONFIG_FILE));
        assert!(err.to_string().contains(PROJECT_CONFIG_FILE));
    }

    #[test]
    fn output_flag_wins() {
        assert_eq!(
            resolve_output(Some("json"), Some("text"), Some("pretty"), None, true),
            "json"
        );
    }

    #[test]
    fn env_beats_config_files() {
        assert_eq!(
            resolve_output(None, Some("text"), Some("json"), Some("json"), true),
            "text"
        );
    }

    #[test]
    fn project_beats_user() {
        assert_eq!(
            resolve_output(None, None, Some("json"), Some("text"), true),
            "json"
        );
        assert_eq!(resolve_output(None, None, None, Some("table"), true), "text");
    }

    #[test]
    fn unknown_values_fall_through_to_tty_default() {
        assert_eq!(resolve_output(None, Some("xml"), None, None, true), "pretty");
        assert_eq!(resolve_output(None, None, None, None, false), "text");
    }

    #[test]
    fn strategy_names_are_kebab_case() {
        assert_eq!(FeedbackStrategy::PathLocal.as_str(), "path-local");
        let parsed: AnalysisConfig =
            toml::from_str("feedback_strategy = \"path-local\"").expect("parse");
        assert_eq!(parsed.feedback_strategy, FeedbackStrategy::PathLocal);
    }
}
