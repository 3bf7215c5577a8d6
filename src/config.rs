//! Configuration file schema and discovery.
//!
//! Every field is optional; accessors supply the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::language::Language;

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codenarrate.yaml", ".codenarrate.yaml"];

/// Commented template written by `codenarrate init`.
pub const TEMPLATE: &str = include_str!("templates/default.yaml");

/// Prefix for environment overrides. Nested keys are joined with `__`,
/// e.g. `CODENARRATE_ANALYSIS__MAX_FILE_SIZE`.
pub const ENV_PREFIX: &str = "CODENARRATE_";

/// Default size ceiling per file: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filters: FilterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalysisConfig {
    /// Largest file analyzed, in bytes (default: 10 MiB)
    #[serde(default)]
    pub max_file_size: Option<u64>,
    /// Treat every file as this language instead of detecting it
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    /// Write `audio_script.txt` next to each explanation (default: true)
    #[serde(default)]
    pub narration: Option<bool>,
    /// "text" (default) or "json"
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FilterConfig {
    /// Only analyze paths matching one of these globs
    #[serde(default)]
    pub include: Vec<String>,
    /// Skip paths matching any of these globs (e.g., "**/vendor/**")
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Skip hidden files and directories (default: true)
    #[serde(default)]
    pub skip_hidden: Option<bool>,
    /// Maximum directory depth below the root
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Include test files (default: true)
    #[serde(default)]
    pub include_tests: Option<bool>,
}

/// How reports are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty file is an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load `explicit` if given, else the first discovered file, else defaults.
    /// Returns the path that was loaded, if any.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(),
        };
        match path {
            Some(p) => {
                let config = Self::parse_file(&p)
                    .map_err(|e| anyhow::anyhow!("failed to read config {}: {}", p.display(), e))?;
                tracing::debug!(path = %p.display(), "loaded config");
                Ok((config, Some(p)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Apply `CODENARRATE_*` variables from the process environment.
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_env_from(std::env::vars())
    }

    /// Apply `CODENARRATE_*` overrides from `vars`. Other variables are
    /// ignored; an unknown key under the prefix is logged and skipped.
    pub fn apply_env_from<I, K, V>(&mut self, vars: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(path) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let path = path.to_ascii_lowercase();
            let value = value.as_ref().trim();
            let var = key.as_ref();
            match path.as_str() {
                "analysis__max_file_size" => {
                    self.analysis.max_file_size = Some(
                        value
                            .parse()
                            .map_err(|e| anyhow::anyhow!("invalid {}={:?}: {}", var, value, e))?,
                    );
                }
                "analysis__language" => self.analysis.language = Some(value.to_string()),
                "output__narration" => self.output.narration = Some(env_bool(var, value)?),
                "output__format" => self.output.format = Some(value.to_string()),
                "filters__include" => self.filters.include = env_list(value),
                "filters__exclude" => self.filters.exclude = env_list(value),
                "filters__skip_hidden" => self.filters.skip_hidden = Some(env_bool(var, value)?),
                "filters__max_depth" => {
                    self.filters.max_depth = Some(
                        value
                            .parse()
                            .map_err(|e| anyhow::anyhow!("invalid {}={:?}: {}", var, value, e))?,
                    );
                }
                "filters__include_tests" => self.filters.include_tests = Some(env_bool(var, value)?),
                _ => {
                    tracing::warn!(variable = var, "ignoring unknown environment override");
                    continue;
                }
            }
            tracing::debug!(variable = var, "applied environment override");
        }
        Ok(())
    }

    /// Returns the per-file size ceiling (defaults to 10 MiB).
    pub fn max_file_size(&self) -> u64 {
        self.analysis.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    /// Returns the forced language, if one is configured and recognised.
    pub fn language_override(&self) -> Option<Language> {
        self.analysis.language.as_deref().and_then(Language::from_name)
    }

    /// Returns whether narration scripts are written (defaults to true).
    pub fn narration_enabled(&self) -> bool {
        self.output.narration.unwrap_or(true)
    }

    /// Returns the output format (defaults to text).
    pub fn output_format(&self) -> OutputFormat {
        self.output
            .format
            .as_deref()
            .and_then(OutputFormat::parse)
            .unwrap_or(OutputFormat::Text)
    }

    /// Returns whether hidden entries are skipped (defaults to true).
    pub fn skip_hidden(&self) -> bool {
        self.filters.skip_hidden.unwrap_or(true)
    }

    /// Returns whether test files are analyzed (defaults to true).
    pub fn include_tests(&self) -> bool {
        self.filters.include_tests.unwrap_or(true)
    }
}

fn env_bool(var: &str, value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("invalid {}={:?}, expected true or false", var, value),
    }
}

/// Comma-separated list; empty items are dropped.
fn env_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Find a config file: working directory first, then the user config directory.
pub fn discover() -> Option<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.is_file() {
            return Some(path);
        }
    }
    let dirs = directories::ProjectDirs::from("", "", "codenarrate")?;
    let path = dirs.config_dir().join(DEFAULT_CONFIG_NAMES[0]);
    path.is_file().then_some(path)
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.analysis.max_file_size == Some(0) {
        anyhow::bail!("analysis.max_file_size must be greater than zero");
    }

    if let Some(name) = &config.analysis.language {
        if Language::from_name(name).is_none() {
            anyhow::bail!("unknown language {:?} in analysis.language", name);
        }
    }

    if let Some(format) = &config.output.format {
        if OutputFormat::parse(format).is_none() {
            anyhow::bail!("invalid output.format {:?}, must be 'text' or 'json'", format);
        }
    }

    for pattern in config.filters.include.iter().chain(&config.filters.exclude) {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid filter pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
