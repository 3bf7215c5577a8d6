//! Command-line interface for codenarrate.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::config::{self, Config, OutputFormat};
use crate::ingest::{self, WalkOptions};
use crate::language::Language;
use crate::parser::Grammar;
use crate::pipeline::{self, PipelineConfig};
use crate::report::{self, Failure, ProjectSummary};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Output directory name used when `--output` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "_explained";

/// Explain source code in plain language.
///
/// codenarrate reads a project, works out what each file does and writes a
/// beginner-friendly explanation per file, plus a narration script ready
/// for a text-to-speech engine.
#[derive(Parser)]
#[command(name = "codenarrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Explain a file or every file in a directory
    Explain(ExplainArgs),
    /// List recognised languages
    Languages,
    /// Create a codenarrate config file from the template
    Init(InitArgs),
}

/// Arguments for the explain command.
#[derive(Parser)]
pub struct ExplainArgs {
    /// Path to explain (file or directory)
    pub path: PathBuf,

    /// Directory for explanation files (default: <PATH>/_explained)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only explain paths matching this glob (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Skip paths matching this glob (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Treat every file as this language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Do not write audio_script.txt files
    #[arg(long)]
    pub no_narration: bool,

    /// Output format: text or json
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "codenarrate.yaml")]
    pub output: PathBuf,
}

/// Fold command-line flags into the loaded config. Flags win.
fn apply_overrides(config: &mut Config, args: &ExplainArgs) {
    if !args.include.is_empty() {
        config.filters.include = args.include.clone();
    }
    if !args.exclude.is_empty() {
        config.filters.exclude.extend(args.exclude.iter().cloned());
    }
    if let Some(language) = &args.language {
        config.analysis.language = Some(language.clone());
    }
    if args.no_narration {
        config.output.narration = Some(false);
    }
    if let Some(format) = &args.format {
        config.output.format = Some(format.clone());
    }
}

/// Keep a previous run's output out of the walk when it sits inside the root.
fn exclude_output(config: &mut Config, root: &Path, output: &Path) {
    if let Ok(relative) = output.strip_prefix(root) {
        if !relative.as_os_str().is_empty() {
            let relative = relative.to_string_lossy().replace('\\', "/");
            config.filters.exclude.push(format!("{}/**", relative));
        }
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// Run the explain command.
pub fn run_explain(args: &ExplainArgs) -> anyhow::Result<i32> {
    let (mut config, config_path) = match Config::load(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Err(e) = config.apply_env() {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }
    apply_overrides(&mut config, args);

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid configuration: {}", e);
        if let Some(path) = config_path {
            eprintln!("Check {}", path.display());
        }
        return Ok(EXIT_ERROR);
    }

    // Resolve path
    let root = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let output = match &args.output {
        Some(p) => p.clone(),
        None if root.is_dir() => root.join(DEFAULT_OUTPUT_DIR),
        None => root
            .parent()
            .map(|p| p.join(DEFAULT_OUTPUT_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
    };
    if root.is_dir() {
        let absolute = if output.is_absolute() {
            output.clone()
        } else {
            std::env::current_dir()?.join(&output)
        };
        exclude_output(&mut config, &root, &absolute);
    }

    let options = WalkOptions::from_config(&config)?;
    let (sources, errors) = match ingest::load(&root, &options) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let failures: Vec<Failure> = errors
        .iter()
        .map(|e| Failure {
            path: ingest::relative_to(&root, e.path())
                .to_string_lossy()
                .replace('\\', "/"),
            error: e.to_string(),
        })
        .collect();

    if sources.is_empty() && failures.is_empty() {
        eprintln!("Warning: no files to explain");
        return Ok(EXIT_SUCCESS);
    }

    let format = config.output_format();
    let narration = config.narration_enabled();
    let pipeline_config = PipelineConfig::from_config(&config);

    let files: Vec<(PathBuf, Vec<u8>)> = sources
        .into_iter()
        .map(|source| (source.relative, source.bytes))
        .collect();
    tracing::info!(files = files.len(), root = %root.display(), "explaining");
    let reports = pipeline::analyze_batch(&files, &pipeline_config);

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let summary = ProjectSummary::build(&name, &reports, failures.len());
    let path_str = args.path.to_string_lossy().to_string();

    match format {
        OutputFormat::Json => {
            report::write_json(&path_str, &summary, &reports, &failures)?;
        }
        OutputFormat::Text => {
            let bar = progress_bar(reports.len());
            for file_report in &reports {
                bar.set_message(file_report.path.display().to_string());
                report::write_explanation_files(&output, file_report, narration)?;
                bar.inc(1);
            }
            bar.finish_and_clear();

            let summary_path = report::write_summary(&output, &summary)?;
            tracing::debug!(path = %summary_path.display(), "wrote project summary");
            report::write_pretty(&path_str, Some(output.as_path()), &summary, &failures);
        }
    }

    if failures.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the languages command.
pub fn run_languages() -> anyhow::Result<i32> {
    println!("Recognised languages:");
    println!();
    println!("  {:<12} {:<12} {:<10} {}", "ID", "NAME", "PARSING", "EXTENSIONS");

    for language in Language::ALL {
        let spec = language.spec();
        let parsing = if Grammar::for_language(language) == Grammar::Generic {
            "basic"
        } else {
            "full"
        };
        let extensions: Vec<String> = spec.extensions.iter().map(|e| format!(".{}", e)).collect();
        println!(
            "  {:<12} {:<12} {:<10} {}",
            spec.id,
            spec.display_name,
            parsing,
            extensions.join(" ")
        );
    }

    println!();
    println!("Other files are explained as generic text.");
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: codenarrate explain . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(path: &Path) -> ExplainArgs {
        ExplainArgs {
            path: path.to_path_buf(),
            output: None,
            config: None,
            include: vec![],
            exclude: vec![],
            language: None,
            no_narration: false,
            format: None,
        }
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::parse_str("filters:\n  exclude:\n    - \"**/vendor/**\"\n").unwrap();
        let mut a = args(Path::new("."));
        a.include = vec!["**/*.py".to_string()];
        a.exclude = vec!["**/build/**".to_string()];
        a.language = Some("go".to_string());
        a.no_narration = true;
        a.format = Some("json".to_string());

        apply_overrides(&mut config, &a);
        assert_eq!(config.filters.include, vec!["**/*.py"]);
        assert_eq!(config.filters.exclude, vec!["**/vendor/**", "**/build/**"]);
        assert_eq!(config.language_override(), Some(Language::Go));
        assert!(!config.narration_enabled());
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_exclude_output_inside_root() {
        let mut config = Config::default();
        exclude_output(&mut config, Path::new("/p"), Path::new("/p/_explained"));
        assert_eq!(config.filters.exclude, vec!["_explained/**"]);

        let mut outside = Config::default();
        exclude_output(&mut outside, Path::new("/p"), Path::new("/elsewhere"));
        assert!(outside.filters.exclude.is_empty());
    }

    #[test]
    fn test_explain_writes_tree() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("proj");
        fs::create_dir_all(project.join("scripts")).unwrap();
        fs::write(project.join("settings.yaml"), "debug: true\n").unwrap();
        fs::write(project.join("scripts/run.sh"), "echo hi\n").unwrap();

        let code = run_explain(&args(&project)).unwrap();
        assert_eq!(code, EXIT_SUCCESS);

        let out = project.join(DEFAULT_OUTPUT_DIR);
        assert!(out.join(report::SUMMARY_FILE).is_file());
        assert!(out.join("settings.yaml_explanation/explanation.txt").is_file());
        assert!(out.join("scripts/run.sh_explanation/audio_script.txt").is_file());

        // A second run must not explain its own output.
        assert_eq!(run_explain(&args(&project)).unwrap(), EXIT_SUCCESS);
        assert!(!out.join(DEFAULT_OUTPUT_DIR).exists());
        assert!(!out.join("00_project_summary.txt_explanation").exists());
    }

    #[test]
    fn test_explain_reports_oversized_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.sh"), "echo 1\n".repeat(50)).unwrap();
        fs::write(dir.path().join("small.sh"), "echo 1\n").unwrap();
        let config = dir.path().join("codenarrate.yaml");
        fs::write(&config, "analysis:\n  max_file_size: 64\n").unwrap();

        let mut a = args(dir.path());
        a.config = Some(config);
        a.output = Some(dir.path().join("out"));
        assert_eq!(run_explain(&a).unwrap(), EXIT_FAILED);
        assert!(dir.path().join("out/small.sh_explanation/explanation.txt").is_file());
    }

    #[test]
    fn test_explain_bad_config_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let mut a = args(dir.path());
        a.language = Some("klingon".to_string());
        assert_eq!(run_explain(&a).unwrap(), EXIT_ERROR);

        let missing = args(&dir.path().join("nope"));
        assert_eq!(run_explain(&missing).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let a = InitArgs {
            output: dir.path().join("conf/codenarrate.yaml"),
        };
        assert_eq!(run_init(&a).unwrap(), EXIT_SUCCESS);
        assert_eq!(fs::read_to_string(&a.output).unwrap(), config::TEMPLATE);
        assert_eq!(run_init(&a).unwrap(), EXIT_ERROR);
    }
}
