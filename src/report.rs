//! Output formatting for codenarrate results.
//!
//! Supports three outputs:
//! - Explanation tree: `explanation.txt` and `audio_script.txt` per source
//!   file, mirrored under an output directory, plus a project summary
//! - JSON: structured output for programmatic consumption
//! - Pretty: coloured terminal summary of a run

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::explain::Explanation;
use crate::metrics::ComplexityTag;
use crate::pipeline::FileReport;

/// Project summary file name; sorts first in a directory listing.
pub const SUMMARY_FILE: &str = "00_project_summary.txt";
pub const EXPLANATION_FILE: &str = "explanation.txt";
pub const NARRATION_FILE: &str = "audio_script.txt";

/// Files named in the summary's "most complex" list.
const TOP_COMPLEX: usize = 5;

const RULE_WIDTH: usize = 80;

/// A file that could not be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: String,
    pub error: String,
}

// =============================================================================
// Explanation text
// =============================================================================

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

/// Render an explanation as the beginner-facing text file.
pub fn render_explanation(explanation: &Explanation) -> String {
    let mut out = String::new();

    heading(&mut out, "What this file does:");
    let _ = writeln!(out, "{}\n", explanation.purpose);

    heading(&mut out, "Why this file exists:");
    let _ = writeln!(out, "{}\n", explanation.rationale);

    heading(&mut out, "How it works (in simple steps):");
    for step in &explanation.mechanism_steps {
        let _ = writeln!(out, "{}", step);
    }
    out.push('\n');

    heading(&mut out, "Where input comes from:");
    bullets(&mut out, &explanation.input_sources);

    heading(&mut out, "Where output goes:");
    bullets(&mut out, &explanation.output_destinations);

    heading(&mut out, "How it connects to other files:");
    bullets(&mut out, &explanation.connections);

    heading(&mut out, "Key things to know:");
    bullets(&mut out, &explanation.key_facts);

    heading(&mut out, "Beginner tip:");
    let _ = writeln!(out, "{}", explanation.beginner_tip);

    out
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "• {}", item);
    }
    out.push('\n');
}

/// Render the narration script. The body is exactly the narration text.
pub fn render_narration(report: &FileReport) -> String {
    let mut text = report.narration.text();
    text.push('\n');
    text
}

/// Directory holding the explanation files for `relative`.
///
/// `src/app.py` maps to `<out>/src/app.py_explanation`.
pub fn explanation_dir(out: &Path, relative: &Path) -> PathBuf {
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    out.join(parent).join(format!("{}_explanation", name))
}

/// Write explanation (and optionally narration) files for one report.
/// Returns the paths written.
pub fn write_explanation_files(
    out: &Path,
    report: &FileReport,
    narration: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let dir = explanation_dir(out, &report.path);
    fs::create_dir_all(&dir)?;

    let mut written = Vec::new();
    let explanation_path = dir.join(EXPLANATION_FILE);
    fs::write(&explanation_path, render_explanation(&report.explanation))?;
    written.push(explanation_path);

    if narration {
        let narration_path = dir.join(NARRATION_FILE);
        fs::write(&narration_path, render_narration(report))?;
        written.push(narration_path);
    }

    tracing::debug!(dir = %dir.display(), files = written.len(), "wrote explanation");
    Ok(written)
}

// =============================================================================
// Project summary
// =============================================================================

/// Totals across every analyzed file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub files: usize,
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub languages: BTreeMap<String, usize>,
    pub extensions: BTreeMap<String, usize>,
    /// Directory ("." for the root) to file names.
    pub directories: BTreeMap<String, Vec<String>>,
    pub complexity: BTreeMap<String, usize>,
    pub average_maintainability: f64,
    /// (path, aggregate complexity), most complex first.
    pub most_complex: Vec<(String, u32)>,
    pub failures: usize,
}

impl ProjectSummary {
    pub fn build(name: &str, reports: &[FileReport], failures: usize) -> Self {
        let mut summary = ProjectSummary {
            name: name.to_string(),
            files: reports.len(),
            failures,
            ..Default::default()
        };

        let mut maintainability = 0.0;
        for report in reports {
            let lines = &report.metrics.lines;
            summary.total_lines += lines.total;
            summary.code_lines += lines.code;
            summary.comment_lines += lines.comment;
            maintainability += report.metrics.maintainability_index;

            *summary
                .languages
                .entry(report.language.language.display_name().to_string())
                .or_default() += 1;

            let ext = report
                .path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
                .unwrap_or_else(|| "(none)".to_string());
            *summary.extensions.entry(ext).or_default() += 1;

            let dir = report
                .path
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| ".".to_string());
            let file = report
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            summary.directories.entry(dir).or_default().push(file);

            *summary
                .complexity
                .entry(report.metrics.complexity_tag().as_str().to_string())
                .or_default() += 1;
        }

        if !reports.is_empty() {
            summary.average_maintainability = maintainability / reports.len() as f64;
        }
        for files in summary.directories.values_mut() {
            files.sort();
        }

        let mut ranked: Vec<(String, u32)> = reports
            .iter()
            .filter(|r| r.metrics.aggregate_complexity > 1)
            .map(|r| (r.path.to_string_lossy().replace('\\', "/"), r.metrics.aggregate_complexity))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(TOP_COMPLEX);
        summary.most_complex = ranked;

        summary
    }
}

/// Render the project summary text file.
pub fn render_summary(summary: &ProjectSummary) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let sub = "-".repeat(40);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "PROJECT SUMMARY - codenarrate");
    let _ = writeln!(out, "{}\n", rule);
    let _ = writeln!(out, "Project Name: {}\n", summary.name);

    let _ = writeln!(out, "PROJECT STATISTICS\n{}", sub);
    let _ = writeln!(out, "Total Files Analyzed: {}", summary.files);
    let _ = writeln!(out, "Total Lines: {}", summary.total_lines);
    let _ = writeln!(out, "Lines of Code: {}", summary.code_lines);
    let _ = writeln!(out, "Comment Lines: {}", summary.comment_lines);
    if summary.failures > 0 {
        let _ = writeln!(out, "Files Skipped: {}", summary.failures);
    }
    out.push('\n');

    let _ = writeln!(out, "PROGRAMMING LANGUAGES\n{}", sub);
    for (language, count) in by_count(&summary.languages) {
        let _ = writeln!(out, "  {}: {} {}", language, count, plural(count, "file", "files"));
    }
    out.push('\n');

    let _ = writeln!(out, "FILE TYPES\n{}", sub);
    for (ext, count) in by_count(&summary.extensions) {
        let _ = writeln!(out, "  {}: {} {}", ext, count, plural(count, "file", "files"));
    }
    out.push('\n');

    let _ = writeln!(out, "PROJECT STRUCTURE\n{}", sub);
    for (dir, files) in &summary.directories {
        let _ = writeln!(out, "  {}/", dir);
        for file in files {
            let _ = writeln!(out, "    ├── {}", file);
        }
    }
    out.push('\n');

    let _ = writeln!(out, "COMPLEXITY OVERVIEW\n{}", sub);
    for tag in [ComplexityTag::Simple, ComplexityTag::ModeratelyComplex, ComplexityTag::Complex] {
        let count = summary.complexity.get(tag.as_str()).copied().unwrap_or(0);
        let _ = writeln!(out, "  {}: {} {}", tag, count, plural(count, "file", "files"));
    }
    let _ = writeln!(out, "  Average maintainability: {:.1} / 100", summary.average_maintainability);
    if !summary.most_complex.is_empty() {
        let _ = writeln!(out, "  Most complex files:");
        for (path, complexity) in &summary.most_complex {
            let _ = writeln!(out, "    • {} (complexity {})", path, complexity);
        }
    }
    out.push('\n');

    let _ = writeln!(out, "HOW TO USE THESE EXPLANATIONS\n{}", sub);
    let _ = writeln!(out, "For each file in this project, you'll find:");
    let _ = writeln!(out, "• {} - a beginner-friendly explanation of what the file does", EXPLANATION_FILE);
    let _ = writeln!(out, "• {} - the same explanation prepared for text-to-speech", NARRATION_FILE);
    out.push('\n');

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "End of Project Summary");
    let _ = writeln!(out, "{}", rule);
    out
}

fn by_count(map: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

pub fn write_summary(out: &Path, summary: &ProjectSummary) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out)?;
    let path = out.join(SUMMARY_FILE);
    fs::write(&path, render_summary(summary))?;
    Ok(path)
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: String,
    pub files_analyzed: usize,
    pub summary: &'a ProjectSummary,
    pub files: &'a [FileReport],
    #[serde(skip_serializing_if = "no_failures")]
    pub failures: &'a [Failure],
}

fn no_failures(failures: &&[Failure]) -> bool {
    failures.is_empty()
}

pub fn render_json(
    path: &str,
    summary: &ProjectSummary,
    reports: &[FileReport],
    failures: &[Failure],
) -> anyhow::Result<String> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path: path.to_string(),
        files_analyzed: reports.len(),
        summary,
        files: reports,
        failures,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in JSON format to stdout.
pub fn write_json(
    path: &str,
    summary: &ProjectSummary,
    reports: &[FileReport],
    failures: &[Failure],
) -> anyhow::Result<()> {
    println!("{}", render_json(path, summary, reports, failures)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a human-readable run summary.
pub fn write_pretty(path: &str, output: Option<&Path>, summary: &ProjectSummary, failures: &[Failure]) {
    println!();
    print!("  ");
    print!("{}", "codenarrate".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Explaining: ".dimmed());
    println!("{}", path);
    if let Some(out) = output {
        print!("  {}", "Output:     ".dimmed());
        println!("{}", out.display());
    }
    println!();

    print!("  {}", format!("✓ {} files explained", summary.files).green());
    print!("  {} lines", summary.total_lines);
    println!();

    if !summary.languages.is_empty() {
        println!("  {}", "Languages:".bold());
        for (language, count) in by_count(&summary.languages) {
            println!("    {:<20} {:>4}", language, count);
        }
        println!();
    }

    print!("  {}", "Complexity: ".bold());
    for tag in [ComplexityTag::Simple, ComplexityTag::ModeratelyComplex, ComplexityTag::Complex] {
        let count = summary.complexity.get(tag.as_str()).copied().unwrap_or(0);
        write_colored_tag(tag, count);
        print!("  ");
    }
    println!();
    println!();

    if !failures.is_empty() {
        println!("  {} ({}):", "Skipped".yellow(), failures.len());
        for failure in failures {
            print!("    {}", failure.path.blue());
            println!("  {}", failure.error.dimmed());
        }
        println!();
    }
}

fn write_colored_tag(tag: ComplexityTag, count: usize) {
    let label = format!("{} {}", count, tag);
    match tag {
        ComplexityTag::Simple => print!("{}", label.green()),
        ComplexityTag::ModeratelyComplex => print!("{}", label.yellow()),
        ComplexityTag::Complex => print!("{}", label.red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{explain_source, PipelineConfig};
    use tempfile::TempDir;

    fn report(path: &str, content: &str) -> FileReport {
        explain_source(Path::new(path), content.as_bytes(), &PipelineConfig::default())
    }

    #[test]
    fn test_render_explanation_headings() {
        let text = render_explanation(&report("run.sh", "echo hi\n").explanation);
        let headings: Vec<&str> = text
            .lines()
            .filter(|l| l.ends_with(':') && !l.starts_with("Step"))
            .collect();
        assert_eq!(
            headings,
            vec![
                "What this file does:",
                "Why this file exists:",
                "How it works (in simple steps):",
                "Where input comes from:",
                "Where output goes:",
                "How it connects to other files:",
                "Key things to know:",
                "Beginner tip:",
            ]
        );
        assert!(text.contains("--------------------\n"));
    }

    #[test]
    fn test_explanation_dir_mirrors_tree() {
        let out = Path::new("/out");
        assert_eq!(
            explanation_dir(out, Path::new("src/app.py")),
            PathBuf::from("/out/src/app.py_explanation")
        );
        assert_eq!(
            explanation_dir(out, Path::new("main.rs")),
            PathBuf::from("/out/main.rs_explanation")
        );
    }

    #[test]
    fn test_write_explanation_files() {
        let dir = TempDir::new().unwrap();
        let r = report("pkg/run.sh", "echo hi\n");

        let written = write_explanation_files(dir.path(), &r, true).unwrap();
        assert_eq!(written.len(), 2);
        let base = dir.path().join("pkg/run.sh_explanation");
        assert!(base.join(EXPLANATION_FILE).is_file());
        let script = fs::read_to_string(base.join(NARRATION_FILE)).unwrap();
        assert_eq!(script.trim_end(), r.narration.text());

        let other = TempDir::new().unwrap();
        let written = write_explanation_files(other.path(), &r, false).unwrap();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_summary_totals() {
        let reports = vec![
            report("a.sh", "echo 1\necho 2\n"),
            report("lib/b.sh", "# note\necho 3\n"),
            report("lib/c.yaml", "k: v\n"),
        ];
        let summary = ProjectSummary::build("demo", &reports, 1);
        assert_eq!(summary.files, 3);
        assert_eq!(summary.total_lines, 5);
        assert_eq!(summary.code_lines, 4);
        assert_eq!(summary.comment_lines, 1);
        assert_eq!(summary.languages.get("Shell"), Some(&2));
        assert_eq!(summary.extensions.get(".sh"), Some(&2));
        assert_eq!(summary.directories.get("lib"), Some(&vec!["b.sh".to_string(), "c.yaml".to_string()]));
        assert_eq!(summary.directories.get("."), Some(&vec!["a.sh".to_string()]));

        let text = render_summary(&summary);
        assert!(text.starts_with(&"=".repeat(RULE_WIDTH)));
        assert!(text.contains("Total Files Analyzed: 3"));
        assert!(text.contains("  Shell: 2 files"));
        assert!(text.contains("    ├── c.yaml"));
        assert!(text.contains("Files Skipped: 1"));
    }

    #[test]
    fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let summary = ProjectSummary::build("demo", &[], 0);
        let path = write_summary(dir.path(), &summary).unwrap();
        assert_eq!(path.file_name().unwrap(), SUMMARY_FILE);
        assert!(fs::read_to_string(path).unwrap().contains("Total Files Analyzed: 0"));
    }

    #[test]
    fn test_json_report() {
        let reports = vec![report("a.sh", "echo 1\n")];
        let summary = ProjectSummary::build("demo", &reports, 0);
        let json = render_json("demo", &summary, &reports, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["files_analyzed"], 1);
        assert_eq!(value["files"][0]["path"], "a.sh");
        assert_eq!(value["files"][0]["narration"]["paragraphs"].as_array().unwrap().len(), 8);
        assert!(value.get("failures").is_none());
    }
}
