//! Integration tests for the analysis pipeline.
//!
//! These tests walk the sample project in testdata and check the
//! structure, metrics and explanations produced for each file.

use std::path::{Path, PathBuf};

use codenarrate::explain::FileRole;
use codenarrate::ingest::{self, WalkOptions};
use codenarrate::language::Language;
use codenarrate::narrate;
use codenarrate::pipeline::{self, Degradation, FileReport, PipelineConfig};

fn sample_project() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("sample_project")
}

fn analyze_sample() -> Vec<FileReport> {
    let root = sample_project();
    let (sources, failures) = ingest::load(&root, &WalkOptions::default()).expect("should walk sample project");
    assert!(failures.is_empty(), "unexpected failures: {:?}", failures);

    let files: Vec<(PathBuf, Vec<u8>)> = sources.into_iter().map(|s| (s.relative, s.bytes)).collect();
    pipeline::analyze_batch(&files, &PipelineConfig::default())
}

fn find<'a>(reports: &'a [FileReport], path: &str) -> &'a FileReport {
    reports
        .iter()
        .find(|r| r.path == Path::new(path))
        .unwrap_or_else(|| panic!("no report for {}", path))
}

// =============================================================================
// Walking and detection
// =============================================================================

#[test]
fn test_sample_project_files() {
    let reports = analyze_sample();
    let paths: Vec<String> = reports
        .iter()
        .map(|r| r.path.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        paths,
        vec![
            "broken.py",
            "calculator.py",
            "config.py",
            "empty.py",
            "main.py",
            "models.py",
            "notes.zzz",
            "scripts/deploy.sh",
            "settings.yaml",
            "tests/test_calculator.py",
            "utils.py",
        ]
    );
}

#[test]
fn test_sample_project_languages() {
    let reports = analyze_sample();
    assert_eq!(find(&reports, "main.py").language.language, Language::Python);
    assert_eq!(find(&reports, "scripts/deploy.sh").language.language, Language::Shell);
    assert_eq!(find(&reports, "settings.yaml").language.language, Language::Yaml);
    assert_eq!(find(&reports, "notes.zzz").language.language, Language::Unknown);
}

// =============================================================================
// Roles
// =============================================================================

#[test]
fn test_roles_by_name_and_content() {
    let reports = analyze_sample();
    assert_eq!(find(&reports, "main.py").explanation.role, FileRole::EntryPoint);
    assert_eq!(find(&reports, "config.py").explanation.role, FileRole::Configuration);
    assert_eq!(find(&reports, "settings.yaml").explanation.role, FileRole::Configuration);
    assert_eq!(find(&reports, "utils.py").explanation.role, FileRole::Utility);
    assert_eq!(find(&reports, "tests/test_calculator.py").explanation.role, FileRole::Test);
    assert_eq!(find(&reports, "scripts/deploy.sh").explanation.role, FileRole::Script);
    assert_eq!(find(&reports, "notes.zzz").explanation.role, FileRole::GenericFile);
    assert_eq!(find(&reports, "empty.py").explanation.role, FileRole::GenericFile);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_roles_from_declarations() {
    let reports = analyze_sample();
    assert_eq!(find(&reports, "calculator.py").explanation.role, FileRole::Library);
    assert_eq!(find(&reports, "models.py").explanation.role, FileRole::DataModel);
}

// =============================================================================
// Structure and metrics
// =============================================================================

#[test]
#[cfg(feature = "tree-sitter")]
fn test_calculator_structure() {
    let reports = analyze_sample();
    let calc = find(&reports, "calculator.py");

    let names: Vec<&str> = calc.structure.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["add", "subtract", "divide", "clamp"]);

    let clamp = calc
        .metrics
        .declarations
        .iter()
        .find(|d| d.name == "clamp")
        .expect("clamp should be measured");
    assert_eq!(clamp.complexity, 3);
    assert_eq!(calc.metrics.aggregate_complexity, 6);
    assert!(calc.degradations.is_empty());
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_main_inputs_outputs_and_connections() {
    let reports = analyze_sample();
    let main = find(&reports, "main.py");
    let explanation = &main.explanation;

    assert!(explanation
        .input_sources
        .iter()
        .any(|s| s == "Text typed by the user in the console"));
    assert!(explanation
        .output_destinations
        .iter()
        .any(|s| s == "Messages printed to the console"));
    assert_eq!(explanation.connections, vec!["sys", "calculator", "config"]);
    assert!(explanation.mechanism_steps[0].starts_with("Step 1: "));
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_broken_file_is_partial() {
    let reports = analyze_sample();
    let broken = find(&reports, "broken.py");
    assert!(broken
        .degradations
        .iter()
        .any(|d| matches!(d, Degradation::PartialParse { .. })));
    assert!(broken.structure.has_function("fine"));
}

#[test]
fn test_empty_file() {
    let reports = analyze_sample();
    let empty = find(&reports, "empty.py");
    assert_eq!(empty.metrics.lines.total, 0);
    assert_eq!(empty.metrics.aggregate_complexity, 1);
    assert!(empty.metrics.maintainability_index.is_finite());
    assert!(empty.structure.declarations.is_empty());
    assert!(empty.structure.imports.is_empty());
    assert!(empty.structure.comments.is_empty());
}

#[test]
fn test_unsupported_language_degrades() {
    let reports = analyze_sample();
    let deploy = find(&reports, "scripts/deploy.sh");
    assert!(deploy
        .degradations
        .contains(&Degradation::UnsupportedLanguage { language: Language::Shell }));
    assert_eq!(deploy.metrics.lines.comment, 2);
}

// =============================================================================
// Explanations and narration
// =============================================================================

#[test]
fn test_no_empty_slots() {
    for report in analyze_sample() {
        let e = &report.explanation;
        let path = report.path.display().to_string();
        assert!(!e.purpose.is_empty(), "{}", path);
        assert!(!e.rationale.is_empty(), "{}", path);
        assert!(!e.mechanism_steps.is_empty(), "{}", path);
        assert!(!e.input_sources.is_empty(), "{}", path);
        assert!(!e.output_destinations.is_empty(), "{}", path);
        assert!(!e.connections.is_empty(), "{}", path);
        assert!(!e.key_facts.is_empty(), "{}", path);
        assert!(!e.beginner_tip.is_empty(), "{}", path);
    }
}

#[test]
fn test_narration_is_normalized() {
    for report in analyze_sample() {
        let text = report.narration.text();
        assert_eq!(narrate::normalize(&text), text, "{}", report.path.display());
        assert!(!text.chars().any(|c| c.is_ascii_digit()), "{}", report.path.display());
    }
}

#[test]
fn test_batch_is_deterministic() {
    let first = analyze_sample();
    let second = analyze_sample();
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.explanation, b.explanation);
        assert_eq!(a.narration, b.narration);
    }
}

#[test]
fn test_language_override() {
    let root = sample_project();
    let bytes = std::fs::read(root.join("notes.zzz")).unwrap();
    let config = PipelineConfig {
        language_override: Some(Language::Ruby),
    };
    let report = pipeline::explain_source(Path::new("notes.zzz"), &bytes, &config);
    assert_eq!(report.language.language, Language::Ruby);
    assert_ne!(report.explanation.role, FileRole::GenericFile);
}
