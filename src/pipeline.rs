//! One-file analysis: detect, parse, measure, explain, narrate.
//!
//! Every stage is a pure function of its inputs. Problems that still allow
//! an explanation are reported as [`Degradation`] values on the report.

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::explain::{self, Explanation};
use crate::language::{self, Language, LanguageTag, SAMPLE_LEN};
use crate::metrics::{self, Metrics};
use crate::narrate::{self, Narration};
use crate::parser::{self, FileStructure, ParseMode, UnparsedRange};

/// Settings the pipeline needs. Immutable for a whole run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Skip detection and treat every file as this language.
    pub language_override: Option<Language>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language_override: config.language_override(),
        }
    }
}

/// A soft problem: the report is still complete, but less precise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// No grammar for this language; line heuristics only.
    UnsupportedLanguage { language: Language },
    /// The grammar hit regions it could not parse.
    PartialParse { ranges: Vec<UnparsedRange> },
    /// No tokens to measure; Halstead figures and the index are floor values.
    MetricComputationDegenerate,
}

/// Everything known about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub language: LanguageTag,
    pub structure: FileStructure,
    pub metrics: Metrics,
    pub explanation: Explanation,
    pub narration: Narration,
    pub degradations: Vec<Degradation>,
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy().replace('\\', "/"))
}

/// Analyze one file. `path` is used for detection and naming only.
pub fn explain_source(path: &Path, bytes: &[u8], config: &PipelineConfig) -> FileReport {
    let sample = &bytes[..bytes.len().min(SAMPLE_LEN)];
    let tag = language::detect_with_override(path, sample, config.language_override);
    let content = String::from_utf8_lossy(bytes);
    tracing::debug!(path = %path.display(), language = %tag.language, source = ?tag.source, "detected language");

    let structure = parser::parse(&content, tag.language);
    let metrics = metrics::compute(&content, &structure);

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let explanation = explain::synthesize(&structure, &metrics, tag.language, &filename);
    let narration = narrate::narrate(&explanation);

    let degradations = degradations(&structure, &metrics);
    if !degradations.is_empty() {
        tracing::debug!(path = %path.display(), ?degradations, "analysis degraded");
    }

    FileReport {
        path: path.to_path_buf(),
        language: tag,
        structure,
        metrics,
        explanation,
        narration,
        degradations,
    }
}

fn degradations(structure: &FileStructure, metrics: &Metrics) -> Vec<Degradation> {
    let mut found = Vec::new();
    if structure.mode == ParseMode::Degraded {
        found.push(Degradation::UnsupportedLanguage {
            language: structure.language,
        });
    }
    if structure.is_partial() {
        found.push(Degradation::PartialParse {
            ranges: structure.unparsed.clone(),
        });
    }
    if metrics.halstead.length == 0 {
        found.push(Degradation::MetricComputationDegenerate);
    }
    found
}

/// Analyze many files in parallel. Results are sorted by path.
pub fn analyze_batch(files: &[(PathBuf, Vec<u8>)], config: &PipelineConfig) -> Vec<FileReport> {
    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|(path, bytes)| explain_source(path, bytes, config))
        .collect();
    reports.sort_by(|a, b| a.path.cmp(&b.path));
    reports
}
