//! Plain-language explanations built from structure and metrics.
//!
//! [`synthesize`] is deterministic and infallible: every slot of the
//! returned [`Explanation`] is filled, falling back to role templates when
//! the file gives nothing to say.

pub mod tables;

use std::fmt;

use serde::Serialize;

use crate::language::Language;
use crate::metrics::{self, Metrics};
use crate::parser::{Declaration, DeclarationKind, FileStructure, TokenClass};

use tables::{Cue, Direction};

/// What a file is for, as far as its name and contents tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    GenericFile,
    Test,
    Configuration,
    EntryPoint,
    Utility,
    DataModel,
    Library,
    Script,
}

impl FileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileRole::GenericFile => "generic file",
            FileRole::Test => "test",
            FileRole::Configuration => "configuration",
            FileRole::EntryPoint => "entry point",
            FileRole::Utility => "utility",
            FileRole::DataModel => "data model",
            FileRole::Library => "library",
            FileRole::Script => "script",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A beginner-facing explanation of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub filename: String,
    /// Display name of the language.
    pub language: String,
    pub role: FileRole,
    pub purpose: String,
    pub rationale: String,
    pub mechanism_steps: Vec<String>,
    pub input_sources: Vec<String>,
    pub output_destinations: Vec<String>,
    pub connections: Vec<String>,
    pub key_facts: Vec<String>,
    pub beginner_tip: String,
}

/// Build the explanation for one file.
pub fn synthesize(
    structure: &FileStructure,
    metrics: &Metrics,
    language: Language,
    filename: &str,
) -> Explanation {
    let role = classify(structure, metrics, language, filename);
    let display = language.display_name();
    tracing::debug!(filename, role = %role, "synthesizing explanation");

    Explanation {
        filename: filename.to_string(),
        language: display.to_string(),
        role,
        purpose: tables::fill(tables::purpose(role), display, filename),
        rationale: tables::fill(tables::rationale(role), display, filename),
        mechanism_steps: mechanism_steps(structure, role),
        input_sources: cues(structure, Direction::Input, tables::input_fallback(role)),
        output_destinations: cues(structure, Direction::Output, tables::output_fallback(role)),
        connections: connections(structure),
        key_facts: key_facts(structure, metrics, language),
        beginner_tip: beginner_tip(role, filename, structure.declarations.len()).to_string(),
    }
}

/// Classify a file's role. Checks run in fixed priority order.
pub fn classify(
    structure: &FileStructure,
    metrics: &Metrics,
    language: Language,
    filename: &str,
) -> FileRole {
    if language == Language::Unknown || metrics.lines.code == 0 {
        return FileRole::GenericFile;
    }
    if is_test(structure, filename) {
        return FileRole::Test;
    }
    if language.is_data() || has_word(filename, tables::CONFIG_WORDS) {
        return FileRole::Configuration;
    }
    if is_entry_point(structure, filename) {
        return FileRole::EntryPoint;
    }
    if has_word(filename, tables::UTILITY_WORDS) {
        return FileRole::Utility;
    }

    let types = structure.count_kind(DeclarationKind::Class) + structure.count_kind(DeclarationKind::Type);
    let functions = structure.count_kind(DeclarationKind::Function);
    if types > 0 && types >= functions {
        FileRole::DataModel
    } else if functions > 0 {
        FileRole::Library
    } else {
        FileRole::Script
    }
}

/// Part of the filename before the first dot.
fn stem(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

fn has_word(filename: &str, words: &[&str]) -> bool {
    filename
        .to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| words.contains(&w))
}

fn is_test(structure: &FileStructure, filename: &str) -> bool {
    let stem = stem(filename);
    let by_name = stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("Test")
        || stem.ends_with("Tests")
        || filename.contains(".test.")
        || filename.contains(".spec.");

    by_name
        || structure
            .imports
            .iter()
            .any(|import| tables::TEST_FRAMEWORKS.iter().any(|fw| import_matches(&import.target, fw)))
}

fn is_entry_point(structure: &FileStructure, filename: &str) -> bool {
    if tables::ENTRY_STEMS.contains(&stem(filename)) || structure.has_function("main") {
        return true;
    }
    // `if __name__ == "__main__":`
    structure.tokens.iter().any(|t| {
        t.class == TokenClass::Operand && t.text.trim_matches(|c| c == '"' || c == '\'') == "__main__"
    })
}

/// Target equals `pattern` or starts with it followed by a path separator.
fn import_matches(target: &str, pattern: &str) -> bool {
    match target.strip_prefix(pattern) {
        Some("") => true,
        Some(rest) => rest.starts_with(['.', '/', ':']),
        None => false,
    }
}

/// Callee equals `pattern` or ends with it after a separator.
fn call_matches(callee: &str, pattern: &str) -> bool {
    match callee.strip_suffix(pattern) {
        Some("") => true,
        Some(rest) => rest.ends_with(['.', ':', '>']),
        None => false,
    }
}

fn mechanism_steps(structure: &FileStructure, role: FileRole) -> Vec<String> {
    let top: Vec<&Declaration> = structure.top_level().collect();

    let phrases: Vec<String> = if top.is_empty() {
        tables::fallback_steps(role).iter().map(|s| s.to_string()).collect()
    } else if top.len() > tables::MAX_STEPS {
        summary_steps(&top)
    } else {
        top.iter().map(|decl| describe(decl, structure)).collect()
    };

    phrases
        .into_iter()
        .enumerate()
        .map(|(i, phrase)| format!("Step {}: {}", i + 1, phrase))
        .collect()
}

fn describe(decl: &Declaration, structure: &FileStructure) -> String {
    let mut phrase = match decl.kind {
        DeclarationKind::Function => {
            format!("Sets up a function called \"{}\" that {}.", decl.name, inputs(&decl.parameters))
        }
        DeclarationKind::Method => match &decl.scope {
            Some(scope) => format!(
                "Adds an action called \"{}\" to {} that {}.",
                decl.name,
                scope,
                inputs(&decl.parameters)
            ),
            None => format!("Adds an action called \"{}\" that {}.", decl.name, inputs(&decl.parameters)),
        },
        DeclarationKind::Class => {
            let qualified = decl.qualified_name();
            let members = structure
                .declarations
                .iter()
                .filter(|d| d.scope.as_deref() == Some(qualified.as_str()) && d.kind.is_callable())
                .count();
            match members {
                0 => format!("Describes a blueprint called \"{}\" for creating objects.", decl.name),
                1 => format!("Describes a blueprint called \"{}\" with 1 action.", decl.name),
                n => format!("Describes a blueprint called \"{}\" with {} actions.", decl.name, n),
            }
        }
        DeclarationKind::Type => format!("Defines a data shape called \"{}\".", decl.name),
        DeclarationKind::Constant => {
            format!("Fixes a value called \"{}\" that never changes.", decl.name)
        }
    };

    if let Some(note) = decl.leading_comment.as_deref().and_then(excerpt) {
        phrase.push_str(&format!(" The author notes: \"{}\"", note));
    }
    phrase
}

fn inputs(parameters: &[String]) -> String {
    match parameters {
        [] => "needs no input".to_string(),
        [one] => format!("takes one input, {}", one),
        [init @ .., last] => format!(
            "takes {} inputs: {} and {}",
            parameters.len(),
            init.join(", "),
            last
        ),
    }
}

/// First line of a comment, cut at a word boundary.
fn excerpt(comment: &str) -> Option<String> {
    let line = comment.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.chars().count() <= tables::MAX_NOTE_LEN {
        return Some(line.to_string());
    }
    let cut: String = line.chars().take(tables::MAX_NOTE_LEN).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    Some(format!("{}...", cut.trim_end()))
}

fn summary_steps(top: &[&Declaration]) -> Vec<String> {
    const ORDER: [DeclarationKind; 5] = [
        DeclarationKind::Class,
        DeclarationKind::Type,
        DeclarationKind::Function,
        DeclarationKind::Method,
        DeclarationKind::Constant,
    ];

    ORDER
        .iter()
        .filter_map(|&kind| {
            let names: Vec<&str> = top
                .iter()
                .filter(|d| d.kind == kind)
                .map(|d| d.name.as_str())
                .collect();
            if names.is_empty() {
                return None;
            }
            let quoted: Vec<String> = names
                .iter()
                .take(tables::MAX_SUMMARY_NAMES)
                .map(|n| format!("\"{}\"", n))
                .collect();
            let noun = if names.len() == 1 {
                tables::kind_singular(kind)
            } else {
                tables::kind_plural(kind)
            };
            let more = if names.len() > tables::MAX_SUMMARY_NAMES {
                " and more"
            } else {
                ""
            };
            Some(format!(
                "Defines {} {}, including {}{}.",
                names.len(),
                noun,
                quoted.join(", "),
                more
            ))
        })
        .collect()
}

fn cues(structure: &FileStructure, direction: Direction, fallback: &str) -> Vec<String> {
    let found: Vec<String> = tables::CUES
        .iter()
        .filter(|cue| cue.direction == direction && cue_present(cue, structure))
        .map(|cue| cue.description.to_string())
        .collect();

    if found.is_empty() {
        vec![fallback.to_string()]
    } else {
        found
    }
}

fn cue_present(cue: &Cue, structure: &FileStructure) -> bool {
    structure
        .call_sites
        .iter()
        .any(|call| cue.calls.iter().any(|p| call_matches(&call.callee, p)))
        || structure
            .imports
            .iter()
            .any(|import| cue.imports.iter().any(|p| import_matches(&import.target, p)))
}

/// Import targets, deduplicated in first-seen order.
fn connections(structure: &FileStructure) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let targets: Vec<String> = structure
        .imports
        .iter()
        .filter(|import| seen.insert(import.target.as_str()))
        .map(|import| import.target.clone())
        .collect();

    if targets.is_empty() {
        vec![tables::NO_CONNECTIONS.to_string()]
    } else {
        targets
    }
}

fn key_facts(structure: &FileStructure, metrics: &Metrics, language: Language) -> Vec<String> {
    let mut facts = Vec::new();

    facts.push(declaration_fact(structure));
    facts.push(tables::language_fact(language).to_string());
    facts.push(format!(
        "Overall it is {} to follow, with a complexity score of {}.",
        metrics.complexity_tag(),
        metrics.aggregate_complexity
    ));

    let lines = &metrics.lines;
    facts.push(format!(
        "It has {} lines: {} of code, {} of comments and {} blank.",
        lines.total, lines.code, lines.comment, lines.blank
    ));

    let mi = metrics.maintainability_index;
    let ease = if mi >= metrics::maintainability::EASY_MIN {
        "easy"
    } else if mi >= metrics::maintainability::FAIR_MIN {
        "fairly easy"
    } else {
        "hard"
    };
    facts.push(format!(
        "Its maintainability score is {:.0} out of 100, so it should be {} to change.",
        mi, ease
    ));

    if let Some(busiest) = metrics.busiest() {
        facts.push(format!(
            "The busiest part is \"{}\", with {} paths through it.",
            busiest.name, busiest.complexity
        ));
    }

    if metrics.max_nesting_depth > 0 {
        let levels = if metrics.max_nesting_depth == 1 { "level" } else { "levels" };
        facts.push(format!(
            "Its logic nests up to {} {} deep, for a cognitive complexity of {}.",
            metrics.max_nesting_depth, levels, metrics.cognitive_complexity
        ));
    }

    if structure.is_partial() {
        let ranges: Vec<String> = structure
            .unparsed
            .iter()
            .map(|r| {
                if r.start_line == r.end_line {
                    format!("line {}", r.start_line)
                } else {
                    format!("lines {} to {}", r.start_line, r.end_line)
                }
            })
            .collect();
        facts.push(format!(
            "Some parts could not be read ({}), so this explanation may miss a few details.",
            ranges.join(", ")
        ));
    }

    facts
}

fn declaration_fact(structure: &FileStructure) -> String {
    let total = structure.declarations.len();
    if total == 0 {
        return "It declares no named parts such as functions or classes.".to_string();
    }

    let parts: Vec<String> = [
        DeclarationKind::Function,
        DeclarationKind::Method,
        DeclarationKind::Class,
        DeclarationKind::Type,
        DeclarationKind::Constant,
    ]
    .iter()
    .filter_map(|&kind| match structure.count_kind(kind) {
        0 => None,
        1 => Some(format!("1 {}", tables::kind_singular(kind))),
        n => Some(format!("{} {}", n, tables::kind_plural(kind))),
    })
    .collect();

    let noun = if total == 1 { "part" } else { "parts" };
    format!("It declares {} named {}: {}.", total, noun, parts.join(", "))
}

/// Pick a tip from the role's pool by filename bytes and declaration count.
fn beginner_tip(role: FileRole, filename: &str, declarations: usize) -> &'static str {
    let pool = tables::tips(role);
    let seed = filename.bytes().map(usize::from).sum::<usize>() + declarations;
    pool[seed % pool.len()]
}
