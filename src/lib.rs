//! codenarrate - plain-language explanations of source code.
//!
//! codenarrate reads a source tree and, for every file, works out what the
//! file is for and how it works, then writes a short explanation aimed at
//! beginners together with a narration script for text-to-speech.
//!
//! # Architecture
//!
//! The per-file pipeline is pure and runs in parallel:
//!
//! - `language`: detect a file's language from its path and content
//! - `parser`: tree-sitter extraction of declarations, imports and comments,
//!   with a line-based fallback for languages without a grammar
//! - `metrics`: complexity, Halstead and maintainability figures
//! - `explain`: rule tables that turn structure and metrics into an explanation
//! - `narrate`: speech-friendly rendering of an explanation
//! - `pipeline`: ties the stages together for one file or a batch
//!
//! Around it sit the collaborators:
//!
//! - `ingest`: directory walking and file reading
//! - `config`: YAML configuration schema and discovery
//! - `report`: explanation files, project summary, JSON output
//! - `cli`: the `codenarrate` command
//!
//! # Adding a New Language
//!
//! Add a row to the language table in `src/language.rs`. For full parsing,
//! add a grammar table under `src/parser/languages/` and map it in
//! `Grammar::for_language`.

pub mod cli;
pub mod config;
pub mod explain;
pub mod ingest;
pub mod language;
pub mod metrics;
pub mod narrate;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use explain::{Explanation, FileRole};
pub use language::{Language, LanguageTag};
pub use metrics::{ComplexityTag, Metrics};
pub use narrate::Narration;
pub use parser::FileStructure;
pub use pipeline::{analyze_batch, explain_source, FileReport, PipelineConfig};
