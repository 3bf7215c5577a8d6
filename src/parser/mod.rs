//! Language-aware structure extraction.
//!
//! This module provides:
//! - `parse`: source text + language -> [`FileStructure`], never failing
//! - `Grammar`: the closed set of grammars and their capability flags
//! - Tree-sitter extraction driven by per-language tables
//! - A degraded line-heuristic path for everything else

pub mod degraded;
pub mod grammar;
pub mod lexer;
pub mod structure;

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub mod languages;

use crate::language::Language;

pub use grammar::{Capabilities, Grammar};
pub use structure::{
    CallSite, Comment, DecisionKind, DecisionPoint, Declaration, DeclarationKind, FileStructure,
    ImportEdge, ParseMode, Span, Token, TokenClass, UnparsedRange,
};

/// Parse `content` as `language`.
///
/// Languages with a grammar get full extraction; malformed regions become
/// [`UnparsedRange`]s. Everything else, and any grammar that fails to load,
/// takes the degraded path.
pub fn parse(content: &str, language: Language) -> FileStructure {
    match Grammar::for_language(language) {
        Grammar::Generic => degraded::parse(content, language),
        grammar => parse_with_grammar(content, language, grammar),
    }
}

#[cfg(feature = "tree-sitter")]
fn parse_with_grammar(content: &str, language: Language, grammar: Grammar) -> FileStructure {
    let Some(config) = grammar.config() else {
        return degraded::parse(content, language);
    };
    match treesitter::parse(content, language, config, grammar.ts_languages()) {
        Ok(structure) => {
            if structure.is_partial() {
                tracing::debug!(
                    language = %language,
                    ranges = structure.unparsed.len(),
                    "partial parse"
                );
            }
            structure
        }
        Err(e) => {
            tracing::warn!(language = %language, error = %e, "grammar unavailable, using line heuristics");
            degraded::parse(content, language)
        }
    }
}

#[cfg(not(feature = "tree-sitter"))]
fn parse_with_grammar(content: &str, language: Language, _grammar: Grammar) -> FileStructure {
    degraded::parse(content, language)
}
