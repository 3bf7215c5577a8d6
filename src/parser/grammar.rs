//! The closed set of grammars and the tables that drive extraction.
//!
//! Each [`Grammar`] variant maps to one static [`GrammarConfig`] in
//! `parser::languages`. [`Grammar::Generic`] is the degraded path taken by
//! every language without a grammar.

use crate::language::Language;

use super::structure::DeclarationKind;

/// A tree-sitter grammar, or the generic line-heuristic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Scala,
    Swift,
    C,
    Cpp,
    Go,
    Rust,
    Generic,
}

/// What a grammar can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub declarations: bool,
    pub imports: bool,
    pub comments: bool,
}

impl Grammar {
    /// Pick the grammar for a language. Builds without the `tree-sitter`
    /// feature always get [`Grammar::Generic`].
    pub fn for_language(language: Language) -> Grammar {
        if !cfg!(feature = "tree-sitter") {
            return Grammar::Generic;
        }
        match language {
            Language::Python => Grammar::Python,
            Language::JavaScript => Grammar::JavaScript,
            Language::TypeScript => Grammar::TypeScript,
            Language::Java => Grammar::Java,
            Language::Scala => Grammar::Scala,
            Language::Swift => Grammar::Swift,
            Language::C => Grammar::C,
            Language::Cpp => Grammar::Cpp,
            Language::Go => Grammar::Go,
            Language::Rust => Grammar::Rust,
            Language::Kotlin
            | Language::Ruby
            | Language::Php
            | Language::Shell
            | Language::Json
            | Language::Yaml
            | Language::Unknown => Grammar::Generic,
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            Grammar::Generic => Capabilities {
                declarations: false,
                imports: false,
                comments: true,
            },
            _ => Capabilities {
                declarations: true,
                imports: true,
                comments: true,
            },
        }
    }

    /// Extraction tables, `None` for [`Grammar::Generic`].
    #[cfg(feature = "tree-sitter")]
    pub fn config(self) -> Option<&'static GrammarConfig> {
        use super::languages::*;
        Some(match self {
            Grammar::Python => &python::CONFIG,
            Grammar::JavaScript => &javascript::CONFIG,
            Grammar::TypeScript => &typescript::CONFIG,
            Grammar::Java => &java::CONFIG,
            Grammar::Scala => &scala::CONFIG,
            Grammar::Swift => &swift::CONFIG,
            Grammar::C => &c::CONFIG,
            Grammar::Cpp => &cpp::CONFIG,
            Grammar::Go => &go::CONFIG,
            Grammar::Rust => &rust_lang::CONFIG,
            Grammar::Generic => return None,
        })
    }

    /// Tree-sitter languages to try, in order. TypeScript tries plain
    /// TypeScript first and TSX second.
    #[cfg(feature = "tree-sitter")]
    pub fn ts_languages(self) -> Vec<tree_sitter::Language> {
        use super::languages::*;
        match self {
            Grammar::Python => python::languages(),
            Grammar::JavaScript => javascript::languages(),
            Grammar::TypeScript => typescript::languages(),
            Grammar::Java => java::languages(),
            Grammar::Scala => scala::languages(),
            Grammar::Swift => swift::languages(),
            Grammar::C => c::languages(),
            Grammar::Cpp => cpp::languages(),
            Grammar::Go => go::languages(),
            Grammar::Rust => rust_lang::languages(),
            Grammar::Generic => Vec::new(),
        }
    }
}

/// A node kind that declares something and may contain members.
#[derive(Debug)]
pub struct Container {
    pub kind: &'static str,
    pub declares: DeclarationKind,
    /// Skip forward declarations such as `struct foo;`.
    pub requires_body: bool,
}

/// A node kind that only qualifies the names inside it (`impl`, namespaces).
#[derive(Debug)]
pub struct ScopeRule {
    pub kind: &'static str,
    pub name_field: &'static str,
    /// Functions inside are methods (`impl`), not free functions (`mod`).
    pub methods: bool,
}

/// How a constant node names what it declares.
#[derive(Debug, Clone, Copy)]
pub enum NameRule {
    /// One name in the given field.
    Field(&'static str),
    /// Every child in the given field (`const a, b = 1, 2`).
    FieldAll(&'static str),
    /// `NAME = value` where NAME is upper snake case.
    ScreamingAssignment,
}

#[derive(Debug)]
pub struct ConstantRule {
    pub kind: &'static str,
    pub names: NameRule,
}

/// Extraction tables for one grammar.
#[derive(Debug)]
pub struct GrammarConfig {
    pub grammar: Grammar,
    /// Function-like node kinds; bodies are not searched for more declarations.
    pub functions: &'static [&'static str],
    pub containers: &'static [Container],
    pub scopes: &'static [ScopeRule],
    /// Top-level constant forms.
    pub constants: &'static [ConstantRule],
    /// `const f = () => {}` style declarations (JavaScript family).
    pub variable_declarations: &'static [&'static str],
    /// Nodes whose span belongs to the declaration they wrap
    /// (decorators, `export`, templates).
    pub wrappers: &'static [&'static str],
    pub comment_kinds: &'static [&'static str],
    /// Captures named `branch`, `loop`, `logical` or `handler`.
    pub decision_query: &'static str,
    /// Captures `import` (the statement) and optionally `path`.
    pub import_query: &'static str,
    /// Captures `call`.
    pub call_query: &'static str,
    /// Python-style docstrings as a fallback leading comment.
    pub docstrings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_capabilities() {
        let caps = Grammar::Generic.capabilities();
        assert!(!caps.declarations);
        assert!(!caps.imports);
        assert!(caps.comments);
    }

    #[test]
    fn test_languages_without_grammar() {
        for language in [Language::Ruby, Language::Json, Language::Unknown] {
            assert_eq!(Grammar::for_language(language), Grammar::Generic);
        }
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_every_grammar_has_a_config() {
        for language in Language::ALL {
            let grammar = Grammar::for_language(language);
            if grammar == Grammar::Generic {
                continue;
            }
            let config = grammar.config().expect("config");
            assert_eq!(config.grammar, grammar);
            assert!(!grammar.ts_languages().is_empty());
            assert!(!config.comment_kinds.is_empty());
        }
    }
}
