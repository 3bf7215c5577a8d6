//! TypeScript and TSX grammar tables.
//!
//! Queries are shared with JavaScript; the TypeScript grammar adds
//! interfaces, type aliases, enums and namespaces.

use crate::parser::grammar::{Container, Grammar, GrammarConfig, ScopeRule};
use crate::parser::structure::DeclarationKind;

use super::javascript::{CALL_QUERY, DECISION_QUERY, FUNCTIONS, IMPORT_QUERY};

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::TypeScript,
    functions: FUNCTIONS,
    containers: &[
        Container {
            kind: "class_declaration",
            declares: DeclarationKind::Class,
            requires_body: false,
        },
        Container {
            kind: "abstract_class_declaration",
            declares: DeclarationKind::Class,
            requires_body: false,
        },
        Container {
            kind: "interface_declaration",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
        Container {
            kind: "type_alias_declaration",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
        Container {
            kind: "enum_declaration",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
    ],
    scopes: &[ScopeRule {
        kind: "internal_module",
        name_field: "name",
        methods: false,
    }],
    constants: &[],
    variable_declarations: &["lexical_declaration", "variable_declaration"],
    wrappers: &["export_statement"],
    comment_kinds: &["comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

/// Plain TypeScript first, TSX second.
pub fn languages() -> Vec<tree_sitter::Language> {
    vec![
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        tree_sitter_typescript::LANGUAGE_TSX.into(),
    ]
}
