//! Rust grammar tables.

use crate::parser::grammar::{Container, ConstantRule, Grammar, GrammarConfig, NameRule, ScopeRule};
use crate::parser::structure::DeclarationKind;

/// Each `match` arm counts as a branch.
const DECISION_QUERY: &str = r#"
(if_expression) @branch
(match_arm) @branch
(for_expression) @loop
(while_expression) @loop
(loop_expression) @loop
(binary_expression operator: "&&") @logical
(binary_expression operator: "||") @logical
"#;

const IMPORT_QUERY: &str = r#"
(use_declaration argument: (_) @path) @import
"#;

const CALL_QUERY: &str = r#"
(call_expression) @call
(macro_invocation) @call
"#;

const fn type_container(kind: &'static str) -> Container {
    Container {
        kind,
        declares: DeclarationKind::Type,
        requires_body: false,
    }
}

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Rust,
    functions: &["function_item", "function_signature_item"],
    containers: &[
        type_container("struct_item"),
        type_container("enum_item"),
        type_container("union_item"),
        type_container("trait_item"),
        type_container("type_item"),
    ],
    scopes: &[
        ScopeRule {
            kind: "impl_item",
            name_field: "type",
            methods: true,
        },
        ScopeRule {
            kind: "mod_item",
            name_field: "name",
            methods: false,
        },
    ],
    constants: &[
        ConstantRule {
            kind: "const_item",
            names: NameRule::Field("name"),
        },
        ConstantRule {
            kind: "static_item",
            names: NameRule::Field("name"),
        },
    ],
    variable_declarations: &[],
    wrappers: &[],
    comment_kinds: &["line_comment", "block_comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_rust::LANGUAGE.into()]
}
