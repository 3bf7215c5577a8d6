//! Go grammar tables.

use crate::parser::grammar::{Container, ConstantRule, Grammar, GrammarConfig, NameRule};
use crate::parser::structure::DeclarationKind;

/// Go has no exceptions; `switch`/`select` arms count as branches.
const DECISION_QUERY: &str = r#"
(if_statement) @branch
(expression_case) @branch
(type_case) @branch
(communication_case) @branch
(for_statement) @loop
(binary_expression operator: "&&") @logical
(binary_expression operator: "||") @logical
"#;

/// Matches single imports and each spec of a grouped import.
const IMPORT_QUERY: &str = r#"
(import_spec path: (interpreted_string_literal) @path) @import
"#;

const CALL_QUERY: &str = r#"
(call_expression) @call
"#;

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Go,
    functions: &["function_declaration", "method_declaration"],
    containers: &[
        Container {
            kind: "type_spec",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
        Container {
            kind: "type_alias",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
    ],
    scopes: &[],
    constants: &[ConstantRule {
        kind: "const_spec",
        names: NameRule::FieldAll("name"),
    }],
    variable_declarations: &[],
    wrappers: &[],
    comment_kinds: &["comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_go::LANGUAGE.into()]
}
