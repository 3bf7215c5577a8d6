//! Python grammar tables.

use crate::parser::grammar::{Container, ConstantRule, Grammar, GrammarConfig, NameRule};
use crate::parser::structure::DeclarationKind;

/// Decision points for cyclomatic complexity.
///
/// `elif` counts as its own branch; `else` does not.
const DECISION_QUERY: &str = r#"
(if_statement) @branch
(elif_clause) @branch
(conditional_expression) @branch
(case_clause) @branch
(for_statement) @loop
(while_statement) @loop
(boolean_operator operator: "and") @logical
(boolean_operator operator: "or") @logical
(except_clause) @handler
"#;

/// `import a.b`, `import a as b`, `from a import b`, `from . import b`.
const IMPORT_QUERY: &str = r#"
(import_statement name: (dotted_name) @path) @import
(import_statement name: (aliased_import name: (dotted_name) @path)) @import
(import_from_statement module_name: (dotted_name) @path) @import
(import_from_statement module_name: (relative_import) @path) @import
"#;

const CALL_QUERY: &str = r#"
(call) @call
"#;

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Python,
    functions: &["function_definition"],
    containers: &[Container {
        kind: "class_definition",
        declares: DeclarationKind::Class,
        requires_body: false,
    }],
    scopes: &[],
    constants: &[ConstantRule {
        kind: "expression_statement",
        names: NameRule::ScreamingAssignment,
    }],
    variable_declarations: &[],
    wrappers: &["decorated_definition"],
    comment_kinds: &["comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: true,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_python::LANGUAGE.into()]
}
