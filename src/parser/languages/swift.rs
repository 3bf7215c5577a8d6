//! Swift grammar tables.
//!
//! `class_declaration` covers classes, structs, enums and extensions in this
//! grammar, so they all surface as classes.

use crate::parser::grammar::{Container, Grammar, GrammarConfig};
use crate::parser::structure::DeclarationKind;

const DECISION_QUERY: &str = r#"
(if_statement) @branch
(guard_statement) @branch
(switch_entry) @branch
(for_statement) @loop
(while_statement) @loop
(repeat_while_statement) @loop
(catch_block) @handler
"#;

const IMPORT_QUERY: &str = r#"
(import_declaration (identifier) @path) @import
"#;

const CALL_QUERY: &str = r#"
(call_expression) @call
"#;

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Swift,
    functions: &[
        "function_declaration",
        "init_declaration",
        "protocol_function_declaration",
    ],
    containers: &[
        Container {
            kind: "class_declaration",
            declares: DeclarationKind::Class,
            requires_body: false,
        },
        Container {
            kind: "protocol_declaration",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
    ],
    scopes: &[],
    constants: &[],
    variable_declarations: &[],
    wrappers: &[],
    comment_kinds: &["comment", "multiline_comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_swift::LANGUAGE.into()]
}

#[cfg(test)]
mod tests {
    use crate::language::Language;
    use crate::parser::parse;
    use crate::parser::tests::assert_spans_well_formed;
    use crate::parser::structure::DeclarationKind;

    #[test]
    fn test_swift_declarations() {
        let source = r#"import Foundation

class Counter {
    var count = 0

    init(start: Int) {
        count = start
    }

    func increment(by amount: Int) {
        guard amount > 0 else { return }
        count += amount
    }
}

func report(_ counter: Counter) {
    print(counter.count)
}
"#;
        let structure = parse(source, Language::Swift);
        assert_spans_well_formed(source, &structure);
        let names: Vec<_> = structure
            .declarations
            .iter()
            .map(|d| (d.kind, d.qualified_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                (DeclarationKind::Class, "Counter".to_string()),
                (DeclarationKind::Method, "Counter.init".to_string()),
                (DeclarationKind::Method, "Counter.increment".to_string()),
                (DeclarationKind::Function, "report".to_string()),
            ]
        );
        assert_eq!(structure.imports[0].target, "Foundation");
        assert_eq!(structure.decision_points.len(), 1);
    }
}
