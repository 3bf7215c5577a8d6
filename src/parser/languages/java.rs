//! Java grammar tables.

use crate::parser::grammar::{Container, Grammar, GrammarConfig};
use crate::parser::structure::DeclarationKind;

const DECISION_QUERY: &str = r#"
(if_statement) @branch
(ternary_expression) @branch
(switch_block_statement_group) @branch
(for_statement) @loop
(enhanced_for_statement) @loop
(while_statement) @loop
(do_statement) @loop
(binary_expression operator: "&&") @logical
(binary_expression operator: "||") @logical
(catch_clause) @handler
"#;

/// `import a.b.C;`, `import static a.b.C.m;`, `import a.b.*;`.
const IMPORT_QUERY: &str = r#"
(import_declaration (scoped_identifier) @path) @import
(import_declaration (identifier) @path) @import
"#;

const CALL_QUERY: &str = r#"
(method_invocation) @call
"#;

const fn container(kind: &'static str, declares: DeclarationKind) -> Container {
    Container {
        kind,
        declares,
        requires_body: false,
    }
}

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Java,
    functions: &["method_declaration", "constructor_declaration"],
    containers: &[
        container("class_declaration", DeclarationKind::Class),
        container("record_declaration", DeclarationKind::Class),
        container("interface_declaration", DeclarationKind::Type),
        container("enum_declaration", DeclarationKind::Type),
        container("annotation_type_declaration", DeclarationKind::Type),
    ],
    scopes: &[],
    constants: &[],
    variable_declarations: &[],
    wrappers: &[],
    comment_kinds: &["line_comment", "block_comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_java::LANGUAGE.into()]
}

#[cfg(test)]
mod tests {
    use crate::language::Language;
    use crate::parser::parse;
    use crate::parser::tests::assert_spans_well_formed;
    use crate::parser::structure::DeclarationKind;

    #[test]
    fn test_java_declarations() {
        let source = r#"
package com.example;

import java.util.List;
import java.util.*;

/**
 * Keeps a running total.
 */
public class Counter {
    private int total;

    public Counter(int start) {
        this.total = start;
    }

    public int add(int amount) {
        if (amount > 0 && total < 100) {
            total += amount;
        }
        System.out.println(total);
        return total;
    }

    interface Listener {
        void changed(int value);
    }
}
"#;
        let structure = parse(source, Language::Java);
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
                (DeclarationKind::Method, "Counter.Counter".to_string()),
                (DeclarationKind::Method, "Counter.add".to_string()),
                (DeclarationKind::Type, "Counter.Listener".to_string()),
                (DeclarationKind::Method, "Counter.Listener.changed".to_string()),
            ]
        );
        assert_eq!(
            structure.declarations[0].leading_comment.as_deref(),
            Some("Keeps a running total.")
        );
        assert_eq!(structure.declarations[2].parameters, vec!["int amount"]);

        let targets: Vec<_> = structure.imports.iter().map(|i| i.target.as_str()).collect();
        assert_eq!(targets, vec!["java.util.List", "java.util"]);
        assert_eq!(structure.decision_points.len(), 2);
        assert!(structure
            .call_sites
            .iter()
            .any(|c| c.callee == "System.out.println"));
    }
}
