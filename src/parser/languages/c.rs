//! C grammar tables.

use crate::parser::grammar::{Container, ConstantRule, Grammar, GrammarConfig, NameRule};
use crate::parser::structure::DeclarationKind;

/// Decision points shared with C++ (which adds range loops and `catch`).
pub(super) const DECISION_QUERY: &str = r#"
(if_statement) @branch
(case_statement) @branch
(conditional_expression) @branch
(for_statement) @loop
(while_statement) @loop
(do_statement) @loop
(binary_expression operator: "&&") @logical
(binary_expression operator: "||") @logical
"#;

/// `#include <a.h>` and `#include "b.h"`.
pub(super) const IMPORT_QUERY: &str = r#"
(preproc_include path: (_) @path) @import
"#;

pub(super) const CALL_QUERY: &str = r#"
(call_expression) @call
"#;

pub(super) const DEFINES: &[ConstantRule] = &[ConstantRule {
    kind: "preproc_def",
    names: NameRule::Field("name"),
}];

/// Tagged types only count when they carry a body; `struct foo;` and
/// `struct foo *p` are references.
pub(super) const fn tagged(kind: &'static str) -> Container {
    Container {
        kind,
        declares: DeclarationKind::Type,
        requires_body: true,
    }
}

pub(super) const TYPEDEF: Container = Container {
    kind: "type_definition",
    declares: DeclarationKind::Type,
    requires_body: false,
};

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::C,
    functions: &["function_definition"],
    containers: &[
        tagged("struct_specifier"),
        tagged("union_specifier"),
        tagged("enum_specifier"),
        TYPEDEF,
    ],
    scopes: &[],
    constants: DEFINES,
    variable_declarations: &[],
    wrappers: &[],
    comment_kinds: &["comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_c::LANGUAGE.into()]
}

#[cfg(test)]
mod tests {
    use crate::language::Language;
    use crate::parser::parse;
    use crate::parser::tests::assert_spans_well_formed;
    use crate::parser::structure::DeclarationKind;

    #[test]
    fn test_c_declarations() {
        let source = r#"#include <stdio.h>
#include "list.h"

#define BUFFER_SIZE 64

struct node {
    int value;
    struct node *next;
};

/* Sum every value in the list. */
static int *sum(struct node *head, int limit) {
    int total = 0;
    while (head && total < limit) {
        total += head->value;
        head = head->next;
    }
    printf("%d\n", total);
    return 0;
}
"#;
        let structure = parse(source, Language::C);
        assert_spans_well_formed(source, &structure);
        let names: Vec<_> = structure
            .declarations
            .iter()
            .map(|d| (d.kind, d.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                (DeclarationKind::Constant, "BUFFER_SIZE"),
                (DeclarationKind::Type, "node"),
                (DeclarationKind::Function, "sum"),
            ]
        );
        let sum = &structure.declarations[2];
        assert_eq!(sum.parameters, vec!["struct node *head", "int limit"]);
        assert_eq!(sum.leading_comment.as_deref(), Some("Sum every value in the list."));

        let targets: Vec<_> = structure.imports.iter().map(|i| i.target.as_str()).collect();
        assert_eq!(targets, vec!["stdio.h", "list.h"]);
        assert_eq!(structure.decision_points.len(), 2);
    }
}
