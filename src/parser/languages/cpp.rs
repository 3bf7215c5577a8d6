//! C++ grammar tables, extending the C tables.

use crate::parser::grammar::{Container, Grammar, GrammarConfig, ScopeRule};
use crate::parser::structure::DeclarationKind;

use super::c::{tagged, CALL_QUERY, DEFINES, IMPORT_QUERY, TYPEDEF};

const DECISION_QUERY: &str = r#"
(if_statement) @branch
(case_statement) @branch
(conditional_expression) @branch
(for_statement) @loop
(for_range_loop) @loop
(while_statement) @loop
(do_statement) @loop
(binary_expression operator: "&&") @logical
(binary_expression operator: "||") @logical
(catch_clause) @handler
"#;

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Cpp,
    functions: &["function_definition"],
    containers: &[
        Container {
            kind: "class_specifier",
            declares: DeclarationKind::Class,
            requires_body: true,
        },
        tagged("struct_specifier"),
        tagged("union_specifier"),
        tagged("enum_specifier"),
        TYPEDEF,
        Container {
            kind: "alias_declaration",
            declares: DeclarationKind::Type,
            requires_body: false,
        },
    ],
    scopes: &[ScopeRule {
        kind: "namespace_definition",
        name_field: "name",
        methods: false,
    }],
    constants: DEFINES,
    variable_declarations: &[],
    wrappers: &["template_declaration"],
    comment_kinds: &["comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_cpp::LANGUAGE.into()]
}

#[cfg(test)]
mod tests {
    use crate::language::Language;
    use crate::parser::parse;
    use crate::parser::tests::assert_spans_well_formed;
    use crate::parser::structure::DeclarationKind;

    #[test]
    fn test_cpp_declarations() {
        let source = r#"#include <vector>

namespace geo {

class Polygon {
public:
    double area() const {
        return 0.0;
    }
    void add(double x, double y);
};

void Polygon::add(double x, double y) {
    for (auto p : points) {
        if (p > x) {
            return;
        }
    }
}

}
"#;
        let structure = parse(source, Language::Cpp);
        assert_spans_well_formed(source, &structure);
        let names: Vec<_> = structure
            .declarations
            .iter()
            .map(|d| (d.kind, d.qualified_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                (DeclarationKind::Class, "geo.Polygon".to_string()),
                (DeclarationKind::Method, "geo.Polygon.area".to_string()),
                (DeclarationKind::Method, "geo.Polygon.add".to_string()),
            ]
        );
        assert_eq!(structure.imports[0].target, "vector");
        assert_eq!(structure.decision_points.len(), 2);
    }
}
