//! JavaScript grammar tables.

use crate::parser::grammar::{Container, Grammar, GrammarConfig};
use crate::parser::structure::DeclarationKind;

/// Decision points shared with TypeScript.
pub(super) const DECISION_QUERY: &str = r#"
(if_statement) @branch
(ternary_expression) @branch
(switch_case) @branch
(for_statement) @loop
(for_in_statement) @loop
(while_statement) @loop
(do_statement) @loop
(binary_expression operator: "&&") @logical
(binary_expression operator: "||") @logical
(binary_expression operator: "??") @logical
(catch_clause) @handler
"#;

/// ES imports, re-exports and CommonJS `require`.
pub(super) const IMPORT_QUERY: &str = r#"
(import_statement source: (string) @path) @import
(export_statement source: (string) @path) @import
(call_expression
  function: (identifier) @require_func (#eq? @require_func "require")
  arguments: (arguments (string) @path)
) @import
"#;

pub(super) const CALL_QUERY: &str = r#"
(call_expression) @call
"#;

pub(super) const FUNCTIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
];

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::JavaScript,
    functions: FUNCTIONS,
    containers: &[Container {
        kind: "class_declaration",
        declares: DeclarationKind::Class,
        requires_body: false,
    }],
    scopes: &[],
    constants: &[],
    variable_declarations: &["lexical_declaration", "variable_declaration"],
    wrappers: &["export_statement"],
    comment_kinds: &["comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_javascript::LANGUAGE.into()]
}

#[cfg(test)]
mod tests {
    use crate::language::Language;
    use crate::parser::parse;
    use crate::parser::tests::assert_spans_well_formed;
    use crate::parser::structure::DeclarationKind;

    #[test]
    fn test_javascript_declarations() {
        let source = r#"
const express = require('express');
const MAX_ITEMS = 50;

/** Greets someone. */
export function greet(name) {
  return `Hello ${name}`;
}

const add = (a, b) => a + b;

class Cart {
  constructor() {
    this.items = [];
  }

  total() {
    return this.items.length;
  }
}
"#;
        let structure = parse(source, Language::JavaScript);
        assert_spans_well_formed(source, &structure);
        let names: Vec<_> = structure
            .declarations
            .iter()
            .map(|d| (d.kind, d.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                (DeclarationKind::Constant, "MAX_ITEMS"),
                (DeclarationKind::Function, "greet"),
                (DeclarationKind::Function, "add"),
                (DeclarationKind::Class, "Cart"),
                (DeclarationKind::Method, "constructor"),
                (DeclarationKind::Method, "total"),
            ]
        );

        let greet = &structure.declarations[1];
        assert_eq!(greet.leading_comment.as_deref(), Some("Greets someone."));
        assert_eq!(greet.parameters, vec!["name"]);
        assert_eq!(structure.declarations[2].parameters, vec!["a", "b"]);
        assert_eq!(structure.declarations[4].scope.as_deref(), Some("Cart"));

        assert_eq!(structure.imports.len(), 1);
        assert_eq!(structure.imports[0].target, "express");
    }

    #[test]
    fn test_javascript_callbacks_are_opaque() {
        let source = "describe('cart', () => {\n  function helper() {}\n  it('works', () => helper());\n});\n";
        let structure = parse(source, Language::JavaScript);
        assert!(structure.declarations.is_empty());
        assert!(structure.call_sites.iter().any(|c| c.callee == "describe"));
    }

    #[test]
    fn test_javascript_es_imports() {
        let source = "import React from 'react';\nimport { a } from \"./util\";\nexport * from './types';\n";
        let structure = parse(source, Language::JavaScript);
        let targets: Vec<_> = structure.imports.iter().map(|i| i.target.as_str()).collect();
        assert_eq!(targets, vec!["react", "./util", "./types"]);
    }
}
