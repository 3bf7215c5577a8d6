//! Scala grammar tables.

use crate::parser::grammar::{Container, Grammar, GrammarConfig};
use crate::parser::structure::DeclarationKind;

/// `case` clauses cover both `match` arms and `catch` handlers.
const DECISION_QUERY: &str = r#"
(if_expression) @branch
(case_clause) @branch
(while_expression) @loop
(for_expression) @loop
"#;

/// Targets come from the statement text (`import a.b.{C, D}` -> `a.b`).
const IMPORT_QUERY: &str = r#"
(import_declaration) @import
"#;

const CALL_QUERY: &str = r#"
(call_expression) @call
"#;

const fn container(kind: &'static str, declares: DeclarationKind) -> Container {
    Container {
        kind,
        declares,
        requires_body: false,
    }
}

pub static CONFIG: GrammarConfig = GrammarConfig {
    grammar: Grammar::Scala,
    functions: &["function_definition", "function_declaration"],
    containers: &[
        container("class_definition", DeclarationKind::Class),
        container("object_definition", DeclarationKind::Class),
        container("trait_definition", DeclarationKind::Type),
        container("enum_definition", DeclarationKind::Type),
    ],
    scopes: &[],
    constants: &[],
    variable_declarations: &[],
    wrappers: &[],
    comment_kinds: &["comment", "block_comment"],
    decision_query: DECISION_QUERY,
    import_query: IMPORT_QUERY,
    call_query: CALL_QUERY,
    docstrings: false,
};

pub fn languages() -> Vec<tree_sitter::Language> {
    vec![tree_sitter_scala::LANGUAGE.into()]
}

#[cfg(test)]
mod tests {
    use crate::language::Language;
    use crate::parser::parse;
    use crate::parser::tests::assert_spans_well_formed;
    use crate::parser::structure::DeclarationKind;

    #[test]
    fn test_scala_declarations() {
        let source = r#"import scala.collection.mutable

trait Greeter {
  def greet(name: String): String
}

object Main extends Greeter {
  def greet(name: String): String = {
    if (name.isEmpty) "nobody" else s"hello $name"
  }

  def main(args: Array[String]): Unit = {
    println(greet("world"))
  }
}
"#;
        let structure = parse(source, Language::Scala);
        assert_spans_well_formed(source, &structure);
        let names: Vec<_> = structure
            .declarations
            .iter()
            .map(|d| (d.kind, d.qualified_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                (DeclarationKind::Type, "Greeter".to_string()),
                (DeclarationKind::Method, "Greeter.greet".to_string()),
                (DeclarationKind::Class, "Main".to_string()),
                (DeclarationKind::Method, "Main.greet".to_string()),
                (DeclarationKind::Method, "Main.main".to_string()),
            ]
        );
        assert_eq!(structure.imports[0].target, "scala.collection.mutable");
    }
}
