//! Structural facts extracted from one source file.

use std::fmt;

use serde::Serialize;

use crate::language::Language;

/// Source location span with byte offsets and 1-indexed, inclusive lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed, inclusive).
    pub end_line: usize,
}

impl Span {
    /// Create a span from a tree-sitter node. A node that ends at column 0
    /// of a later row is treated as ending on the previous line.
    #[cfg(feature = "tree-sitter")]
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        let end_line = if end.column == 0 && end.row > start.row {
            end.row
        } else {
            end.row + 1
        };
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            end_line,
        }
    }

    /// Number of lines covered.
    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }

    /// Whether `line` falls inside the span.
    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_line == self.end_line {
            write!(f, "line {}", self.start_line)
        } else {
            write!(f, "lines {}-{}", self.start_line, self.end_line)
        }
    }
}

/// Kind of declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Method,
    Class,
    Type,
    Constant,
}

impl DeclarationKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Class => "class",
            DeclarationKind::Type => "type",
            DeclarationKind::Constant => "constant",
        }
    }

    /// Check if this is a callable (function or method).
    pub fn is_callable(&self) -> bool {
        matches!(self, DeclarationKind::Function | DeclarationKind::Method)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declaration extracted from source code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Qualifying prefix from the smallest enclosing named scope,
    /// e.g. `Config` for a method of `Config`.
    pub scope: Option<String>,
    pub parameters: Vec<String>,
    /// Own span: stops before the first nested declaration.
    pub span: Span,
    /// Number of enclosing extracted declarations (0 = top level).
    pub depth: usize,
    pub leading_comment: Option<String>,
}

impl Declaration {
    /// Get the fully qualified name (`scope.name`).
    pub fn qualified_name(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}.{}", scope, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

/// One import/include/use statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    /// Normalized module or path, e.g. `os.path` or `./util`.
    pub target: String,
    /// Statement text as written.
    pub raw: String,
    pub line: usize,
}

/// A comment, with delimiters stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
    pub line: usize,
    pub end_line: usize,
}

/// A call expression, reduced to its callee text (`os.path.join`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub callee: String,
    pub line: usize,
}

/// Category of a cyclomatic decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Branch,
    Loop,
    Logical,
    Handler,
}

impl DecisionKind {
    /// Map a query capture name to a kind.
    pub fn from_capture(name: &str) -> Option<Self> {
        match name {
            "branch" => Some(DecisionKind::Branch),
            "loop" => Some(DecisionKind::Loop),
            "logical" => Some(DecisionKind::Logical),
            "handler" => Some(DecisionKind::Handler),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionPoint {
    pub kind: DecisionKind,
    pub line: usize,
    /// Enclosing branches, loops and handlers. Logical operators never
    /// open a level.
    pub nesting: usize,
}

/// Halstead class of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Operator,
    Operand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub class: TokenClass,
    pub line: usize,
}

/// A region the grammar could not parse (ERROR or MISSING node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnparsedRange {
    pub start_line: usize,
    pub end_line: usize,
}

/// How the structure was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Full concrete-syntax-tree extraction.
    Grammar,
    /// Line heuristics only: comments, no declarations or imports.
    Degraded,
}

/// Everything the parser knows about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileStructure {
    pub language: Language,
    pub mode: ParseMode,
    pub declarations: Vec<Declaration>,
    pub imports: Vec<ImportEdge>,
    pub comments: Vec<Comment>,
    pub call_sites: Vec<CallSite>,
    pub decision_points: Vec<DecisionPoint>,
    #[serde(skip)]
    pub tokens: Vec<Token>,
    pub unparsed: Vec<UnparsedRange>,
}

impl FileStructure {
    /// Create an empty structure.
    pub fn empty(language: Language, mode: ParseMode) -> Self {
        Self {
            language,
            mode,
            declarations: Vec::new(),
            imports: Vec::new(),
            comments: Vec::new(),
            call_sites: Vec::new(),
            decision_points: Vec::new(),
            tokens: Vec::new(),
            unparsed: Vec::new(),
        }
    }

    /// Top-level declarations in source order.
    pub fn top_level(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.is_top_level())
    }

    /// Count declarations of a given kind.
    pub fn count_kind(&self, kind: DeclarationKind) -> usize {
        self.declarations.iter().filter(|d| d.kind == kind).count()
    }

    /// Check for a callable with the given name.
    pub fn has_function(&self, name: &str) -> bool {
        self.declarations
            .iter()
            .any(|d| d.kind.is_callable() && d.name == name)
    }

    pub fn is_partial(&self) -> bool {
        !self.unparsed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, kind: DeclarationKind, scope: Option<&str>, depth: usize) -> Declaration {
        Declaration {
            kind,
            name: name.to_string(),
            scope: scope.map(str::to_string),
            parameters: Vec::new(),
            span: Span {
                start_byte: 0,
                end_byte: 0,
                start_line: 1,
                end_line: 3,
            },
            depth,
            leading_comment: None,
        }
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            decl("validate", DeclarationKind::Method, Some("Config"), 1).qualified_name(),
            "Config.validate"
        );
        assert_eq!(
            decl("main", DeclarationKind::Function, None, 0).qualified_name(),
            "main"
        );
    }

    #[test]
    fn test_span_helpers() {
        let span = decl("f", DeclarationKind::Function, None, 0).span;
        assert_eq!(span.line_count(), 3);
        assert!(span.contains_line(3));
        assert!(!span.contains_line(4));
        assert_eq!(span.to_string(), "lines 1-3");
    }

    #[test]
    fn test_structure_queries() {
        let mut structure = FileStructure::empty(Language::Python, ParseMode::Grammar);
        structure.declarations = vec![
            decl("Shape", DeclarationKind::Class, None, 0),
            decl("area", DeclarationKind::Method, Some("Shape"), 1),
            decl("main", DeclarationKind::Function, None, 0),
        ];
        assert_eq!(structure.top_level().count(), 2);
        assert_eq!(structure.count_kind(DeclarationKind::Method), 1);
        assert!(structure.has_function("main"));
        assert!(!structure.has_function("Shape"));
        assert!(!structure.is_partial());
    }

    #[test]
    fn test_decision_kind_from_capture() {
        assert_eq!(DecisionKind::from_capture("loop"), Some(DecisionKind::Loop));
        assert_eq!(DecisionKind::from_capture("import"), None);
    }
}
