//! Tree-sitter based structure extraction.
//!
//! One generic walker is configured per language through [`GrammarConfig`]
//! tables; decision points, imports and calls come from queries.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language as TsLanguage, Node, Parser as TsParser, Query, QueryCursor, Tree};

use crate::language::{Language, LanguageSpec};

use super::grammar::{Container, GrammarConfig, NameRule, ScopeRule};
use super::lexer;
use super::structure::{
    CallSite, Comment, DecisionKind, DecisionPoint, Declaration, DeclarationKind, FileStructure,
    ImportEdge, ParseMode, Span, UnparsedRange,
};

/// Longest callee text kept for a call site.
const MAX_CALLEE_LEN: usize = 80;

/// JavaScript-family value kinds that make a variable a function.
const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

/// Anonymous function kinds; like named functions, their bodies are opaque.
const ANONYMOUS_FUNCTIONS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "lambda",
    "lambda_expression",
    "func_literal",
    "closure_expression",
];

const PARAMETER_NODE_KINDS_TO_SKIP: &[&str] = &["comment", "line_comment", "block_comment"];

/// Parse `content` with the grammar tables in `config`.
///
/// Fails only when the grammar cannot be loaded or a query does not
/// compile; malformed source is recorded as unparsed ranges instead.
pub fn parse(
    content: &str,
    language: Language,
    config: &'static GrammarConfig,
    ts_languages: Vec<TsLanguage>,
) -> anyhow::Result<FileStructure> {
    let source = content.as_bytes();
    let (tree, ts_language) = parse_best(source, ts_languages)?;

    let decision_query = Query::new(&ts_language, config.decision_query)
        .context("decision query does not compile")?;
    let import_query = Query::new(&ts_language, config.import_query)
        .context("import query does not compile")?;
    let call_query =
        Query::new(&ts_language, config.call_query).context("call query does not compile")?;

    let root = tree.root_node();
    let spec = language.spec();
    let lines = LineIndex::new(content);

    let (comments, unparsed) = collect_comments_and_errors(root, source, config, spec);

    let mut extractor = Extractor {
        config,
        source,
        decls: Vec::new(),
    };
    extractor.visit_children(root, &Frame::default());
    let mut declarations = extractor.finish(&comments, &lines);
    if config.docstrings {
        attach_docstrings(&mut declarations, root, source);
    }

    let mut structure = FileStructure::empty(language, ParseMode::Grammar);
    structure.declarations = declarations;
    structure.imports = collect_imports(&import_query, root, source);
    structure.call_sites = collect_calls(&call_query, root, source);
    structure.decision_points = collect_decisions(&decision_query, root, source);
    structure.comments = comments.into_iter().map(|c| c.comment).collect();
    structure.unparsed = unparsed;
    structure.tokens = lexer::tokenize(content, spec);
    Ok(structure)
}

/// Parse with each candidate language and keep the tree with the fewest
/// error nodes; the first clean parse wins outright.
fn parse_best(source: &[u8], candidates: Vec<TsLanguage>) -> anyhow::Result<(Tree, TsLanguage)> {
    let mut best: Option<(usize, Tree, TsLanguage)> = None;
    for ts_language in candidates {
        let mut parser = TsParser::new();
        parser
            .set_language(&ts_language)
            .context("grammar could not be loaded")?;
        let Some(tree) = parser.parse(source, None) else {
            continue;
        };
        let errors = count_errors(tree.root_node());
        if best.as_ref().map_or(true, |(fewest, _, _)| errors < *fewest) {
            best = Some((errors, tree, ts_language));
        }
        if errors == 0 {
            break;
        }
    }
    best.map(|(_, tree, ts_language)| (tree, ts_language))
        .ok_or_else(|| anyhow::anyhow!("failed to parse source"))
}

fn count_errors(root: Node) -> usize {
    if !root.has_error() {
        return 0;
    }
    let mut count = 0;
    traverse(root, |node| {
        if node.is_error() || node.is_missing() {
            count += 1;
            return false;
        }
        node.has_error()
    });
    count
}

/// Pre-order traversal. `visit` returns whether to descend into the node.
fn traverse<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut cursor = root.walk();
    loop {
        let descend = visit(cursor.node());
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// Byte offsets of line starts, for re-deriving byte ends of clamped spans.
struct LineIndex {
    starts: Vec<usize>,
    len: usize,
    total_lines: usize,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(content.match_indices('\n').map(|(pos, _)| pos + 1));
        Self {
            starts,
            len: content.len(),
            total_lines: content.lines().count(),
        }
    }

    /// Exclusive byte end of `line` (the position of its newline).
    fn line_end(&self, line: usize) -> usize {
        self.starts
            .get(line)
            .map_or(self.len, |start| start.saturating_sub(1))
    }
}

struct CollectedComment {
    comment: Comment,
    /// Nothing but whitespace precedes the comment on its first line.
    own_line: bool,
}

fn collect_comments_and_errors(
    root: Node,
    source: &[u8],
    config: &GrammarConfig,
    spec: &LanguageSpec,
) -> (Vec<CollectedComment>, Vec<UnparsedRange>) {
    let mut comments = Vec::new();
    let mut unparsed = Vec::new();
    traverse(root, |node| {
        if node.is_error() || node.is_missing() {
            let span = Span::from_node(node);
            unparsed.push(UnparsedRange {
                start_line: span.start_line,
                end_line: span.end_line.max(span.start_line),
            });
            return false;
        }
        if config.comment_kinds.contains(&node.kind()) {
            let span = Span::from_node(node);
            let cleaned = lexer::strip_comment(text(node, source), spec);
            let line_start = node.start_byte() - node.start_position().column;
            let own_line = source[line_start..node.start_byte()]
                .iter()
                .all(u8::is_ascii_whitespace);
            comments.push(CollectedComment {
                comment: Comment {
                    text: cleaned,
                    line: span.start_line,
                    end_line: span.end_line.max(span.start_line),
                },
                own_line,
            });
            return false;
        }
        true
    });
    (comments, unparsed)
}

/// Walk context: the enclosing named scope and declaration depth.
#[derive(Debug, Clone, Default)]
struct Frame {
    scope: Option<String>,
    in_type: bool,
    depth: usize,
}

impl Frame {
    fn qualify(&self, name: &str) -> String {
        match &self.scope {
            Some(scope) => format!("{}.{}", scope, name),
            None => name.to_string(),
        }
    }

    fn enter(&self, name: &str, in_type: bool, depth: usize) -> Frame {
        Frame {
            scope: Some(self.qualify(name)),
            in_type,
            depth,
        }
    }
}

struct Extractor<'s> {
    config: &'static GrammarConfig,
    source: &'s [u8],
    decls: Vec<Declaration>,
}

impl<'s> Extractor<'s> {
    fn visit_children(&mut self, node: Node, frame: &Frame) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, frame);
        }
    }

    fn visit(&mut self, node: Node, frame: &Frame) {
        // ERROR regions are reported as unparsed ranges, never as declarations.
        let kind = node.kind();
        if node.is_error() || ANONYMOUS_FUNCTIONS.contains(&kind) {
            return;
        }
        let config = self.config;

        if config.functions.contains(&kind) {
            self.function(node, frame);
        } else if let Some(container) = config.containers.iter().find(|c| c.kind == kind) {
            self.container(node, container, frame);
        } else if let Some(scope) = config.scopes.iter().find(|s| s.kind == kind) {
            self.scope(node, scope, frame);
        } else if config.variable_declarations.contains(&kind) {
            self.variables(node, frame);
        } else if let Some(rule) = config.constants.iter().find(|r| r.kind == kind) {
            if frame.scope.is_none() {
                self.constants(node, rule.names, frame);
            }
        } else {
            self.visit_children(node, frame);
        }
    }

    fn function(&mut self, node: Node, frame: &Frame) {
        let Some((qualifier, name)) = self.function_name(node) else {
            return;
        };
        let (scope, kind) = match qualifier {
            Some(q) => (Some(frame.qualify(&q)), DeclarationKind::Method),
            None if frame.in_type => (frame.scope.clone(), DeclarationKind::Method),
            None => (frame.scope.clone(), DeclarationKind::Function),
        };
        let parameters = self.parameters(node);
        self.push(kind, name, scope, parameters, self.outer(node), frame.depth);
    }

    fn container(&mut self, node: Node, container: &Container, frame: &Frame) {
        if container.requires_body && node.child_by_field_name("body").is_none() {
            return;
        }
        match self.container_name(node) {
            Some(name) => {
                self.push(
                    container.declares,
                    name.clone(),
                    frame.scope.clone(),
                    Vec::new(),
                    self.outer(node),
                    frame.depth,
                );
                let inner = frame.enter(&name, true, frame.depth + 1);
                self.visit_children(node, &inner);
            }
            None => self.visit_children(node, frame),
        }
    }

    fn scope(&mut self, node: Node, rule: &ScopeRule, frame: &Frame) {
        let name = node
            .child_by_field_name(rule.name_field)
            .map(|n| strip_generics(text(n, self.source)).to_string());
        match name {
            Some(name) if !name.is_empty() => {
                let inner = frame.enter(&name, rule.methods || frame.in_type, frame.depth);
                self.visit_children(node, &inner);
            }
            _ => self.visit_children(node, frame),
        }
    }

    /// `const f = () => {}` becomes a function; `const LIMIT = 3` at the top
    /// level becomes a constant.
    fn variables(&mut self, node: Node, frame: &Frame) {
        let is_const = text(node, self.source).starts_with("const");
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "variable_declarator")
            .collect();
        let single = declarators.len() == 1;

        for declarator in declarators {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            if name_node.kind() != "identifier" {
                continue;
            }
            let name = text(name_node, self.source).to_string();
            let span_node = if single { self.outer(node) } else { declarator };

            match declarator.child_by_field_name("value") {
                Some(value) if FUNCTION_VALUES.contains(&value.kind()) => {
                    let kind = if frame.in_type {
                        DeclarationKind::Method
                    } else {
                        DeclarationKind::Function
                    };
                    let parameters = self.parameters(value);
                    self.push(kind, name, frame.scope.clone(), parameters, span_node, frame.depth);
                }
                _ if is_const && frame.scope.is_none() && is_screaming(&name) => {
                    self.push(
                        DeclarationKind::Constant,
                        name,
                        None,
                        Vec::new(),
                        span_node,
                        frame.depth,
                    );
                }
                Some(value) => self.visit(value, frame),
                None => {}
            }
        }
    }

    fn constants(&mut self, node: Node, names: NameRule, frame: &Frame) {
        let found: Vec<String> = match names {
            NameRule::Field(field) => node
                .child_by_field_name(field)
                .map(|n| text(n, self.source).to_string())
                .into_iter()
                .collect(),
            NameRule::FieldAll(field) => {
                let mut cursor = node.walk();
                node.children_by_field_name(field, &mut cursor)
                    .map(|n| text(n, self.source).to_string())
                    .collect()
            }
            NameRule::ScreamingAssignment => node
                .named_child(0)
                .filter(|a| a.kind() == "assignment")
                .and_then(|a| a.child_by_field_name("left"))
                .filter(|left| left.kind() == "identifier")
                .map(|left| text(left, self.source).to_string())
                .filter(|name| is_screaming(name))
                .into_iter()
                .collect(),
        };
        for name in found.into_iter().filter(|n| !n.is_empty()) {
            self.push(
                DeclarationKind::Constant,
                name,
                None,
                Vec::new(),
                self.outer(node),
                frame.depth,
            );
        }
    }

    fn push(
        &mut self,
        kind: DeclarationKind,
        name: String,
        scope: Option<String>,
        parameters: Vec<String>,
        span_node: Node,
        depth: usize,
    ) {
        if name.is_empty() {
            return;
        }
        self.decls.push(Declaration {
            kind,
            name,
            scope,
            parameters,
            span: Span::from_node(span_node),
            depth,
            leading_comment: None,
        });
    }

    /// Climb through wrapper nodes (decorators, `export`, templates).
    fn outer<'t>(&self, node: Node<'t>) -> Node<'t> {
        let mut current = node;
        while let Some(parent) = current.parent() {
            if !self.config.wrappers.contains(&parent.kind()) {
                break;
            }
            current = parent;
        }
        current
    }

    /// Name of a function plus an explicit qualifier (Go receiver type,
    /// C++ `Type::method`).
    fn function_name(&self, node: Node) -> Option<(Option<String>, String)> {
        if node.kind() == "init_declaration" {
            return Some((None, "init".to_string()));
        }
        let receiver = node
            .child_by_field_name("receiver")
            .map(|r| receiver_type(text(r, self.source)))
            .filter(|r| !r.is_empty());

        if let Some(name) = node.child_by_field_name("name") {
            return Some((receiver, text(name, self.source).to_string()));
        }
        declarator_name(node, self.source)
    }

    fn container_name(&self, node: Node) -> Option<String> {
        let name = match node.child_by_field_name("name") {
            Some(n) => text(n, self.source).to_string(),
            None => declarator_name(node, self.source).map(|(_, name)| name)?,
        };
        let name = strip_generics(&name).trim().to_string();
        (!name.is_empty()).then_some(name)
    }

    fn parameters(&self, node: Node) -> Vec<String> {
        let list = node
            .child_by_field_name("parameters")
            .or_else(|| function_declarator(node).and_then(|d| d.child_by_field_name("parameters")));

        if let Some(list) = list {
            let mut cursor = list.walk();
            return list
                .named_children(&mut cursor)
                .filter(|p| !PARAMETER_NODE_KINDS_TO_SKIP.contains(&p.kind()))
                .map(|p| collapse_whitespace(text(p, self.source)))
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(single) = node.child_by_field_name("parameter") {
            return vec![collapse_whitespace(text(single, self.source))];
        }
        // Swift puts parameters directly under the declaration.
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() == "parameter")
            .map(|p| collapse_whitespace(text(p, self.source)))
            .collect()
    }

    /// Sort, then make spans non-overlapping and attach leading comments.
    fn finish(self, comments: &[CollectedComment], lines: &LineIndex) -> Vec<Declaration> {
        let mut decls = self.decls;
        decls.sort_by_key(|d| (d.span.start_line, d.span.start_byte));

        let mut owned: Vec<Declaration> = Vec::with_capacity(decls.len());
        for mut decl in decls {
            decl.span.end_line = decl.span.end_line.min(lines.total_lines).max(decl.span.start_line);
            if let Some(prev) = owned.last_mut() {
                if decl.span.start_line <= prev.span.end_line {
                    if decl.span.start_line <= prev.span.start_line {
                        // Shares the first line of the previous declaration.
                        continue;
                    }
                    prev.span.end_line = decl.span.start_line - 1;
                    prev.span.end_byte = lines.line_end(prev.span.end_line);
                }
            }
            owned.push(decl);
        }

        let by_end: HashMap<usize, &Comment> = comments
            .iter()
            .filter(|c| c.own_line)
            .map(|c| (c.comment.end_line, &c.comment))
            .collect();
        for decl in &mut owned {
            decl.leading_comment = leading_comment(decl.span.start_line, &by_end);
        }
        owned
    }
}

/// The contiguous comment block ending on the line above `line`.
fn leading_comment(line: usize, by_end: &HashMap<usize, &Comment>) -> Option<String> {
    let mut block = Vec::new();
    let mut cursor = line;
    while cursor > 1 {
        let Some(comment) = by_end.get(&(cursor - 1)) else {
            break;
        };
        block.push(*comment);
        cursor = comment.line;
    }
    let text = block
        .iter()
        .rev()
        .map(|c| c.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Fill missing leading comments from Python docstrings.
fn attach_docstrings(decls: &mut [Declaration], root: Node, source: &[u8]) {
    let wanted: HashSet<usize> = decls
        .iter()
        .filter(|d| d.leading_comment.is_none())
        .map(|d| d.span.start_line)
        .collect();
    if wanted.is_empty() {
        return;
    }

    let mut docstrings: HashMap<usize, String> = HashMap::new();
    traverse(root, |node| {
        if node.is_error() {
            return false;
        }
        if matches!(node.kind(), "function_definition" | "class_definition") {
            let outer = match node.parent() {
                Some(p) if p.kind() == "decorated_definition" => p,
                _ => node,
            };
            if let Some(doc) = docstring(node, source) {
                docstrings.insert(start_line(outer), doc);
            }
        }
        true
    });

    for decl in decls.iter_mut().filter(|d| d.leading_comment.is_none()) {
        if let Some(doc) = docstrings.remove(&decl.span.start_line) {
            decl.leading_comment = Some(doc);
        }
    }
}

fn docstring(node: Node, source: &[u8]) -> Option<String> {
    let body = node.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0).filter(|s| s.kind() == "string")?;
    let raw = text(string, source)
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_matches(|c| c == '"' || c == '\'');
    let doc = collapse_whitespace(raw);
    (!doc.is_empty()).then_some(doc)
}

/// Follow the C-family declarator chain down to a name.
fn declarator_name(node: Node, source: &[u8]) -> Option<(Option<String>, String)> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "operator_name"
            | "destructor_name" => return Some((None, text(current, source).to_string())),
            "qualified_identifier" => {
                let scope = current
                    .child_by_field_name("scope")
                    .map(|s| strip_generics(text(s, source)).to_string());
                let name = text(current.child_by_field_name("name")?, source);
                let name = name.rsplit("::").next().unwrap_or(name).to_string();
                return Some((scope, name));
            }
            _ => current = current.child_by_field_name("declarator")?,
        }
    }
}

fn function_declarator(node: Node) -> Option<Node> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        if current.kind() == "function_declarator" {
            return Some(current);
        }
        current = current.child_by_field_name("declarator")?;
    }
}

/// `(c *Config)` -> `Config`, `(s *Stack[T])` -> `Stack`.
fn receiver_type(receiver: &str) -> String {
    let inner = receiver.trim().trim_start_matches('(').trim_end_matches(')');
    let last = inner.split_whitespace().last().unwrap_or("");
    let last = last.trim_start_matches('*');
    last.split('[').next().unwrap_or("").to_string()
}

/// `Foo<T>` -> `Foo`.
fn strip_generics(name: &str) -> &str {
    name.split(['<', '[']).next().unwrap_or(name).trim()
}

fn is_screaming(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn collect_decisions(query: &Query, root: Node, source: &[u8]) -> Vec<DecisionPoint> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source);
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    while let Some(m) = matches.next() {
        for capture in m.captures {
            let Some(kind) = DecisionKind::from_capture(names[capture.index as usize]) else {
                continue;
            };
            if seen.insert(capture.node.id()) {
                let node = capture.node;
                found.push((node.start_byte(), node.end_byte(), kind, start_line(node)));
            }
        }
    }
    // Outer nodes first when two start at the same byte.
    found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut open_ends: Vec<usize> = Vec::new();
    let mut points = Vec::with_capacity(found.len());
    for (start, end, kind, line) in found {
        while open_ends.last().is_some_and(|&e| e <= start) {
            open_ends.pop();
        }
        points.push(DecisionPoint {
            kind,
            line,
            nesting: open_ends.len(),
        });
        if kind != DecisionKind::Logical {
            open_ends.push(end);
        }
    }
    points
}

fn collect_imports(query: &Query, root: Node, source: &[u8]) -> Vec<ImportEdge> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source);
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    while let Some(m) = matches.next() {
        let mut statement = None;
        let mut path = None;
        for capture in m.captures {
            match names[capture.index as usize] {
                "import" => statement = Some(capture.node),
                "path" => path = Some(capture.node),
                _ => {}
            }
        }
        let Some(statement) = statement else {
            continue;
        };
        let key = path.unwrap_or(statement);
        if !seen.insert((key.start_byte(), key.end_byte())) {
            continue;
        }
        let raw = collapse_whitespace(text(statement, source));
        let target = match path {
            Some(p) => normalize_import(text(p, source)),
            None => normalize_import(strip_import_keyword(&raw)),
        };
        if target.is_empty() {
            continue;
        }
        edges.push((
            key.start_byte(),
            ImportEdge {
                target,
                raw,
                line: start_line(statement),
            },
        ));
    }
    edges.sort_by_key(|(byte, _)| *byte);
    edges.into_iter().map(|(_, edge)| edge).collect()
}

fn strip_import_keyword(raw: &str) -> &str {
    raw.trim().strip_prefix("import").unwrap_or(raw).trim()
}

/// Reduce an import path to the module it names.
pub(crate) fn normalize_import(path: &str) -> String {
    let path = collapse_whitespace(path);
    let path = path
        .trim()
        .trim_end_matches(';')
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '<' | '>'));
    let path = path.split(" as ").next().unwrap_or(path);
    let path = path.split("::{").next().unwrap_or(path);
    let path = path.split(".{").next().unwrap_or(path);
    let path = path.trim_end_matches("::*").trim_end_matches(".*").trim_end_matches("._");
    path.trim().to_string()
}

fn collect_calls(query: &Query, root: Node, source: &[u8]) -> Vec<CallSite> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source);
    let mut calls = Vec::new();

    while let Some(m) = matches.next() {
        for capture in m.captures {
            if names[capture.index as usize] != "call" {
                continue;
            }
            let callee = callee_text(text(capture.node, source));
            if !callee.is_empty() {
                calls.push((
                    capture.node.start_byte(),
                    CallSite {
                        callee,
                        line: start_line(capture.node),
                    },
                ));
            }
        }
    }
    calls.sort_by_key(|(byte, _)| *byte);
    calls.into_iter().map(|(_, call)| call).collect()
}

/// `os.path.join(a, b)` -> `os.path.join`; `println!("x")` -> `println`.
fn callee_text(call: &str) -> String {
    let head = call.split(['(', '[', '{']).next().unwrap_or(call);
    let head = collapse_whitespace(head).replace(" .", ".").replace(". ", ".");
    let head = head.split("::<").next().unwrap_or(&head).trim_end_matches('!');
    head.chars().take(MAX_CALLEE_LEN).collect::<String>().trim().to_string()
}
