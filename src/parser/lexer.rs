//! Delimiter-aware lexing shared by the grammar and degraded paths.
//!
//! Two passes live here: [`tokenize`] produces Halstead operator/operand
//! tokens and [`line_kinds`] classifies each line as blank, comment-only or
//! code. Both skip comments using the delimiters from the language table.

use crate::language::LanguageSpec;

use super::structure::{Token, TokenClass};

/// Operators tried longest first.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "<<=", ">>=", "**=", "===", "!==", "...", "->", "=>", "::", "==", "!=", "<=", ">=", "&&",
    "||", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "**", "//",
    "?.", "??", ":=",
];

/// Closing halves of paired operators; the opener already counts the pair.
const CLOSERS: &[char] = &[')', ']', '}'];

/// Characters that open a string literal.
const QUOTES: &[char] = &['"', '\'', '`'];

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

/// Split `content` into Halstead tokens.
///
/// Keywords and punctuation are operators; identifiers, numbers and string
/// literals are operands. Comments and whitespace are dropped.
pub fn tokenize(content: &str, spec: &LanguageSpec) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;
    let mut line_has_token = false;

    while i < content.len() {
        let rest = &content[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c == '\n' {
            line += 1;
            i += 1;
            line_has_token = false;
            continue;
        }
        if c.is_whitespace() {
            i += c.len_utf8();
            continue;
        }

        if spec.line_comments.iter().any(|d| rest.starts_with(d)) {
            i += rest.find('\n').unwrap_or(rest.len());
            continue;
        }

        let block = spec.block_comments.iter().find(|(o, _)| rest.starts_with(o));
        let mut quoted_block = None;
        if let Some((open, close)) = block {
            let body = &rest[open.len()..];
            let consumed = match body.find(close) {
                Some(pos) => open.len() + pos + close.len(),
                None => rest.len(),
            };
            // `x = """..."""` is a string value, not a docstring.
            if line_has_token && open.starts_with(QUOTES) {
                quoted_block = Some(consumed);
            } else {
                line += rest[..consumed].matches('\n').count();
                i += consumed;
                continue;
            }
        }

        let start_line = line;
        line_has_token = true;
        let len = if let Some(len) = quoted_block {
            len
        } else if c == '"' || c == '`' || (c == '\'' && !is_lifetime(rest, spec)) {
            string_len(rest, c)
        } else if c.is_ascii_digit() {
            word_len(rest, |ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
        } else if is_ident_start(c) || c == '\'' {
            c.len_utf8() + word_len(&rest[c.len_utf8()..], is_ident_char)
        } else {
            operator_len(rest)
        };

        let text = &rest[..len];
        line += text.matches('\n').count();
        i += len;

        if text.len() == 1 && CLOSERS.contains(&c) {
            continue;
        }

        let class = if is_ident_start(c) && spec.keywords.contains(&text) {
            TokenClass::Operator
        } else if c == '"' || c == '`' || c == '\'' || c.is_ascii_digit() || is_ident_start(c) {
            TokenClass::Operand
        } else {
            TokenClass::Operator
        };

        tokens.push(Token {
            text: text.to_string(),
            class,
            line: start_line,
        });
    }

    tokens
}

/// Classify every line of `content`. The result has one entry per line as
/// counted by [`str::lines`], so empty content yields no entries.
pub fn line_kinds(content: &str, spec: &LanguageSpec) -> Vec<LineKind> {
    let mut open: Option<OpenRegion> = None;
    content
        .lines()
        .map(|line| classify_line(line, spec, &mut open))
        .collect()
}

/// Strip comment delimiters and decoration from comment text.
pub fn strip_comment(text: &str, spec: &LanguageSpec) -> String {
    let mut cleaned = Vec::new();
    for raw in text.lines() {
        let mut line = raw.trim();
        for (open, close) in spec.block_comments {
            line = line.strip_prefix(open).unwrap_or(line);
            line = line.strip_suffix(close).unwrap_or(line);
        }
        for delim in spec.line_comments {
            while let Some(stripped) = line.strip_prefix(delim) {
                line = stripped;
            }
        }
        // Doc-comment decoration: `///`, `//!`, leading `*`.
        let line = line
            .trim_start_matches(|c| c == '/' || c == '!')
            .trim()
            .trim_start_matches('*')
            .trim();
        if !line.is_empty() {
            cleaned.push(line);
        }
    }
    cleaned.join(" ")
}

/// A block comment or multi-line string still open at the end of a line.
#[derive(Debug, Clone, Copy)]
struct OpenRegion {
    close: &'static str,
    comment: bool,
}

/// Where the code part of a line stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    LineComment,
    Block(&'static str, &'static str),
    /// A string that runs past the end of the line, closed by the given text.
    Text(&'static str),
}

fn classify_line(line: &str, spec: &LanguageSpec, open: &mut Option<OpenRegion>) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    let mut rest = trimmed;
    let mut has_code = false;
    loop {
        if let Some(region) = *open {
            has_code |= !region.comment;
            match rest.find(region.close) {
                Some(pos) => {
                    rest = &rest[pos + region.close.len()..];
                    *open = None;
                }
                None => break,
            }
        }

        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let Some((at, boundary)) = next_boundary(rest, spec) else {
            has_code = true;
            break;
        };
        has_code |= at > 0;
        let (skip, region) = match boundary {
            Boundary::LineComment => break,
            // Quote-delimited "comments" only count as such at the start of a line.
            Boundary::Block(opener, close) if has_code && opener.starts_with(QUOTES) => {
                (opener.len(), OpenRegion { close, comment: false })
            }
            Boundary::Block(opener, close) => (opener.len(), OpenRegion { close, comment: true }),
            Boundary::Text(close) => (1, OpenRegion { close, comment: false }),
        };
        has_code |= !region.comment;
        rest = &rest[at + skip..];
        *open = Some(region);
    }

    if has_code {
        LineKind::Code
    } else {
        LineKind::Comment
    }
}

/// Scan left to right for the first comment opener outside a string
/// literal, or a string left open at the end of the line.
fn next_boundary(rest: &str, spec: &LanguageSpec) -> Option<(usize, Boundary)> {
    let mut i = 0;
    while i < rest.len() {
        let tail = &rest[i..];
        if spec.line_comments.iter().any(|d| tail.starts_with(d)) {
            return Some((i, Boundary::LineComment));
        }
        if let Some(&(open, close)) = spec.block_comments.iter().find(|(o, _)| tail.starts_with(o)) {
            return Some((i, Boundary::Block(open, close)));
        }

        let c = tail.chars().next()?;
        if QUOTES.contains(&c) && !is_lifetime(tail, spec) {
            let (len, closed) = scan_string(tail, c);
            if !closed && c == '`' {
                return Some((i, Boundary::Text("`")));
            }
            i += len;
        } else {
            i += c.len_utf8();
        }
    }
    None
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Rust lifetimes (`'a`) look like an unterminated char literal.
fn is_lifetime(rest: &str, spec: &LanguageSpec) -> bool {
    if spec.id != "rust" {
        return false;
    }
    let mut chars = rest.chars().skip(1);
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => is_ident_start(first) && second != '\'',
        _ => false,
    }
}

fn word_len(rest: &str, accept: impl Fn(char) -> bool) -> usize {
    rest.char_indices()
        .find(|&(_, ch)| !accept(ch))
        .map_or(rest.len(), |(pos, _)| pos)
}

/// Length of a string literal starting at `rest[0] == quote`. Backtick
/// strings may span lines; the others stop at the end of the line.
fn string_len(rest: &str, quote: char) -> usize {
    scan_string(rest, quote).0
}

/// Length of the literal and whether its closing quote was found.
fn scan_string(rest: &str, quote: char) -> (usize, bool) {
    let mut escaped = false;
    for (pos, ch) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            return (pos + ch.len_utf8(), true);
        } else if ch == '\n' && quote != '`' {
            return (pos, false);
        }
    }
    (rest.len(), false)
}

fn operator_len(rest: &str) -> usize {
    MULTI_CHAR_OPERATORS
        .iter()
        .find(|op| rest.starts_with(*op))
        .map_or_else(|| rest.chars().next().map_or(1, char::len_utf8), |op| op.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn texts(tokens: &[Token], class: TokenClass) -> Vec<&str> {
        tokens
            .iter()
            .filter(|t| t.class == class)
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn test_tokenize_python() {
        let spec = Language::Python.spec();
        let tokens = tokenize("if x >= 10:\n    return x  # done\n", spec);
        assert_eq!(texts(&tokens, TokenClass::Operand), vec!["x", "10", "x"]);
        assert_eq!(texts(&tokens, TokenClass::Operator), vec!["if", ">=", ":", "return"]);
        assert_eq!(tokens.last().map(|t| t.line), Some(2));
    }

    #[test]
    fn test_tokenize_skips_block_comments_and_closers() {
        let spec = Language::C.spec();
        let tokens = tokenize("/* a\n b */ int f(void) { return \"s\"; }\n", spec);
        assert!(tokens.iter().all(|t| t.text != "a" && t.text != ")"));
        assert!(tokens.iter().any(|t| t.text == "\"s\"" && t.class == TokenClass::Operand));
        assert_eq!(tokens[0].text, "int");
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_tokenize_rust_lifetime() {
        let spec = Language::Rust.spec();
        let tokens = tokenize("fn f<'a>(x: &'a str) -> char { 'c' }", spec);
        assert!(tokens.iter().any(|t| t.text == "'a"));
        assert!(tokens.iter().any(|t| t.text == "'c'"));
        assert!(tokens.iter().any(|t| t.text == "->"));
    }

    #[test]
    fn test_line_kinds() {
        let spec = Language::JavaScript.spec();
        let content = "// header\n\nconst a = 1; // trailing\n/* start\n still comment\n end */\nlet b = /* inline */ 2;\n";
        assert_eq!(
            line_kinds(content, spec),
            vec![
                LineKind::Comment,
                LineKind::Blank,
                LineKind::Code,
                LineKind::Comment,
                LineKind::Comment,
                LineKind::Comment,
                LineKind::Code,
            ]
        );
    }

    #[test]
    fn test_line_kinds_python_docstring() {
        let spec = Language::Python.spec();
        let content = "\"\"\"Module doc.\n\nMore.\n\"\"\"\nx = 1\n";
        assert_eq!(
            line_kinds(content, spec),
            vec![
                LineKind::Comment,
                LineKind::Blank,
                LineKind::Comment,
                LineKind::Comment,
                LineKind::Code,
            ]
        );
    }

    #[test]
    fn test_line_kinds_comment_opener_inside_string() {
        let spec = Language::JavaScript.spec();
        let content = "const re = \"/*\";\nlet a = 1;\nlet b = 2;\nlet c = 3;\n";
        assert_eq!(line_kinds(content, spec), vec![LineKind::Code; 4]);

        let quoted = "const s = '// not a comment'; /* real\n comment */\n";
        assert_eq!(line_kinds(quoted, spec), vec![LineKind::Code, LineKind::Comment]);
    }

    #[test]
    fn test_line_kinds_python_triple_quoted_value() {
        let spec = Language::Python.spec();
        let content = "x = \"\"\"\nprint(1)\n\"\"\"\ny = 2\n";
        assert_eq!(line_kinds(content, spec), vec![LineKind::Code; 4]);
    }

    #[test]
    fn test_line_kinds_multiline_template_string() {
        let spec = Language::JavaScript.spec();
        let content = "const t = `first\n/* still text\nlast`;\n// done\n";
        assert_eq!(
            line_kinds(content, spec),
            vec![LineKind::Code, LineKind::Code, LineKind::Code, LineKind::Comment]
        );
    }

    #[test]
    fn test_tokenize_triple_quoted_value_is_operand() {
        let spec = Language::Python.spec();
        let tokens = tokenize("x = \"\"\"a\nb\"\"\"\ny = 1\n", spec);
        assert!(tokens
            .iter()
            .any(|t| t.text == "\"\"\"a\nb\"\"\"" && t.class == TokenClass::Operand));
        assert_eq!(tokens.last().map(|t| t.line), Some(3));
    }

    #[test]
    fn test_line_kinds_empty() {
        assert!(line_kinds("", Language::Rust.spec()).is_empty());
    }

    #[test]
    fn test_strip_comment() {
        let rust = Language::Rust.spec();
        assert_eq!(strip_comment("/// Adds two numbers.", rust), "Adds two numbers.");
        assert_eq!(
            strip_comment("/**\n * Parses input.\n */", Language::Java.spec()),
            "Parses input."
        );
        assert_eq!(strip_comment("# set up", Language::Python.spec()), "set up");
    }
}
