//! Line-heuristic parsing for files without a grammar.
//!
//! Produces comments and tokens only; declarations and imports stay empty.

use crate::language::Language;

use super::lexer::{self, LineKind};
use super::structure::{Comment, FileStructure, ParseMode};

pub fn parse(content: &str, language: Language) -> FileStructure {
    let spec = language.spec();
    let mut structure = FileStructure::empty(language, ParseMode::Degraded);

    let lines: Vec<&str> = content.lines().collect();
    let kinds = lexer::line_kinds(content, spec);

    // Merge runs of comment-only lines into one comment.
    let mut run: Option<(usize, Vec<&str>)> = None;
    for (index, kind) in kinds.iter().enumerate() {
        let line_no = index + 1;
        match (kind, run.as_mut()) {
            (LineKind::Comment, Some((_, texts))) => texts.push(lines[index]),
            (LineKind::Comment, None) => run = Some((line_no, vec![lines[index]])),
            (_, Some(_)) => {
                if let Some((start, texts)) = run.take() {
                    push_comment(&mut structure, start, &texts, language);
                }
            }
            (_, None) => {}
        }
    }
    if let Some((start, texts)) = run.take() {
        push_comment(&mut structure, start, &texts, language);
    }

    structure.tokens = lexer::tokenize(content, spec);
    structure
}

fn push_comment(structure: &mut FileStructure, start: usize, texts: &[&str], language: Language) {
    let text = lexer::strip_comment(&texts.join("\n"), language.spec());
    structure.comments.push(Comment {
        text,
        line: start,
        end_line: start + texts.len() - 1,
    });
}
