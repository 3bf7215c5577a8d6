//! Complexity, Halstead and maintainability metrics.
//!
//! Everything here is computed from the parsed [`FileStructure`] plus a
//! single linear pass over the content for line counts.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::parser::lexer::{self, LineKind};
use crate::parser::{DecisionKind, FileStructure, TokenClass};

/// Maintainability index weights (classic formula).
pub mod weights {
    pub const BASE: f64 = 171.0;
    pub const VOLUME: f64 = 5.2;
    pub const COMPLEXITY: f64 = 0.23;
    pub const LINES: f64 = 16.2;
}

/// Complexity tag thresholds on the aggregate.
pub mod buckets {
    pub const SIMPLE_MAX: u32 = 10;
    pub const MODERATE_MAX: u32 = 25;
}

/// Maintainability score bands, used for wording only.
pub mod maintainability {
    pub const EASY_MIN: f64 = 65.0;
    pub const FAIR_MIN: f64 = 40.0;
}

/// Complexity of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationMetrics {
    pub name: String,
    pub complexity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Halstead {
    /// n1: distinct operators.
    pub distinct_operators: usize,
    /// n2: distinct operands.
    pub distinct_operands: usize,
    /// N1: total operators.
    pub total_operators: usize,
    /// N2: total operands.
    pub total_operands: usize,
    pub vocabulary: usize,
    pub length: usize,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LineCounts {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Parallel to `FileStructure::declarations`.
    pub declarations: Vec<DeclarationMetrics>,
    pub aggregate_complexity: u32,
    /// Each branch, loop or handler costs 1 plus its nesting level;
    /// each logical operator costs 1.
    pub cognitive_complexity: u32,
    /// Deepest control-flow level, counting enclosing declarations.
    pub max_nesting_depth: usize,
    /// Mean level over branches, loops and handlers.
    pub average_nesting_depth: f64,
    pub halstead: Halstead,
    /// Clamped to [0, 100].
    pub maintainability_index: f64,
    pub lines: LineCounts,
}

impl Metrics {
    pub fn complexity_tag(&self) -> ComplexityTag {
        ComplexityTag::from_aggregate(self.aggregate_complexity)
    }

    /// The most complex declaration, if any exceeds the base complexity.
    pub fn busiest(&self) -> Option<&DeclarationMetrics> {
        self.declarations
            .iter()
            .filter(|d| d.complexity > 1)
            .max_by(|a, b| a.complexity.cmp(&b.complexity).then(b.name.cmp(&a.name)))
    }
}

/// Human wording for the aggregate complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTag {
    Simple,
    ModeratelyComplex,
    Complex,
}

impl ComplexityTag {
    pub fn from_aggregate(aggregate: u32) -> Self {
        match aggregate {
            a if a <= buckets::SIMPLE_MAX => ComplexityTag::Simple,
            a if a <= buckets::MODERATE_MAX => ComplexityTag::ModeratelyComplex,
            _ => ComplexityTag::Complex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTag::Simple => "simple",
            ComplexityTag::ModeratelyComplex => "moderately complex",
            ComplexityTag::Complex => "complex",
        }
    }
}

impl fmt::Display for ComplexityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compute all metrics for one file.
pub fn compute(content: &str, structure: &FileStructure) -> Metrics {
    let declarations: Vec<DeclarationMetrics> = structure
        .declarations
        .iter()
        .map(|decl| {
            let points = structure
                .decision_points
                .iter()
                .filter(|p| decl.span.contains_line(p.line))
                .count();
            DeclarationMetrics {
                name: decl.qualified_name(),
                complexity: 1 + points as u32,
            }
        })
        .collect();

    let aggregate_complexity = if declarations.is_empty() {
        1
    } else {
        declarations.iter().map(|d| d.complexity).sum()
    };

    let nesting = nesting(structure);
    let halstead = halstead(structure);
    let lines = count_lines(content, structure);
    let maintainability_index =
        maintainability_index(halstead.volume, aggregate_complexity, lines.code);

    tracing::debug!(
        complexity = aggregate_complexity,
        cognitive = nesting.cognitive,
        volume = halstead.volume,
        mi = maintainability_index,
        "metrics computed"
    );

    Metrics {
        declarations,
        aggregate_complexity,
        cognitive_complexity: nesting.cognitive,
        max_nesting_depth: nesting.max_depth,
        average_nesting_depth: nesting.average_depth,
        halstead,
        maintainability_index,
        lines,
    }
}

struct Nesting {
    cognitive: u32,
    max_depth: usize,
    average_depth: f64,
}

/// A control structure's level is the number of declarations around it
/// plus the control structures around it. A function body is level 1.
fn nesting(structure: &FileStructure) -> Nesting {
    let mut cognitive = 0u32;
    let mut levels = Vec::new();

    for point in &structure.decision_points {
        if point.kind == DecisionKind::Logical {
            cognitive += 1;
            continue;
        }
        let enclosing = structure
            .declarations
            .iter()
            .filter(|d| d.span.contains_line(point.line))
            .map(|d| d.depth + 1)
            .max()
            .unwrap_or(0);
        // Nesting inside the first function level is what costs extra.
        let increment = enclosing.saturating_sub(1) + point.nesting;
        cognitive += 1 + increment as u32;
        levels.push(enclosing + point.nesting);
    }

    let max_depth = levels.iter().copied().max().unwrap_or(0);
    let average_depth = if levels.is_empty() {
        0.0
    } else {
        levels.iter().sum::<usize>() as f64 / levels.len() as f64
    };
    Nesting {
        cognitive,
        max_depth,
        average_depth,
    }
}

/// 171 - 5.2 ln(V) - 0.23 CC - 16.2 ln(LOC), clamped to [0, 100].
///
/// Volume and lines are floored at 1 so the logarithms stay finite.
pub fn maintainability_index(volume: f64, complexity: u32, code_lines: usize) -> f64 {
    let volume = volume.max(1.0);
    let loc = (code_lines as f64).max(1.0);
    let raw = weights::BASE
        - weights::VOLUME * volume.ln()
        - weights::COMPLEXITY * f64::from(complexity)
        - weights::LINES * loc.ln();
    raw.clamp(0.0, 100.0)
}

fn halstead(structure: &FileStructure) -> Halstead {
    let mut operators = HashSet::new();
    let mut operands = HashSet::new();
    let mut total_operators = 0;
    let mut total_operands = 0;

    for token in &structure.tokens {
        match token.class {
            TokenClass::Operator => {
                operators.insert(token.text.as_str());
                total_operators += 1;
            }
            TokenClass::Operand => {
                operands.insert(token.text.as_str());
                total_operands += 1;
            }
        }
    }

    let n1 = operators.len();
    let n2 = operands.len();
    let vocabulary = n1 + n2;
    let length = total_operators + total_operands;
    let volume = length as f64 * (vocabulary.max(1) as f64).log2();
    let difficulty = (n1 as f64 / 2.0) * (total_operands as f64 / n2.max(1) as f64);

    Halstead {
        distinct_operators: n1,
        distinct_operands: n2,
        total_operators,
        total_operands,
        vocabulary,
        length,
        volume,
        difficulty,
        effort: difficulty * volume,
    }
}

fn count_lines(content: &str, structure: &FileStructure) -> LineCounts {
    let mut counts = LineCounts::default();
    for kind in lexer::line_kinds(content, structure.language.spec()) {
        counts.total += 1;
        match kind {
            LineKind::Blank => counts.blank += 1,
            LineKind::Comment => counts.comment += 1,
            LineKind::Code => counts.code += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parser::parse;

    #[test]
    fn test_empty_content() {
        let structure = parse("", Language::Python);
        let metrics = compute("", &structure);
        assert_eq!(metrics.lines, LineCounts::default());
        assert_eq!(metrics.aggregate_complexity, 1);
        assert!(metrics.maintainability_index.is_finite());
        assert_eq!(metrics.halstead.volume, 0.0);
        assert_eq!(metrics.halstead.difficulty, 0.0);
        assert_eq!(metrics.cognitive_complexity, 0);
        assert_eq!(metrics.max_nesting_depth, 0);
        assert_eq!(metrics.average_nesting_depth, 0.0);
    }

    #[test]
    fn test_maintainability_clamped() {
        assert_eq!(maintainability_index(0.0, 1, 0), 100.0);
        assert_eq!(maintainability_index(1e12, 500, 1_000_000), 0.0);
        let mid = maintainability_index(1000.0, 10, 100);
        assert!(mid > 0.0 && mid < 100.0, "got {}", mid);
    }

    #[test]
    fn test_maintainability_monotonic_in_complexity() {
        let low = maintainability_index(800.0, 2, 60);
        let high = maintainability_index(800.0, 40, 60);
        assert!(high < low);
    }

    #[test]
    fn test_complexity_tags() {
        assert_eq!(ComplexityTag::from_aggregate(1), ComplexityTag::Simple);
        assert_eq!(ComplexityTag::from_aggregate(10), ComplexityTag::Simple);
        assert_eq!(ComplexityTag::from_aggregate(11), ComplexityTag::ModeratelyComplex);
        assert_eq!(ComplexityTag::from_aggregate(25), ComplexityTag::ModeratelyComplex);
        assert_eq!(ComplexityTag::from_aggregate(26), ComplexityTag::Complex);
    }

    #[test]
    fn test_line_counts_degraded() {
        let content = "# comment\n\necho hi\n";
        let structure = parse(content, Language::Shell);
        let metrics = compute(content, &structure);
        assert_eq!(
            metrics.lines,
            LineCounts {
                total: 3,
                code: 1,
                comment: 1,
                blank: 1,
            }
        );
    }

    #[test]
    fn test_halstead_counts() {
        let content = "x = x + 1\n";
        let structure = parse(content, Language::Python);
        let h = compute(content, &structure).halstead;
        assert_eq!(h.distinct_operators, 2);
        assert_eq!(h.distinct_operands, 2);
        assert_eq!(h.total_operators, 2);
        assert_eq!(h.total_operands, 3);
        assert_eq!(h.vocabulary, 4);
        assert_eq!(h.length, 5);
        assert!((h.volume - 10.0).abs() < 1e-9);
        assert!((h.difficulty - 1.5).abs() < 1e-9);
        assert!((h.effort - 15.0).abs() < 1e-9);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_if_and_loop_gives_three() {
        let content = "def walk(items):\n    for item in items:\n        if item:\n            print(item)\n    return None\n";
        let structure = parse(content, Language::Python);
        let metrics = compute(content, &structure);
        assert_eq!(metrics.declarations.len(), 1);
        assert_eq!(metrics.declarations[0].complexity, 3);
        assert_eq!(metrics.aggregate_complexity, 3);
        assert_eq!(metrics.busiest().map(|d| d.name.as_str()), Some("walk"));
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_aggregate_sums_declarations() {
        let content = "def a(x):\n    if x:\n        return 1\n\ndef b(y):\n    while y:\n        y -= 1\n";
        let structure = parse(content, Language::Python);
        let metrics = compute(content, &structure);
        let per: Vec<_> = metrics.declarations.iter().map(|d| d.complexity).collect();
        assert_eq!(per, vec![2, 2]);
        assert_eq!(metrics.aggregate_complexity, 4);
        assert_eq!(metrics.complexity_tag(), ComplexityTag::Simple);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_nesting_weights_cognitive_complexity() {
        let content = "def walk(items):\n    for item in items:\n        if item:\n            print(item)\n    return None\n";
        let structure = parse(content, Language::Python);
        let nesting: Vec<_> = structure.decision_points.iter().map(|p| p.nesting).collect();
        assert_eq!(nesting, vec![0, 1]);

        let metrics = compute(content, &structure);
        // for: 1, if inside for: 1 + 1
        assert_eq!(metrics.cognitive_complexity, 3);
        assert_eq!(metrics.max_nesting_depth, 2);
        assert!((metrics.average_nesting_depth - 1.5).abs() < 1e-9);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_flat_and_nested_differ_only_in_cognitive() {
        let flat = "def f(a, b):\n    if a:\n        pass\n    if b:\n        pass\n";
        let deep = "def f(a, b):\n    if a:\n        if b:\n            pass\n";
        let flat = compute(flat, &parse(flat, Language::Python));
        let deep = compute(deep, &parse(deep, Language::Python));

        assert_eq!(flat.aggregate_complexity, deep.aggregate_complexity);
        assert_eq!(flat.cognitive_complexity, 2);
        assert_eq!(deep.cognitive_complexity, 3);
        assert_eq!(flat.max_nesting_depth, 1);
        assert_eq!(deep.max_nesting_depth, 2);
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_method_level_and_logical_operators() {
        let content = "class Gate:\n    def check(self, a, b):\n        if a and b:\n            return True\n        return False\n";
        let metrics = compute(content, &parse(content, Language::Python));
        // if inside a method: 1 + 1, `and`: 1
        assert_eq!(metrics.cognitive_complexity, 3);
        assert_eq!(metrics.max_nesting_depth, 2);
    }
}
