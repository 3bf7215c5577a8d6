//! Language detection and the shared per-language table.
//!
//! Detection runs in a fixed order and the first hit wins:
//!
//! 1. Case-insensitive extension lookup
//! 2. Shebang interpreter on the first line
//! 3. Weighted content fingerprints (a language needs [`MIN_FINGERPRINT_SCORE`])
//!
//! Anything left over is [`Language::Unknown`], which is a valid answer rather
//! than an error. The same table carries the comment delimiters and keyword
//! sets consumed by the lexer and the metrics engine.

use std::fmt;
use std::path::Path;

use phf::phf_map;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Minimum summed fingerprint weight for a content-based match.
pub const MIN_FINGERPRINT_SCORE: u32 = 3;

/// Number of leading bytes inspected for shebangs and fingerprints.
pub const SAMPLE_LEN: usize = 4096;

/// A recognised language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Kotlin,
    Scala,
    Swift,
    C,
    Cpp,
    Go,
    Rust,
    Ruby,
    Php,
    Shell,
    Json,
    Yaml,
    Unknown,
}

impl Language {
    /// All known languages in table order (excludes `Unknown`).
    pub const ALL: [Language; 16] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Kotlin,
        Language::Scala,
        Language::Swift,
        Language::C,
        Language::Cpp,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Php,
        Language::Shell,
        Language::Json,
        Language::Yaml,
    ];

    /// Table entry for this language.
    pub fn spec(self) -> &'static LanguageSpec {
        LANGUAGES
            .iter()
            .find(|spec| spec.language == self)
            .unwrap_or(&UNKNOWN_SPEC)
    }

    /// Stable lowercase identifier used in config files and JSON output.
    pub fn id(self) -> &'static str {
        self.spec().id
    }

    /// Human-facing name ("C++", "JavaScript").
    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    /// Data formats (JSON, YAML) carry no executable code.
    pub fn is_data(self) -> bool {
        self.spec().is_data
    }

    /// Parse a language from a configuration value. Accepts the id, the
    /// display name or a known extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Language> {
        let wanted = name.trim().trim_start_matches('.').to_ascii_lowercase();
        if wanted.is_empty() {
            return None;
        }
        LANGUAGES
            .iter()
            .find(|spec| {
                spec.id == wanted
                    || spec.display_name.to_ascii_lowercase() == wanted
                    || spec.aliases.contains(&wanted.as_str())
            })
            .map(|spec| spec.language)
            .or_else(|| EXTENSIONS.get(wanted.as_str()).copied())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// How a language was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    Extension,
    Shebang,
    Heuristic,
    Override,
    None,
}

/// Result of language detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageTag {
    pub language: Language,
    pub source: DetectionSource,
}

impl LanguageTag {
    pub fn unknown() -> Self {
        Self {
            language: Language::Unknown,
            source: DetectionSource::None,
        }
    }
}

/// Static description of one language.
#[derive(Debug)]
pub struct LanguageSpec {
    pub language: Language,
    pub id: &'static str,
    pub display_name: &'static str,
    /// Extra names accepted by [`Language::from_name`].
    pub aliases: &'static [&'static str],
    /// Extensions without the dot, lowercase.
    pub extensions: &'static [&'static str],
    /// Shebang interpreter names, version suffixes already stripped.
    pub interpreters: &'static [&'static str],
    pub line_comments: &'static [&'static str],
    pub block_comments: &'static [(&'static str, &'static str)],
    pub keywords: &'static [&'static str],
    pub is_data: bool,
}

static LANGUAGES: &[LanguageSpec] = &[
    LanguageSpec {
        language: Language::Python,
        id: "python",
        display_name: "Python",
        aliases: &["py", "python3"],
        extensions: &["py", "pyw", "pyi"],
        interpreters: &["python", "pypy"],
        line_comments: &["#"],
        block_comments: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
        keywords: &[
            "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
            "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
            "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
            "with", "yield",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::JavaScript,
        id: "javascript",
        display_name: "JavaScript",
        aliases: &["js", "node"],
        extensions: &["js", "jsx", "mjs", "cjs"],
        interpreters: &["node", "nodejs", "deno", "bun"],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
            "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
            "import", "in", "instanceof", "let", "new", "of", "return", "switch", "throw", "try",
            "typeof", "var", "void", "while", "yield",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::TypeScript,
        id: "typescript",
        display_name: "TypeScript",
        aliases: &["ts", "tsx"],
        extensions: &["ts", "tsx", "mts", "cts"],
        interpreters: &["ts-node", "tsx"],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
            "continue", "declare", "default", "do", "else", "enum", "export", "extends", "finally",
            "for", "function", "if", "implements", "import", "in", "instanceof", "interface",
            "let", "namespace", "new", "of", "private", "protected", "public", "readonly",
            "return", "switch", "throw", "try", "type", "typeof", "var", "while", "yield",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Java,
        id: "java",
        display_name: "Java",
        aliases: &[],
        extensions: &["java"],
        interpreters: &[],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "abstract", "break", "case", "catch", "class", "continue", "default", "do", "else",
            "enum", "extends", "final", "finally", "for", "if", "implements", "import",
            "instanceof", "interface", "new", "package", "private", "protected", "public",
            "return", "static", "super", "switch", "synchronized", "this", "throw", "throws",
            "try", "void", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Kotlin,
        id: "kotlin",
        display_name: "Kotlin",
        aliases: &["kt"],
        extensions: &["kt", "kts"],
        interpreters: &["kotlin"],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "as", "break", "class", "continue", "data", "do", "else", "for", "fun", "if",
            "import", "in", "interface", "is", "object", "package", "private", "return", "throw",
            "try", "val", "var", "when", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Scala,
        id: "scala",
        display_name: "Scala",
        aliases: &["sc"],
        extensions: &["scala", "sc"],
        interpreters: &["scala"],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "case", "catch", "class", "def", "do", "else", "extends", "final", "finally", "for",
            "if", "implicit", "import", "lazy", "match", "new", "object", "override", "package",
            "private", "return", "sealed", "throw", "trait", "try", "type", "val", "var", "while",
            "with", "yield",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Swift,
        id: "swift",
        display_name: "Swift",
        aliases: &[],
        extensions: &["swift"],
        interpreters: &["swift"],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "as", "break", "case", "catch", "class", "continue", "default", "defer", "do", "else",
            "enum", "extension", "for", "func", "guard", "if", "import", "in", "init", "let",
            "protocol", "repeat", "return", "self", "struct", "switch", "throw", "throws", "try",
            "var", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::C,
        id: "c",
        display_name: "C",
        aliases: &[],
        extensions: &["c", "h"],
        interpreters: &[],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "break", "case", "char", "const", "continue", "default", "do", "double", "else",
            "enum", "extern", "float", "for", "goto", "if", "int", "long", "return", "short",
            "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned",
            "void", "volatile", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Cpp,
        id: "cpp",
        display_name: "C++",
        aliases: &["c++", "cplusplus"],
        extensions: &["cpp", "cc", "cxx", "hpp", "hh", "hxx", "c++"],
        interpreters: &[],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "auto", "break", "case", "catch", "class", "const", "continue", "default", "delete",
            "do", "else", "enum", "for", "if", "namespace", "new", "private", "protected",
            "public", "return", "static", "struct", "switch", "template", "this", "throw", "try",
            "typename", "using", "virtual", "void", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Go,
        id: "go",
        display_name: "Go",
        aliases: &["golang"],
        extensions: &["go"],
        interpreters: &[],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "break", "case", "chan", "const", "continue", "default", "defer", "else",
            "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
            "package", "range", "return", "select", "struct", "switch", "type", "var",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Rust,
        id: "rust",
        display_name: "Rust",
        aliases: &["rs"],
        extensions: &["rs"],
        interpreters: &[],
        line_comments: &["//"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
            "mut", "pub", "ref", "return", "static", "struct", "trait", "type", "unsafe", "use",
            "where", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Ruby,
        id: "ruby",
        display_name: "Ruby",
        aliases: &["rb"],
        extensions: &["rb", "rake", "gemspec"],
        interpreters: &["ruby"],
        line_comments: &["#"],
        block_comments: &[("=begin", "=end")],
        keywords: &[
            "alias", "and", "begin", "break", "case", "class", "def", "do", "else", "elsif",
            "end", "ensure", "for", "if", "in", "module", "next", "not", "or", "rescue", "retry",
            "return", "self", "unless", "until", "when", "while", "yield",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Php,
        id: "php",
        display_name: "PHP",
        aliases: &[],
        extensions: &["php", "phtml"],
        interpreters: &["php"],
        line_comments: &["//", "#"],
        block_comments: &[("/*", "*/")],
        keywords: &[
            "abstract", "array", "as", "break", "case", "catch", "class", "const", "continue",
            "default", "do", "echo", "else", "elseif", "extends", "for", "foreach", "function",
            "if", "implements", "interface", "namespace", "new", "private", "protected",
            "public", "require", "return", "static", "switch", "throw", "try", "use", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Shell,
        id: "shell",
        display_name: "Shell",
        aliases: &["sh", "bash", "zsh"],
        extensions: &["sh", "bash", "zsh", "ksh"],
        interpreters: &["sh", "bash", "zsh", "ksh", "dash", "fish"],
        line_comments: &["#"],
        block_comments: &[],
        keywords: &[
            "case", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function", "if",
            "in", "local", "return", "then", "until", "while",
        ],
        is_data: false,
    },
    LanguageSpec {
        language: Language::Json,
        id: "json",
        display_name: "JSON",
        aliases: &[],
        extensions: &["json", "jsonc", "json5"],
        interpreters: &[],
        line_comments: &[],
        block_comments: &[],
        keywords: &["true", "false", "null"],
        is_data: true,
    },
    LanguageSpec {
        language: Language::Yaml,
        id: "yaml",
        display_name: "YAML",
        aliases: &["yml"],
        extensions: &["yaml", "yml"],
        interpreters: &[],
        line_comments: &["#"],
        block_comments: &[],
        keywords: &["true", "false", "null", "yes", "no"],
        is_data: true,
    },
];

static UNKNOWN_SPEC: LanguageSpec = LanguageSpec {
    language: Language::Unknown,
    id: "unknown",
    display_name: "an unrecognised language",
    aliases: &[],
    extensions: &[],
    interpreters: &[],
    line_comments: &["#", "//"],
    block_comments: &[("/*", "*/")],
    keywords: &[],
    is_data: false,
};

/// Extension (lowercase, no dot) to language.
static EXTENSIONS: phf::Map<&'static str, Language> = phf_map! {
    "py" => Language::Python,
    "pyw" => Language::Python,
    "pyi" => Language::Python,
    "js" => Language::JavaScript,
    "jsx" => Language::JavaScript,
    "mjs" => Language::JavaScript,
    "cjs" => Language::JavaScript,
    "ts" => Language::TypeScript,
    "tsx" => Language::TypeScript,
    "mts" => Language::TypeScript,
    "cts" => Language::TypeScript,
    "java" => Language::Java,
    "kt" => Language::Kotlin,
    "kts" => Language::Kotlin,
    "scala" => Language::Scala,
    "sc" => Language::Scala,
    "swift" => Language::Swift,
    "c" => Language::C,
    "h" => Language::C,
    "cpp" => Language::Cpp,
    "cc" => Language::Cpp,
    "cxx" => Language::Cpp,
    "hpp" => Language::Cpp,
    "hh" => Language::Cpp,
    "hxx" => Language::Cpp,
    "c++" => Language::Cpp,
    "go" => Language::Go,
    "rs" => Language::Rust,
    "rb" => Language::Ruby,
    "rake" => Language::Ruby,
    "gemspec" => Language::Ruby,
    "php" => Language::Php,
    "phtml" => Language::Php,
    "sh" => Language::Shell,
    "bash" => Language::Shell,
    "zsh" => Language::Shell,
    "ksh" => Language::Shell,
    "json" => Language::Json,
    "jsonc" => Language::Json,
    "json5" => Language::Json,
    "yaml" => Language::Yaml,
    "yml" => Language::Yaml,
};

/// Whether `ext` (without the dot, any case) is a known source extension.
pub fn is_known_extension(ext: &str) -> bool {
    EXTENSIONS.contains_key(ext.to_ascii_lowercase().as_str())
}

lazy_static::lazy_static! {
    /// Weighted content fingerprints, checked in table order.
    static ref FINGERPRINTS: Vec<(Language, Vec<(Regex, u32)>)> = {
        let table: &[(Language, &[(&str, u32)])] = &[
            (Language::Python, &[
                (r"(?m)^\s*def \w+\(.*\)\s*(->.*)?:\s*$", 3),
                (r"(?m)^\s*(from [\w.]+ )?import [\w.]+", 1),
                (r#"if __name__ == ['"]__main__['"]"#, 3),
                (r"(?m)^\s*class \w+(\(.*\))?:\s*$", 2),
                (r"\bself\.\w+", 1),
            ]),
            (Language::JavaScript, &[
                (r"\bconsole\.log\(", 2),
                (r"\brequire\(['\x22]", 2),
                (r"\bmodule\.exports\b", 3),
                (r"(?m)^\s*function \w+\s*\(", 1),
                (r"=>\s*\{", 1),
            ]),
            (Language::TypeScript, &[
                (r"(?m)^\s*(export )?interface \w+\s*\{", 2),
                (r":\s*(string|number|boolean|void)\b", 2),
                (r"(?m)^\s*(export )?type \w+\s*=", 1),
            ]),
            (Language::Java, &[
                (r"public static void main\(String", 4),
                (r"(?m)^\s*package [\w.]+;", 2),
                (r"(?m)^\s*import java\.", 3),
                (r"System\.out\.print", 2),
            ]),
            (Language::Kotlin, &[
                (r"(?m)^\s*fun \w+\(", 2),
                (r"(?m)^\s*val \w+\s*[:=]", 1),
                (r"\bprintln\(", 1),
            ]),
            (Language::Scala, &[
                (r"(?m)^\s*object \w+( extends \w+)?\s*\{", 2),
                (r"(?m)^\s*def \w+.*=", 1),
                (r"(?m)^\s*case class \w+", 3),
            ]),
            (Language::Swift, &[
                (r"(?m)^\s*import (UIKit|Foundation|SwiftUI)", 4),
                (r"(?m)^\s*func \w+\(.*\)\s*(->|\{)", 2),
                (r"\bguard let\b", 3),
            ]),
            (Language::C, &[
                (r"(?m)^\s*#include\s*<(stdio|stdlib|string|unistd)\.h>", 3),
                (r"\bprintf\(", 1),
                (r"\bmalloc\(", 1),
            ]),
            (Language::Cpp, &[
                (r"(?m)^\s*#include\s*<(iostream|vector|string|memory|map)>", 3),
                (r"\bstd::", 2),
                (r"(?m)^\s*namespace \w+", 1),
            ]),
            (Language::Go, &[
                (r"(?m)^package \w+\s*$", 2),
                (r"(?m)^func (\(\w+ \*?\w+\) )?\w+\(", 2),
                (r"\bfmt\.Print", 1),
                (r":=", 1),
            ]),
            (Language::Rust, &[
                (r"(?m)^\s*(pub )?fn \w+", 2),
                (r"(?m)^\s*use \w+(::\w+)+", 1),
                (r"\blet mut\b", 2),
                (r"\bimpl\b.*\{", 1),
            ]),
            (Language::Ruby, &[
                (r"(?m)^\s*require ['\x22]", 2),
                (r"(?m)^\s*def \w+[?!]?\s*$", 2),
                (r"(?m)^\s*end\s*$", 1),
                (r"\bputs\b", 1),
            ]),
            (Language::Php, &[
                (r"<\?php", 5),
                (r"\$\w+\s*=", 1),
            ]),
            (Language::Shell, &[
                (r"(?m)^\s*(if|while) \[", 2),
                (r"(?m)^\s*fi\s*$", 2),
                (r"(?m)^\s*echo ", 1),
                (r"\$\{?\w+\}?", 1),
            ]),
            (Language::Json, &[
                (r#"\A\s*[\{\[]\s*"[^"]*"\s*:"#, 3),
            ]),
            (Language::Yaml, &[
                (r"\A---\s*$", 2),
                (r"(?m)^[A-Za-z_][\w-]*:\s*$", 1),
                (r"(?m)^\s*- \w+", 1),
            ]),
        ];
        table
            .iter()
            .map(|(language, patterns)| {
                let compiled = patterns
                    .iter()
                    .filter_map(|(pattern, weight)| {
                        Regex::new(pattern).ok().map(|re| (re, *weight))
                    })
                    .collect();
                (*language, compiled)
            })
            .collect()
    };
}

/// Detect the language of a file from its path and a content sample.
pub fn detect(path: &Path, sample: &[u8]) -> LanguageTag {
    if let Some(language) = by_extension(path) {
        return LanguageTag {
            language,
            source: DetectionSource::Extension,
        };
    }

    let sample = &sample[..sample.len().min(SAMPLE_LEN)];
    let text = String::from_utf8_lossy(sample);

    if let Some(language) = by_shebang(&text) {
        return LanguageTag {
            language,
            source: DetectionSource::Shebang,
        };
    }

    if let Some(language) = by_fingerprint(&text) {
        return LanguageTag {
            language,
            source: DetectionSource::Heuristic,
        };
    }

    tracing::debug!(path = %path.display(), "language not recognised");
    LanguageTag::unknown()
}

/// Like [`detect`], but an explicit language wins over everything else.
pub fn detect_with_override(path: &Path, sample: &[u8], forced: Option<Language>) -> LanguageTag {
    match forced {
        Some(language) => LanguageTag {
            language,
            source: DetectionSource::Override,
        },
        None => detect(path, sample),
    }
}

fn by_extension(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSIONS.get(ext.as_str()).copied()
}

/// Resolve `#!/usr/bin/env [-S] X`, `#!/path/to/X` and versioned interpreters.
fn by_shebang(text: &str) -> Option<Language> {
    let first = text.lines().next()?;
    let rest = first.strip_prefix("#!")?;
    let mut words = rest.split_whitespace();
    let mut program = words.next()?;

    if program.rsplit('/').next() == Some("env") {
        program = words.find(|w| !w.starts_with('-'))?;
    }

    let name = program.rsplit('/').next()?;
    let interpreter = strip_version(name);

    LANGUAGES
        .iter()
        .find(|spec| spec.interpreters.contains(&interpreter))
        .map(|spec| spec.language)
}

/// `python3.11` -> `python`, `ruby2` -> `ruby`.
fn strip_version(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.')
}

fn by_fingerprint(text: &str) -> Option<Language> {
    let mut best: Option<(Language, u32)> = None;
    for (language, patterns) in FINGERPRINTS.iter() {
        let score: u32 = patterns
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .map(|(_, weight)| weight)
            .sum();
        // Strictly greater keeps the earlier table entry on ties.
        if score >= MIN_FINGERPRINT_SCORE && best.map_or(true, |(_, top)| score > top) {
            best = Some((*language, score));
        }
    }
    best.map(|(language, _)| language)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect_str(path: &str, content: &str) -> LanguageTag {
        detect(Path::new(path), content.as_bytes())
    }

    #[test]
    fn test_extension_wins() {
        let tag = detect_str("src/app.PY", "#!/bin/bash\necho hi\n");
        assert_eq!(tag.language, Language::Python);
        assert_eq!(tag.source, DetectionSource::Extension);
    }

    #[test]
    fn test_every_language_has_an_extension() {
        for language in Language::ALL {
            let spec = language.spec();
            assert!(!spec.extensions.is_empty(), "{} has no extensions", spec.id);
            for ext in spec.extensions {
                assert_eq!(
                    EXTENSIONS.get(*ext).copied(),
                    Some(language),
                    "extension {} not mapped to {}",
                    ext,
                    spec.id
                );
            }
        }
    }

    #[test]
    fn test_shebang_env() {
        let tag = detect_str("bin/tool", "#!/usr/bin/env python3\nprint('x')\n");
        assert_eq!(tag.language, Language::Python);
        assert_eq!(tag.source, DetectionSource::Shebang);
    }

    #[test]
    fn test_shebang_env_split_flag() {
        let tag = detect_str("bin/tool", "#!/usr/bin/env -S node --experimental\n");
        assert_eq!(tag.language, Language::JavaScript);
    }

    #[test]
    fn test_shebang_direct_path_with_version() {
        let tag = detect_str("run", "#!/usr/local/bin/python3.11\n");
        assert_eq!(tag.language, Language::Python);

        let tag = detect_str("deploy", "#!/bin/bash\nset -e\n");
        assert_eq!(tag.language, Language::Shell);
    }

    #[test]
    fn test_fingerprint_go() {
        let content = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tx := 1\n\tfmt.Println(x)\n}\n";
        let tag = detect_str("Buildfile", content);
        assert_eq!(tag.language, Language::Go);
        assert_eq!(tag.source, DetectionSource::Heuristic);
    }

    #[test]
    fn test_fingerprint_below_threshold_is_unknown() {
        let tag = detect_str("notes", "x := 1\n");
        assert_eq!(tag, LanguageTag::unknown());
    }

    #[test]
    fn test_unknown_for_prose() {
        let tag = detect_str("README", "Just some words about the project.\n");
        assert_eq!(tag.language, Language::Unknown);
        assert_eq!(tag.source, DetectionSource::None);
    }

    #[test]
    fn test_empty_sample() {
        let tag = detect_str("LICENSE", "");
        assert_eq!(tag.language, Language::Unknown);
    }

    #[test]
    fn test_override() {
        let tag = detect_with_override(Path::new("a.py"), b"", Some(Language::Ruby));
        assert_eq!(tag.language, Language::Ruby);
        assert_eq!(tag.source, DetectionSource::Override);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Language::from_name("Python"), Some(Language::Python));
        assert_eq!(Language::from_name("c++"), Some(Language::Cpp));
        assert_eq!(Language::from_name(".rs"), Some(Language::Rust));
        assert_eq!(Language::from_name("golang"), Some(Language::Go));
        assert_eq!(Language::from_name("cobol"), None);
        assert_eq!(Language::from_name(""), None);
    }

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version("python3.11"), "python");
        assert_eq!(strip_version("node"), "node");
    }

    #[test]
    fn test_all_fingerprints_compile() {
        assert_eq!(FINGERPRINTS.len(), Language::ALL.len());
        for (language, patterns) in FINGERPRINTS.iter() {
            assert!(!patterns.is_empty(), "{:?} lost its fingerprints", language);
        }
    }
}
