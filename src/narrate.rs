//! Text-to-speech friendly rendering of an explanation.
//!
//! [`normalize`] rewrites text so a speech engine reads it naturally.
//! Passes run in this order:
//!
//! 1. common abbreviations ("e.g.") become words
//! 2. known file extensions are read as "dot" plus letters
//! 3. free-standing numbers become words
//! 4. acronyms are spelled out
//! 5. the paragraph gets a closing pause marker
//!
//! Applying it twice changes nothing.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::explain::Explanation;
use crate::language::is_known_extension;

/// Marker closing every paragraph.
pub const PAUSE: &str = "(pause)";

const PARAGRAPH_BREAK: &str = "\n\n";

const ABBREVIATIONS: [(&str, &str); 4] = [
    ("e.g.", "for example"),
    ("i.e.", "that is"),
    ("etc.", "and so on"),
    ("vs.", "versus"),
];

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

lazy_static! {
    static ref ABBREVIATION: Regex = Regex::new(r"\b(?:e\.g\.|i\.e\.|etc\.|vs\.)").expect("valid regex");
    static ref NUMBER: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid regex");
    static ref ACRONYM: Regex = Regex::new(r"\b[A-Z]{2,5}\b").expect("valid regex");
    static ref EXTENSION: Regex = Regex::new(r"\.([A-Za-z][A-Za-z0-9]{0,4})\b").expect("valid regex");
}

/// An explanation prepared for narration: one paragraph per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narration {
    pub paragraphs: Vec<String>,
}

impl Narration {
    /// Paragraphs joined by blank lines.
    pub fn text(&self) -> String {
        self.paragraphs.join(PARAGRAPH_BREAK)
    }
}

/// Turn an explanation into eight narrated paragraphs.
pub fn narrate(explanation: &Explanation) -> Narration {
    let sections = [
        format!("What this file does: {}", explanation.purpose),
        format!("Why this file exists: {}", explanation.rationale),
        format!("How it works: {}", explanation.mechanism_steps.join(" ")),
        format!("Where input comes from: {}.", sentence_list(&explanation.input_sources)),
        format!("Where output goes: {}.", sentence_list(&explanation.output_destinations)),
        format!("How it connects to other files: {}", connections(&explanation.connections)),
        format!("Key things to know: {}", explanation.key_facts.join(" ")),
        format!("Beginner tip: {}", explanation.beginner_tip),
    ];

    let paragraphs = sections
        .iter()
        .map(|section| normalize_paragraph(&collapse(section)))
        .collect();
    Narration { paragraphs }
}

/// Normalize every paragraph of `text`. Empty paragraphs are dropped.
pub fn normalize(text: &str) -> String {
    text.split(PARAGRAPH_BREAK)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(normalize_paragraph)
        .collect::<Vec<_>>()
        .join(PARAGRAPH_BREAK)
}

fn normalize_paragraph(paragraph: &str) -> String {
    let paragraph = paragraph.trim();
    if paragraph.is_empty() {
        return String::new();
    }

    let text = speak_abbreviations(paragraph);
    let text = speak_extensions(&text);
    let text = speak_numbers(&text);
    let mut text = spell_acronyms(&text);

    if !text.ends_with(PAUSE) {
        text.push(' ');
        text.push_str(PAUSE);
    }
    text
}

fn speak_abbreviations(text: &str) -> String {
    ABBREVIATION
        .replace_all(text, |caps: &Captures| {
            let Some(m) = caps.get(0) else {
                return String::new();
            };
            let spoken = ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == m.as_str())
                .map_or(m.as_str(), |(_, long)| *long);
            // "etc." that closes a sentence keeps its full stop.
            let rest = text[m.end()..].trim_start();
            let ends_sentence = rest.is_empty() || rest.starts_with(char::is_uppercase);
            if m.as_str() == "etc." && ends_sentence {
                format!("{}.", spoken)
            } else {
                spoken.to_string()
            }
        })
        .into_owned()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Digit runs glued to a letter or a dotted suffix ("v1.2", "1.2.3",
/// "mp3") are names, not quantities, and stay as written.
fn speak_numbers(text: &str) -> String {
    NUMBER
        .replace_all(text, |caps: &Captures| {
            let Some(m) = caps.get(0) else {
                return String::new();
            };
            let before = text[..m.start()].chars().next_back();
            let mut after = text[m.end()..].chars();
            let glued_before = before.is_some_and(|c| is_word_char(c) || c == '.');
            let glued_after = match after.next() {
                Some('.') => after.next().is_some_and(is_word_char),
                Some(c) => is_word_char(c),
                None => false,
            };
            if glued_before || glued_after {
                m.as_str().to_string()
            } else {
                speak_number(m.as_str())
            }
        })
        .into_owned()
}

/// A capitalised file stem ("MAIN dot p y") and anything after a dot are
/// left alone.
fn spell_acronyms(text: &str) -> String {
    ACRONYM
        .replace_all(text, |caps: &Captures| {
            let Some(m) = caps.get(0) else {
                return String::new();
            };
            let after_dot = text[..m.start()].ends_with('.');
            let file_stem = text[m.end()..].starts_with(" dot ");
            if after_dot || file_stem {
                m.as_str().to_string()
            } else {
                spell(m.as_str())
            }
        })
        .into_owned()
}

fn speak_extensions(text: &str) -> String {
    EXTENSION
        .replace_all(text, |caps: &Captures| {
            let whole = &caps[0];
            let ext = &caps[1];
            if !is_known_extension(&ext.to_ascii_lowercase()) {
                return whole.to_string();
            }
            let start = caps.get(0).map_or(0, |m| m.start());
            let glued = text[..start].chars().next_back().is_some_and(|c| !c.is_whitespace());
            let spoken: Vec<String> = ext
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(d) => ONES[d as usize].to_string(),
                    None => c.to_ascii_lowercase().to_string(),
                })
                .collect();
            let lead = if glued { " " } else { "" };
            format!("{}dot {}", lead, spoken.join(" "))
        })
        .into_owned()
}

/// "3" -> "three", "2.5" -> "two point five".
fn speak_number(digits: &str) -> String {
    match digits.split_once('.') {
        Some((whole, fraction)) => format!("{} point {}", speak_integer(whole), speak_digits(fraction)),
        None => speak_integer(digits),
    }
}

fn speak_integer(digits: &str) -> String {
    match digits.parse::<u64>() {
        Ok(n) => number_to_words(n),
        Err(_) => speak_digits(digits),
    }
}

fn speak_digits(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| ONES[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// English words for `n`, e.g. 1234 -> "one thousand two hundred thirty-four".
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts = Vec::new();
    let mut rest = n;
    for (scale, name) in SCALES {
        if rest >= scale {
            parts.push(format!("{} {}", below_thousand(rest / scale), name));
            rest %= scale;
        }
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    let mut words = Vec::new();
    if hundreds > 0 {
        words.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        words.push(below_hundred(rest));
    }
    words.join(" ")
}

fn below_hundred(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        ones => format!("{}-{}", tens, ONES[ones as usize]),
    }
}

fn spell(acronym: &str) -> String {
    acronym
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sentence_list(items: &[String]) -> String {
    let trimmed: Vec<&str> = items.iter().map(|s| s.trim_end_matches('.')).collect();
    trimmed.join("; ")
}

fn connections(items: &[String]) -> String {
    match items {
        [single] if single.ends_with('.') => single.clone(),
        _ => format!("it uses {}.", items.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_number_words() {
        assert_eq!(number_to_words(0), "zero");
        assert_eq!(number_to_words(7), "seven");
        assert_eq!(number_to_words(42), "forty-two");
        assert_eq!(number_to_words(100), "one hundred");
        assert_eq!(number_to_words(1234), "one thousand two hundred thirty-four");
        assert_eq!(number_to_words(2_000_005), "two million five");
    }

    #[test]
    fn test_normalize_rules() {
        assert_eq!(normalize("It has 3 lines."), "It has three lines. (pause)");
        assert_eq!(normalize("Version 2.5 ships."), "Version two point five ships. (pause)");
        assert_eq!(normalize("Calls the API."), "Calls the A P I. (pause)");
        assert_eq!(normalize("Open main.py now"), "Open main dot p y now (pause)");
        assert_eq!(normalize("Plays a.mp3"), "Plays a.mp3 (pause)");
    }

    #[test]
    fn test_version_strings_left_alone() {
        assert_eq!(normalize("Needs v1.2 or later"), "Needs v1.2 or later (pause)");
        assert_eq!(normalize("Pinned to 1.2.3 today"), "Pinned to 1.2.3 today (pause)");
        assert_eq!(normalize("Encodes mp3 and x264"), "Encodes mp3 and x264 (pause)");
        assert_eq!(normalize("A score of 6."), "A score of six. (pause)");
        assert_eq!(normalize("Step 2. Then 3.5 more"), "Step two. Then three point five more (pause)");
    }

    #[test]
    fn test_uppercase_filename() {
        assert_eq!(normalize("Run MAIN.PY first"), "Run MAIN dot p y first (pause)");
        assert_eq!(normalize("Read the API.py file"), "Read the API dot p y file (pause)");
        assert_eq!(normalize("Uses the API"), "Uses the A P I (pause)");
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(
            normalize("Files, e.g. configs, i.e. settings"),
            "Files, for example configs, that is settings (pause)"
        );
        assert_eq!(normalize("Lists, maps, etc."), "Lists, maps, and so on. (pause)");
        assert_eq!(normalize("Tabs vs. spaces"), "Tabs versus spaces (pause)");
    }

    #[test]
    fn test_paragraphs_are_separated() {
        assert_eq!(normalize("one\n\n\n\ntwo"), "one (pause)\n\ntwo (pause)");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n  "), "");
    }

    #[test]
    fn test_huge_number_spelled_by_digit() {
        let text = normalize("99999999999999999999999");
        assert!(text.starts_with("nine nine nine"));
        assert!(!text.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_single_letter_extension() {
        assert!(is_known_extension("h"));
        assert_eq!(normalize("See util.h"), "See util dot h (pause)");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "\\PC{0,200}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn normalize_is_idempotent_on_prose(
            words in prop::collection::vec(
                "[A-Za-z]{1,6}|[0-9]{1,4}|[A-Z]{2,5}|[a-z]{1,5}\\.(py|rs|go|js|PY)|v?[0-9]\\.[0-9](\\.[0-9])?|e\\.g\\.|etc\\.|\n\n",
                0..30,
            )
        ) {
            let text = words.join(" ");
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
        }
    }
}
