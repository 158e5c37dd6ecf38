//! Text cleanup shared by stop names, headsigns and route long names.
//!
//! Every helper is a pure function of its input. Built-in patterns are
//! compiled once into `OnceLock` statics; the acronym pattern comes from
//! configuration and lives in [`Acronyms`].

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Acronyms kept upper-case when names and headsigns are case-folded.
pub const DEFAULT_ACRONYMS: &[&str] = &[
    "AL", "CBC", "CNIB", "CONA", "EMCO", "HMP", "HSC", "JB", "JJ", "MFRC", "MI", "MUN", "MVR",
    "NL", "RDM", "RCMP", "RNC", "YMCA",
];

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

/// Street type → abbreviation, matched as whole words, case-insensitive.
const STREET_TYPES: &[(&str, &str)] = &[
    ("avenue", "Ave"),
    ("boulevard", "Blvd"),
    ("court", "Crt"),
    ("crescent", "Cres"),
    ("drive", "Dr"),
    ("heights", "Hts"),
    ("highway", "Hwy"),
    ("lane", "Ln"),
    ("parkway", "Pkwy"),
    ("place", "Pl"),
    ("road", "Rd"),
    ("square", "Sq"),
    ("street", "St"),
    ("terrace", "Ter"),
    ("village", "Vlg"),
];

const ORDINAL_WORDS: &[(&str, &str)] = &[
    ("first", "1st"),
    ("second", "2nd"),
    ("third", "3rd"),
    ("fourth", "4th"),
    ("fifth", "5th"),
    ("sixth", "6th"),
    ("seventh", "7th"),
    ("eighth", "8th"),
    ("ninth", "9th"),
    ("tenth", "10th"),
];

/// Configured set of protected acronyms.
#[derive(Debug, Clone)]
pub struct Acronyms {
    words: Vec<String>,
    pattern: Option<Regex>,
}

impl Acronyms {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self, regex::Error> {
        let words: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        let pattern = if words.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
            Some(Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?)
        };
        Ok(Acronyms { words, pattern })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Upper-case every protected acronym found as a whole word.
    pub fn restore(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(text, |caps: &Captures| caps[0].to_uppercase())
                .into_owned(),
            None => text.to_string(),
        }
    }
}

impl Default for Acronyms {
    fn default() -> Self {
        // Escaped literals always compile.
        Acronyms::new(DEFAULT_ACRONYMS).unwrap()
    }
}

/// True when the text has letters and none of them is lower-case.
pub fn is_upper_case_only(text: &str) -> bool {
    let mut has_letter = false;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        if c.is_lowercase() {
            return false;
        }
        has_letter = true;
    }
    has_letter
}

/// Lower-case an all-caps text, keeping protected acronyms upper-case.
///
/// Mixed-case text is returned unchanged.
pub fn fold_upper_case(text: &str, acronyms: &Acronyms) -> String {
    if !is_upper_case_only(text) {
        return text.to_string();
    }
    acronyms.restore(&text.to_lowercase())
}

/// Title-case every word whatever the casing of the whole text, then
/// upper-case protected acronyms again.
///
/// Apostrophes stay inside a word: `O'BRIEN'S` → `O'brien's`.
pub fn title_case_words(text: &str, acronyms: &Acronyms) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !(c.is_alphanumeric() || c == '\'');
    }
    acronyms.restore(&out)
}

/// `a/b`, `a /  b`, `a // b` → `a / b`.
pub fn clean_slashes(text: &str) -> String {
    static RE_SLASHES: OnceLock<Regex> = OnceLock::new();
    compiled(&RE_SLASHES, r"\s*/(?:\s*/)*\s*")
        .replace_all(text, " / ")
        .into_owned()
}

/// `a-b`, `a -b` → `a - b`.
pub fn clean_dashes(text: &str) -> String {
    static RE_DASHES: OnceLock<Regex> = OnceLock::new();
    compiled(&RE_DASHES, r"\s*-\s*")
        .replace_all(text, " - ")
        .into_owned()
}

/// Abbreviate street types (`Street` → `St`, `Road` → `Rd`, ...).
pub fn clean_street_types(text: &str) -> String {
    static RE_STREET_TYPES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    let rules = RE_STREET_TYPES.get_or_init(|| {
        STREET_TYPES
            .iter()
            .map(|(word, abbr)| (Regex::new(&format!(r"(?i)\b{}\b", word)).unwrap(), *abbr))
            .collect()
    });
    let mut s = text.to_string();
    for (re, abbr) in rules {
        s = re.replace_all(&s, *abbr).into_owned();
    }
    s
}

/// Agency shorthand `B:Rd` → `Bay Rd`. Runs after [`clean_street_types`].
pub fn clean_bay_road(text: &str) -> String {
    static RE_BAY_ROAD: OnceLock<Regex> = OnceLock::new();
    compiled(&RE_BAY_ROAD, r"(?i)\bb:rd\b")
        .replace_all(text, "Bay Rd")
        .into_owned()
}

/// Suffix a number takes as an ordinal: 1st, 2nd, 3rd, 11th, 22nd.
fn ordinal_suffix(number: &str) -> &'static str {
    let tail: String = number.chars().rev().take(2).collect();
    let mut tail = tail.chars();
    let last = tail.next();
    let tens = tail.next();
    match (tens, last) {
        (Some('1'), _) => "th",
        (_, Some('1')) => "st",
        (_, Some('2')) => "nd",
        (_, Some('3')) => "rd",
        _ => "th",
    }
}

/// `First` → `1st`, `2ND` → `2nd`, `2 nd` → `2nd`.
///
/// A spaced suffix is only joined when it is lower-case and the right one
/// for the number; `st` is never joined so `45 st. clare` keeps its street.
pub fn clean_ordinals(text: &str) -> String {
    static RE_ORDINAL_WORDS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    static RE_ORDINAL_SUFFIX: OnceLock<Regex> = OnceLock::new();
    static RE_SPACED_SUFFIX: OnceLock<Regex> = OnceLock::new();

    let rules = RE_ORDINAL_WORDS.get_or_init(|| {
        ORDINAL_WORDS
            .iter()
            .map(|(word, num)| (Regex::new(&format!(r"(?i)\b{}\b", word)).unwrap(), *num))
            .collect()
    });
    let mut s = text.to_string();
    for (re, num) in rules {
        s = re.replace_all(&s, *num).into_owned();
    }
    let s = compiled(&RE_SPACED_SUFFIX, r"\b(\d+)\s+(nd|rd|th)\b").replace_all(
        &s,
        |caps: &Captures| {
            if ordinal_suffix(&caps[1]) == &caps[2] {
                format!("{}{}", &caps[1], &caps[2])
            } else {
                caps[0].to_string()
            }
        },
    );
    compiled(&RE_ORDINAL_SUFFIX, r"(?i)\b(\d+)(st|nd|rd|th)\b")
        .replace_all(&s, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_lowercase())
        })
        .into_owned()
}

/// Drop unmatched `)`, close unmatched `(`, remove empty `()`.
pub fn balance_parentheses(text: &str) -> String {
    static RE_EMPTY_PARENS: OnceLock<Regex> = OnceLock::new();

    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len() + 1);
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' if depth == 0 => {}
            ')' => {
                depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.extend(std::iter::repeat(')').take(depth));
    compiled(&RE_EMPTY_PARENS, r"\(\s*\)")
        .replace_all(&out, "")
        .into_owned()
}

/// Strip separators and stray punctuation from both ends.
pub fn clean_bounds(text: &str) -> String {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '/' | '-' | ',' | '&' | '.' | ';' | ':')
    })
    .to_string()
}

/// Upper-case the first letter of every word; the rest is left alone.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace() || matches!(c, '/' | '(' | '[' | '-' | '&' | '"');
    }
    out
}

/// Final pass for any label: whitespace, parentheses, bounds, capitals.
///
/// Separators left right inside parentheses or after a comma are dropped:
/// `(/ Sobeys)` → `(Sobeys)`, `12, / Water` → `12, Water`.
pub fn clean_label(text: &str) -> String {
    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    static RE_OPEN_PAREN_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    static RE_CLOSE_PAREN_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    static RE_COMMA_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    static RE_OPEN_PAREN: OnceLock<Regex> = OnceLock::new();
    static RE_CLOSE_PAREN: OnceLock<Regex> = OnceLock::new();

    let s = compiled(&RE_SPACES, r"\s+").replace_all(text, " ");
    let s = compiled(&RE_OPEN_PAREN_SEPARATOR, r"\(\s*(?:[/,&;:-]\s*)+")
        .replace_all(&s, "(");
    let s = compiled(&RE_CLOSE_PAREN_SEPARATOR, r"(?:\s*[/,&;:-])+\s*\)")
        .replace_all(&s, ")");
    let s = compiled(&RE_COMMA_SEPARATOR, r",(?:\s*[/&;:-])+\s*").replace_all(&s, ", ");
    let s = compiled(&RE_OPEN_PAREN, r"\(\s+").replace_all(&s, "(");
    let s = compiled(&RE_CLOSE_PAREN, r"\s+\)").replace_all(&s, ")");
    let s = balance_parentheses(&s);
    let s = clean_bounds(&s);
    // Removing `()` or bounds can leave doubled spaces behind.
    let s = compiled(&RE_SPACES, r"\s+").replace_all(&s, " ");
    capitalize_words(s.trim())
}
