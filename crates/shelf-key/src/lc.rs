//! Library of Congress and National Library of Medicine call numbers.
//!
//! Both share one shape: class letters, a class number with an optional decimal
//! part, then cutters and a free-form suffix (year, volume, copy). Cutters are
//! decimal, so their digits are kept verbatim; every other number is
//! length-prefixed.

use crate::generic::normalize_generic;
use crate::tokens::{join_tokens, render_number, tokenize, NumberStyle};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{1,3})\s*(\d+)(?:\.(\d+))?(.*)$").expect("valid LC class pattern")
});
static CUTTER_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z]\d+[A-Z]*)+$").expect("valid cutter word pattern"));
static CUTTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]\d+[A-Z]*").expect("valid cutter pattern"));

struct ClassNumber<'a> {
    letters: &'a str,
    int: &'a str,
    frac: Option<&'a str>,
    rest: &'a str,
}

fn parse_class(upper: &str) -> Option<ClassNumber<'_>> {
    let caps = CLASS.captures(upper)?;
    Some(ClassNumber {
        letters: caps.get(1)?.as_str(),
        int: caps.get(2)?.as_str(),
        frac: caps.get(3).map(|m| m.as_str()),
        rest: caps.get(4).map_or("", |m| m.as_str()),
    })
}

fn build_key(class: &ClassNumber<'_>) -> String {
    let mut parts = vec![
        class.letters.to_string(),
        render_number(class.int, class.frac, NumberStyle::LengthPrefixed),
    ];
    for word in class.rest.split_whitespace() {
        let word = word.trim_start_matches('.');
        if word.is_empty() {
            continue;
        }
        if CUTTER_WORD.is_match(word) {
            parts.extend(CUTTER.find_iter(word).map(|m| m.as_str().to_string()));
            continue;
        }
        let rendered = join_tokens(&tokenize(word, true), NumberStyle::LengthPrefixed);
        if !rendered.is_empty() {
            parts.push(rendered);
        }
    }
    parts.join(" ")
}

/// `PR9199.3 .L33 1990` -> `PR 49199.3 L33 41990`.
#[must_use]
pub fn normalize_lc(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match parse_class(&upper) {
        Some(class) => build_key(&class),
        None => normalize_generic(raw),
    }
}

fn is_nlm_class(letters: &str) -> bool {
    let mut chars = letters.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('W'), None, None) => true,
        (Some('W'), Some(_), None) => true,
        (Some('Q'), Some(second), None) => ('S'..='Z').contains(&second),
        _ => false,
    }
}

/// NLM numbers share LC syntax but are restricted to the QS-QZ and W-WZ classes.
/// Anything else is not an NLM number and gets the generic key.
#[must_use]
pub fn normalize_nlm(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match parse_class(&upper) {
        Some(class) if is_nlm_class(class.letters) => build_key(&class),
        _ => normalize_generic(raw),
    }
}
