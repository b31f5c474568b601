use crate::generic::normalize_generic;
use crate::tokens::{join_tokens, render_number, tokenize, NumberStyle};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3})(?:\.(\d+))?(\D.*)?$").expect("valid Dewey class pattern"));
static CUTTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+\d+[A-Z]*$").expect("valid Dewey cutter pattern"));

/// `308 H977` -> `3308 H977`. Values that do not open with a Dewey class
/// number (e.g. `FIC SMITH`) get the generic key.
#[must_use]
pub fn normalize_dewey(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let Some(caps) = CLASS.captures(&upper) else {
        return normalize_generic(raw);
    };
    let int = caps.get(1).map_or("", |m| m.as_str());
    let frac = caps.get(2).map(|m| m.as_str());
    let rest = caps.get(3).map_or("", |m| m.as_str());

    let mut parts = vec![render_number(int, frac, NumberStyle::LengthPrefixed)];
    for word in rest.split_whitespace() {
        let word = word.trim_matches('.');
        if word.is_empty() {
            continue;
        }
        if CUTTER.is_match(word) {
            parts.push(word.to_string());
            continue;
        }
        let rendered = join_tokens(&tokenize(word, true), NumberStyle::LengthPrefixed);
        if !rendered.is_empty() {
            parts.push(rendered);
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dewey_examples() {
        assert_eq!(normalize_dewey("308 H977"), "3308 H977");
        assert_eq!(normalize_dewey("823.914 r123 2001"), "3823.914 R123 42001");
        assert_eq!(normalize_dewey("005.133 .J38"), "15.133 J38");
    }

    #[test]
    fn dewey_orders_like_a_shelf() {
        let shelf = ["005.133 A1", "100 B2", "308 H977", "308.1 A1", "308.12 A1", "823.914 R123"];
        let keys: Vec<String> = shelf.iter().map(|raw| normalize_dewey(raw)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn dewey_falls_back_for_prefixed_values() {
        assert_eq!(normalize_dewey("FIC SMITH"), "FIC SMITH");
        assert_eq!(normalize_dewey("1234 X"), normalize_generic("1234 X"));
    }
}
