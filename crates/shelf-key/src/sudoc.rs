use crate::generic::normalize_generic;
use crate::tokens::{join_tokens, tokenize, NumberStyle};

/// Placed between the class stem and the book number.
const STEM_SEPARATOR: &str = " : ";

/// Superintendent of Documents numbers, e.g. `I 19.79: EC 7/PROV.3`.
///
/// The stem (agency, subagency, series) and the book number are split at the
/// first colon. Dots inside SuDoc numbers are hierarchy separators, not
/// decimal points: `19.100` files after `19.79`.
#[must_use]
pub fn normalize_sudoc(raw: &str) -> String {
    let (stem, book) = match raw.split_once(':') {
        Some((stem, book)) => (stem, Some(book)),
        None => (raw, None),
    };
    let stem_tokens = tokenize(stem, false);
    if stem_tokens.is_empty() {
        return normalize_generic(raw);
    }

    let mut key = join_tokens(&stem_tokens, NumberStyle::Padded);
    if let Some(book) = book {
        let book_key = join_tokens(&tokenize(book, false), NumberStyle::Padded);
        if !book_key.is_empty() {
            key.push_str(STEM_SEPARATOR);
            key.push_str(&book_key);
        }
    }
    key
}
