/// Characters stripped from both ends of a heading.
const EDGE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '/', '"', '\'', '[', ']'];

/// Browse key for name and subject headings.
///
/// Case folding and whitespace collapsing make `Mark Twain,` and
/// `mark   twain` collide, which is what collapsing relies on.
#[must_use]
pub fn normalize_heading(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|ch: char| EDGE_PUNCTUATION.contains(&ch) || ch.is_whitespace())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn folds_case_and_whitespace() {
        assert_eq!(normalize_heading("  Mark   Twain, "), "mark twain");
        assert_eq!(normalize_heading("\"History -- Fiction.\""), "history -- fiction");
        assert_eq!(normalize_heading("Ölberg"), "ölberg");
    }

    #[test]
    fn empty_headings_stay_empty() {
        assert_eq!(normalize_heading(""), "");
        assert_eq!(normalize_heading(" ., "), "");
    }
}
