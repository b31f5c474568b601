//! Tokenization shared by every scheme.
//!
//! A raw value is split into upper-cased word runs and ASCII digit runs; anything
//! else (punctuation, whitespace, symbols) is a separator. Digit runs are rendered
//! so that byte-wise comparison of the final key matches numeric comparison.

/// Width that padded numbers are left-filled to. Longer runs are kept as-is.
pub const NUMBER_WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Word(String),
    Number { int: String, frac: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberStyle {
    Padded,
    LengthPrefixed,
}

impl Token {
    pub(crate) fn render(&self, style: NumberStyle) -> String {
        match self {
            Self::Word(word) => word.clone(),
            Self::Number { int, frac } => render_number(int, frac.as_deref(), style),
        }
    }
}

/// Splits `raw` into tokens. With `decimals` set, `12.5` is one number with a
/// fractional part; otherwise the dot is a separator and yields two numbers.
pub(crate) fn tokenize(raw: &str, decimals: bool) -> Vec<Token> {
    let chars: Vec<char> = raw.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let int: String = chars[start..i].iter().collect();
            let mut frac = None;
            if decimals
                && i + 1 < chars.len()
                && chars[i] == '.'
                && chars[i + 1].is_ascii_digit()
            {
                let frac_start = i + 1;
                i = frac_start;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                frac = Some(chars[frac_start..i].iter().collect());
            }
            tokens.push(Token::Number { int, frac });
        } else if ch.is_alphanumeric() {
            let start = i;
            while i < chars.len() && chars[i].is_alphanumeric() && !chars[i].is_ascii_digit() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            tokens.push(Token::Word(word.to_uppercase()));
        } else {
            i += 1;
        }
    }
    tokens
}

pub(crate) fn join_tokens(tokens: &[Token], style: NumberStyle) -> String {
    tokens
        .iter()
        .map(|token| token.render(style))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn render_number(int: &str, frac: Option<&str>, style: NumberStyle) -> String {
    let mut out = match style {
        NumberStyle::Padded => pad_number(int),
        NumberStyle::LengthPrefixed => length_prefixed(int),
    };
    if let Some(frac) = frac.map(|f| f.trim_end_matches('0')).filter(|f| !f.is_empty()) {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Left-pads a digit run with zeros to [`NUMBER_WIDTH`].
#[must_use]
pub fn pad_number(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
    // Runs wider than NUMBER_WIDTH pass through unpadded and compare lexically.
    format!("{:0>width$}", trimmed, width = NUMBER_WIDTH)
}

/// Prefixes a digit run with its significant length: `1990` -> `41990`.
/// Zero renders as `0`, which sorts before every positive number.
#[must_use]
pub fn length_prefixed(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return "0".to_string();
    }
    // One prefix digit: runs of ten or more digits all share prefix 9 and
    // compare lexically after it. Class numbers never get that long.
    format!("{}{}", trimmed.len().min(9), trimmed)
}
