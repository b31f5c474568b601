use crate::tokens::{join_tokens, tokenize, NumberStyle};

/// Scheme-agnostic key used by untyped ("ALL") browse and as the fallback for
/// values a scheme parser cannot make sense of.
#[must_use]
pub fn normalize_generic(raw: &str) -> String {
    join_tokens(&tokenize(raw, true), NumberStyle::Padded)
}

/// Local/other schemes: no class-number semantics, so dots separate numbers.
#[must_use]
pub fn normalize_local(raw: &str) -> String {
    join_tokens(&tokenize(raw, false), NumberStyle::Padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generic_pads_numbers_and_keeps_decimals() {
        assert_eq!(normalize_generic("E 3184 S75 1231"), "E 003184 S 000075 001231");
        assert_eq!(normalize_generic("pr9199.3 .l33"), "PR 009199.3 L 000033");
    }

    #[test]
    fn generic_orders_decimal_class_numbers() {
        assert!(normalize_generic("QA 9199.25") < normalize_generic("QA 9199.3"));
        assert!(normalize_generic("QA 9199") < normalize_generic("QA 9199.3"));
        assert!(normalize_generic("QA 99") < normalize_generic("QA 100"));
    }

    #[test]
    fn local_treats_dots_as_separators() {
        assert_eq!(normalize_local("Fic. Smith 2.10"), "FIC SMITH 000002 000010");
        assert!(normalize_local("BOX 2.9") < normalize_local("BOX 2.10"));
    }

    #[test]
    fn garbage_degrades_to_best_effort() {
        assert_eq!(normalize_generic(""), "");
        assert_eq!(normalize_generic("  ?!  "), "");
        assert_eq!(normalize_local("--x--"), "X");
    }
}
