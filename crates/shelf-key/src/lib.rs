//! # Browse Shelf Key
//!
//! Turns raw catalog values into keys whose byte order matches shelf order.
//!
//! ## Schemes
//!
//! ```text
//! raw call number ──┬─> LC / NLM   class letters, class number, cutters, suffix
//!                   ├─> DEWEY      class number, cutter, suffix
//!                   ├─> SUDOC      stem : book number
//!                   ├─> LOCAL      alphanumeric runs
//!                   └─> GENERIC    scheme-agnostic ("ALL" browse, fallback)
//!
//! raw heading ─────────> normalize_heading (subjects, contributors, authorities)
//! ```
//!
//! Every function here is pure and total: malformed input yields a best-effort
//! key instead of an error, so a single bad record never blocks browsing.
//!
//! ## Example
//!
//! ```
//! use browse_shelf_key::{normalize, ShelvingAlgorithm};
//!
//! assert_eq!(normalize("PR9199.3 .L33 1990", ShelvingAlgorithm::Lc), "PR 49199.3 L33 41990");
//! assert_eq!(normalize("308 H977", ShelvingAlgorithm::Dewey), "3308 H977");
//! ```

mod algorithm;
mod dewey;
mod generic;
mod heading;
mod lc;
mod sudoc;
mod tokens;

pub use algorithm::{ShelvingAlgorithm, UnknownAlgorithm};
pub use dewey::normalize_dewey;
pub use generic::{normalize_generic, normalize_local};
pub use heading::normalize_heading;
pub use lc::{normalize_lc, normalize_nlm};
pub use sudoc::normalize_sudoc;
pub use tokens::{length_prefixed, pad_number, NUMBER_WIDTH};

/// Normalizes `raw` with the rules of `algorithm`.
#[must_use]
pub fn normalize(raw: &str, algorithm: ShelvingAlgorithm) -> String {
    (algorithm.normalizer())(raw)
}
