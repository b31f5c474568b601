//! # Browse Memory Index
//!
//! A [`DirectionalQueryPort`](browse_engine::DirectionalQueryPort) backed by
//! sorted in-memory trees, one per shelving algorithm:
//!
//! ```text
//! records ──extract_key(alg)──> BTreeMap<key, [id, ...]>   (x6 algorithms)
//!                                  │
//!              range(> k) / range(< k).rev() ─> scope + predicates ─> slice
//! ```
//!
//! Used by the `catalog-browse` CLI and as the reference adapter in tests.

mod error;
mod index;

pub use error::{IndexError, Result};
pub use index::MemoryIndex;
