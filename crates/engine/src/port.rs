use crate::error::PortError;
use async_trait::async_trait;
use browse_protocol::{BrowseField, Predicate, TenantScope};
use browse_shelf_key::ShelvingAlgorithm;
use std::fmt;

/// Range comparator of a directional slice, relative to the request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    /// Ascending for lower bounds, descending for upper bounds.
    #[must_use]
    pub const fn order(self) -> SortOrder {
        match self {
            Self::Lt | Self::Le => SortOrder::Descending,
            Self::Gt | Self::Ge => SortOrder::Ascending,
        }
    }

    /// Same direction, reaching the bound key itself.
    #[must_use]
    pub const fn inclusive(self) -> Self {
        match self {
            Self::Lt | Self::Le => Self::Le,
            Self::Gt | Self::Ge => Self::Ge,
        }
    }

    /// The opposite side of the same split point: `> k` pairs with `<= k`.
    #[must_use]
    pub const fn complement(self) -> Self {
        match self {
            Self::Lt => Self::Ge,
            Self::Le => Self::Gt,
            Self::Gt => Self::Le,
            Self::Ge => Self::Lt,
        }
    }

    #[must_use]
    pub fn admits(self, key: &str, bound: &str) -> bool {
        match self {
            Self::Lt => key < bound,
            Self::Le => key <= bound,
            Self::Gt => key > bound,
            Self::Ge => key >= bound,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One directional range query: `field <comparator> key`, sorted away from
/// `key`, at most `size` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRequest {
    pub field: BrowseField,
    pub algorithm: ShelvingAlgorithm,
    pub comparator: Comparator,
    pub key: String,
    pub size: usize,
    pub scope: TenantScope,
    pub predicates: Vec<Predicate>,
}

impl SliceRequest {
    #[must_use]
    pub fn order(&self) -> SortOrder {
        self.comparator.order()
    }
}

/// Count of every entry matching scope and predicates, independent of any anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct CountRequest {
    pub field: BrowseField,
    pub algorithm: ShelvingAlgorithm,
    pub scope: TenantScope,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseEntry<R> {
    pub key: String,
    pub type_id: Option<String>,
    pub record: R,
}

/// Entries in request order plus whether more matching entries exist past the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseSlice<R> {
    pub entries: Vec<BrowseEntry<R>>,
    pub has_more_beyond: bool,
}

impl<R> BrowseSlice<R> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            has_more_beyond: false,
        }
    }
}

/// Ordered range access to an index of browse entries.
///
/// Entries with equal keys are returned in a stable order (by record id) so
/// repeated requests see identical slices.
#[async_trait]
pub trait DirectionalQueryPort<R>: Send + Sync {
    async fn fetch(&self, request: &SliceRequest) -> Result<BrowseSlice<R>, PortError>;

    async fn count(&self, request: &CountRequest) -> Result<u64, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comparator_sides() {
        assert_eq!(Comparator::Gt.order(), SortOrder::Ascending);
        assert_eq!(Comparator::Le.order(), SortOrder::Descending);
        assert_eq!(Comparator::Gt.complement(), Comparator::Le);
        assert_eq!(Comparator::Lt.complement(), Comparator::Ge);
        assert_eq!(Comparator::Lt.inclusive(), Comparator::Le);

        assert!(Comparator::Ge.admits("B", "B"));
        assert!(!Comparator::Gt.admits("B", "B"));
        assert!(Comparator::Lt.admits("A", "B"));
    }
}
