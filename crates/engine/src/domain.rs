use browse_protocol::BrowseField;
use browse_shelf_key::ShelvingAlgorithm;

/// Ownership data every indexed record carries.
pub trait CatalogRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    fn tenant_id(&self) -> &str;

    fn shared(&self) -> bool;
}

/// How one record family is keyed, displayed and collapsed.
///
/// The merger and the index adapters are generic over this trait, so adding a
/// browsable family means adding a domain, not another merger.
pub trait BrowseDomain: Send + Sync {
    type Record: CatalogRecord;

    fn field(&self) -> BrowseField;

    /// Sort key of `record` under `algorithm`.
    fn extract_key(&self, record: &Self::Record, algorithm: ShelvingAlgorithm) -> String;

    fn display_value(&self, record: &Self::Record) -> String;

    fn type_id(&self, record: &Self::Record) -> Option<String>;

    /// Normalizes a user supplied anchor the same way keys are extracted.
    fn anchor_key(&self, raw: &str, algorithm: ShelvingAlgorithm) -> String {
        browse_shelf_key::normalize(raw, algorithm)
    }

    /// Records a single entry stands for (linked instances, titles, ...).
    fn record_count(&self, _record: &Self::Record) -> u64 {
        1
    }

    /// Count of a run of same-key records.
    fn aggregate_count(&self, group: &[Self::Record]) -> u64 {
        group.iter().map(|record| self.record_count(record)).sum()
    }

    /// The record shown for a collapsed run; `group` is in ascending order.
    fn project_representative(&self, group: &[Self::Record]) -> Option<Self::Record> {
        group.first().cloned()
    }
}
