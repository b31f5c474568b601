use crate::error::{IndexError, Result};
use async_trait::async_trait;
use browse_engine::{
    BrowseDomain, BrowseEntry, BrowseSlice, CatalogRecord, Comparator, CountRequest,
    DirectionalQueryPort, PortError, SliceRequest, SortOrder,
};
use browse_protocol::{record_allowed, Predicate, TenantScope};
use browse_shelf_key::ShelvingAlgorithm;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::Path;

/// Ids sharing one key, kept sorted.
type KeyTree = BTreeMap<String, Vec<String>>;

/// Ordered in-memory index of one record family.
///
/// Every record is keyed once per shelving algorithm, so any browse option can
/// be answered without re-sorting. Equal keys are ordered by record id.
pub struct MemoryIndex<D: BrowseDomain> {
    domain: D,
    records: HashMap<String, D::Record>,
    trees: HashMap<ShelvingAlgorithm, KeyTree>,
}

impl<D: BrowseDomain> MemoryIndex<D> {
    pub fn new(domain: D) -> Self {
        let trees = ShelvingAlgorithm::ALL
            .iter()
            .map(|algorithm| (*algorithm, KeyTree::new()))
            .collect();
        Self {
            domain,
            records: HashMap::new(),
            trees,
        }
    }

    /// Builds an index, rejecting duplicate record ids.
    pub fn from_records(domain: D, records: impl IntoIterator<Item = D::Record>) -> Result<Self> {
        let mut index = Self::new(domain);
        for record in records {
            if index.records.contains_key(record.id()) {
                return Err(IndexError::DuplicateId(record.id().to_string()));
            }
            index.upsert(record);
        }
        log::debug!("Indexed {} {} records", index.len(), index.domain.field());
        Ok(index)
    }

    #[must_use]
    pub fn domain(&self) -> &D {
        &self.domain
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&D::Record> {
        self.records.get(id)
    }

    /// Inserts `record`, replacing any record with the same id.
    pub fn upsert(&mut self, record: D::Record) {
        let id = record.id().to_string();
        self.remove(&id);
        for (algorithm, tree) in &mut self.trees {
            let key = self.domain.extract_key(&record, *algorithm);
            let ids = tree.entry(key).or_default();
            let position = ids.binary_search(&id).unwrap_or_else(|at| at);
            ids.insert(position, id.clone());
        }
        self.records.insert(id, record);
    }

    pub fn remove(&mut self, id: &str) -> Option<D::Record> {
        let record = self.records.remove(id)?;
        for (algorithm, tree) in &mut self.trees {
            let key = self.domain.extract_key(&record, *algorithm);
            if let Some(ids) = tree.get_mut(&key) {
                ids.retain(|existing| existing != id);
                if ids.is_empty() {
                    tree.remove(&key);
                }
            }
        }
        Some(record)
    }

    fn allowed(&self, record: &D::Record, request_scope: &SliceScope<'_>) -> bool {
        let type_id = self.domain.type_id(record);
        record_allowed(
            request_scope.scope,
            request_scope.predicates,
            record.tenant_id(),
            record.shared(),
            type_id.as_deref(),
        )
    }

    fn tree(&self, algorithm: ShelvingAlgorithm) -> std::result::Result<&KeyTree, PortError> {
        self.trees
            .get(&algorithm)
            .ok_or_else(|| PortError::Unavailable(format!("no {algorithm} key tree")))
    }

    fn entry(&self, key: &str, record: &D::Record) -> BrowseEntry<D::Record> {
        BrowseEntry {
            key: key.to_string(),
            type_id: self.domain.type_id(record),
            record: record.clone(),
        }
    }
}

impl<D> MemoryIndex<D>
where
    D: BrowseDomain,
    D::Record: DeserializeOwned,
{
    /// Loads a JSON array of records.
    pub async fn load_json(domain: D, path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let records: Vec<D::Record> = serde_json::from_slice(&bytes)?;
        log::info!("Loaded {} records from {}", records.len(), path.display());
        Self::from_records(domain, records)
    }
}

struct SliceScope<'a> {
    scope: &'a TenantScope,
    predicates: &'a [Predicate],
}

#[async_trait]
impl<D: BrowseDomain> DirectionalQueryPort<D::Record> for MemoryIndex<D> {
    async fn fetch(
        &self,
        request: &SliceRequest,
    ) -> std::result::Result<BrowseSlice<D::Record>, PortError> {
        let tree = self.tree(request.algorithm)?;
        let filter = SliceScope {
            scope: &request.scope,
            predicates: &request.predicates,
        };
        let bound = request.key.as_str();
        let range: Box<dyn Iterator<Item = (&String, &Vec<String>)> + Send + '_> =
            match request.comparator {
                Comparator::Gt => Box::new(
                    tree.range::<str, _>((Bound::Excluded(bound), Bound::Unbounded)),
                ),
                Comparator::Ge => Box::new(
                    tree.range::<str, _>((Bound::Included(bound), Bound::Unbounded)),
                ),
                Comparator::Lt => Box::new(
                    tree.range::<str, _>((Bound::Unbounded, Bound::Excluded(bound)))
                        .rev(),
                ),
                Comparator::Le => Box::new(
                    tree.range::<str, _>((Bound::Unbounded, Bound::Included(bound)))
                        .rev(),
                ),
            };
        let descending = request.order() == SortOrder::Descending;

        let mut entries = Vec::with_capacity(request.size.min(self.records.len()));
        let mut has_more_beyond = false;
        'keys: for (key, ids) in range {
            let ordered: Box<dyn Iterator<Item = &String>> = if descending {
                Box::new(ids.iter().rev())
            } else {
                Box::new(ids.iter())
            };
            for id in ordered {
                let Some(record) = self.records.get(id) else {
                    continue;
                };
                if !self.allowed(record, &filter) {
                    continue;
                }
                if entries.len() == request.size {
                    has_more_beyond = true;
                    break 'keys;
                }
                entries.push(self.entry(key, record));
            }
        }
        Ok(BrowseSlice {
            entries,
            has_more_beyond,
        })
    }

    async fn count(&self, request: &CountRequest) -> std::result::Result<u64, PortError> {
        let filter = SliceScope {
            scope: &request.scope,
            predicates: &request.predicates,
        };
        Ok(self
            .records
            .values()
            .filter(|record| self.allowed(record, &filter))
            .count() as u64)
    }
}
