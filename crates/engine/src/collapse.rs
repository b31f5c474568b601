use crate::domain::BrowseDomain;
use crate::port::BrowseEntry;
use browse_protocol::BrowseItem;

/// Merges runs of identical browse keys into single items.
pub struct ItemCollapser;

impl ItemCollapser {
    /// One item per entry, in input order.
    pub fn itemize<D: BrowseDomain>(
        domain: &D,
        entries: Vec<BrowseEntry<D::Record>>,
    ) -> Vec<BrowseItem<D::Record>> {
        entries
            .into_iter()
            .map(|entry| {
                let count = domain.record_count(&entry.record);
                let value = domain.display_value(&entry.record);
                BrowseItem::new(entry.key, value, count, entry.type_id, entry.record)
            })
            .collect()
    }

    /// One item per run of equal keys in an ascending entry list, with the
    /// count and representative chosen by `domain`.
    pub fn collapse_entries<D: BrowseDomain>(
        domain: &D,
        entries: Vec<BrowseEntry<D::Record>>,
    ) -> Vec<BrowseItem<D::Record>> {
        let mut items = Vec::new();
        let mut run: Vec<BrowseEntry<D::Record>> = Vec::new();
        for entry in entries {
            if run.last().is_some_and(|last| last.key != entry.key) {
                items.extend(Self::collapse_run(domain, std::mem::take(&mut run)));
            }
            run.push(entry);
        }
        items.extend(Self::collapse_run(domain, run));
        items
    }

    fn collapse_run<D: BrowseDomain>(
        domain: &D,
        run: Vec<BrowseEntry<D::Record>>,
    ) -> Option<BrowseItem<D::Record>> {
        let key = run.first()?.key.clone();
        let mut member_type_ids: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(run.len());
        for entry in run {
            if let Some(type_id) = entry.type_id {
                if !member_type_ids.contains(&type_id) {
                    member_type_ids.push(type_id);
                }
            }
            records.push(entry.record);
        }
        let count = domain.aggregate_count(&records);
        let representative = domain.project_representative(&records)?;
        let value = domain.display_value(&representative);
        let type_id = domain.type_id(&representative);
        let mut item = BrowseItem::new(key, value, count, type_id, representative);
        item.member_type_ids = member_type_ids;
        Some(item)
    }

    /// Merges adjacent items sharing a key: counts add up, the first item stays
    /// the representative, and the merged item is the anchor if any member was.
    pub fn collapse<R>(items: Vec<BrowseItem<R>>) -> Vec<BrowseItem<R>> {
        let mut merged: Vec<BrowseItem<R>> = Vec::with_capacity(items.len());
        for item in items {
            match merged.last_mut() {
                Some(last) if last.key == item.key => {
                    last.count += item.count;
                    last.is_anchor |= item.is_anchor;
                    if last.record.is_none() && item.record.is_some() {
                        last.value = item.value;
                        last.record = item.record;
                        last.type_id = item.type_id;
                    }
                    for type_id in item.member_type_ids {
                        if !last.member_type_ids.contains(&type_id) {
                            last.member_type_ids.push(type_id);
                        }
                    }
                }
                _ => merged.push(item),
            }
        }
        merged
    }
}
