//! Anchor-centered windowing over two directional range queries.
//!
//! ```text
//!            backward (< anchor, desc)      forward (>= anchor, asc)
//!   ... e d c b a  <──────────── anchor ────────────>  A B C D E ...
//!             └─ last p units ─┘         └─ first limit - p units ─┘
//! ```
//!
//! Both sides and the total count are requested concurrently. Each side asks
//! for one unit more than it keeps; seeing that extra unit is what makes the
//! `prev` / `next` cursors exact.

use crate::collapse::ItemCollapser;
use crate::domain::BrowseDomain;
use crate::error::{BrowseError, PortError, Result};
use crate::port::{
    BrowseEntry, Comparator, CountRequest, DirectionalQueryPort, SliceRequest, SortOrder,
};
use crate::query::BrowseQuery;
use crate::settings::EngineSettings;
use browse_config::BrowseConfig;
use browse_protocol::{BrowseItem, BrowseMode, BrowseResult, Predicate};

/// Every unit fetched on one side, ascending.
struct Side<R> {
    items: Vec<BrowseItem<R>>,
    /// No matching entries exist past the fetched ones.
    exhausted: bool,
}

impl<R> Side<R> {
    fn has_more_than(&self, kept: usize) -> bool {
        !self.exhausted || self.items.len() > kept
    }
}

fn distinct_keys<R>(entries: &[BrowseEntry<R>]) -> usize {
    let mut count = 0;
    let mut previous: Option<&str> = None;
    for entry in entries {
        if previous != Some(entry.key.as_str()) {
            count += 1;
            previous = Some(entry.key.as_str());
        }
    }
    count
}

fn take_last<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(n);
    items.split_off(skip)
}

pub struct BrowseWindowMerger<'a, D, P: ?Sized> {
    domain: &'a D,
    port: &'a P,
    settings: &'a EngineSettings,
}

impl<'a, D, P> BrowseWindowMerger<'a, D, P>
where
    D: BrowseDomain,
    P: DirectionalQueryPort<D::Record> + ?Sized,
{
    pub fn new(domain: &'a D, port: &'a P, settings: &'a EngineSettings) -> Self {
        Self {
            domain,
            port,
            settings,
        }
    }

    /// Builds the window for an already validated query.
    ///
    /// Items are ascending by key, flagged `is_anchor` where the key equals
    /// the anchor and the mode reaches it, and still carry their records.
    pub async fn merge(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
    ) -> Result<BrowseResult<D::Record>> {
        let mut result = match query.mode {
            BrowseMode::Around | BrowseMode::AroundExclusive => self.around(query, config).await?,
            BrowseMode::Forward | BrowseMode::ForwardInclusive => {
                self.forward(query, config).await?
            }
            BrowseMode::Backward | BrowseMode::BackwardInclusive => {
                self.backward(query, config).await?
            }
        };
        if query.collapse_duplicates {
            result.items = ItemCollapser::collapse(result.items);
        }
        if query.mode.includes_anchor() {
            for item in &mut result.items {
                if item.key == query.anchor {
                    item.is_anchor = true;
                }
            }
        }
        log::debug!(
            "Browse {} {} '{}': {} items, total {}, prev {:?}, next {:?}",
            self.domain.field(),
            query.mode,
            query.anchor,
            result.items.len(),
            result.total_records,
            result.prev,
            result.next
        );
        Ok(result)
    }

    async fn around(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
    ) -> Result<BrowseResult<D::Record>> {
        let preceding = query.preceding_count();
        let following = query.limit - preceding;
        let forward_comparator = if query.mode == BrowseMode::Around {
            Comparator::Ge
        } else {
            Comparator::Gt
        };

        let (backward, forward, total) = tokio::try_join!(
            self.fetch_side(query, config, Comparator::Lt, preceding + 1),
            self.fetch_side(query, config, forward_comparator, following + 1),
            self.count(query, config),
        )?;

        let more_before = backward.has_more_than(preceding);
        let anchor_found = forward
            .items
            .first()
            .is_some_and(|item| item.key == query.anchor);
        let any_data = !backward.items.is_empty() || !forward.items.is_empty();
        let synthesize = query.mode == BrowseMode::Around
            && query.highlight_match
            && !anchor_found
            && any_data;

        let mut window = take_last(backward.items, preceding);
        let mut forward_slots = following;
        if synthesize {
            window.push(BrowseItem::placeholder(
                query.anchor.clone(),
                query.anchor_display().to_string(),
            ));
            forward_slots -= 1;
        }
        let more_after = !forward.exhausted || forward.items.len() > forward_slots;
        window.extend(forward.items.into_iter().take(forward_slots));

        Ok(Self::with_cursors(window, total, more_before, more_after))
    }

    async fn forward(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
    ) -> Result<BrowseResult<D::Record>> {
        let comparator = if query.mode == BrowseMode::ForwardInclusive {
            Comparator::Ge
        } else {
            Comparator::Gt
        };
        let (side, earlier, total) = tokio::try_join!(
            self.fetch_side(query, config, comparator, query.limit + 1),
            self.probe(query, config, comparator.complement()),
            self.count(query, config),
        )?;
        let more_after = side.has_more_than(query.limit);
        let mut window = side.items;
        window.truncate(query.limit);
        Ok(Self::with_cursors(window, total, earlier, more_after))
    }

    async fn backward(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
    ) -> Result<BrowseResult<D::Record>> {
        let comparator = if query.mode == BrowseMode::BackwardInclusive {
            Comparator::Le
        } else {
            Comparator::Lt
        };
        let (side, later, total) = tokio::try_join!(
            self.fetch_side(query, config, comparator, query.limit + 1),
            self.probe(query, config, comparator.complement()),
            self.count(query, config),
        )?;
        let more_before = side.has_more_than(query.limit);
        let window = take_last(side.items, query.limit);
        Ok(Self::with_cursors(window, total, more_before, later))
    }

    fn with_cursors(
        items: Vec<BrowseItem<D::Record>>,
        total_records: u64,
        more_before: bool,
        more_after: bool,
    ) -> BrowseResult<D::Record> {
        let prev = items
            .first()
            .filter(|_| more_before)
            .map(|item| item.key.clone());
        let next = items
            .last()
            .filter(|_| more_after)
            .map(|item| item.key.clone());
        BrowseResult {
            total_records,
            prev,
            next,
            items,
        }
    }

    fn slice_request(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
        comparator: Comparator,
        size: usize,
    ) -> SliceRequest {
        SliceRequest {
            field: self.domain.field(),
            algorithm: config.shelving_algorithm,
            comparator,
            key: query.anchor.clone(),
            size,
            scope: query.scope.clone(),
            predicates: query.predicates.clone(),
        }
    }

    async fn count(&self, query: &BrowseQuery, config: &BrowseConfig) -> Result<u64> {
        let mut predicates = query.predicates.clone();
        if config.is_typed() {
            predicates.push(Predicate::TypeIdIn(
                config.type_ids.iter().cloned().collect(),
            ));
        }
        let request = CountRequest {
            field: self.domain.field(),
            algorithm: config.shelving_algorithm,
            scope: query.scope.clone(),
            predicates,
        };
        Ok(self.port.count(&request).await?)
    }

    /// Whether at least one entry matches `comparator` relative to the anchor.
    async fn probe(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
        comparator: Comparator,
    ) -> Result<bool> {
        let request = self.slice_request(query, config, comparator, 1);
        let slice = self.port.fetch(&request).await?;
        Ok(!slice.entries.is_empty())
    }

    /// Pages away from the anchor until `units` units are known or the index
    /// runs out.
    ///
    /// A page that stops short of the end may split the run of its last key,
    /// so that run is dropped and re-read from the key inclusively by the next
    /// page. A page holding a single key run is retried at double size.
    async fn fetch_side(
        &self,
        query: &BrowseQuery,
        config: &BrowseConfig,
        comparator: Comparator,
        units: usize,
    ) -> Result<Side<D::Record>> {
        let collapse = query.collapse_duplicates;
        let size = units.max(self.settings.min_fetch_size);
        let mut request = self.slice_request(query, config, comparator, size);
        let mut entries: Vec<BrowseEntry<D::Record>> = Vec::new();
        let mut exhausted = false;
        let mut rounds = 0;

        loop {
            if rounds == self.settings.max_fetch_rounds {
                return Err(BrowseError::Upstream(PortError::Other(format!(
                    "no progress after {rounds} fetches {} '{}'",
                    request.comparator, request.key
                ))));
            }
            rounds += 1;

            let slice = self.port.fetch(&request).await?;
            let mut page = slice.entries;
            if page.is_empty() || !slice.has_more_beyond {
                entries.append(&mut page);
                exhausted = true;
                break;
            }

            let received = page.len();
            let Some(tail_key) = page.last().map(|entry| entry.key.clone()) else {
                break;
            };
            let tail_run = page
                .iter()
                .rev()
                .take_while(|entry| entry.key == tail_key)
                .count();
            if tail_run == received {
                request.size = request.size.saturating_mul(2);
                log::debug!(
                    "Key run '{}' fills the page; widening to {}",
                    tail_key,
                    request.size
                );
                continue;
            }

            page.truncate(received - tail_run);
            entries.append(&mut page);
            let have = if collapse {
                distinct_keys(&entries)
            } else {
                entries.len()
            };
            if have >= units {
                break;
            }
            request.comparator = comparator.inclusive();
            request.key = tail_key;
            request.size = (tail_run + units - have).max(self.settings.min_fetch_size);
        }

        if comparator.order() == SortOrder::Descending {
            entries.reverse();
        }
        let items = if collapse {
            ItemCollapser::collapse_entries(self.domain, entries)
        } else {
            ItemCollapser::itemize(self.domain, entries)
        };
        Ok(Side { items, exhausted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{CallNumberDomain, CallNumberRecord};
    use crate::test_support::{FakePort, RecordingPort};
    use browse_protocol::{BrowseOptionId, TenantScope};
    use browse_shelf_key::ShelvingAlgorithm;
    use pretty_assertions::assert_eq;

    fn all_config() -> BrowseConfig {
        BrowseConfig::new(BrowseOptionId::all(), ShelvingAlgorithm::Generic)
    }

    fn keys(result: &BrowseResult<CallNumberRecord>) -> Vec<&str> {
        result.items.iter().map(|item| item.key.as_str()).collect()
    }

    fn query(anchor: &str, mode: BrowseMode, limit: usize) -> BrowseQuery {
        BrowseQuery::new(anchor, mode, limit, TenantScope::member("college"))
    }

    async fn run(port: &FakePort, query: &BrowseQuery) -> BrowseResult<CallNumberRecord> {
        let settings = EngineSettings::default();
        BrowseWindowMerger::new(&CallNumberDomain, port, &settings)
            .merge(query, &all_config())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn around_existing_anchor() {
        let port = FakePort::with_keys(&["A", "B", "C", "D", "E", "F", "G"]);
        let result = run(&port, &query("D", BrowseMode::Around, 3).preceding(1)).await;
        assert_eq!(keys(&result), ["C", "D", "E"]);
        assert!(result.items[1].is_anchor);
        assert_eq!(result.prev.as_deref(), Some("C"));
        assert_eq!(result.next.as_deref(), Some("E"));
        assert_eq!(result.total_records, 7);
    }

    #[tokio::test]
    async fn around_missing_anchor_inserts_placeholder() {
        let port = FakePort::with_keys(&["A", "B", "D", "E"]);
        let result = run(&port, &query("C", BrowseMode::Around, 3).preceding(1)).await;
        assert_eq!(keys(&result), ["B", "C", "D"]);
        assert!(result.items[1].is_placeholder());
        assert_eq!(result.items[1].count, 0);
        assert_eq!(result.prev.as_deref(), Some("B"));
        assert_eq!(result.next.as_deref(), Some("D"));
    }

    #[tokio::test]
    async fn around_without_highlight_has_no_placeholder() {
        let port = FakePort::with_keys(&["A", "B", "D", "E"]);
        let result = run(&port, &query("C", BrowseMode::Around, 3).preceding(1).highlight(false)).await;
        assert_eq!(keys(&result), ["B", "D", "E"]);
        assert!(result.items.iter().all(|item| !item.is_anchor));
    }

    #[tokio::test]
    async fn around_exclusive_skips_anchor() {
        let port = FakePort::with_keys(&["A", "B", "C", "D", "E"]);
        let result = run(&port, &query("C", BrowseMode::AroundExclusive, 4).preceding(2)).await;
        assert_eq!(keys(&result), ["A", "B", "D", "E"]);
        assert!(result.items.iter().all(|item| !item.is_anchor));
        assert_eq!(result.prev, None);
        assert_eq!(result.next, None);
    }

    #[tokio::test]
    async fn short_backward_side_shrinks_window() {
        let port = FakePort::with_keys(&["A", "B", "C", "D", "E", "F"]);
        let result = run(&port, &query("B", BrowseMode::Around, 5).preceding(3)).await;
        assert_eq!(keys(&result), ["A", "B", "C"]);
        assert_eq!(result.prev, None);
        assert_eq!(result.next.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn anchor_past_the_end_keeps_placeholder_last() {
        let port = FakePort::with_keys(&["A", "B", "C"]);
        let result = run(&port, &query("Z", BrowseMode::Around, 4).preceding(2)).await;
        assert_eq!(keys(&result), ["B", "C", "Z"]);
        assert_eq!(result.prev.as_deref(), Some("B"));
        assert_eq!(result.next, None);
    }

    #[tokio::test]
    async fn empty_index_gives_empty_window() {
        let port = FakePort::with_keys(&[]);
        let result = run(&port, &query("M", BrowseMode::Around, 4)).await;
        assert!(result.items.is_empty());
        assert_eq!((result.prev, result.next, result.total_records), (None, None, 0));
    }

    #[tokio::test]
    async fn forward_collapses_duplicates_across_pages() {
        let port = FakePort::with_keys(&["A", "F1", "F1", "F1", "F1", "F2", "G", "H"]);
        let settings = EngineSettings::default();
        let result = BrowseWindowMerger::new(&CallNumberDomain, &port, &settings)
            .merge(&query("F", BrowseMode::Forward, 2), &all_config())
            .await
            .unwrap();
        assert_eq!(keys(&result), ["F1", "F2"]);
        assert_eq!(result.items[0].count, 4);
        assert_eq!(result.prev.as_deref(), Some("F1"));
        assert_eq!(result.next.as_deref(), Some("F2"));
    }

    #[tokio::test]
    async fn forward_without_collapsing_counts_entries() {
        let port = FakePort::with_keys(&["F1", "F1", "F2"]);
        let result = run(&port, &query("F", BrowseMode::Forward, 2).collapse(false)).await;
        assert_eq!(keys(&result), ["F1", "F1"]);
        assert_eq!(result.prev, None);
        assert_eq!(result.next.as_deref(), Some("F1"));
    }

    #[tokio::test]
    async fn backward_inclusive_flags_anchor() {
        let port = FakePort::with_keys(&["A", "B", "C", "D"]);
        let result = run(&port, &query("C", BrowseMode::BackwardInclusive, 2)).await;
        assert_eq!(keys(&result), ["B", "C"]);
        assert!(result.items[1].is_anchor);
        assert_eq!(result.prev.as_deref(), Some("B"));
        assert_eq!(result.next.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn single_key_page_widens() {
        let mut keys_in: Vec<&str> = vec!["B"; 9];
        keys_in.push("C");
        let port = RecordingPort::new(FakePort::with_keys(&keys_in));
        let settings = EngineSettings::default();
        let result = BrowseWindowMerger::new(&CallNumberDomain, &port, &settings)
            .merge(&query("A", BrowseMode::Forward, 1), &all_config())
            .await
            .unwrap();
        assert_eq!(result.items[0].key, "B");
        assert_eq!(result.items[0].count, 9);
        assert_eq!(result.next.as_deref(), Some("B"));
        assert!(port.sizes().iter().any(|size| *size >= 8));
    }

    #[tokio::test]
    async fn runaway_port_is_bounded() {
        let port = FakePort::with_keys(&["B", "B"]).always_more();
        let settings = EngineSettings {
            max_fetch_rounds: 3,
            ..EngineSettings::default()
        };
        let err = BrowseWindowMerger::new(&CallNumberDomain, &port, &settings)
            .merge(&query("A", BrowseMode::Forward, 1), &all_config())
            .await
            .unwrap_err();
        assert!(matches!(err, BrowseError::Upstream(_)));
    }

    #[test]
    fn distinct_key_counting() {
        let entries: Vec<BrowseEntry<()>> = ["A", "A", "B", "C", "C"]
            .iter()
            .map(|key| BrowseEntry {
                key: key.to_string(),
                type_id: None,
                record: (),
            })
            .collect();
        assert_eq!(distinct_keys(&entries), 3);
        assert_eq!(take_last(vec![1, 2, 3], 2), vec![2, 3]);
        assert_eq!(take_last(vec![1], 5), vec![1]);
    }
}
