use browse_config::BrowseConfig;
use browse_protocol::BrowseItem;

/// Drops intermediate values whose type is outside a typed browse option.
///
/// Windows are built over every type so neighbours keep their shelf context;
/// this pass then removes the rows the option does not cover. Cursors and
/// totals are left untouched.
pub struct IrrelevantResultFilter;

impl IrrelevantResultFilter {
    #[must_use]
    pub fn applies(config: &BrowseConfig, intermediate_values_enabled: bool) -> bool {
        config.is_typed() && !intermediate_values_enabled
    }

    pub fn apply<R>(
        items: Vec<BrowseItem<R>>,
        config: &BrowseConfig,
        intermediate_values_enabled: bool,
    ) -> Vec<BrowseItem<R>> {
        if !Self::applies(config, intermediate_values_enabled) {
            return items;
        }
        let before = items.len();
        let kept: Vec<_> = items
            .into_iter()
            .filter(|item| {
                item.is_anchor
                    || item
                        .member_type_ids
                        .iter()
                        .any(|type_id| config.type_ids.contains(type_id))
            })
            .collect();
        if kept.len() != before {
            log::debug!(
                "Dropped {} intermediate values outside option {}",
                before - kept.len(),
                config.id
            );
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use browse_protocol::BrowseOptionId;
    use browse_shelf_key::ShelvingAlgorithm;
    use pretty_assertions::assert_eq;

    fn item(key: &str, types: &[&str]) -> BrowseItem<()> {
        let mut item = BrowseItem::new(key.into(), key.into(), 1, None, ());
        item.member_type_ids = types.iter().map(|t| t.to_string()).collect();
        item
    }

    fn dewey() -> BrowseConfig {
        BrowseConfig::new(BrowseOptionId::new("DEWEY"), ShelvingAlgorithm::Dewey)
            .with_type_ids(["dewey"])
    }

    #[test]
    fn keeps_matching_types_and_anchor() {
        let mut anchor = item("B", &["lc"]);
        anchor.is_anchor = true;
        let items = vec![item("A", &["lc"]), anchor, item("C", &["lc", "dewey"]), item("D", &[])];
        let kept = IrrelevantResultFilter::apply(items, &dewey(), false);
        assert_eq!(kept.iter().map(|i| i.key.as_str()).collect::<Vec<_>>(), ["B", "C"]);
    }

    #[test]
    fn inactive_for_untyped_or_enabled_intermediates() {
        let items = || vec![item("A", &["lc"]), item("B", &["dewey"])];
        assert_eq!(IrrelevantResultFilter::apply(items(), &dewey(), true).len(), 2);

        let all = BrowseConfig::new(BrowseOptionId::all(), ShelvingAlgorithm::Generic);
        assert_eq!(IrrelevantResultFilter::apply(items(), &all, false).len(), 2);

        let untyped = BrowseConfig::new(BrowseOptionId::new("LC"), ShelvingAlgorithm::Lc);
        assert_eq!(IrrelevantResultFilter::apply(items(), &untyped, false).len(), 2);
    }
}
