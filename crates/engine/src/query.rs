use crate::error::{BrowseError, Result};
use crate::port::{Comparator, SortOrder};
use crate::settings::EngineSettings;
use browse_protocol::{BrowseMode, BrowseOptionId, Predicate, TenantScope};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A single browse request.
///
/// `anchor` is already normalized with the algorithm of the resolved browse
/// option; `display_anchor` is the raw text shown on a synthesized placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQuery {
    pub anchor: String,
    #[serde(default)]
    pub display_anchor: Option<String>,
    pub mode: BrowseMode,
    pub limit: usize,
    /// Defaults to half the limit.
    #[serde(default)]
    pub preceding_records_count: Option<usize>,
    #[serde(default)]
    pub browse_option: BrowseOptionId,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
    pub scope: TenantScope,
    #[serde(default = "default_true")]
    pub highlight_match: bool,
    #[serde(default)]
    pub expand_all: bool,
    #[serde(default)]
    pub intermediate_values_enabled: bool,
    #[serde(default = "default_true")]
    pub collapse_duplicates: bool,
}

impl BrowseQuery {
    pub fn new(anchor: impl Into<String>, mode: BrowseMode, limit: usize, scope: TenantScope) -> Self {
        Self {
            anchor: anchor.into(),
            display_anchor: None,
            mode,
            limit,
            preceding_records_count: None,
            browse_option: BrowseOptionId::all(),
            predicates: Vec::new(),
            scope,
            highlight_match: true,
            expand_all: false,
            intermediate_values_enabled: false,
            collapse_duplicates: true,
        }
    }

    pub fn around(anchor: impl Into<String>, limit: usize, scope: TenantScope) -> Self {
        Self::new(anchor, BrowseMode::Around, limit, scope)
    }

    #[must_use]
    pub fn preceding(mut self, count: usize) -> Self {
        self.preceding_records_count = Some(count);
        self
    }

    #[must_use]
    pub fn option(mut self, id: BrowseOptionId) -> Self {
        self.browse_option = id;
        self
    }

    #[must_use]
    pub fn display_anchor(mut self, raw: impl Into<String>) -> Self {
        self.display_anchor = Some(raw.into());
        self
    }

    #[must_use]
    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[must_use]
    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight_match = enabled;
        self
    }

    #[must_use]
    pub fn expand_all(mut self, enabled: bool) -> Self {
        self.expand_all = enabled;
        self
    }

    #[must_use]
    pub fn intermediate_values(mut self, enabled: bool) -> Self {
        self.intermediate_values_enabled = enabled;
        self
    }

    #[must_use]
    pub fn collapse(mut self, enabled: bool) -> Self {
        self.collapse_duplicates = enabled;
        self
    }

    /// Slots reserved before the anchor.
    #[must_use]
    pub fn preceding_count(&self) -> usize {
        self.preceding_records_count.unwrap_or(self.limit / 2)
    }

    /// Text shown for a synthesized anchor.
    #[must_use]
    pub fn anchor_display(&self) -> &str {
        self.display_anchor.as_deref().unwrap_or(&self.anchor)
    }

    /// Rejects malformed requests before any query is issued.
    pub fn validate(&self, settings: &EngineSettings) -> Result<()> {
        if self.limit == 0 || self.limit > settings.max_limit {
            return Err(BrowseError::validation(
                "limit",
                self.limit,
                format!("must be between 1 and {}", settings.max_limit),
            ));
        }
        let preceding = self.preceding_count();
        if preceding >= self.limit {
            return Err(BrowseError::validation(
                "precedingRecordsCount",
                preceding,
                "must be less than limit",
            ));
        }
        if self.mode.is_around() && self.anchor.trim().is_empty() {
            return Err(BrowseError::validation(
                "anchor",
                &self.anchor,
                "around browsing requires an anchor value",
            ));
        }
        Ok(())
    }
}

/// One comparator clause of a range expression, e.g. `callNumber >= "B"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBound {
    pub comparator: Comparator,
    pub value: String,
}

impl RangeBound {
    pub fn new(comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            comparator,
            value: value.into(),
        }
    }
}

fn bad_combination(bounds: &[RangeBound]) -> BrowseError {
    let rendered = bounds
        .iter()
        .map(|b| format!("{} {}", b.comparator, b.value))
        .collect::<Vec<_>>()
        .join(" or ");
    BrowseError::validation("query", rendered, "bad comparator combination")
}

/// Maps a comparator clause set to a mode and its anchor value.
///
/// `>= x` / `> x` give forward modes, `<= x` / `< x` backward ones. A lower
/// bound paired with `< x` over the same value gives `AROUND` (`>=`) or
/// `AROUND_EXCLUSIVE` (`>`).
pub fn mode_from_range(bounds: &[RangeBound]) -> Result<(BrowseMode, String)> {
    match bounds {
        [single] => {
            let mode = match single.comparator {
                Comparator::Gt => BrowseMode::Forward,
                Comparator::Ge => BrowseMode::ForwardInclusive,
                Comparator::Lt => BrowseMode::Backward,
                Comparator::Le => BrowseMode::BackwardInclusive,
            };
            Ok((mode, single.value.clone()))
        }
        [first, second] => {
            let (lower, upper) = match (first.comparator.order(), second.comparator.order()) {
                (a, b) if a == b => return Err(bad_combination(bounds)),
                (SortOrder::Ascending, _) => (first, second),
                _ => (second, first),
            };
            if lower.value != upper.value || upper.comparator != Comparator::Lt {
                return Err(bad_combination(bounds));
            }
            let mode = if lower.comparator == Comparator::Ge {
                BrowseMode::Around
            } else {
                BrowseMode::AroundExclusive
            };
            Ok((mode, lower.value.clone()))
        }
        _ => Err(bad_combination(bounds)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope() -> TenantScope {
        TenantScope::member("college")
    }

    #[test]
    fn preceding_defaults_to_half_limit() {
        let query = BrowseQuery::around("B", 11, scope());
        assert_eq!(query.preceding_count(), 5);
        assert_eq!(query.preceding(0).preceding_count(), 0);
    }

    #[test]
    fn validates_limits() {
        let settings = EngineSettings::default();
        assert!(BrowseQuery::around("B", 5, scope()).validate(&settings).is_ok());

        let zero = BrowseQuery::around("B", 0, scope()).validate(&settings);
        assert!(matches!(zero, Err(BrowseError::Validation { ref parameter, .. }) if parameter == "limit"));

        let too_big = BrowseQuery::around("B", settings.max_limit + 1, scope());
        assert!(too_big.validate(&settings).is_err());

        let preceding = BrowseQuery::around("B", 5, scope()).preceding(5).validate(&settings);
        assert!(
            matches!(preceding, Err(BrowseError::Validation { ref parameter, ref value, .. })
                if parameter == "precedingRecordsCount" && value == "5")
        );

        let blank = BrowseQuery::around("  ", 5, scope()).validate(&settings);
        assert!(blank.is_err());
        let open_forward = BrowseQuery::new("", BrowseMode::Forward, 5, scope());
        assert!(open_forward.validate(&settings).is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let query: BrowseQuery = serde_json::from_value(serde_json::json!({
            "anchor": "B",
            "mode": "AROUND",
            "limit": 10,
            "scope": {"tenantId": "college"}
        }))
        .unwrap();
        assert!(query.highlight_match);
        assert!(query.collapse_duplicates);
        assert!(!query.expand_all);
        assert!(query.browse_option.is_all());
    }

    #[test]
    fn range_maps_to_modes() {
        let around = mode_from_range(&[
            RangeBound::new(Comparator::Ge, "B"),
            RangeBound::new(Comparator::Lt, "B"),
        ])
        .unwrap();
        assert_eq!(around, (BrowseMode::Around, "B".to_string()));

        let exclusive = mode_from_range(&[
            RangeBound::new(Comparator::Lt, "B"),
            RangeBound::new(Comparator::Gt, "B"),
        ])
        .unwrap();
        assert_eq!(exclusive.0, BrowseMode::AroundExclusive);

        let forward = mode_from_range(&[RangeBound::new(Comparator::Ge, "F")]).unwrap();
        assert_eq!(forward.0, BrowseMode::ForwardInclusive);
        let backward = mode_from_range(&[RangeBound::new(Comparator::Lt, "F")]).unwrap();
        assert_eq!(backward.0, BrowseMode::Backward);
    }

    #[test]
    fn rejects_bad_combinations() {
        let cases = [
            vec![],
            vec![RangeBound::new(Comparator::Gt, "A"), RangeBound::new(Comparator::Ge, "A")],
            vec![RangeBound::new(Comparator::Ge, "A"), RangeBound::new(Comparator::Lt, "B")],
            vec![RangeBound::new(Comparator::Ge, "A"), RangeBound::new(Comparator::Le, "A")],
        ];
        for bounds in cases {
            let err = mode_from_range(&bounds).unwrap_err();
            assert!(err.is_validation(), "{bounds:?}");
        }
    }
}
