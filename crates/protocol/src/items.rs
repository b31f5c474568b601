use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// One row of a browse page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrowseItem<R> {
    /// Normalized sort key.
    pub key: String,
    /// Value shown to the user (possibly highlighted).
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_anchor: bool,
    /// Aggregated number of records behind this row.
    #[serde(rename = "totalRecords")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<R>,
    /// Type ids of every collapsed member, for relevance filtering.
    #[serde(skip)]
    pub member_type_ids: Vec<String>,
}

impl<R> BrowseItem<R> {
    pub fn new(key: String, value: String, count: u64, type_id: Option<String>, record: R) -> Self {
        let member_type_ids = type_id.iter().cloned().collect();
        Self {
            key,
            value,
            is_anchor: false,
            count,
            type_id,
            record: Some(record),
            member_type_ids,
        }
    }

    /// Zero-count stand-in for an anchor that has no record.
    pub fn placeholder(key: String, value: String) -> Self {
        Self {
            key,
            value,
            is_anchor: true,
            count: 0,
            type_id: None,
            record: None,
            member_type_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.record.is_none() && self.count == 0 && self.is_anchor
    }
}

/// A browse page: `{ totalRecords, prev, next, items }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResult<R> {
    pub total_records: u64,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub items: Vec<BrowseItem<R>>,
}

impl<R> BrowseResult<R> {
    pub fn empty(total_records: u64) -> Self {
        Self {
            total_records,
            prev: None,
            next: None,
            items: Vec::new(),
        }
    }
}
