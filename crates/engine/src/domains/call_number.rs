use super::join_present;
use crate::domain::{BrowseDomain, CatalogRecord};
use browse_protocol::BrowseField;
use browse_shelf_key::{normalize, normalize_generic, ShelvingAlgorithm};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An item's effective call number with its enumeration data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallNumberRecord {
    pub id: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    pub tenant_id: String,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub prefix: Option<String>,
    pub call_number: String,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub enumeration: Option<String>,
    #[serde(default)]
    pub chronology: Option<String>,
    #[serde(default)]
    pub copy_number: Option<String>,
    #[serde(default)]
    pub type_id: Option<String>,
    /// Shelving order precomputed at ingestion; keys `ALL` browse in place of
    /// the call number.
    #[serde(default)]
    pub effective_shelving_order: Option<String>,
}

impl CallNumberRecord {
    pub fn new(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        call_number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            instance_id: None,
            tenant_id: tenant_id.into(),
            shared: false,
            prefix: None,
            call_number: call_number.into(),
            suffix: None,
            volume: None,
            enumeration: None,
            chronology: None,
            copy_number: None,
            type_id: None,
            effective_shelving_order: None,
        }
    }

    #[must_use]
    pub fn with_type_id(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    #[must_use]
    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    /// `prefix callNumber suffix`, as printed on the spine label.
    pub fn full_call_number(&self) -> String {
        join_present([
            self.prefix.as_deref(),
            Some(self.call_number.as_str()),
            self.suffix.as_deref(),
        ])
    }

    fn shelving_order(&self) -> Option<&str> {
        self.effective_shelving_order
            .as_deref()
            .filter(|order| !order.trim().is_empty())
    }

    fn item_parts(&self) -> String {
        join_present([
            self.suffix.as_deref(),
            self.volume.as_deref(),
            self.enumeration.as_deref(),
            self.chronology.as_deref(),
            self.copy_number.as_deref(),
        ])
    }
}

impl CatalogRecord for CallNumberRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn shared(&self) -> bool {
        self.shared
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallNumberDomain;

impl BrowseDomain for CallNumberDomain {
    type Record = CallNumberRecord;

    fn field(&self) -> BrowseField {
        BrowseField::CallNumber
    }

    // Prefix is ignored for shelving; item parts sort after the class part.
    // Generic keys pass through `normalize_generic` whatever their source, so a
    // precomputed shelving order and a bare call number land on one scale.
    fn extract_key(&self, record: &CallNumberRecord, algorithm: ShelvingAlgorithm) -> String {
        if algorithm == ShelvingAlgorithm::Generic {
            return match record.shelving_order() {
                Some(order) => normalize_generic(order),
                None => normalize_generic(&join_present([
                    Some(record.call_number.as_str()),
                    Some(record.item_parts().as_str()),
                ])),
            };
        }
        let class_key = normalize(&record.call_number, algorithm);
        let item_key = normalize_generic(&record.item_parts());
        join_present([Some(class_key.as_str()), Some(item_key.as_str())])
    }

    fn display_value(&self, record: &CallNumberRecord) -> String {
        record.full_call_number()
    }

    fn type_id(&self, record: &CallNumberRecord) -> Option<String> {
        record.type_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_follow_algorithm() {
        let mut record = CallNumberRecord::new("i1", "college", "PR9199.3 .L33");
        record.prefix = Some("OVERSIZE".to_string());
        record.volume = Some("v.2".to_string());

        let domain = CallNumberDomain;
        assert_eq!(domain.extract_key(&record, ShelvingAlgorithm::Lc), "PR 49199.3 L33 V 000002");
        assert_eq!(domain.display_value(&record), "OVERSIZE PR9199.3 .L33");
    }

    #[test]
    fn generic_keys_share_one_scale_with_anchors() {
        let bare = CallNumberRecord::new("i1", "college", "QA 76 .B2");
        let mut ordered = CallNumberRecord::new("i2", "college", "ignored");
        ordered.effective_shelving_order = Some("qa 76 b2".to_string());
        let mut blank = CallNumberRecord::new("i3", "college", "QA 80 .C3");
        blank.effective_shelving_order = Some("  ".to_string());

        let domain = CallNumberDomain;
        let anchor = domain.anchor_key(" QA 76 .B2 ", ShelvingAlgorithm::Generic);
        assert_eq!(anchor, "QA 000076 B 000002");
        assert_eq!(domain.extract_key(&bare, ShelvingAlgorithm::Generic), anchor);
        assert_eq!(domain.extract_key(&ordered, ShelvingAlgorithm::Generic), anchor);
        assert_eq!(
            domain.extract_key(&blank, ShelvingAlgorithm::Generic),
            "QA 000080 C 000003"
        );
    }

    #[test]
    fn generic_keys_are_stable_under_renormalization() {
        let key = CallNumberDomain.anchor_key("E 3184 S75 1234", ShelvingAlgorithm::Generic);
        assert_eq!(key, "E 003184 S 000075 001234");
        assert_eq!(CallNumberDomain.anchor_key(&key, ShelvingAlgorithm::Generic), key);
    }
}
