use crate::domain::{BrowseDomain, CatalogRecord};
use browse_protocol::BrowseField;
use browse_shelf_key::{normalize_heading, ShelvingAlgorithm};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn one() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub shared: bool,
    pub value: String,
    #[serde(default)]
    pub authority_id: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default = "one")]
    pub instance_count: u64,
}

impl CatalogRecord for SubjectRecord {
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

/// Subject headings. Algorithms do not apply; keys are folded headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectDomain;

impl BrowseDomain for SubjectDomain {
    type Record = SubjectRecord;

    fn field(&self) -> BrowseField {
        BrowseField::Subject
    }

    fn extract_key(&self, record: &SubjectRecord, _algorithm: ShelvingAlgorithm) -> String {
        normalize_heading(&record.value)
    }

    fn display_value(&self, record: &SubjectRecord) -> String {
        record.value.trim().to_string()
    }

    fn type_id(&self, record: &SubjectRecord) -> Option<String> {
        record.type_id.clone()
    }

    fn anchor_key(&self, raw: &str, _algorithm: ShelvingAlgorithm) -> String {
        normalize_heading(raw)
    }

    fn record_count(&self, record: &SubjectRecord) -> u64 {
        record.instance_count
    }

    // An authority-controlled spelling represents the heading when present.
    fn project_representative(&self, group: &[SubjectRecord]) -> Option<SubjectRecord> {
        group
            .iter()
            .find(|record| record.authority_id.is_some())
            .or_else(|| group.first())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn subject(id: &str, value: &str, authority_id: Option<&str>, count: u64) -> SubjectRecord {
        SubjectRecord {
            id: id.to_string(),
            tenant_id: "college".to_string(),
            shared: false,
            value: value.to_string(),
            authority_id: authority_id.map(str::to_string),
            source_id: None,
            type_id: None,
            instance_count: count,
        }
    }

    #[test]
    fn headings_fold_case_and_punctuation() {
        let a = subject("s1", "World War, 1939-1945.", None, 1);
        let b = subject("s2", "world war, 1939-1945", None, 1);
        assert_eq!(
            SubjectDomain.extract_key(&a, ShelvingAlgorithm::Generic),
            SubjectDomain.extract_key(&b, ShelvingAlgorithm::Lc)
        );
    }

    #[test]
    fn authorized_spelling_represents_group() {
        let group = vec![
            subject("s1", "Rivers.", None, 3),
            subject("s2", "Rivers", Some("auth-1"), 2),
        ];
        assert_eq!(SubjectDomain.aggregate_count(&group), 5);
        let representative = SubjectDomain.project_representative(&group).unwrap();
        assert_eq!(representative.id, "s2");
    }
}
