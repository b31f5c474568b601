use crate::domain::{BrowseDomain, CatalogRecord};
use browse_protocol::BrowseField;
use browse_shelf_key::{normalize, ShelvingAlgorithm};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One classification number attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    pub id: String,
    pub instance_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub shared: bool,
    pub classification_number: String,
    #[serde(default)]
    pub classification_type_id: Option<String>,
}

impl CatalogRecord for ClassificationRecord {
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
pub struct ClassificationDomain;

impl BrowseDomain for ClassificationDomain {
    type Record = ClassificationRecord;

    fn field(&self) -> BrowseField {
        BrowseField::Classification
    }

    fn extract_key(&self, record: &ClassificationRecord, algorithm: ShelvingAlgorithm) -> String {
        normalize(&record.classification_number, algorithm)
    }

    fn display_value(&self, record: &ClassificationRecord) -> String {
        record.classification_number.trim().to_string()
    }

    fn type_id(&self, record: &ClassificationRecord) -> Option<String> {
        record.classification_type_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dewey_key() {
        let record = ClassificationRecord {
            id: "c1".to_string(),
            instance_id: "in1".to_string(),
            tenant_id: "college".to_string(),
            shared: false,
            classification_number: "308 H977".to_string(),
            classification_type_id: Some("dewey".to_string()),
        };
        assert_eq!(
            ClassificationDomain.extract_key(&record, ShelvingAlgorithm::Dewey),
            "3308 H977"
        );
        assert_eq!(ClassificationDomain.type_id(&record).as_deref(), Some("dewey"));
    }
}
