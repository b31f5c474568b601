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
pub struct ContributorRecord {
    pub id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub shared: bool,
    pub name: String,
    #[serde(default)]
    pub contributor_name_type_id: Option<String>,
    #[serde(default)]
    pub contributor_type_ids: Vec<String>,
    #[serde(default)]
    pub authority_id: Option<String>,
    #[serde(default = "one")]
    pub instance_count: u64,
}

impl CatalogRecord for ContributorRecord {
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
pub struct ContributorDomain;

impl BrowseDomain for ContributorDomain {
    type Record = ContributorRecord;

    fn field(&self) -> BrowseField {
        BrowseField::Contributor
    }

    fn extract_key(&self, record: &ContributorRecord, _algorithm: ShelvingAlgorithm) -> String {
        normalize_heading(&record.name)
    }

    fn display_value(&self, record: &ContributorRecord) -> String {
        record.name.trim().to_string()
    }

    fn type_id(&self, record: &ContributorRecord) -> Option<String> {
        record.contributor_name_type_id.clone()
    }

    fn anchor_key(&self, raw: &str, _algorithm: ShelvingAlgorithm) -> String {
        normalize_heading(raw)
    }

    fn record_count(&self, record: &ContributorRecord) -> u64 {
        record.instance_count
    }

    /// Keeps the first record but carries the union of every member's
    /// contributor type ids.
    fn project_representative(&self, group: &[ContributorRecord]) -> Option<ContributorRecord> {
        let mut representative = group.first()?.clone();
        for record in &group[1..] {
            for type_id in &record.contributor_type_ids {
                if !representative.contributor_type_ids.contains(type_id) {
                    representative.contributor_type_ids.push(type_id.clone());
                }
            }
        }
        Some(representative)
    }
}
