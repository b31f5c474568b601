use crate::domain::{BrowseDomain, CatalogRecord};
use browse_protocol::BrowseField;
use browse_shelf_key::{normalize_heading, ShelvingAlgorithm};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AuthRefType {
    Authorized,
    Reference,
    #[serde(rename = "Auth/Ref")]
    AuthRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityRecord {
    pub id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub shared: bool,
    pub heading_ref: String,
    /// Heading family, e.g. "Personal Name" or "Topical".
    pub heading_type: String,
    pub auth_ref_type: AuthRefType,
    #[serde(default)]
    pub number_of_titles: u64,
}

impl CatalogRecord for AuthorityRecord {
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
pub struct AuthorityDomain;

impl BrowseDomain for AuthorityDomain {
    type Record = AuthorityRecord;

    fn field(&self) -> BrowseField {
        BrowseField::Authority
    }

    fn extract_key(&self, record: &AuthorityRecord, _algorithm: ShelvingAlgorithm) -> String {
        normalize_heading(&record.heading_ref)
    }

    fn display_value(&self, record: &AuthorityRecord) -> String {
        record.heading_ref.trim().to_string()
    }

    fn type_id(&self, record: &AuthorityRecord) -> Option<String> {
        Some(record.heading_type.clone())
    }

    fn anchor_key(&self, raw: &str, _algorithm: ShelvingAlgorithm) -> String {
        normalize_heading(raw)
    }

    fn record_count(&self, record: &AuthorityRecord) -> u64 {
        record.number_of_titles
    }

    fn project_representative(&self, group: &[AuthorityRecord]) -> Option<AuthorityRecord> {
        group
            .iter()
            .find(|record| record.auth_ref_type == AuthRefType::Authorized)
            .or_else(|| group.first())
            .cloned()
    }
}
