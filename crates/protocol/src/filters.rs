use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whose records a request may see.
///
/// A member tenant sees its own records plus shared ones. A central
/// (consortium) tenant sees shared records and every member's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantScope {
    pub tenant_id: String,
    #[serde(default)]
    pub central: bool,
}

impl TenantScope {
    pub fn member(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            central: false,
        }
    }

    pub fn central(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            central: true,
        }
    }

    #[must_use]
    pub fn allows(&self, record_tenant: &str, shared: bool) -> bool {
        self.central || shared || record_tenant == self.tenant_id
    }
}

/// Record-level filter applied by the query adapter before windowing.
///
/// Mirrors the CQL clauses the browse endpoints accept, e.g.
/// `instances.shared==true` or `instances.tenantId==college`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    Shared(bool),
    TenantId(String),
    TypeIdIn(Vec<String>),
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, record_tenant: &str, shared: bool, type_id: Option<&str>) -> bool {
        match self {
            Self::Shared(expected) => shared == *expected,
            Self::TenantId(tenant) => record_tenant == tenant,
            Self::TypeIdIn(ids) => {
                ids.is_empty() || type_id.is_some_and(|t| ids.iter().any(|id| id == t))
            }
        }
    }
}

/// Scope check plus every predicate (conjunction).
#[must_use]
pub fn record_allowed(
    scope: &TenantScope,
    predicates: &[Predicate],
    record_tenant: &str,
    shared: bool,
    type_id: Option<&str>,
) -> bool {
    scope.allows(record_tenant, shared)
        && predicates
            .iter()
            .all(|p| p.matches(record_tenant, shared, type_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_scope_sees_own_and_shared() {
        let scope = TenantScope::member("college");
        assert!(scope.allows("college", false));
        assert!(scope.allows("university", true));
        assert!(!scope.allows("university", false));
    }

    #[test]
    fn central_scope_sees_everything() {
        let scope = TenantScope::central("consortium");
        assert!(scope.allows("college", false));
        assert!(scope.allows("university", false));
        assert!(scope.allows("consortium", true));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let scope = TenantScope::central("consortium");
        let predicates = vec![
            Predicate::Shared(false),
            Predicate::TenantId("college".to_string()),
        ];
        assert!(record_allowed(&scope, &predicates, "college", false, None));
        assert!(!record_allowed(&scope, &predicates, "college", true, None));
        assert!(!record_allowed(&scope, &predicates, "university", false, None));
    }

    #[test]
    fn empty_type_set_means_all_types() {
        let scope = TenantScope::member("college");
        let any = vec![Predicate::TypeIdIn(Vec::new())];
        assert!(record_allowed(&scope, &any, "college", false, None));
        let dewey = vec![Predicate::TypeIdIn(vec!["dewey".to_string()])];
        assert!(record_allowed(&scope, &dewey, "college", false, Some("dewey")));
        assert!(!record_allowed(&scope, &dewey, "college", false, Some("lc")));
        assert!(!record_allowed(&scope, &dewey, "college", false, None));
    }
}
