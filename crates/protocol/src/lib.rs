use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod browse;
pub mod filters;
mod items;

pub use browse::{BrowseField, BrowseMode, BrowseOptionId};
pub use filters::{record_allowed, Predicate, TenantScope};
pub use items::{BrowseItem, BrowseResult};

pub const ERROR_CODE_VALIDATION: &str = "validation_error";
pub const ERROR_CODE_UPSTREAM: &str = "upstream_failure";
pub const ERROR_CODE_INTERNAL: &str = "internal";

/// Structured error body returned to callers (the HTTP 400/500 payload).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn validation(parameter: &str, value: &str, message: impl Into<String>) -> Self {
        Self {
            code: ERROR_CODE_VALIDATION.to_string(),
            message: message.into(),
            details: Some(serde_json::json!({
                "parameters": [{ "key": parameter, "value": value }]
            })),
            hint: None,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.code == ERROR_CODE_VALIDATION
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validation_envelope_lists_parameter() {
        let envelope = ErrorEnvelope::validation(
            "precedingRecordsCount",
            "5",
            "Value must be less than limit",
        );
        assert!(envelope.is_validation());
        let raw = serialize_json(&envelope).unwrap();
        assert_eq!(
            raw,
            r#"{"code":"validation_error","message":"Value must be less than limit","details":{"parameters":[{"key":"precedingRecordsCount","value":"5"}]},"hint":null}"#
        );
    }
}
