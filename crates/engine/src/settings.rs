use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 100;
pub const DEFAULT_MIN_FETCH_SIZE: usize = 0;
pub const DEFAULT_MAX_FETCH_ROUNDS: usize = 64;

/// Markup placed around the exact anchor match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
        }
    }
}

impl HighlightMarker {
    #[must_use]
    pub fn wrap(&self, value: &str) -> String {
        format!("{}{}{}", self.open, value, self.close)
    }
}

/// Service-wide knobs, loaded from TOML (or JSON) with defaults for every key.
///
/// ```toml
/// default_limit = 20
/// max_limit = 100
/// min_fetch_size = 50
/// max_fetch_rounds = 64
///
/// [highlight]
/// open = "<mark>"
/// close = "</mark>"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    pub default_limit: usize,
    pub max_limit: usize,
    /// Lower bound on the page size asked from the port.
    pub min_fetch_size: usize,
    /// Upper bound on port round trips per side of one browse.
    pub max_fetch_rounds: usize,
    pub highlight: HighlightMarker,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            min_fetch_size: DEFAULT_MIN_FETCH_SIZE,
            max_fetch_rounds: DEFAULT_MAX_FETCH_ROUNDS,
            highlight: HighlightMarker::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    default_limit: Option<usize>,
    max_limit: Option<usize>,
    min_fetch_size: Option<usize>,
    max_fetch_rounds: Option<usize>,
    highlight: Option<RawHighlight>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHighlight {
    open: Option<String>,
    close: Option<String>,
}

impl EngineSettings {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: RawSettings = match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(json_err) => toml::from_str(raw).map_err(|toml_err| {
                anyhow!("Settings are not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
            })?,
        };
        let settings = Self::merge(parsed);
        settings.validate()?;
        Ok(settings)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings =
            Self::parse(&raw).with_context(|| format!("Invalid settings {}", path.display()))?;
        log::debug!("Loaded engine settings from {}", path.display());
        Ok(settings)
    }

    fn merge(raw: RawSettings) -> Self {
        let defaults = Self::default();
        let highlight = raw.highlight.unwrap_or_default();
        Self {
            default_limit: raw.default_limit.unwrap_or(defaults.default_limit),
            max_limit: raw.max_limit.unwrap_or(defaults.max_limit),
            min_fetch_size: raw.min_fetch_size.unwrap_or(defaults.min_fetch_size),
            max_fetch_rounds: raw.max_fetch_rounds.unwrap_or(defaults.max_fetch_rounds),
            highlight: HighlightMarker {
                open: highlight.open.unwrap_or(defaults.highlight.open),
                close: highlight.close.unwrap_or(defaults.highlight.close),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_limit == 0 {
            return Err(anyhow!("max_limit must be positive"));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(anyhow!(
                "default_limit must be between 1 and max_limit ({})",
                self.max_limit
            ));
        }
        if self.max_fetch_rounds == 0 {
            return Err(anyhow!("max_fetch_rounds must be positive"));
        }
        Ok(())
    }
}
