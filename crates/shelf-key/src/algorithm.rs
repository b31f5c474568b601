use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shelving scheme used to turn a raw classification value into a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShelvingAlgorithm {
    Lc,
    Dewey,
    Nlm,
    Sudoc,
    Local,
    Generic,
}

impl ShelvingAlgorithm {
    pub const ALL: [ShelvingAlgorithm; 6] = [
        Self::Lc,
        Self::Dewey,
        Self::Nlm,
        Self::Sudoc,
        Self::Local,
        Self::Generic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lc => "LC",
            Self::Dewey => "DEWEY",
            Self::Nlm => "NLM",
            Self::Sudoc => "SUDOC",
            Self::Local => "LOCAL",
            Self::Generic => "GENERIC",
        }
    }

    /// Scheme-specific normalizer. Every entry is a pure function that never fails.
    #[must_use]
    pub fn normalizer(self) -> fn(&str) -> String {
        match self {
            Self::Lc => crate::lc::normalize_lc,
            Self::Nlm => crate::lc::normalize_nlm,
            Self::Dewey => crate::dewey::normalize_dewey,
            Self::Sudoc => crate::sudoc::normalize_sudoc,
            Self::Local => crate::generic::normalize_local,
            Self::Generic => crate::generic::normalize_generic,
        }
    }
}

impl fmt::Display for ShelvingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shelving algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for ShelvingAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LC" => Ok(Self::Lc),
            "DEWEY" => Ok(Self::Dewey),
            "NLM" => Ok(Self::Nlm),
            "SUDOC" => Ok(Self::Sudoc),
            "LOCAL" | "OTHER" => Ok(Self::Local),
            "GENERIC" | "DEFAULT" => Ok(Self::Generic),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("lc".parse::<ShelvingAlgorithm>(), Ok(ShelvingAlgorithm::Lc));
        assert_eq!(" Other ".parse::<ShelvingAlgorithm>(), Ok(ShelvingAlgorithm::Local));
        assert_eq!("default".parse::<ShelvingAlgorithm>(), Ok(ShelvingAlgorithm::Generic));
        assert!("bliss".parse::<ShelvingAlgorithm>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        let raw = serde_json::to_string(&ShelvingAlgorithm::Sudoc).unwrap();
        assert_eq!(raw, "\"SUDOC\"");
        let back: ShelvingAlgorithm = serde_json::from_str("\"DEWEY\"").unwrap();
        assert_eq!(back, ShelvingAlgorithm::Dewey);
    }
}
