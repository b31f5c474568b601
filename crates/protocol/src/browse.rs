use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparator set of a browse request.
///
/// `Around` corresponds to `field >= anchor or field < anchor`; `AroundExclusive`
/// to `field > anchor or field < anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrowseMode {
    Around,
    AroundExclusive,
    Forward,
    ForwardInclusive,
    Backward,
    BackwardInclusive,
}

impl BrowseMode {
    #[must_use]
    pub const fn is_around(self) -> bool {
        matches!(self, Self::Around | Self::AroundExclusive)
    }

    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward | Self::ForwardInclusive)
    }

    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::Backward | Self::BackwardInclusive)
    }

    /// Whether the comparator reaches the anchor value itself.
    #[must_use]
    pub const fn includes_anchor(self) -> bool {
        matches!(
            self,
            Self::Around | Self::ForwardInclusive | Self::BackwardInclusive
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Around => "AROUND",
            Self::AroundExclusive => "AROUND_EXCLUSIVE",
            Self::Forward => "FORWARD",
            Self::ForwardInclusive => "FORWARD_INCLUSIVE",
            Self::Backward => "BACKWARD",
            Self::BackwardInclusive => "BACKWARD_INCLUSIVE",
        }
    }
}

impl fmt::Display for BrowseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "AROUND" | "AROUND_INCLUDING" | "AROUND_INCLUSIVE" => Ok(Self::Around),
            "AROUND_EXCLUSIVE" => Ok(Self::AroundExclusive),
            "FORWARD" => Ok(Self::Forward),
            "FORWARD_INCLUSIVE" | "FORWARD_INCLUDING" => Ok(Self::ForwardInclusive),
            "BACKWARD" => Ok(Self::Backward),
            "BACKWARD_INCLUSIVE" | "BACKWARD_INCLUDING" => Ok(Self::BackwardInclusive),
            _ => Err(format!("unknown browse mode '{s}'")),
        }
    }
}

/// The browsable record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BrowseField {
    CallNumber,
    Classification,
    Subject,
    Contributor,
    Authority,
}

impl BrowseField {
    pub const ALL: [BrowseField; 5] = [
        Self::CallNumber,
        Self::Classification,
        Self::Subject,
        Self::Contributor,
        Self::Authority,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CallNumber => "callNumber",
            Self::Classification => "classification",
            Self::Subject => "subject",
            Self::Contributor => "contributor",
            Self::Authority => "authority",
        }
    }

    /// Whether the field browses classification values and therefore honours
    /// browse options and shelving algorithms.
    #[must_use]
    pub const fn is_typed(self) -> bool {
        matches!(self, Self::CallNumber | Self::Classification)
    }
}

impl fmt::Display for BrowseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowseField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown browse field '{s}'"))
    }
}

/// Name of a configured browse option (`ALL`, `LC`, `DEWEY`, ...), stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct BrowseOptionId(String);

impl<'de> Deserialize<'de> for BrowseOptionId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl BrowseOptionId {
    pub const ALL: &'static str = "ALL";

    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_uppercase())
    }

    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BrowseOptionId {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for BrowseOptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
