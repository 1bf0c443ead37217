use serde::{Deserialize, Serialize};

use crate::foundation::error::{RasterError, RasterResult};

/// How coordinates outside the raster are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Out-of-range coordinates are an error.
    #[default]
    Error,
    /// Out-of-range coordinates are skipped.
    Discard,
    /// Coordinates wrap around with floored modulo.
    Wrap,
    /// The plane is tiled with alternately flipped copies of the raster.
    Mirror,
}

/// Name table. The first entry for each policy is its canonical name.
const NAMES: &[(&str, OverflowPolicy)] = &[
    ("error", OverflowPolicy::Error),
    ("ignore", OverflowPolicy::Discard),
    ("discard", OverflowPolicy::Discard),
    ("wrap", OverflowPolicy::Wrap),
    ("mirror", OverflowPolicy::Mirror),
];

impl OverflowPolicy {
    /// All policies in declaration order.
    pub const ALL: [Self; 4] = [Self::Error, Self::Discard, Self::Wrap, Self::Mirror];

    /// Canonical name of this policy.
    pub fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Discard => "ignore",
            Self::Wrap => "wrap",
            Self::Mirror => "mirror",
        }
    }

    /// Resolve a canonical name or alias.
    pub fn from_name(name: &str) -> RasterResult<Self> {
        NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| *p)
            .ok_or_else(|| RasterError::UnknownPolicy {
                name: name.to_owned(),
                known: known_names().collect(),
            })
    }
}

/// Every accepted name, canonical names and aliases alike.
pub fn known_names() -> impl Iterator<Item = &'static str> {
    NAMES.iter().map(|(n, _)| *n)
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl Serialize for OverflowPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for OverflowPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_name(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/policy/overflow.rs"]
mod tests;
