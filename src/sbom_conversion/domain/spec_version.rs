use crate::shared::error::SbomError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// CycloneDX schema version
///
/// Versions are totally ordered, oldest first. `SpecVersion::NEWEST` is the
/// version every decoded document is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
}

impl SpecVersion {
    /// All known versions, oldest first
    pub const ALL: [SpecVersion; 4] = [
        SpecVersion::V1_0,
        SpecVersion::V1_1,
        SpecVersion::V1_2,
        SpecVersion::V1_3,
    ];

    /// The canonical version documents are held at while being converted
    pub const NEWEST: SpecVersion = SpecVersion::V1_3;

    /// The position of this version in [`SpecVersion::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The adjacent older version, `None` for the oldest
    pub fn previous(self) -> Option<SpecVersion> {
        self.index()
            .checked_sub(1)
            .map(|i| SpecVersion::ALL[i])
    }

    /// The version string as written in documents ("1.2")
    pub fn as_str(self) -> &'static str {
        match self {
            SpecVersion::V1_0 => "1.0",
            SpecVersion::V1_1 => "1.1",
            SpecVersion::V1_2 => "1.2",
            SpecVersion::V1_3 => "1.3",
        }
    }

    fn known_versions() -> String {
        SpecVersion::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SpecVersion {
    fn default() -> Self {
        SpecVersion::NEWEST
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecVersion {
    type Err = SbomError;

    /// Accepts "1.2", "v1.2", "v1_2" and "1_2"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_start_matches(&['v', 'V'][..])
            .replace('_', ".");

        if let Some(version) = SpecVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
        {
            return Ok(version);
        }

        let newest = parse_major_minor(SpecVersion::NEWEST.as_str());
        let reason = match parse_major_minor(&normalized) {
            Some(requested) if Some(requested) > newest => format!(
                "Schema version {} is newer than the newest supported version {}. Upgrading documents is not supported.",
                s.trim(),
                SpecVersion::NEWEST
            ),
            _ => format!(
                "Unknown schema version '{}'. Known versions: {}",
                s.trim(),
                SpecVersion::known_versions()
            ),
        };
        Err(SbomError::InvalidRequest { reason })
    }
}

fn parse_major_minor(s: &str) -> Option<(u32, u32)> {
    let (major, minor) = s.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

impl Serialize for SpecVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SpecVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// SPDX tag-value document version
///
/// The tag-value format carries its own version axis, unrelated to
/// [`SpecVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SpdxVersion {
    V2_1,
    #[default]
    V2_2,
}

impl SpdxVersion {
    pub const ALL: [SpdxVersion; 2] = [SpdxVersion::V2_1, SpdxVersion::V2_2];

    /// The value of the `SPDXVersion:` tag
    pub fn as_tag(self) -> &'static str {
        match self {
            SpdxVersion::V2_1 => "SPDX-2.1",
            SpdxVersion::V2_2 => "SPDX-2.2",
        }
    }
}

impl fmt::Display for SpdxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for SpdxVersion {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed
            .strip_prefix("SPDX-")
            .or_else(|| trimmed.strip_prefix("spdx-"))
            .unwrap_or(trimmed)
            .trim_start_matches(&['v', 'V'][..])
            .replace('_', ".");

        match normalized.as_str() {
            "2.1" => Ok(SpdxVersion::V2_1),
            "2.2" => Ok(SpdxVersion::V2_2),
            _ => Err(SbomError::InvalidRequest {
                reason: format!(
                    "Unknown SPDX version '{}'. Known versions: 2.1, 2.2",
                    trimmed
                ),
            }),
        }
    }
}
