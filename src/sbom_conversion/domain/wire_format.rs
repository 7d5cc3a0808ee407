use super::spec_version::{SpdxVersion, SpecVersion};
use crate::shared::error::SbomError;
use std::fmt;
use std::str::FromStr;

/// Byte-level encoding of a BOM, independent of its schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireFormat {
    /// CycloneDX JSON
    Json,
    /// CycloneDX XML
    Xml,
    /// SPDX tag-value
    SpdxTag,
    /// Flat component table
    Csv,
    /// No known encoding
    Unsupported,
}

impl WireFormat {
    /// Formats that have a real encoding, in display order
    pub const SUPPORTED: [WireFormat; 4] = [
        WireFormat::Json,
        WireFormat::Xml,
        WireFormat::SpdxTag,
        WireFormat::Csv,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WireFormat::Json => "json",
            WireFormat::Xml => "xml",
            WireFormat::SpdxTag => "spdxtag",
            WireFormat::Csv => "csv",
            WireFormat::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(WireFormat::Json),
            "xml" => Ok(WireFormat::Xml),
            "spdxtag" | "spdx" => Ok(WireFormat::SpdxTag),
            "csv" => Ok(WireFormat::Csv),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json', 'xml', 'spdxtag' or 'csv'",
                s
            )),
        }
    }
}

/// The version axis a wire format is qualified with
///
/// CycloneDX encodings follow the BOM schema version, while SPDX tag-value
/// documents carry their own SPDX version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    Schema(SpecVersion),
    TagValue(SpdxVersion),
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::Schema(v) => write!(f, "{}", v),
            FormatVersion::TagValue(v) => write!(f, "{}", v),
        }
    }
}

/// A (wire format, version) pair an encoder is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatTarget {
    pub format: WireFormat,
    pub version: FormatVersion,
}

impl FormatTarget {
    pub fn new(format: WireFormat, version: FormatVersion) -> Self {
        Self { format, version }
    }

    pub fn schema(format: WireFormat, version: SpecVersion) -> Self {
        Self::new(format, FormatVersion::Schema(version))
    }

    pub fn tag_value(version: SpdxVersion) -> Self {
        Self::new(WireFormat::SpdxTag, FormatVersion::TagValue(version))
    }

    /// The newest version on the format's own version axis
    pub fn default_for(format: WireFormat) -> Self {
        match format {
            WireFormat::SpdxTag => Self::tag_value(SpdxVersion::default()),
            WireFormat::Json | WireFormat::Xml | WireFormat::Csv | WireFormat::Unsupported => {
                Self::schema(format, SpecVersion::NEWEST)
            }
        }
    }

    /// Builds a target from a format and an optional version string
    ///
    /// The string is read on the format's own axis: an SPDX version for
    /// tag-value, a schema version otherwise. A schema version given for
    /// tag-value names a pair that can never be encoded.
    pub fn parse(format: WireFormat, version: Option<&str>) -> Result<Self, SbomError> {
        let Some(version) = version else {
            return Ok(Self::default_for(format));
        };
        match format {
            WireFormat::SpdxTag => match version.parse::<SpdxVersion>() {
                Ok(spdx) => Ok(Self::tag_value(spdx)),
                Err(err) => match version.parse::<SpecVersion>() {
                    Ok(schema) => Err(SbomError::UnsupportedFormat {
                        format,
                        version: Some(FormatVersion::Schema(schema)),
                    }),
                    Err(_) => Err(err),
                },
            },
            WireFormat::Json | WireFormat::Xml | WireFormat::Csv | WireFormat::Unsupported => {
                Ok(Self::schema(format, version.parse()?))
            }
        }
    }

    /// The schema version the document must be at when it is encoded
    ///
    /// Tag-value output is always produced from the newest document.
    pub fn schema_version(&self) -> SpecVersion {
        match self.version {
            FormatVersion::Schema(v) => v,
            FormatVersion::TagValue(_) => SpecVersion::NEWEST,
        }
    }
}

impl fmt::Display for FormatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.format, self.version)
    }
}
