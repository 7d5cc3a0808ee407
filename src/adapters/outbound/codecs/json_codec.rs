use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_conversion::domain::{Bom, FormatTarget, SpecVersion, WireFormat};
use crate::shared::error::SbomError;
use crate::shared::ConvertResult;
use serde::Serialize;
use serde_json::Value;

const BOM_FORMAT: &str = "CycloneDX";

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "bomFormat")]
    bom_format: &'static str,
    #[serde(flatten)]
    bom: &'a Bom,
}

/// JsonCodec adapter for CycloneDX JSON
///
/// CycloneDX only defines a JSON encoding from 1.2 onwards, so both
/// directions are limited to `JsonCodec::VERSIONS`.
pub struct JsonCodec {
    version: SpecVersion,
}

impl JsonCodec {
    /// Schema versions with a JSON encoding
    pub const VERSIONS: [SpecVersion; 2] = [SpecVersion::V1_2, SpecVersion::V1_3];

    /// Creates a codec whose encoder writes `version` documents
    pub fn new(version: SpecVersion) -> Self {
        Self { version }
    }

    fn read_spec_version(value: &Value) -> ConvertResult<SpecVersion> {
        let raw = value
            .get("specVersion")
            .and_then(Value::as_str)
            .ok_or_else(|| SbomError::parse(WireFormat::Json, "Missing specVersion"))?;

        let version: SpecVersion = raw
            .parse()
            .map_err(|e| SbomError::parse(WireFormat::Json, e))?;
        if !Self::VERSIONS.contains(&version) {
            return Err(SbomError::parse(
                WireFormat::Json,
                format!(
                    "CycloneDX {} has no JSON encoding; JSON documents must be 1.2 or 1.3",
                    version
                ),
            ));
        }
        Ok(version)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(SpecVersion::NEWEST)
    }
}

impl BomDecoder for JsonCodec {
    fn decode(&self, data: &[u8]) -> ConvertResult<Bom> {
        let mut value: Value =
            serde_json::from_slice(data).map_err(|e| SbomError::parse(WireFormat::Json, e))?;

        let Some(object) = value.as_object_mut() else {
            return Err(SbomError::parse(
                WireFormat::Json,
                "Top-level value is not an object",
            ));
        };
        match object.remove("bomFormat") {
            Some(Value::String(format)) if format == BOM_FORMAT => {}
            Some(other) => {
                return Err(SbomError::parse(
                    WireFormat::Json,
                    format!("bomFormat must be \"{}\", found {}", BOM_FORMAT, other),
                ))
            }
            None => return Err(SbomError::parse(WireFormat::Json, "Missing bomFormat")),
        }

        // 1.2 is a structural subset of 1.3, so the same model reads both
        Self::read_spec_version(&value)?;
        let mut bom: Bom =
            serde_json::from_value(value).map_err(|e| SbomError::parse(WireFormat::Json, e))?;
        bom.spec_version = SpecVersion::NEWEST;
        Ok(bom)
    }
}

impl BomEncoder for JsonCodec {
    fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>> {
        let envelope = Envelope {
            bom_format: BOM_FORMAT,
            bom,
        };
        let mut output = serde_json::to_vec_pretty(&envelope).map_err(|e| SbomError::Encode {
            target: FormatTarget::schema(WireFormat::Json, self.version),
            details: e.to_string(),
        })?;
        output.push(b'\n');
        Ok(output)
    }
}
