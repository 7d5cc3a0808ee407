use crate::sbom_conversion::domain::Bom;
use crate::shared::ConvertResult;

/// BomDecoder port for parsing a wire format into the canonical model
///
/// One decoder exists per wire format. A decoder reads every version of its
/// format it understands and returns the document upgraded to
/// `SpecVersion::NEWEST`; upgrading is the decoder's own job.
pub trait BomDecoder {
    /// Parses raw document bytes
    ///
    /// # Errors
    /// Returns `SbomError::Parse` if the bytes are not a well-formed document
    /// of this format, or declare a version this decoder does not read
    fn decode(&self, data: &[u8]) -> ConvertResult<Bom>;
}

/// BomEncoder port for writing the canonical model to a wire format
///
/// Each encoder instance is bound to a single (format, version) pair and
/// expects the document to already be at the matching schema version.
pub trait BomEncoder {
    /// Serializes the document
    ///
    /// # Errors
    /// Returns `SbomError::Encode` if serialization fails
    fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>>;
}
