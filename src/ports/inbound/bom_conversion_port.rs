use crate::application::dto::{ConversionRequest, ConversionResponse};
use crate::sbom_conversion::domain::FormatTarget;
use crate::shared::ConvertResult;

/// BomConversionPort - Inbound port for the conversion use case
///
/// This port defines the interface that external adapters (CLI, API, etc.)
/// use to trigger a conversion. It represents the application's public API.
pub trait BomConversionPort {
    /// Converts a document to the requested format and version
    ///
    /// # Errors
    /// Returns an error if:
    /// - The input format is unknown or cannot be detected
    /// - The requested output pair is not supported
    /// - The input cannot be parsed
    /// - The requested output version is newer than the newest known version
    fn convert(&self, request: ConversionRequest) -> ConvertResult<ConversionResponse>;

    /// Every (format, version) pair the port can produce, sorted
    fn supported_targets(&self) -> Vec<FormatTarget>;
}
