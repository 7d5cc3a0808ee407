use crate::sbom_conversion::domain::{FormatTarget, WireFormat};

/// ConversionResponse - Internal response DTO from the conversion use case
#[derive(Debug, Clone)]
pub struct ConversionResponse {
    /// The encoded output document
    pub content: Vec<u8>,
    /// The format the input was decoded from
    pub source_format: WireFormat,
    /// The format and version the output was encoded as
    pub target: FormatTarget,
    /// Number of downgrade steps applied between decode and encode
    pub steps_applied: usize,
}

impl ConversionResponse {
    pub fn new(
        content: Vec<u8>,
        source_format: WireFormat,
        target: FormatTarget,
        steps_applied: usize,
    ) -> Self {
        Self {
            content,
            source_format,
            target,
            steps_applied,
        }
    }
}
