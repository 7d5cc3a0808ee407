use crate::sbom_conversion::domain::{FormatTarget, WireFormat};
use std::path::PathBuf;

/// ConversionRequest - Internal request DTO for the conversion use case
///
/// The input format may be given explicitly or left to detection from the
/// filename. The input version is never given: decoders read it from the
/// document itself.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Raw input document
    pub input: Vec<u8>,
    /// Filename the input was read from, used for format detection
    pub input_filename: Option<PathBuf>,
    /// Explicit input format, overriding detection
    pub input_format: Option<WireFormat>,
    /// Requested output format and version
    pub output: FormatTarget,
}

impl ConversionRequest {
    pub fn new(input: Vec<u8>, output: FormatTarget) -> Self {
        Self {
            input,
            input_filename: None,
            input_format: None,
            output,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.input_filename = Some(filename.into());
        self
    }

    pub fn with_input_format(mut self, format: WireFormat) -> Self {
        self.input_format = Some(format);
        self
    }
}
