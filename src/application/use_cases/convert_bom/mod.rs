use crate::application::dto::{ConversionRequest, ConversionResponse};
use crate::application::factories::CodecRegistry;
use crate::ports::inbound::BomConversionPort;
use crate::ports::outbound::ProgressReporter;
use crate::sbom_conversion::domain::{Bom, FormatTarget, SpecVersion, WireFormat};
use crate::sbom_conversion::services::{DowngradeChain, EncodingDetector};
use crate::shared::error::SbomError;
use crate::shared::ConvertResult;
use log::debug;

/// ConvertBomUseCase - Core use case for BOM conversion
///
/// Decodes the input into the canonical model at the newest schema version,
/// walks the downgrade chain down to the requested version and encodes the
/// result. Every failure is detected before any output is produced.
///
/// # Type Parameters
/// * `PR` - ProgressReporter implementation
pub struct ConvertBomUseCase<PR> {
    registry: CodecRegistry,
    progress_reporter: PR,
}

impl<PR> ConvertBomUseCase<PR>
where
    PR: ProgressReporter,
{
    /// Creates a new ConvertBomUseCase with injected dependencies
    pub fn new(registry: CodecRegistry, progress_reporter: PR) -> Self {
        Self {
            registry,
            progress_reporter,
        }
    }

    /// Executes the conversion use case
    ///
    /// # Arguments
    /// * `request` - Input bytes plus the requested output pair
    ///
    /// # Returns
    /// ConversionResponse carrying the encoded output
    pub fn execute(&self, request: ConversionRequest) -> ConvertResult<ConversionResponse> {
        // Step 1: Resolve the input format without looking at the bytes
        let source_format = self.resolve_input_format(&request)?;

        // Step 2: Reject unsupported output pairs before parsing anything
        let target = request.output;
        if !self.registry.supports_encode(target) {
            return Err(SbomError::unsupported_target(target));
        }
        let steps = Self::downgrade_distance(target)?;

        // Step 3: Decode into the canonical model
        let bom = self.decode_and_report(&request.input, source_format)?;

        // Step 4: Walk down to the target schema version
        let bom = self.downgrade_with_progress(bom, steps);

        // Step 5: Encode
        let content = self.registry.encode(&bom, target)?;
        self.progress_reporter
            .report_completion(&format!("✅ Converted {} input to {}", source_format, target));

        Ok(ConversionResponse::new(content, source_format, target, steps))
    }

    /// Explicit format wins; otherwise the format is detected from the filename
    fn resolve_input_format(&self, request: &ConversionRequest) -> ConvertResult<WireFormat> {
        let format = match (request.input_format, &request.input_filename) {
            (Some(format), _) => format,
            (None, Some(filename)) => {
                let detected = EncodingDetector::detect(filename);
                debug!("Detected {} from {}", detected, filename.display());
                detected
            }
            (None, None) => WireFormat::Unsupported,
        };

        if !self.registry.supports_decode(format) {
            return Err(SbomError::UnsupportedFormat {
                format,
                version: None,
            });
        }
        Ok(format)
    }

    /// Number of downgrade steps from the newest version to the target's
    fn downgrade_distance(target: FormatTarget) -> ConvertResult<usize> {
        let to = target.schema_version();
        SpecVersion::NEWEST
            .index()
            .checked_sub(to.index())
            .ok_or_else(|| SbomError::InvalidRequest {
                reason: format!(
                    "Target version {} is newer than the newest supported version {}",
                    to,
                    SpecVersion::NEWEST
                ),
            })
    }

    fn decode_and_report(&self, input: &[u8], format: WireFormat) -> ConvertResult<Bom> {
        self.progress_reporter
            .report(&format!("📖 Reading {} BOM ({} bytes)", format, input.len()));

        let bom = self.registry.decode(input, format)?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} component(s)",
            bom.flattened_components().len()
        ));
        Ok(bom)
    }

    fn downgrade_with_progress(&self, mut bom: Bom, steps: usize) -> Bom {
        for step in 1..=steps {
            let from = bom.spec_version;
            bom = DowngradeChain::downgrade(bom);
            let message = format!("{} -> {}", from, bom.spec_version);
            self.progress_reporter
                .report_progress(step, steps, Some(&message));
        }
        bom
    }
}

impl<PR> BomConversionPort for ConvertBomUseCase<PR>
where
    PR: ProgressReporter,
{
    fn convert(&self, request: ConversionRequest) -> ConvertResult<ConversionResponse> {
        self.execute(request)
    }

    fn supported_targets(&self) -> Vec<FormatTarget> {
        self.registry.encodable_targets()
    }
}

#[cfg(test)]
mod tests;
