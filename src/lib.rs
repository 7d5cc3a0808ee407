//! bom-convert - CycloneDX SBOM format and version conversion
//!
//! This library converts Software Bills of Materials between wire formats
//! (CycloneDX JSON, CycloneDX XML, SPDX tag-value, CSV) and downgrades them
//! between CycloneDX schema versions, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_conversion`): The canonical BOM model, versions,
//!   formats and the pure downgrade and detection services
//! - **Application Layer** (`application`): The conversion use case and the
//!   codec registry
//! - **Ports** (`ports`): Interface definitions for codecs and infrastructure
//! - **Adapters** (`adapters`): Concrete codecs, file and console adapters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use bom_convert::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let reader = FileSystemReader::new(PathBuf::from("bom.json"));
//! let (input, filename) = reader.read_bom()?;
//!
//! // Create use case
//! let use_case = ConvertBomUseCase::new(CodecRegistry::standard(), StderrProgressReporter::new());
//!
//! // Execute
//! let target = FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_0);
//! let mut request = ConversionRequest::new(input, target);
//! if let Some(filename) = filename {
//!     request = request.with_filename(filename);
//! }
//! let response = use_case.execute(request)?;
//!
//! // Present output
//! StdoutPresenter::new().present(&response.content)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_conversion;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::codecs::{CsvCodec, JsonCodec, SpdxTagCodec, XmlCodec};
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdinReader, StdoutPresenter,
    };
    pub use crate::application::dto::{ConversionRequest, ConversionResponse};
    pub use crate::application::factories::{
        CodecRegistry, CodecRegistryBuilder, InputSource, IoFactory, OutputSink,
    };
    pub use crate::application::use_cases::ConvertBomUseCase;
    pub use crate::ports::inbound::BomConversionPort;
    pub use crate::ports::outbound::{
        BomDecoder, BomEncoder, BomReader, OutputPresenter, ProgressReporter,
    };
    pub use crate::sbom_conversion::domain::{
        Bom, Component, ComponentType, FormatTarget, FormatVersion, Hash, LicenseChoice,
        SpdxVersion, SpecVersion, WireFormat,
    };
    pub use crate::sbom_conversion::services::{DowngradeChain, EncodingDetector};
    pub use crate::shared::error::SbomError;
    pub use crate::shared::{ConvertResult, Result};
}
