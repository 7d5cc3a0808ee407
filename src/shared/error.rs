use crate::sbom_conversion::domain::{FormatTarget, FormatVersion, WireFormat};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the document was converted
    Success = 0,
    /// The conversion itself failed (unsupported format, parse error, invalid request)
    ConversionFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (file I/O error, config error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Picks the exit code for an error surfaced at the binary boundary
    pub fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<SbomError>() {
            Some(e) if e.is_conversion_error() => ExitCode::ConversionFailed,
            _ => ExitCode::ApplicationError,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ConversionFailed => write!(f, "Conversion Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for BOM conversion.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Unsupported BOM format: {}\n\n💡 Hint: {}", describe_pair(.format, .version), unsupported_hint(.format))]
    UnsupportedFormat {
        format: WireFormat,
        version: Option<FormatVersion>,
    },

    #[error("Failed to parse {format} BOM\nDetails: {details}\n\n💡 Hint: Please verify that the input is a well-formed {format} document")]
    Parse { format: WireFormat, details: String },

    #[error("Failed to encode BOM as {target}\nDetails: {details}")]
    Encode { target: FormatTarget, details: String },

    #[error("Invalid conversion request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    #[error("Invalid config: {message}\n\n💡 Hint: {hint}")]
    Config { message: String, hint: String },
}

impl SbomError {
    /// Shorthand for a parse failure reported by a codec
    pub fn parse(format: WireFormat, details: impl fmt::Display) -> Self {
        SbomError::Parse {
            format,
            details: details.to_string(),
        }
    }

    pub fn unsupported_target(target: FormatTarget) -> Self {
        SbomError::UnsupportedFormat {
            format: target.format,
            version: Some(target.version),
        }
    }

    /// True for failures of the conversion itself rather than of the
    /// surrounding I/O
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            SbomError::UnsupportedFormat { .. }
                | SbomError::Parse { .. }
                | SbomError::Encode { .. }
                | SbomError::InvalidRequest { .. }
        )
    }
}

fn describe_pair(format: &WireFormat, version: &Option<FormatVersion>) -> String {
    match version {
        Some(version) => format!("{}/{}", format, version),
        None => format.to_string(),
    }
}

fn unsupported_hint(format: &WireFormat) -> &'static str {
    match format {
        WireFormat::Unsupported => {
            "The input format could not be detected from the file extension. Use --input-format to specify it"
        }
        WireFormat::Json | WireFormat::Xml | WireFormat::SpdxTag | WireFormat::Csv => {
            "Run with --list-formats to see every supported format/version pair"
        }
    }
}
