use super::error::SbomError;

/// Type alias for Result with anyhow::Error as the error type.
/// This provides a consistent error handling pattern across the binary side
/// of the codebase (CLI, config, file I/O).
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Result of a conversion-core operation, carrying the typed error so callers
/// can tell unsupported formats, parse failures and invalid requests apart.
pub type ConvertResult<T> = std::result::Result<T, SbomError>;
