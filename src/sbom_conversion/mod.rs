/// Conversion domain layer - BOM model, versions, formats and the pure
/// services (encoding detection, version downgrade) that operate on them.
pub mod domain;
pub mod services;
